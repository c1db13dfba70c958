use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Operations must be of a type the schema has a root type for.
#[derive(Clone, Copy, Debug, Default)]
pub struct SupportedOperationTypes;

pub fn factory() -> SupportedOperationTypes {
    SupportedOperationTypes
}

impl RuleStep for SupportedOperationTypes {
    fn rule_number(&self) -> &'static str {
        "5.2"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Validation.Operations"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::Operation)]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(part) = ctx.part() else {
            return true;
        };
        let PartKind::Operation { operation_type, .. } = part.kind else {
            return true;
        };
        if part.graph_type.is_some() {
            return true;
        }

        let message = error_message(&operation_type.to_string());
        if let Some(id) = ctx.active_part() {
            ctx.report_error(self.reference(), id, message);
        }
        false
    }
}

fn error_message(operation_type: &str) -> String {
    format!("Schema does not support {operation_type} operations")
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        ast::Type,
        schema::{
            meta::{Field, ObjectMeta},
            model::SchemaType,
        },
        validation::{
            expect_fails_rule_with_schema, expect_passes_rule, expect_passes_rule_with_schema,
        },
    };

    fn query_only_schema() -> SchemaType {
        SchemaType::new("Query")
            .register(ObjectMeta::new("Query", &[Field::new("a", Type::named("Int"))]).into_meta())
            .build()
            .expect("valid schema")
    }

    #[test]
    fn all_roots_supported() {
        expect_passes_rule(
            factory,
            r#"
          query Q { dog { name } }
          mutation M { testInput }
          subscription S { newDog { name } }
        "#,
        );
    }

    #[test]
    fn declared_mutation_root_supported() {
        let schema = SchemaType::new("Query")
            .mutation("Mutation")
            .register(ObjectMeta::new("Query", &[Field::new("a", Type::named("Int"))]).into_meta())
            .register(
                ObjectMeta::new("Mutation", &[Field::new("b", Type::named("Int"))]).into_meta(),
            )
            .build()
            .expect("valid schema");

        expect_passes_rule_with_schema(&schema, factory, "mutation M { b }");
    }

    #[test]
    fn unsupported_roots() {
        expect_fails_rule_with_schema(
            &query_only_schema(),
            factory,
            r#"
          { a }
          mutation M { a }
          subscription { a }
        "#,
            &[
                error_message("mutation").as_str(),
                error_message("subscription").as_str(),
            ],
        );
    }
}
