use std::fmt;

use crate::{
    ast::Type,
    document::{DocumentPartType, PartKind, SuppliedValueKind},
    schema::meta::MetaType,
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Input object values must supply every required field of their type.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequiredInputFields;

pub fn factory() -> RequiredInputFields {
    RequiredInputFields
}

impl RuleStep for RequiredInputFields {
    fn rule_number(&self) -> &'static str {
        "5.6.4"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Input-Object-Required-Fields"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::SuppliedValue)]
    }

    fn should_execute(&self, ctx: &DocumentValidationContext<'_, '_>) -> bool {
        ctx.part().is_some_and(|p| {
            p.value_kind() == Some(SuppliedValueKind::Complex)
                && matches!(p.graph_type, Some(MetaType::InputObject(_)))
        })
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let Some(input_type) = document.part(id).graph_type else {
            return true;
        };
        let provided = document
            .children(id)
            .iter()
            .filter_map(|&c| match document.part(c).kind {
                PartKind::InputObjectField { name, .. } => Some(name),
                _ => None,
            })
            .collect::<Vec<_>>();

        let messages = input_type
            .input_fields()
            .iter()
            .filter(|f| f.is_required() && !provided.contains(&f.name.as_str()))
            .map(|f| error_message(input_type.name(), &f.name, &f.arg_type))
            .collect::<Vec<_>>();

        let passed = messages.is_empty();
        for message in messages {
            ctx.report_error(self.reference(), id, message);
        }
        passed
    }
}

fn error_message(
    type_name: impl fmt::Display,
    field_name: impl fmt::Display,
    field_type: &Type,
) -> String {
    format!(r#"Field "{type_name}.{field_name}" of required type "{field_type}" was not provided"#)
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        ast::Type,
        validation::{expect_fails_rule, expect_passes_rule},
    };

    #[test]
    fn all_required_fields_provided() {
        expect_passes_rule(
            factory,
            r#"
          {
            complicatedArgs {
              complexArgField(complexArg: { requiredField: true })
            }
          }
        "#,
        );
    }

    #[test]
    fn explicit_null_is_provided() {
        expect_passes_rule(
            factory,
            r#"
          {
            complicatedArgs {
              complexArgField(complexArg: { requiredField: null })
            }
          }
        "#,
        );
    }

    #[test]
    fn missing_required_field() {
        expect_fails_rule(
            factory,
            r#"
          {
            complicatedArgs {
              complexArgField(complexArg: { intField: 4 })
            }
          }
        "#,
            &[error_message("ComplexInput", "requiredField", &Type::non_null_named("Boolean")).as_str()],
        );
    }

    #[test]
    fn missing_multiple_required_fields() {
        expect_fails_rule(
            factory,
            r#"
          mutation {
            testInput(input: {})
          }
        "#,
            &[
                error_message("TestInput", "id", &Type::non_null_named("Int")).as_str(),
                error_message("TestInput", "name", &Type::non_null_named("String")).as_str(),
            ],
        );
    }
}
