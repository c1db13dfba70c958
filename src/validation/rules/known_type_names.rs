use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Type conditions of fragments must name types of the schema.
#[derive(Clone, Copy, Debug, Default)]
pub struct KnownTypeNames;

pub fn factory() -> KnownTypeNames {
    KnownTypeNames
}

impl RuleStep for KnownTypeNames {
    fn rule_number(&self) -> &'static str {
        "5.5.1.2"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Fragment-Spread-Type-Existence"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[
            RuleScope::Part(DocumentPartType::NamedFragment),
            RuleScope::Part(DocumentPartType::InlineFragment),
        ]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let type_name = match ctx.document().part(id).kind {
            PartKind::NamedFragment { type_condition, .. }
            | PartKind::InlineFragment {
                type_condition: Some(type_condition),
            } => type_condition,
            _ => return true,
        };
        if ctx.schema().concrete_type_by_name(type_name).is_some() {
            return true;
        }

        ctx.report_error(self.reference(), id, error_message(type_name));
        false
    }
}

fn error_message(type_name: impl fmt::Display) -> String {
    format!(r#"Unknown type "{type_name}""#)
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn known_type_names_are_valid() {
        expect_passes_rule(
            factory,
            r#"
          query Foo($var: String, $required: [String!]!) {
            user(id: 4) {
              pets { ... on Pet { name }, ...PetFields, ... { name } }
            }
          }
          fragment PetFields on Pet {
            name
          }
        "#,
        );
    }

    #[test]
    fn unknown_type_names_are_invalid() {
        expect_fails_rule(
            factory,
            r#"
          query Foo {
            user(id: 4) {
              name
              pets { ... on Badger { name }, ...PetFields }
            }
          }
          fragment PetFields on Peettt {
            name
          }
        "#,
            &[
                error_message("Badger").as_str(),
                error_message("Peettt").as_str(),
            ],
        );
    }

    #[test]
    fn built_in_scalars_are_known() {
        expect_passes_rule(factory, "fragment F on String { __typename }");
    }
}
