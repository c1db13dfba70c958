use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

use super::parent_type;

/// Selected fields must be defined on the type they're selected on.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldsOnCorrectType;

pub fn factory() -> FieldsOnCorrectType {
    FieldsOnCorrectType
}

impl RuleStep for FieldsOnCorrectType {
    fn rule_number(&self) -> &'static str {
        "5.3.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Field-Selections"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::Field)]
    }

    fn should_execute(&self, ctx: &DocumentValidationContext<'_, '_>) -> bool {
        // Fields of unknown types are reported elsewhere.
        ctx.active_part()
            .is_some_and(|id| parent_type(ctx.document(), id).is_some())
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let PartKind::Field {
            name, field: None, ..
        } = document.part(id).kind
        else {
            return true;
        };
        let Some(parent) = parent_type(document, id) else {
            return true;
        };

        let message = error_message(name, parent.name());
        ctx.report_error(self.reference(), id, message);
        false
    }
}

fn error_message(field: impl fmt::Display, type_name: impl fmt::Display) -> String {
    format!(r#"Unknown field "{field}" on type "{type_name}""#)
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        parser::SourceLocation,
        validation::{expect_fails_rule, expect_passes_rule},
    };

    #[test]
    fn selection_on_object() {
        expect_passes_rule(
            factory,
            r#"
          fragment objectFieldSelection on Dog {
            __typename
            name
          }
        "#,
        );
    }

    #[test]
    fn aliased_selection_on_object() {
        expect_passes_rule(
            factory,
            r#"
          fragment aliasedObjectFieldSelection on Dog {
            tn : __typename
            otherName : name
          }
        "#,
        );
    }

    #[test]
    fn selection_on_interface() {
        expect_passes_rule(
            factory,
            r#"
          fragment interfaceFieldSelection on Pet {
            __typename
            name
          }
        "#,
        );
    }

    #[test]
    fn lying_alias_selection() {
        expect_passes_rule(
            factory,
            r#"
          fragment lyingAliasSelection on Dog {
            name : nickname
          }
        "#,
        );
    }

    #[test]
    fn ignores_unknown_type() {
        expect_passes_rule(
            factory,
            r#"
          fragment unknownSelection on UnknownType {
            unknownField
          }
        "#,
        );
    }

    #[test]
    fn nested_unknown_fields() {
        let errs = expect_fails_rule(
            factory,
            "fragment typeKnownAgain on Pet {\n  unknown_pet_field {\n    ... on Cat {\n      unknown_cat_field\n    }\n  }\n}",
            &[
                error_message("unknown_pet_field", "Pet").as_str(),
                error_message("unknown_cat_field", "Cat").as_str(),
            ],
        );

        assert_eq!(errs[0].location(), SourceLocation::new(35, 1, 2));
        assert_eq!(
            errs[0].origin().path().to_string(),
            "fragment typeKnownAgain/unknown_pet_field",
        );
    }

    #[test]
    fn unknown_field_on_fragment() {
        expect_fails_rule(
            factory,
            r#"
          fragment fieldNotDefined on Dog {
            meowVolume
          }
        "#,
            &[error_message("meowVolume", "Dog").as_str()],
        );
    }

    #[test]
    fn unknown_aliased_target() {
        expect_fails_rule(
            factory,
            r#"
          fragment aliasedFieldTargetNotDefined on Dog {
            volume : mooVolume
          }
        "#,
            &[error_message("mooVolume", "Dog").as_str()],
        );
    }

    #[test]
    fn not_defined_on_interface() {
        expect_fails_rule(
            factory,
            r#"
          fragment notDefinedOnInterface on Pet {
            tailLength
          }
        "#,
            &[error_message("tailLength", "Pet").as_str()],
        );
    }

    #[test]
    fn defined_in_concrete_types_but_not_interface() {
        expect_fails_rule(
            factory,
            r#"
          fragment definedOnImplementorsButNotInterface on Pet {
            nickname
          }
        "#,
            &[error_message("nickname", "Pet").as_str()],
        );
    }

    #[test]
    fn meta_field_on_union() {
        expect_passes_rule(
            factory,
            r#"
          fragment metaFieldOnUnion on CatOrDog {
            __typename
          }
        "#,
        );
    }

    #[test]
    fn fields_on_union() {
        expect_fails_rule(
            factory,
            r#"
          fragment definedOnImplementorsQueriedOnUnion on CatOrDog {
            name
          }
        "#,
            &[error_message("name", "CatOrDog").as_str()],
        );
    }

    #[test]
    fn valid_field_in_inline_fragment() {
        expect_passes_rule(
            factory,
            r#"
          fragment objectFieldSelection on Pet {
            ... on Dog {
              name
            }
            ... {
              name
            }
          }
        "#,
        );
    }
}
