use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Non-repeatable directives must be applied at most once per location.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniqueDirectivesPerLocation;

pub fn factory() -> UniqueDirectivesPerLocation {
    UniqueDirectivesPerLocation
}

impl RuleStep for UniqueDirectivesPerLocation {
    fn rule_number(&self) -> &'static str {
        "5.7.3"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Directives-Are-Unique-Per-Location"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::Directive)]
    }

    fn should_execute(&self, ctx: &DocumentValidationContext<'_, '_>) -> bool {
        ctx.part().is_some_and(|p| {
            matches!(
                p.kind,
                PartKind::Directive {
                    directive: Some(d),
                    ..
                } if !d.is_repeatable,
            )
        })
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let PartKind::Directive { name, .. } = document.part(id).kind else {
            return true;
        };
        let repeated = document
            .directive_siblings(id)
            .into_iter()
            .take_while(|&s| s != id)
            .any(|s| matches!(document.part(s).kind, PartKind::Directive { name: n, .. } if n == name));
        if !repeated {
            return true;
        }

        ctx.report_error(self.reference(), id, error_message(name));
        false
    }
}

fn error_message(directive_name: impl fmt::Display) -> String {
    format!(r#"The directive "@{directive_name}" can only be used once at this location"#)
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn no_directives() {
        expect_passes_rule(factory, "fragment Test on Dog { name }");
    }

    #[test]
    fn unique_directives_in_different_locations() {
        expect_passes_rule(
            factory,
            r#"
          fragment Test on Dog @onFragmentDefinition {
            name @skip(if: true)
          }
        "#,
        );
    }

    #[test]
    fn same_directives_in_different_locations() {
        expect_passes_rule(
            factory,
            r#"
          query Q($a: Boolean @onVariable, $b: Boolean @onVariable) {
            dog @skip(if: true) {
              name @skip(if: true)
            }
          }
        "#,
        );
    }

    #[test]
    fn repeatable_directives() {
        expect_passes_rule(
            factory,
            r#"
          query Q($a: Boolean @tag(name: "a") @tag(name: "b")) {
            dog @tag(name: "a") @tag(name: "b") { name }
          }
        "#,
        );
    }

    #[test]
    fn unknown_directives_are_ignored() {
        expect_passes_rule(factory, "{ dog @unknown @unknown { name } }");
    }

    #[test]
    fn duplicate_directives_in_one_location() {
        expect_fails_rule(
            factory,
            r#"
          fragment Test on Dog {
            name @skip(if: true) @skip(if: false)
          }
        "#,
            &[error_message("skip").as_str()],
        );
    }

    #[test]
    fn many_duplicate_directives_in_one_location() {
        expect_fails_rule(
            factory,
            r#"
          fragment Test on Dog {
            name @skip(if: true) @skip(if: true) @skip(if: true)
          }
        "#,
            &[error_message("skip").as_str(), error_message("skip").as_str()],
        );
    }

    #[test]
    fn duplicate_directives_on_variable_and_operation() {
        expect_fails_rule(
            factory,
            r#"
          query Q($a: Boolean @onVariable @onVariable) @onQuery @onQuery {
            dog { name }
          }
        "#,
            &[error_message("onVariable").as_str(), error_message("onQuery").as_str()],
        );
    }
}
