use std::fmt;

use crate::{
    document::{PartId, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Fragment spreads must not form cycles.
///
/// Every spread leading back to the fragment it's part of is reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFragmentCycles;

pub fn factory() -> NoFragmentCycles {
    NoFragmentCycles
}

impl RuleStep for NoFragmentCycles {
    fn rule_number(&self) -> &'static str {
        "5.5.2.2"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Fragment-spreads-must-not-form-cycles"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Document]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let document = ctx.document();
        let mut cyclic: Vec<(PartId, &str)> = vec![];

        for &fragment in document.named_fragments() {
            let PartKind::NamedFragment { name, .. } = document.part(fragment).kind else {
                continue;
            };
            // Redefinitions are reported elsewhere, and never spread.
            if document.named_fragment(name) != Some(fragment) {
                continue;
            }

            for spread in document.descendants(fragment) {
                let Some(spread_name) = document.spread_name(spread) else {
                    continue;
                };
                let Some(target) = document.named_fragment(spread_name) else {
                    continue;
                };
                if target == fragment || document.reachable_fragments(target).contains(&fragment) {
                    cyclic.push((spread, spread_name));
                }
            }
        }

        let passed = cyclic.is_empty();
        for (id, name) in cyclic {
            ctx.report_error(self.reference(), id, error_message(name));
        }
        passed
    }
}

fn error_message(frag_name: impl fmt::Display) -> String {
    format!(r#"Cannot spread fragment "{frag_name}""#)
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn single_reference_is_valid() {
        expect_passes_rule(
            factory,
            r#"
          fragment fragA on Dog { ...fragB }
          fragment fragB on Dog { name }
        "#,
        );
    }

    #[test]
    fn spreading_twice_is_not_circular() {
        expect_passes_rule(
            factory,
            r#"
          fragment fragA on Dog { ...fragB, ...fragB }
          fragment fragB on Dog { name }
        "#,
        );
    }

    #[test]
    fn spreading_twice_indirectly_is_not_circular() {
        expect_passes_rule(
            factory,
            r#"
          fragment fragA on Dog { ...fragB, ...fragC }
          fragment fragB on Dog { ...fragC }
          fragment fragC on Dog { name }
        "#,
        );
    }

    #[test]
    fn double_spread_within_abstract_types() {
        expect_passes_rule(
            factory,
            r#"
          fragment nameFragment on Pet {
            ... on Dog { name }
            ... on Cat { name }
          }

          fragment spreadsInAnon on Pet {
            ... on Dog { ...nameFragment }
            ... on Cat { ...nameFragment }
          }
        "#,
        );
    }

    #[test]
    fn does_not_false_positive_on_unknown_fragment() {
        expect_passes_rule(
            factory,
            r#"
          fragment nameFragment on Pet {
            ...UnknownFragment
          }
        "#,
        );
    }

    #[test]
    fn spreading_recursively_within_field_fails() {
        expect_fails_rule(
            factory,
            r#"
          fragment fragA on Human { relatives { ...fragA } },
        "#,
            &[error_message("fragA").as_str()],
        );
    }

    #[test]
    fn no_spreading_itself_directly() {
        expect_fails_rule(
            factory,
            r#"
          fragment fragA on Dog { ...fragA }
        "#,
            &[error_message("fragA").as_str()],
        );
    }

    #[test]
    fn no_spreading_itself_directly_within_inline_fragment() {
        expect_fails_rule(
            factory,
            r#"
          fragment fragA on Pet {
            ... on Dog {
              ...fragA
            }
          }
        "#,
            &[error_message("fragA").as_str()],
        );
    }

    #[test]
    fn no_spreading_itself_indirectly() {
        expect_fails_rule(
            factory,
            r#"
          fragment fragA on Dog { ...fragB }
          fragment fragB on Dog { ...fragA }
        "#,
            &[error_message("fragB").as_str(), error_message("fragA").as_str()],
        );
    }

    #[test]
    fn no_spreading_itself_deeply() {
        expect_fails_rule(
            factory,
            r#"
          fragment fragA on Dog { ...fragB }
          fragment fragB on Dog { ...fragC }
          fragment fragC on Dog { ...fragA, ...fragD }
          fragment fragD on Dog { name }
        "#,
            &[
                error_message("fragB").as_str(),
                error_message("fragC").as_str(),
                error_message("fragA").as_str(),
            ],
        );
    }

    #[test]
    fn cycles_are_reported_once_per_spread() {
        expect_fails_rule(
            factory,
            r#"
          fragment fragA on Dog { ...fragB }
          fragment fragB on Dog { ...fragB }
        "#,
            &[error_message("fragB").as_str()],
        );
    }
}
