use std::fmt;

use fnv::FnvHashSet;

use crate::{
    document::PartKind,
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Named fragments must have distinct names.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniqueFragmentNames;

pub fn factory() -> UniqueFragmentNames {
    UniqueFragmentNames
}

impl RuleStep for UniqueFragmentNames {
    fn rule_number(&self) -> &'static str {
        "5.5.1.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Fragment-Name-Uniqueness"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Document]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let document = ctx.document();
        let mut seen = FnvHashSet::default();
        let duplicates = document
            .named_fragments()
            .iter()
            .filter_map(|&id| match document.part(id).kind {
                PartKind::NamedFragment { name, .. } => (!seen.insert(name)).then_some((id, name)),
                _ => None,
            })
            .collect::<Vec<_>>();

        let passed = duplicates.is_empty();
        for (id, name) in duplicates {
            ctx.report_error(self.reference(), id, error_message(name));
        }
        passed
    }
}

fn error_message(frag_name: impl fmt::Display) -> String {
    format!(r#"There can only be one fragment named "{frag_name}""#)
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        parser::SourceLocation,
        validation::{expect_fails_rule, expect_passes_rule},
    };

    #[test]
    fn no_fragments() {
        expect_passes_rule(factory, "{ dog { name } }");
    }

    #[test]
    fn one_fragment() {
        expect_passes_rule(
            factory,
            r#"
          {
            dog { ...fragA }
          }

          fragment fragA on Dog {
            name
          }
        "#,
        );
    }

    #[test]
    fn many_fragments() {
        expect_passes_rule(
            factory,
            r#"
          {
            dog { ...fragA ...fragB ...fragC }
          }
          fragment fragA on Dog { name }
          fragment fragB on Dog { nickname }
          fragment fragC on Dog { barkVolume }
        "#,
        );
    }

    #[test]
    fn inline_fragments_always_unique() {
        expect_passes_rule(
            factory,
            r#"
          {
            dogOrHuman {
              ...on Dog { name }
              ...on Dog { barkVolume }
            }
          }
        "#,
        );
    }

    #[test]
    fn fragment_and_operation_named_the_same() {
        expect_passes_rule(
            factory,
            r#"
          query Foo { dog { ...Foo } }
          fragment Foo on Dog { name }
        "#,
        );
    }

    #[test]
    fn fragments_named_the_same() {
        let errs = expect_fails_rule(
            factory,
            "{ dog { ...fragA } }\nfragment fragA on Dog { name }\nfragment fragA on Dog { barks }",
            &[error_message("fragA").as_str()],
        );

        assert_eq!(errs[0].location(), SourceLocation::new(52, 2, 0));
    }

    #[test]
    fn fragments_named_the_same_no_reference() {
        expect_fails_rule(
            factory,
            r#"
          fragment fragA on Dog { name }
          fragment fragA on Dog { barks }
          fragment fragA on Dog { nickname }
        "#,
            &[error_message("fragA").as_str(), error_message("fragA").as_str()],
        );
    }
}
