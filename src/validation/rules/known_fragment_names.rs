use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Spread fragments must be defined in the document.
#[derive(Clone, Copy, Debug, Default)]
pub struct KnownFragmentNames;

pub fn factory() -> KnownFragmentNames {
    KnownFragmentNames
}

impl RuleStep for KnownFragmentNames {
    fn rule_number(&self) -> &'static str {
        "5.5.2.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Fragment-spread-target-defined"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::FragmentSpread)]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let PartKind::FragmentSpread { name } = document.part(id).kind else {
            return true;
        };
        if document.named_fragment(name).is_some() {
            return true;
        }

        ctx.report_error(self.reference(), id, error_message(name));
        false
    }
}

fn error_message(frag_name: impl fmt::Display) -> String {
    format!(r#"Unknown fragment: "{frag_name}""#)
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        parser::SourceLocation,
        validation::{expect_fails_rule, expect_passes_rule},
    };

    #[test]
    fn known() {
        expect_passes_rule(
            factory,
            r#"
          {
            human(id: 4) {
              ...HumanFields1
              ... on Human {
                ...HumanFields2
              }
              ... {
                name
              }
            }
          }
          fragment HumanFields1 on Human {
            name
            ...HumanFields3
          }
          fragment HumanFields2 on Human {
            name
          }
          fragment HumanFields3 on Human {
            name
          }
        "#,
        );
    }

    #[test]
    fn unknown() {
        let errs = expect_fails_rule(
            factory,
            "{\n  human(id: 4) {\n    ...UnknownFragment1\n    ... on Human {\n      ...UnknownFragment2\n    }\n  }\n}\nfragment HumanFields on Human {\n  name\n  ...UnknownFragment3\n}",
            &[
                error_message("UnknownFragment1").as_str(),
                error_message("UnknownFragment2").as_str(),
                error_message("UnknownFragment3").as_str(),
            ],
        );

        assert_eq!(errs[0].location(), SourceLocation::new(23, 2, 4));
        assert_eq!(
            errs[1].origin().path().to_string(),
            "query/human/... on Human/...UnknownFragment2",
        );
    }
}
