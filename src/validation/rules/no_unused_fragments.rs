use std::fmt;

use fnv::FnvHashSet;

use crate::{
    document::PartKind,
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Every named fragment must be spread, directly or not, by an operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoUnusedFragments;

pub fn factory() -> NoUnusedFragments {
    NoUnusedFragments
}

impl RuleStep for NoUnusedFragments {
    fn rule_number(&self) -> &'static str {
        "5.5.1.4"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Fragments-Must-Be-Used"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Document]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let document = ctx.document();
        let used = document
            .operations()
            .iter()
            .flat_map(|&op| document.reachable_fragments(op))
            .filter_map(|f| match document.part(f).kind {
                PartKind::NamedFragment { name, .. } => Some(name),
                _ => None,
            })
            .collect::<FnvHashSet<_>>();
        let unused = document
            .named_fragments()
            .iter()
            .filter_map(|&id| match document.part(id).kind {
                PartKind::NamedFragment { name, .. } if !used.contains(name) => Some((id, name)),
                _ => None,
            })
            .collect::<Vec<_>>();

        let passed = unused.is_empty();
        for (id, name) in unused {
            ctx.report_error(self.reference(), id, error_message(name));
        }
        passed
    }
}

fn error_message(frag_name: impl fmt::Display) -> String {
    format!(r#"Fragment "{frag_name}" is never used"#)
}
