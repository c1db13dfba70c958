use fnv::FnvHashSet;

use crate::{
    document::PartKind,
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Named operations must have distinct names.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniqueOperationNames;

pub fn factory() -> UniqueOperationNames {
    UniqueOperationNames
}

impl RuleStep for UniqueOperationNames {
    fn rule_number(&self) -> &'static str {
        "5.2.1.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Operation-Name-Uniqueness"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Document]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let document = ctx.document();
        let mut seen = FnvHashSet::default();
        let duplicates = document
            .operations()
            .iter()
            .filter_map(|&id| match document.part(id).kind {
                PartKind::Operation { name: Some(name), .. } => {
                    (!seen.insert(name)).then_some((id, name))
                }
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

fn error_message(op_name: &str) -> String {
    format!("There can only be one operation named \"{op_name}\"")
}
