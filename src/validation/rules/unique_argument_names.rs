use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

use super::has_earlier_sibling;

/// A field or directive must not be supplied the same argument twice.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniqueArgumentNames;

pub fn factory() -> UniqueArgumentNames {
    UniqueArgumentNames
}

impl RuleStep for UniqueArgumentNames {
    fn rule_number(&self) -> &'static str {
        "5.4.2"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Argument-Uniqueness"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::InputArgument)]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let PartKind::InputArgument { name, .. } = document.part(id).kind else {
            return true;
        };
        let duplicated = has_earlier_sibling(document, id, |c| match document.part(c).kind {
            PartKind::InputArgument { name, .. } => Some(name),
            _ => None,
        });
        if !duplicated {
            return true;
        }

        ctx.report_error(self.reference(), id, error_message(name));
        false
    }
}

fn error_message(arg_name: impl fmt::Display) -> String {
    format!(r#"There can only be one argument named "{arg_name}""#)
}
