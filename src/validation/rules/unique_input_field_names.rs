use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

use super::has_earlier_sibling;

/// An input object value must not supply the same field twice.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniqueInputFieldNames;

pub fn factory() -> UniqueInputFieldNames {
    UniqueInputFieldNames
}

impl RuleStep for UniqueInputFieldNames {
    fn rule_number(&self) -> &'static str {
        "5.6.3"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Input-Object-Field-Uniqueness"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::InputObjectField)]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let PartKind::InputObjectField { name, .. } = document.part(id).kind else {
            return true;
        };
        let duplicated = has_earlier_sibling(document, id, |c| match document.part(c).kind {
            PartKind::InputObjectField { name, .. } => Some(name),
            _ => None,
        });
        if !duplicated {
            return true;
        }

        ctx.report_error(self.reference(), id, error_message(name));
        false
    }
}

fn error_message(field_name: impl fmt::Display) -> String {
    format!(r#"There can only be one input field named "{field_name}""#)
}
