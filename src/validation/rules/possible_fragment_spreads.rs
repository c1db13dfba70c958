use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

use super::parent_type;

/// Fragments must only be spread where their type condition may apply.
#[derive(Clone, Copy, Debug, Default)]
pub struct PossibleFragmentSpreads;

pub fn factory() -> PossibleFragmentSpreads {
    PossibleFragmentSpreads
}

impl RuleStep for PossibleFragmentSpreads {
    fn rule_number(&self) -> &'static str {
        "5.5.2.3"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Fragment-spread-is-possible"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[
            RuleScope::Part(DocumentPartType::FragmentSpread),
            RuleScope::Part(DocumentPartType::InlineFragment),
        ]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let part = document.part(id);
        let (Some(frag_type), Some(parent_type)) = (part.graph_type, parent_type(document, id))
        else {
            return true;
        };
        if !frag_type.is_composite()
            || !parent_type.is_composite()
            || ctx.schema().type_overlap(parent_type, frag_type)
        {
            return true;
        }

        let message = match part.kind {
            PartKind::FragmentSpread { name } => {
                error_message(Some(name), parent_type.name(), frag_type.name())
            }
            _ => error_message(None, parent_type.name(), frag_type.name()),
        };
        ctx.report_error(self.reference(), id, message);
        false
    }
}

fn error_message(
    frag_name: Option<&str>,
    parent_type_name: impl fmt::Display,
    frag_type: impl fmt::Display,
) -> String {
    if let Some(frag_name) = frag_name {
        format!(
            "Fragment \"{frag_name}\" cannot be spread here as objects of type \
             \"{parent_type_name}\" can never be of type \"{frag_type}\"",
        )
    } else {
        format!(
            "Fragment cannot be spread here as objects of type \"{parent_type_name}\" \
             can never be of type \"{frag_type}\"",
        )
    }
}
