use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Fragments may only condition on object, interface or union types.
#[derive(Clone, Copy, Debug, Default)]
pub struct FragmentsOnCompositeTypes;

pub fn factory() -> FragmentsOnCompositeTypes {
    FragmentsOnCompositeTypes
}

impl RuleStep for FragmentsOnCompositeTypes {
    fn rule_number(&self) -> &'static str {
        "5.5.1.3"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Fragments-On-Composite-Types"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[
            RuleScope::Part(DocumentPartType::NamedFragment),
            RuleScope::Part(DocumentPartType::InlineFragment),
        ]
    }

    fn should_execute(&self, ctx: &DocumentValidationContext<'_, '_>) -> bool {
        ctx.part()
            .and_then(|p| p.graph_type)
            .is_some_and(|t| !t.is_composite())
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let part = ctx.document().part(id);
        let Some(type_name) = part.graph_type.map(|t| t.name().to_owned()) else {
            return true;
        };

        let message = match part.kind {
            PartKind::NamedFragment { name, .. } => error_message(Some(name), &type_name),
            PartKind::InlineFragment {
                type_condition: Some(_),
            } => error_message(None, &type_name),
            _ => return true,
        };
        ctx.report_error(self.reference(), id, message);
        false
    }
}

fn error_message(fragment_name: Option<&str>, on_type: impl fmt::Display) -> String {
    if let Some(name) = fragment_name {
        format!(r#"Fragment "{name}" cannot condition on non composite type "{on_type}""#)
    } else {
        format!(r#"Fragment cannot condition on non composite type "{on_type}""#)
    }
}
