use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Leaf fields must not have a selection, and composite fields must have
/// one.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarLeafs;

pub fn factory() -> ScalarLeafs {
    ScalarLeafs
}

impl RuleStep for ScalarLeafs {
    fn rule_number(&self) -> &'static str {
        "5.3.3"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Leaf-Field-Selections"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::Field)]
    }

    fn should_execute(&self, ctx: &DocumentValidationContext<'_, '_>) -> bool {
        ctx.part().is_some_and(|p| p.graph_type.is_some())
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let part = document.part(id);
        let (PartKind::Field { name, .. }, Some(field_type)) = (&part.kind, part.graph_type) else {
            return true;
        };
        let type_literal = part
            .type_expression
            .as_ref()
            .map_or_else(|| field_type.name().to_owned(), ToString::to_string);
        let has_selection = document
            .children(id)
            .iter()
            .any(|&c| matches!(document.part(c).kind, PartKind::FieldSelectionSet));

        let message = match (field_type.is_leaf(), has_selection) {
            (true, true) => no_allowed_error_message(name, &type_literal),
            (false, false) => required_error_message(name, &type_literal),
            _ => return true,
        };
        ctx.report_error(self.reference(), id, message);
        false
    }
}

fn no_allowed_error_message(field_name: impl fmt::Display, type_name: impl fmt::Display) -> String {
    format!(
        r#"Field "{field_name}" must not have a selection since type "{type_name}" has no subfields"#,
    )
}

fn required_error_message(field_name: impl fmt::Display, type_name: impl fmt::Display) -> String {
    format!(
        r#"Field "{field_name}" of type "{type_name}" must have a selection of subfields. Did you mean "{field_name} {{ ... }}"?"#,
    )
}
