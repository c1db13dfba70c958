use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    schema::meta::MetaType,
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

use super::parent_type;

/// Fields of input object values must be defined by the input object type.
#[derive(Clone, Copy, Debug, Default)]
pub struct KnownInputFieldNames;

pub fn factory() -> KnownInputFieldNames {
    KnownInputFieldNames
}

impl RuleStep for KnownInputFieldNames {
    fn rule_number(&self) -> &'static str {
        "5.6.2"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Input-Object-Field-Names"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::InputObjectField)]
    }

    fn should_execute(&self, ctx: &DocumentValidationContext<'_, '_>) -> bool {
        ctx.active_part().is_some_and(|id| {
            matches!(
                parent_type(ctx.document(), id),
                Some(MetaType::InputObject(_)),
            )
        })
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();
        let (PartKind::InputObjectField { name, field: None }, Some(input_type)) =
            (&document.part(id).kind, parent_type(document, id))
        else {
            return true;
        };

        let message = error_message(name, input_type.name());
        ctx.report_error(self.reference(), id, message);
        false
    }
}

fn error_message(field_name: impl fmt::Display, type_name: impl fmt::Display) -> String {
    format!(r#"Unknown field "{field_name}" on input object "{type_name}""#)
}
