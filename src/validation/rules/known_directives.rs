use std::fmt;

use crate::{
    document::{DocumentPartType, PartKind},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Applied directives must be defined by the schema.
#[derive(Clone, Copy, Debug, Default)]
pub struct KnownDirectives;

pub fn factory() -> KnownDirectives {
    KnownDirectives
}

impl RuleStep for KnownDirectives {
    fn rule_number(&self) -> &'static str {
        "5.7.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Directives-Are-Defined"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::Directive)]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let PartKind::Directive {
            name,
            directive: None,
            ..
        } = ctx.document().part(id).kind
        else {
            return true;
        };

        ctx.report_error(self.reference(), id, error_message(name));
        false
    }
}

fn error_message(directive_name: impl fmt::Display) -> String {
    format!(r#"Unknown directive "@{directive_name}""#)
}
