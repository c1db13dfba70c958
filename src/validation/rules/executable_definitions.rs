use crate::validation::{DocumentValidationContext, RuleScope, RuleStep};

/// A document must define at least one operation to be executable.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExecutableDefinitions;

pub fn factory() -> ExecutableDefinitions {
    ExecutableDefinitions
}

impl RuleStep for ExecutableDefinitions {
    fn rule_number(&self) -> &'static str {
        "5.1.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Executable-Definitions"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Document]
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        if ctx.document().operations().is_empty() {
            ctx.report_document_error(self.reference(), error_message());
            false
        } else {
            true
        }
    }
}

fn error_message() -> &'static str {
    "Document must contain at least one operation"
}
