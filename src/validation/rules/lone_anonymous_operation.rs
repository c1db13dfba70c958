use crate::{
    document::PartKind,
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// An anonymous operation must be the only operation of its document.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoneAnonymousOperation;

pub fn factory() -> LoneAnonymousOperation {
    LoneAnonymousOperation
}

impl RuleStep for LoneAnonymousOperation {
    fn rule_number(&self) -> &'static str {
        "5.2.2.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Lone-Anonymous-Operation"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Document]
    }

    fn should_execute(&self, ctx: &DocumentValidationContext<'_, '_>) -> bool {
        ctx.document().operations().len() > 1
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let document = ctx.document();
        let anonymous = document
            .operations()
            .iter()
            .copied()
            .filter(|&id| matches!(document.part(id).kind, PartKind::Operation { name: None, .. }))
            .collect::<Vec<_>>();

        let passed = anonymous.is_empty();
        for id in anonymous {
            ctx.report_error(self.reference(), id, error_message());
        }
        passed
    }
}

fn error_message() -> &'static str {
    "This anonymous operation must be the only defined operation"
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn no_operations() {
        expect_passes_rule(factory, "fragment fragA on Dog { name }");
    }

    #[test]
    fn one_anon_operation() {
        expect_passes_rule(factory, "{ dog { name } }");
    }

    #[test]
    fn multiple_named_operations() {
        expect_passes_rule(
            factory,
            r#"
          query Foo { dog { name } }
          query Bar { dog { name } }
        "#,
        );
    }

    #[test]
    fn anon_operation_with_fragment() {
        expect_passes_rule(
            factory,
            r#"
          { ...Foo }
          fragment Foo on QueryRoot { dog { name } }
        "#,
        );
    }

    #[test]
    fn multiple_anon_operations() {
        expect_fails_rule(
            factory,
            r#"
          { dog { name } }
          { dog { nickname } }
        "#,
            &[error_message(), error_message()],
        );
    }

    #[test]
    fn anon_operation_with_a_mutation() {
        expect_fails_rule(
            factory,
            r#"
          { dog { name } }
          mutation Foo { testInput }
        "#,
            &[error_message()],
        );
    }
}
