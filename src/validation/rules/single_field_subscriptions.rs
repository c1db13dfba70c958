use fnv::FnvHashSet;

use crate::{
    ast::OperationType,
    document::{DocumentPartType, PartId, PartKind, QueryDocument},
    validation::{DocumentValidationContext, RuleScope, RuleStep},
};

/// Subscriptions must select exactly one root field, fragments included.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleFieldSubscriptions;

pub fn factory() -> SingleFieldSubscriptions {
    SingleFieldSubscriptions
}

impl RuleStep for SingleFieldSubscriptions {
    fn rule_number(&self) -> &'static str {
        "5.2.3.1"
    }

    fn rule_anchor(&self) -> &'static str {
        "sec-Single-root-field"
    }

    fn applies_to(&self) -> &'static [RuleScope] {
        &[RuleScope::Part(DocumentPartType::Operation)]
    }

    fn should_execute(&self, ctx: &DocumentValidationContext<'_, '_>) -> bool {
        ctx.part().is_some_and(|p| {
            matches!(
                p.kind,
                PartKind::Operation {
                    operation_type: OperationType::Subscription,
                    ..
                },
            )
        })
    }

    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool {
        let Some(id) = ctx.active_part() else {
            return true;
        };
        let document = ctx.document();

        let mut keys = FnvHashSet::default();
        let mut visited = FnvHashSet::default();
        collect_response_keys(document, id, &mut keys, &mut visited);
        if keys.len() == 1 {
            return true;
        }

        let message = match document.part(id).kind {
            PartKind::Operation { name: Some(name), .. } => error_message(Some(name)),
            _ => error_message(None),
        };
        ctx.report_error(self.reference(), id, message);
        false
    }
}

/// Collects the response keys selected directly by the selection sets of
/// the part with the provided `id`, looking through fragments.
fn collect_response_keys<'a>(
    document: &QueryDocument<'a>,
    id: PartId,
    keys: &mut FnvHashSet<&'a str>,
    visited: &mut FnvHashSet<PartId>,
) {
    for &set in document.children(id) {
        if !matches!(document.part(set).kind, PartKind::FieldSelectionSet) {
            continue;
        }
        for &selection in document.children(set) {
            match document.part(selection).kind {
                PartKind::Field { alias, .. } => {
                    keys.insert(alias);
                }
                PartKind::InlineFragment { .. } => {
                    collect_response_keys(document, selection, keys, visited);
                }
                PartKind::FragmentSpread { name } => {
                    if let Some(fragment) = document.named_fragment(name) {
                        if visited.insert(fragment) {
                            collect_response_keys(document, fragment, keys, visited);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn error_message(op_name: Option<&str>) -> String {
    match op_name {
        Some(name) => format!("Subscription \"{name}\" must select only one top level field"),
        None => "Anonymous Subscription must select only one top level field".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn single_field() {
        expect_passes_rule(factory, "subscription ImportantEmails { newDog { name } }");
    }

    #[test]
    fn single_field_through_fragments() {
        expect_passes_rule(
            factory,
            r#"
          subscription S { ...A ... on SubscriptionRoot { newDog { barks } } }
          fragment A on SubscriptionRoot { newDog { name } ...A }
        "#,
        );
    }

    #[test]
    fn queries_are_not_checked() {
        expect_passes_rule(factory, "query Q { dog { name } cat { name } }");
    }

    #[test]
    fn multiple_fields() {
        expect_fails_rule(
            factory,
            "subscription S { newDog { name } newCat { name } }",
            &[error_message(Some("S")).as_str()],
        );
    }

    #[test]
    fn multiple_fields_through_fragments() {
        expect_fails_rule(
            factory,
            r#"
          subscription { ...A }
          fragment A on SubscriptionRoot { newDog { name } ... on SubscriptionRoot { cat: newCat { name } } }
        "#,
            &[error_message(None).as_str()],
        );
    }
}
