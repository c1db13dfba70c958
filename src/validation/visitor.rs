use crate::{
    document::{PartId, QueryDocument},
    validation::{DocumentValidationContext, RuleError, RuleScope, RuleStep, all_rules},
};

/// Validates the provided `document` against every rule of
/// [`all_rules()`].
///
/// Returns all the found errors, document-wide ones first, then in document
/// order.
pub fn validate_document(document: &mut QueryDocument<'_>) -> Vec<RuleError> {
    validate_document_with_rules(document, &all_rules())
}

/// Validates the provided `document` against the provided `rules` only.
pub fn validate_document_with_rules(
    document: &mut QueryDocument<'_>,
    rules: &[Box<dyn RuleStep>],
) -> Vec<RuleError> {
    crate::__span_trace!("validate_document", rules = rules.len());

    let mut ctx = DocumentValidationContext::new(document);

    for rule in rules
        .iter()
        .filter(|r| r.applies_to().contains(&RuleScope::Document))
    {
        run_rule(&mut ctx, rule.as_ref());
    }

    let roots = ctx
        .document()
        .operations()
        .iter()
        .chain(ctx.document().named_fragments())
        .copied()
        .collect::<Vec<_>>();
    for root in roots {
        visit_part(&mut ctx, rules, root);
    }

    ctx.set_active_part(None);
    let errors = ctx.into_errors();
    crate::__trace!(errors = errors.len(), "document validated");
    errors
}

fn visit_part(ctx: &mut DocumentValidationContext<'_, '_>, rules: &[Box<dyn RuleStep>], id: PartId) {
    let scope = RuleScope::Part(ctx.document().part(id).part_type());
    for rule in rules.iter().filter(|r| r.applies_to().contains(&scope)) {
        ctx.set_active_part(Some(id));
        run_rule(ctx, rule.as_ref());
    }

    let children = ctx.document().children(id).to_vec();
    for child in children {
        visit_part(ctx, rules, child);
    }
}

fn run_rule(ctx: &mut DocumentValidationContext<'_, '_>, rule: &dyn RuleStep) {
    if rule.should_execute(ctx) {
        let passed = rule.execute(ctx);
        if !passed {
            crate::__trace!(
                rule = rule.rule_number(),
                part = ?ctx.active_part(),
                "rule step reported errors",
            );
        }
    }
}
