use std::fmt;

use crate::{
    document::DocumentPartType,
    validation::{DocumentValidationContext, RuleReference},
};

/// What a [`RuleStep`] is run on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RuleScope {
    /// The whole document, once, before any part is visited.
    Document,

    /// Every part of the provided type.
    Part(DocumentPartType),
}

/// A single validation clause.
///
/// Steps hold no state: everything they need is in the
/// [`DocumentValidationContext`], and everything they find is reported to it.
pub trait RuleStep: fmt::Debug {
    /// Number of the implemented clause, e.g. `5.8.1`.
    fn rule_number(&self) -> &'static str;

    /// Anchor of the implemented clause in the GraphQL specification text.
    fn rule_anchor(&self) -> &'static str;

    /// Scopes this step is run on.
    fn applies_to(&self) -> &'static [RuleScope];

    /// Checks whether this step is relevant for the active part.
    fn should_execute(&self, _ctx: &DocumentValidationContext<'_, '_>) -> bool {
        true
    }

    /// Runs this step, returning whether the check passed.
    fn execute(&self, ctx: &mut DocumentValidationContext<'_, '_>) -> bool;

    /// Reference to the implemented clause.
    fn reference(&self) -> RuleReference {
        RuleReference::new(self.rule_number(), self.rule_anchor())
    }
}
