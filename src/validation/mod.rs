//! Query validation related methods and data structures

mod context;
pub mod rules;
mod traits;
mod visitor;

#[cfg(test)]
pub(crate) mod test_harness;

pub use self::{
    context::{
        DocumentValidationContext, RuleError, RuleReference, SPECIFICATION_URL, SourceOrigin,
        VALIDATION_ERROR_CODE,
    },
    rules::all_rules,
    traits::{RuleScope, RuleStep},
    visitor::{validate_document, validate_document_with_rules},
};

#[cfg(test)]
pub(crate) use self::test_harness::{
    expect_fails_rule, expect_fails_rule_with_schema, expect_passes_rule,
    expect_passes_rule_with_schema,
};
