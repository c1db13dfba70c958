#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[doc(hidden)]
#[macro_use]
mod macros;
pub mod ast;
pub mod document;
mod options;
pub mod parser;
pub mod schema;
pub mod validation;

// Required by the crate-internal tracing macros.
#[cfg(feature = "tracing")]
#[doc(hidden)]
pub use tracing;

use std::fmt;

use crate::{
    document::construct_document,
    parser::parse_document_source,
    validation::{RuleStep, all_rules, validate_document_with_rules},
};

pub use crate::{
    ast::{OperationType, Type},
    document::QueryDocument,
    options::DocumentOptions,
    parser::{ParseError, SourceLocation, Spanning},
    schema::{meta, model::SchemaType},
    validation::RuleError,
};

/// An error that prevented a query document from being processed
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GraphQLError {
    ParseError(Spanning<ParseError>),
    ValidationError(Vec<RuleError>),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError(e) => write!(f, "{e}"),
            Self::ValidationError(errs) => {
                for e in errs {
                    writeln!(f, "{e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GraphQLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseError(e) => Some(e),
            Self::ValidationError(errs) => Some(errs.first()?),
        }
    }
}

impl From<Spanning<ParseError>> for GraphQLError {
    fn from(e: Spanning<ParseError>) -> Self {
        Self::ParseError(e)
    }
}

/// Parses, binds and validates a query document against the provided
/// `schema`.
///
/// The syntax tree is released once the document is bound, so only the
/// [`QueryDocument`] outlives this call.
///
/// # Errors
///
/// - [`GraphQLError::ParseError`] on the first syntax error.
/// - [`GraphQLError::ValidationError`] with every rule violation found,
///   unless validation is turned off by the `options`.
pub fn process_document<'a>(
    schema: &'a SchemaType,
    source: &'a str,
    options: &DocumentOptions,
) -> Result<QueryDocument<'a>, GraphQLError> {
    crate::__span_debug!("process_document");

    let tree = parse_document_source(source)?;
    let mut document = construct_document(schema, source, &tree);
    tree.release();

    if !options.validate {
        return Ok(document);
    }

    let rules = all_rules()
        .into_iter()
        .filter(|r| !options.is_rule_disabled(r.rule_number()))
        .collect::<Vec<Box<dyn RuleStep>>>();
    let mut errors = validate_document_with_rules(&mut document, &rules);
    errors.retain(|e| {
        e.rule()
            .is_none_or(|r| !options.is_rule_disabled(r.number()))
    });
    if let Some(max) = options.max_errors {
        errors.truncate(max);
    }

    if errors.is_empty() {
        Ok(document)
    } else {
        Err(GraphQLError::ValidationError(errors))
    }
}
