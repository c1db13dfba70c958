use std::fmt;

use crate::{
    document::{DocumentPart, PartId, QueryDocument, SourcePath},
    parser::SourceLocation,
    schema::model::SchemaType,
};

/// Base URL of the rule anchors.
pub const SPECIFICATION_URL: &str = "https://spec.graphql.org/October2021/#";

/// Error code carried by every [`RuleError`].
pub const VALIDATION_ERROR_CODE: &str = "GRAPHQL_VALIDATION_FAILED";

/// Validation clause a [`RuleError`] originates from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RuleReference {
    number: &'static str,
    anchor: &'static str,
}

impl RuleReference {
    #[doc(hidden)]
    pub fn new(number: &'static str, anchor: &'static str) -> Self {
        Self { number, anchor }
    }

    /// Number of the clause, e.g. `5.8.1`.
    pub fn number(&self) -> &'static str {
        self.number
    }

    /// Anchor of the clause in the GraphQL specification text.
    pub fn anchor(&self) -> &'static str {
        self.anchor
    }

    /// Full URL of the clause.
    pub fn url(&self) -> String {
        format!("{SPECIFICATION_URL}{}", self.anchor)
    }
}

/// Where a [`RuleError`] points to.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SourceOrigin {
    location: SourceLocation,
    path: SourcePath,
}

impl SourceOrigin {
    #[doc(hidden)]
    pub fn new(location: SourceLocation, path: SourcePath) -> Self {
        Self { location, path }
    }

    /// Location of the offending construct.
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Logical path of the offending construct.
    pub fn path(&self) -> &SourcePath {
        &self.path
    }
}

/// Query validation error
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuleError {
    origin: SourceOrigin,
    message: String,
    code: &'static str,
    rule: Option<RuleReference>,
}

impl RuleError {
    #[doc(hidden)]
    pub fn new(message: impl Into<String>, origin: SourceOrigin) -> Self {
        Self {
            origin,
            message: message.into(),
            code: VALIDATION_ERROR_CODE,
            rule: None,
        }
    }

    #[doc(hidden)]
    #[must_use]
    pub fn with_rule(mut self, rule: RuleReference) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Access the message for a validation error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error code of this error.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Validation clause this error originates from, if any.
    pub fn rule(&self) -> Option<RuleReference> {
        self.rule
    }

    /// Access the origin of the validation error
    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }

    /// Shortcut for the location of the [`origin`](RuleError::origin).
    pub fn location(&self) -> SourceLocation {
        self.origin.location
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}. At {}", self.message, self.origin.location)?;
        if !self.origin.path.is_empty() {
            write!(f, " ({})", self.origin.path)?;
        }
        Ok(())
    }
}

impl std::error::Error for RuleError {}

/// State shared by the [`RuleStep`]s validating a single document.
pub struct DocumentValidationContext<'d, 'a> {
    document: &'d mut QueryDocument<'a>,
    active_part: Option<PartId>,
    errors: Vec<RuleError>,
}

impl fmt::Debug for DocumentValidationContext<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentValidationContext")
            .field("active_part", &self.active_part)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl<'d, 'a> DocumentValidationContext<'d, 'a> {
    #[doc(hidden)]
    pub fn new(document: &'d mut QueryDocument<'a>) -> Self {
        Self {
            document,
            active_part: None,
            errors: vec![],
        }
    }

    /// Document being validated.
    pub fn document(&self) -> &QueryDocument<'a> {
        &*self.document
    }

    /// Mutable access to the document being validated.
    pub fn document_mut(&mut self) -> &mut QueryDocument<'a> {
        &mut *self.document
    }

    /// Schema the document is bound to.
    pub fn schema(&self) -> &'a SchemaType {
        self.document.schema()
    }

    /// Part currently visited, `None` while document-wide rules run.
    pub fn active_part(&self) -> Option<PartId> {
        self.active_part
    }

    /// Shortcut for the [`DocumentPart`] currently visited.
    pub fn part(&self) -> Option<&DocumentPart<'a>> {
        self.active_part.map(|id| self.document.part(id))
    }

    pub(crate) fn set_active_part(&mut self, part: Option<PartId>) {
        self.active_part = part;
    }

    /// Records an error of the referenced clause located at the provided
    /// `part`.
    pub fn report_error(&mut self, rule: RuleReference, part: PartId, message: impl Into<String>) {
        let origin = SourceOrigin::new(self.document.part(part).location, self.document.path(part));
        self.push(RuleError::new(message, origin).with_rule(rule));
    }

    /// Records an error of the referenced clause located at a variable
    /// declaration of the provided `operation`.
    pub fn report_variable_error(
        &mut self,
        rule: RuleReference,
        operation: PartId,
        location: SourceLocation,
        variable: &str,
        message: impl Into<String>,
    ) {
        let mut path = self.document.path(operation).segments().to_vec();
        path.push(format!("${variable}"));
        let origin = SourceOrigin::new(location, SourcePath::from(path));
        self.push(RuleError::new(message, origin).with_rule(rule));
    }

    /// Records an error of the referenced clause concerning the whole
    /// document.
    pub fn report_document_error(&mut self, rule: RuleReference, message: impl Into<String>) {
        let origin = SourceOrigin::new(SourceLocation::new_origin(), SourcePath::default());
        self.push(RuleError::new(message, origin).with_rule(rule));
    }

    fn push(&mut self, error: RuleError) {
        crate::__trace_debug!(
            rule = ?error.rule.map(|r| r.number),
            message = %error.message,
            location = %error.origin.location,
            "validation rule failed",
        );
        self.errors.push(error);
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[RuleError] {
        &self.errors
    }

    #[doc(hidden)]
    pub fn into_errors(self) -> Vec<RuleError> {
        self.errors
    }
}
