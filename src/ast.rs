//! Syntax-level type expressions and operation kinds.

use std::{fmt, str::FromStr};

use arcstr::ArcStr;
use derive_more::with_trait::Display;

use crate::parser::{ParseError, Spanning, parse_type_expression};

/// A type literal in the syntax tree
///
/// This enum carries no semantic information and might refer to types that do
/// not exist.
#[derive(Clone, Eq, Hash, PartialEq, Debug)]
pub enum Type {
    /// A nullable named type, e.g. `String`
    Named(ArcStr),
    /// A nullable list type, e.g. `[String]`
    ///
    /// The list itself is what's nullable, the containing type might be non-null.
    List(Box<Type>),
    /// A non-null named type, e.g. `String!`
    NonNullNamed(ArcStr),
    /// A non-null list type, e.g. `[String]!`.
    ///
    /// The list itself is what's non-null, the containing type might be null.
    NonNullList(Box<Type>),
}

impl Type {
    /// Creates a nullable named type.
    pub fn named(name: impl Into<ArcStr>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a non-null named type.
    pub fn non_null_named(name: impl Into<ArcStr>) -> Self {
        Self::NonNullNamed(name.into())
    }

    /// Creates a nullable list of the provided `inner` type.
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// Get the name of a named type.
    ///
    /// Only applies to named types; lists will return `None`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => Some(n),
            _ => None,
        }
    }

    /// Get the innermost name by unpacking lists
    ///
    /// All type literals contain exactly one named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => n,
            Self::List(l) | Self::NonNullList(l) => l.innermost_name(),
        }
    }

    /// Determines if a type only can represent non-null values.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNullNamed(_) | Self::NonNullList(_))
    }

    /// Determines if this is a (possibly non-null) list type.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_) | Self::NonNullList(_))
    }

    /// Returns the item type of a list type.
    pub fn list_inner(&self) -> Option<&Self> {
        match self {
            Self::List(l) | Self::NonNullList(l) => Some(l),
            _ => None,
        }
    }

    /// Strips the outermost non-null wrapper, if any.
    #[must_use]
    pub fn nullable(&self) -> Self {
        match self {
            Self::NonNullNamed(n) => Self::Named(n.clone()),
            Self::NonNullList(l) => Self::List(l.clone()),
            t => t.clone(),
        }
    }

    /// Wraps this type into a non-null one, if it isn't already.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::Named(n) => Self::NonNullNamed(n),
            Self::List(l) => Self::NonNullList(l),
            t => t,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::NonNullNamed(n) => write!(f, "{n}!"),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNullList(t) => write!(f, "[{t}]!"),
        }
    }
}

impl FromStr for Type {
    type Err = Spanning<ParseError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_expression(s)
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum OperationType {
    #[display("query")]
    Query,
    #[display("mutation")]
    Mutation,
    #[display("subscription")]
    Subscription,
}

impl OperationType {
    /// Parses an operation type keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "query" => Some(Self::Query),
            "mutation" => Some(Self::Mutation),
            "subscription" => Some(Self::Subscription),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OperationType, Type};

    #[test]
    fn parses_type_expressions() {
        let ty: Type = "[String!]!".parse().expect("valid type");

        assert_eq!(
            ty,
            Type::NonNullList(Box::new(Type::non_null_named("String"))),
        );
        assert_eq!(ty.to_string(), "[String!]!");
        assert_eq!(ty.innermost_name(), "String");
        assert!(ty.is_non_null());
        assert_eq!(ty.nullable(), Type::list(Type::non_null_named("String")));
        assert_eq!(ty.list_inner(), Some(&Type::non_null_named("String")));
    }

    #[test]
    fn rejects_malformed_type_expressions() {
        assert!("[String".parse::<Type>().is_err());
        assert!("String!!".parse::<Type>().is_err());
        assert!("".parse::<Type>().is_err());
    }

    #[test]
    fn wraps_non_null_once() {
        assert_eq!(Type::named("Int").non_null(), Type::non_null_named("Int"));
        assert_eq!(
            Type::non_null_named("Int").non_null(),
            Type::non_null_named("Int"),
        );
    }

    #[test]
    fn operation_keywords() {
        assert_eq!(
            OperationType::from_keyword("subscription"),
            Some(OperationType::Subscription),
        );
        assert_eq!(OperationType::from_keyword("fragment"), None);
        assert_eq!(OperationType::Mutation.to_string(), "mutation");
    }
}
