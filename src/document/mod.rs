//! Schema-bound representation of a query document.
//!
//! A [`QueryDocument`] is built out of a [`SyntaxTree`](crate::parser::SyntaxTree)
//! by [`construct_document`]. Its parts live in a single arena and refer to
//! each other by [`PartId`].

mod constructor;
mod variables;

use std::fmt;

use derive_more::with_trait::Display;
use fnv::FnvHashSet;

use crate::{
    ast::{OperationType, Type},
    parser::{ScalarValueType, SourceLocation},
    schema::{
        meta::{Argument, Field, MetaType},
        model::{DirectiveLocation, DirectiveType, SchemaType},
    },
};

pub use self::{
    constructor::{ConstructionStep, StepResult, construct_document},
    variables::{VariableCollection, VariableDeclaration},
};

/// Index of a [`DocumentPart`] inside its [`QueryDocument`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("#{_0}")]
pub struct PartId(usize);

/// Kind of a [`DocumentPart`], without its payload.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum DocumentPartType {
    Operation,
    FieldSelectionSet,
    Field,
    InlineFragment,
    NamedFragment,
    FragmentSpread,
    Directive,
    InputArgument,
    InputObjectField,
    SuppliedValue,
}

/// Syntactic kind of a [`PartKind::SuppliedValue`].
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SuppliedValueKind {
    Scalar(ScalarValueType),
    Enum,
    Boolean,
    Null,
    List,
    Complex,
    Variable,
}

/// Payload of a [`DocumentPart`].
#[derive(Clone, Debug)]
pub enum PartKind<'a> {
    /// `query Name(…) @dir { … }`.
    Operation {
        /// Type of the operation, `query` for the `{ … }` shorthand.
        operation_type: OperationType,
        /// Name of the operation, if any.
        name: Option<&'a str>,
        /// Declared variables.
        variables: VariableCollection<'a>,
    },

    /// `{ … }` of an operation, field or fragment.
    FieldSelectionSet,

    /// `alias: name(…) @dir { … }`.
    Field {
        /// Name of the selected field.
        name: &'a str,
        /// Response key, equal to the `name` when not aliased.
        alias: &'a str,
        /// Schema definition of the field, if it exists on the parent type.
        field: Option<&'a Field>,
    },

    /// `... on Type @dir { … }`.
    InlineFragment {
        /// Type condition, if any.
        type_condition: Option<&'a str>,
    },

    /// `fragment Name on Type @dir { … }`.
    NamedFragment {
        /// Name of the fragment.
        name: &'a str,
        /// Type condition.
        type_condition: &'a str,
    },

    /// `...Name @dir`.
    FragmentSpread {
        /// Name of the spread fragment.
        name: &'a str,
    },

    /// `@name(…)`.
    Directive {
        /// Name of the directive.
        name: &'a str,
        /// Schema definition of the directive, if it exists.
        directive: Option<&'a DirectiveType>,
        /// Where the directive is applied.
        location: DirectiveLocation,
    },

    /// `name: value` of a field or directive.
    InputArgument {
        /// Name of the argument.
        name: &'a str,
        /// Schema definition of the argument, if it exists.
        argument: Option<&'a Argument>,
    },

    /// `name: value` of a complex value.
    InputObjectField {
        /// Name of the input field.
        name: &'a str,
        /// Schema definition of the input field, if it exists.
        field: Option<&'a Argument>,
    },

    /// Any input value.
    SuppliedValue {
        /// Syntactic kind of the value.
        kind: SuppliedValueKind,
        /// Source text of the literal, quotes included. For variables, the
        /// name without `$`. Empty for lists and complex values.
        text: &'a str,
    },
}

impl PartKind<'_> {
    /// Returns the [`DocumentPartType`] of this kind.
    pub fn part_type(&self) -> DocumentPartType {
        match self {
            Self::Operation { .. } => DocumentPartType::Operation,
            Self::FieldSelectionSet => DocumentPartType::FieldSelectionSet,
            Self::Field { .. } => DocumentPartType::Field,
            Self::InlineFragment { .. } => DocumentPartType::InlineFragment,
            Self::NamedFragment { .. } => DocumentPartType::NamedFragment,
            Self::FragmentSpread { .. } => DocumentPartType::FragmentSpread,
            Self::Directive { .. } => DocumentPartType::Directive,
            Self::InputArgument { .. } => DocumentPartType::InputArgument,
            Self::InputObjectField { .. } => DocumentPartType::InputObjectField,
            Self::SuppliedValue { .. } => DocumentPartType::SuppliedValue,
        }
    }
}

/// A single schema-bound node of a [`QueryDocument`].
#[derive(Clone, Debug)]
pub struct DocumentPart<'a> {
    /// Part owning this one, `None` for operations and named fragments.
    pub parent: Option<PartId>,

    /// What this part is.
    pub kind: PartKind<'a>,

    /// Schema type this part is bound to, `None` when it couldn't be
    /// resolved.
    ///
    /// Always the type named by the [`type_expression`] when both are
    /// present.
    ///
    /// [`type_expression`]: DocumentPart::type_expression
    pub graph_type: Option<&'a MetaType>,

    /// Type expected at the position of this part, where there is one.
    pub type_expression: Option<Type>,

    /// Location of the first token of this part.
    pub location: SourceLocation,

    /// Child parts, in source order.
    pub children: Vec<PartId>,
}

impl DocumentPart<'_> {
    /// Returns the [`DocumentPartType`] of this part.
    pub fn part_type(&self) -> DocumentPartType {
        self.kind.part_type()
    }

    /// Returns the [`SuppliedValueKind`] if this part is a supplied value.
    pub fn value_kind(&self) -> Option<SuppliedValueKind> {
        match self.kind {
            PartKind::SuppliedValue { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Logical path of a part inside its document, e.g. `query MyOp/dog/name`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SourcePath(Vec<String>);

impl SourcePath {
    /// Segments of this path, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Indicates whether this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for SourcePath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// A query document bound to the [`SchemaType`] it's going to run against.
#[derive(Debug)]
pub struct QueryDocument<'a> {
    schema: &'a SchemaType,
    source: &'a str,
    parts: Vec<DocumentPart<'a>>,
    operations: Vec<PartId>,
    named_fragments: Vec<PartId>,
}

impl<'a> QueryDocument<'a> {
    pub(crate) fn new(schema: &'a SchemaType, source: &'a str) -> Self {
        Self {
            schema,
            source,
            parts: vec![],
            operations: vec![],
            named_fragments: vec![],
        }
    }

    /// Schema this document is bound to.
    pub fn schema(&self) -> &'a SchemaType {
        self.schema
    }

    /// Source text this document was parsed from.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Operations, in source order.
    pub fn operations(&self) -> &[PartId] {
        &self.operations
    }

    /// Named fragments, in source order, duplicates included.
    pub fn named_fragments(&self) -> &[PartId] {
        &self.named_fragments
    }

    /// Number of parts in this document.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Returns the part with the provided `id`.
    ///
    /// # Panics
    ///
    /// If the `id` doesn't belong to this document.
    pub fn part(&self, id: PartId) -> &DocumentPart<'a> {
        &self.parts[id.0]
    }

    pub(crate) fn part_mut(&mut self, id: PartId) -> &mut DocumentPart<'a> {
        &mut self.parts[id.0]
    }

    /// Children of the part with the provided `id`.
    pub fn children(&self, id: PartId) -> &[PartId] {
        &self.part(id).children
    }

    /// Parent of the part with the provided `id`.
    pub fn parent(&self, id: PartId) -> Option<PartId> {
        self.part(id).parent
    }

    /// Iterates over the ancestors of the part with the provided `id`,
    /// closest first.
    pub fn ancestors(&self, id: PartId) -> impl Iterator<Item = PartId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    /// Collects the part with the provided `id` and all its descendants, in
    /// depth-first pre-order.
    pub fn descendants(&self, id: PartId) -> Vec<PartId> {
        let mut out = vec![];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Operation or named fragment the part with the provided `id` belongs
    /// to.
    pub fn definition_of(&self, id: PartId) -> PartId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Looks up the first named fragment with the provided `name`.
    pub fn named_fragment(&self, name: &str) -> Option<PartId> {
        self.named_fragments.iter().copied().find(|&id| {
            matches!(self.part(id).kind, PartKind::NamedFragment { name: n, .. } if n == name)
        })
    }

    /// Variables of the operation with the provided `id`, `None` if it's not
    /// an operation.
    pub fn variables(&self, id: PartId) -> Option<&VariableCollection<'a>> {
        match &self.part(id).kind {
            PartKind::Operation { variables, .. } => Some(variables),
            _ => None,
        }
    }

    /// Mutable access to the variables of the operation with the provided
    /// `id`, `None` if it's not an operation.
    pub fn variables_mut(&mut self, id: PartId) -> Option<&mut VariableCollection<'a>> {
        match &mut self.part_mut(id).kind {
            PartKind::Operation { variables, .. } => Some(variables),
            _ => None,
        }
    }

    /// Human-readable label of an operation, e.g. `query MyOp`.
    pub fn operation_label(&self, id: PartId) -> String {
        match &self.part(id).kind {
            PartKind::Operation {
                operation_type,
                name: Some(name),
                ..
            } => format!("{operation_type} {name}"),
            PartKind::Operation { operation_type, .. } => operation_type.to_string(),
            PartKind::NamedFragment { name, .. } => format!("fragment {name}"),
            _ => String::new(),
        }
    }

    /// Builds the logical path of the part with the provided `id`.
    pub fn path(&self, id: PartId) -> SourcePath {
        let mut chain = self.ancestors(id).collect::<Vec<_>>();
        chain.reverse();
        chain.push(id);

        SourcePath(
            chain
                .into_iter()
                .flat_map(|p| self.path_segments(p))
                .collect(),
        )
    }

    fn path_segments(&self, id: PartId) -> Vec<String> {
        let part = self.part(id);
        match &part.kind {
            PartKind::Operation { .. } | PartKind::NamedFragment { .. } => {
                vec![self.operation_label(id)]
            }
            PartKind::FieldSelectionSet => vec![],
            PartKind::Field { alias, .. } => vec![(*alias).into()],
            PartKind::InlineFragment {
                type_condition: Some(t),
            } => vec![format!("... on {t}")],
            PartKind::InlineFragment { .. } => vec!["...".into()],
            PartKind::FragmentSpread { name } => vec![format!("...{name}")],
            PartKind::Directive { name, .. } => match self.declaring_variable(id) {
                Some(var) => vec![format!("${var}"), format!("@{name}")],
                None => vec![format!("@{name}")],
            },
            PartKind::InputArgument { name, .. } | PartKind::InputObjectField { name, .. } => {
                vec![(*name).into()]
            }
            PartKind::SuppliedValue { .. } => {
                if let Some(var) = self.declaring_variable(id) {
                    return vec![format!("${var}")];
                }
                let Some(parent) = part.parent else {
                    return vec![];
                };
                match self.part(parent).value_kind() {
                    Some(SuppliedValueKind::List) => self
                        .children(parent)
                        .iter()
                        .position(|&c| c == id)
                        .map(|i| vec![i.to_string()])
                        .unwrap_or_default(),
                    _ => vec![],
                }
            }
        }
    }

    /// Name of the variable declaring the provided default value or
    /// directive part, if any.
    pub fn declaring_variable(&self, id: PartId) -> Option<&'a str> {
        let parent = self.parent(id)?;
        self.variables(parent)?
            .iter()
            .chain(self.variables(parent)?.duplicates())
            .find(|v| v.default_value == Some(id) || v.directives.contains(&id))
            .map(|v| v.name)
    }

    /// Indicates whether the part with the provided `id` is, or is nested
    /// in, the default value of a variable.
    pub fn is_in_default_value(&self, id: PartId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .any(|p| {
                self.part(p).value_kind().is_some() && self.declaring_variable(p).is_some()
            })
    }

    /// Name of the fragment spread by the part with the provided `id`, if
    /// it's a fragment spread.
    pub fn spread_name(&self, id: PartId) -> Option<&'a str> {
        match self.part(id).kind {
            PartKind::FragmentSpread { name } => Some(name),
            _ => None,
        }
    }

    /// Named fragments transitively spread from the part with the provided
    /// `id`, each listed once, in discovery order.
    ///
    /// Spread cycles are walked at most once. The part itself is listed only
    /// if it's a named fragment spreading itself through a cycle.
    pub fn reachable_fragments(&self, id: PartId) -> Vec<PartId> {
        let mut visited = FnvHashSet::default();
        let mut found = vec![];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for spread in self.descendants(current) {
                let Some(fragment) = self.spread_name(spread).and_then(|n| self.named_fragment(n))
                else {
                    continue;
                };
                if visited.insert(fragment) {
                    found.push(fragment);
                    stack.push(fragment);
                }
            }
        }
        found
    }

    /// Directives applied at the same place as the directive with the
    /// provided `id`, itself included, in source order.
    pub fn directive_siblings(&self, id: PartId) -> Vec<PartId> {
        let Some(parent) = self.parent(id) else {
            return vec![id];
        };
        if let Some(variables) = self.variables(parent) {
            if let Some(var) = variables
                .iter()
                .chain(variables.duplicates())
                .find(|v| v.directives.contains(&id))
            {
                return var.directives.clone();
            }
        }
        self.children(parent)
            .iter()
            .copied()
            .filter(|&c| {
                matches!(self.part(c).kind, PartKind::Directive { .. })
                    && self.declaring_variable(c).is_none()
            })
            .collect()
    }

    pub(crate) fn add_part(&mut self, part: DocumentPart<'a>, attach: bool) -> PartId {
        let id = PartId(self.parts.len());
        if attach {
            if let Some(parent) = part.parent {
                self.parts[parent.0].children.push(id);
            }
        }
        match part.kind {
            PartKind::Operation { .. } => self.operations.push(id),
            PartKind::NamedFragment { .. } => self.named_fragments.push(id),
            _ => {}
        }
        self.parts.push(part);
        id
    }
}
