//! Types used to describe a `GraphQL` schema

use std::iter;

use arcstr::ArcStr;

use crate::ast::Type;

/// A scalar literal as written in a query document, handed to a
/// [`ScalarParseFn`] for acceptance.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScalarLiteral<'a> {
    Int(&'a str),
    Float(&'a str),
    /// Raw contents of a string or block string literal, quotes excluded.
    String(&'a str),
    Boolean(bool),
    Enum(&'a str),
}

/// Shortcut for a function deciding whether a scalar accepts a literal.
pub type ScalarParseFn = for<'b> fn(ScalarLiteral<'b>) -> bool;

/// Scalar type metadata
#[derive(Debug)]
pub struct ScalarMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    pub(crate) parse_fn: ScalarParseFn,
}

/// Object type metadata
#[derive(Debug)]
pub struct ObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub fields: Vec<Field>,
    #[doc(hidden)]
    pub interface_names: Vec<ArcStr>,
}

/// Enum type metadata
#[derive(Debug)]
pub struct EnumMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub values: Vec<EnumValue>,
}

/// Interface type metadata
#[derive(Debug)]
pub struct InterfaceMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub fields: Vec<Field>,
    #[doc(hidden)]
    pub interface_names: Vec<ArcStr>,
}

/// Union type metadata
#[derive(Debug)]
pub struct UnionMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub of_type_names: Vec<ArcStr>,
}

/// Input object metadata
#[derive(Debug)]
pub struct InputObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub input_fields: Vec<Argument>,
}

/// Generic type metadata
#[derive(Debug)]
pub enum MetaType {
    #[doc(hidden)]
    Scalar(ScalarMeta),
    #[doc(hidden)]
    Object(ObjectMeta),
    #[doc(hidden)]
    Enum(EnumMeta),
    #[doc(hidden)]
    Interface(InterfaceMeta),
    #[doc(hidden)]
    Union(UnionMeta),
    #[doc(hidden)]
    InputObject(InputObjectMeta),
}

/// Metadata for a field
#[derive(Debug, Clone)]
pub struct Field {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub field_type: Type,
}

impl Field {
    /// Builds a new [`Field`] of the given [`Type`] with the given `name`.
    pub fn new(name: impl Into<ArcStr>, field_type: Type) -> Self {
        Self {
            name: name.into(),
            arguments: vec![],
            field_type,
        }
    }

    /// Adds an `argument` to this [`Field`].
    ///
    /// Arguments are unordered and can't contain duplicates by name.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Access an argument's meta data given its name.
    pub fn argument_by_name(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Returns true if the type is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        // "used exclusively by GraphQL’s introspection system"
        self.name.starts_with("__")
    }
}

/// Metadata for an argument to a field, a directive or an input object
#[derive(Debug, Clone)]
pub struct Argument {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub arg_type: Type,
    #[doc(hidden)]
    pub default_value: Option<ArcStr>,
}

impl Argument {
    /// Builds a new [`Argument`] of the given [`Type`] with the given `name`.
    pub fn new(name: impl Into<ArcStr>, arg_type: Type) -> Self {
        Self {
            name: name.into(),
            arg_type,
            default_value: None,
        }
    }

    /// Set the default value of this [`Argument`], as a GraphQL literal.
    ///
    /// Overwrites any previously set default value.
    #[must_use]
    pub fn default_value(mut self, literal: impl Into<ArcStr>) -> Self {
        self.default_value = Some(literal.into());
        self
    }

    /// Indicates whether this argument must always be supplied: its type is
    /// non-null and it has no default value.
    pub fn is_required(&self) -> bool {
        self.arg_type.is_non_null() && self.default_value.is_none()
    }
}

/// Metadata for a single value in an enum
#[derive(Debug, Clone)]
pub struct EnumValue {
    /// The name of the enum value
    ///
    /// This is the string literal representation of the enum in responses.
    pub name: ArcStr,
}

impl EnumValue {
    /// Constructs a new [`EnumValue`] with the provided `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self { name: name.into() }
    }
}

impl MetaType {
    /// Access the name of the type
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(ScalarMeta { name, .. })
            | Self::Object(ObjectMeta { name, .. })
            | Self::Enum(EnumMeta { name, .. })
            | Self::Interface(InterfaceMeta { name, .. })
            | Self::Union(UnionMeta { name, .. })
            | Self::InputObject(InputObjectMeta { name, .. }) => name,
        }
    }

    /// Access a field's meta data given its name
    ///
    /// Only objects and interfaces have fields. This method always returns `None` for other types.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        match self {
            Self::Object(ObjectMeta { fields, .. }) | Self::Interface(InterfaceMeta { fields, .. }) => {
                fields.iter().find(|f| f.name == name)
            }
            _ => None,
        }
    }

    /// Access an input field's meta data given its name
    ///
    /// Only input objects have input fields. This method always returns `None` for other types.
    pub fn input_field_by_name(&self, name: &str) -> Option<&Argument> {
        self.input_fields().iter().find(|f| f.name == name)
    }

    /// Input fields of an input object, empty for other types.
    pub fn input_fields(&self) -> &[Argument] {
        match self {
            Self::InputObject(InputObjectMeta { input_fields, .. }) => input_fields,
            _ => &[],
        }
    }

    /// Indicates whether this is an enum type declaring the provided value.
    pub fn has_enum_value(&self, name: &str) -> bool {
        match self {
            Self::Enum(EnumMeta { values, .. }) => values.iter().any(|v| v.name == name),
            _ => false,
        }
    }

    /// Names of the interfaces an object or interface type implements.
    pub fn interface_names(&self) -> &[ArcStr] {
        match self {
            Self::Object(ObjectMeta {
                interface_names, ..
            })
            | Self::Interface(InterfaceMeta {
                interface_names, ..
            }) => interface_names,
            _ => &[],
        }
    }

    /// Checks whether a scalar type accepts the provided literal.
    ///
    /// Always `false` for non-scalar types.
    pub fn accepts_literal(&self, literal: ScalarLiteral<'_>) -> bool {
        match self {
            Self::Scalar(ScalarMeta { parse_fn, .. }) => parse_fn(literal),
            _ => false,
        }
    }

    /// Returns true if the type is a composite type
    ///
    /// Objects, interfaces, and unions are composite.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    /// Returns true if the type can occur in leaf positions in queries
    ///
    /// Only enums and scalars are leaf types.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Enum(_) | Self::Scalar(_))
    }

    /// Returns true if the type is abstract
    ///
    /// Only interfaces and unions are abstract types.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// Returns true if the type can be used in input positions, e.g. arguments or variables
    ///
    /// Only scalars, enums, and input objects are input types.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_))
    }

    /// Returns true if the type is built-in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        let name = self.name();
        // "used exclusively by GraphQL’s introspection system"
        name.starts_with("__")
            || matches!(name, "Boolean" | "String" | "Int" | "Float" | "ID")
    }

    /// Names of all the types referenced by this one: field, argument and
    /// input field types, interfaces and union members.
    pub(crate) fn referenced_type_names(&self) -> Vec<&str> {
        fn field_types(fields: &[Field]) -> impl Iterator<Item = &str> {
            fields.iter().flat_map(|f| {
                f.arguments
                    .iter()
                    .map(|a| a.arg_type.innermost_name())
                    .chain(iter::once(f.field_type.innermost_name()))
            })
        }

        match self {
            Self::Scalar(_) | Self::Enum(_) => vec![],
            Self::Object(ObjectMeta {
                fields,
                interface_names,
                ..
            })
            | Self::Interface(InterfaceMeta {
                fields,
                interface_names,
                ..
            }) => field_types(fields)
                .chain(interface_names.iter().map(ArcStr::as_str))
                .collect(),
            Self::Union(UnionMeta { of_type_names, .. }) => {
                of_type_names.iter().map(ArcStr::as_str).collect()
            }
            Self::InputObject(InputObjectMeta { input_fields, .. }) => input_fields
                .iter()
                .map(|a| a.arg_type.innermost_name())
                .collect(),
        }
    }
}

impl ScalarMeta {
    /// Builds a new [`ScalarMeta`] type with the specified `name`, accepting
    /// any scalar literal.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            parse_fn: |literal| !matches!(literal, ScalarLiteral::Enum(_)),
        }
    }

    /// Sets the function deciding which literals this [`ScalarMeta`] type
    /// accepts.
    #[must_use]
    pub fn parse_fn(mut self, parse_fn: ScalarParseFn) -> Self {
        self.parse_fn = parse_fn;
        self
    }

    /// Wraps this [`ScalarMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Scalar(self)
    }
}

impl ObjectMeta {
    /// Build a new [`ObjectMeta`] type with the specified `name` and `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: &[Field]) -> Self {
        Self {
            name: name.into(),
            fields: fields.to_vec(),
            interface_names: vec![],
        }
    }

    /// Set the `interfaces` this [`ObjectMeta`] type implements.
    ///
    /// Overwrites any previously set list of interfaces.
    #[must_use]
    pub fn interfaces(mut self, interfaces: &[Type]) -> Self {
        self.interface_names = interfaces
            .iter()
            .map(|t| t.innermost_name().into())
            .collect();
        self
    }

    /// Wraps this [`ObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Object(self)
    }
}

impl EnumMeta {
    /// Build a new [`EnumMeta`] type with the specified `name` and possible
    /// `values`.
    pub fn new(name: impl Into<ArcStr>, values: &[EnumValue]) -> Self {
        Self {
            name: name.into(),
            values: values.to_vec(),
        }
    }

    /// Wraps this [`EnumMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Enum(self)
    }
}

impl InterfaceMeta {
    /// Builds a new [`InterfaceMeta`] type with the specified `name` and
    /// `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: &[Field]) -> Self {
        Self {
            name: name.into(),
            fields: fields.to_vec(),
            interface_names: vec![],
        }
    }

    /// Sets the `interfaces` this [`InterfaceMeta`] interface implements.
    ///
    /// Overwrites any previously set list of interfaces.
    #[must_use]
    pub fn interfaces(mut self, interfaces: &[Type]) -> Self {
        self.interface_names = interfaces
            .iter()
            .map(|t| t.innermost_name().into())
            .collect();
        self
    }

    /// Wraps this [`InterfaceMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Interface(self)
    }
}

impl UnionMeta {
    /// Build a new [`UnionMeta`] type with the specified `name` and possible
    /// [`Type`]s.
    pub fn new(name: impl Into<ArcStr>, of_types: &[Type]) -> Self {
        Self {
            name: name.into(),
            of_type_names: of_types.iter().map(|t| t.innermost_name().into()).collect(),
        }
    }

    /// Wraps this [`UnionMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Union(self)
    }
}

impl InputObjectMeta {
    /// Builds a new [`InputObjectMeta`] type with the specified `name` and
    /// `input_fields`.
    pub fn new(name: impl Into<ArcStr>, input_fields: &[Argument]) -> Self {
        Self {
            name: name.into(),
            input_fields: input_fields.to_vec(),
        }
    }

    /// Wraps this [`InputObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::InputObject(self)
    }
}

pub(crate) fn parse_int(literal: ScalarLiteral<'_>) -> bool {
    matches!(literal, ScalarLiteral::Int(i) if i.parse::<i32>().is_ok())
}

pub(crate) fn parse_float(literal: ScalarLiteral<'_>) -> bool {
    matches!(literal, ScalarLiteral::Int(n) | ScalarLiteral::Float(n) if n.parse::<f64>().is_ok())
}

pub(crate) fn parse_string(literal: ScalarLiteral<'_>) -> bool {
    matches!(literal, ScalarLiteral::String(_))
}

pub(crate) fn parse_boolean(literal: ScalarLiteral<'_>) -> bool {
    matches!(literal, ScalarLiteral::Boolean(_))
}

pub(crate) fn parse_id(literal: ScalarLiteral<'_>) -> bool {
    matches!(literal, ScalarLiteral::String(_) | ScalarLiteral::Int(_))
}
