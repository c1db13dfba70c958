//! Schema assembled out of [`meta`](crate::schema::meta) types.

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use fnv::FnvHashMap;

use crate::{
    ast::{OperationType, Type},
    schema::meta::{
        self, Argument, Field, InterfaceMeta, MetaType, ObjectMeta, ScalarMeta, UnionMeta,
    },
};

/// Metadata for a schema
#[derive(Debug)]
pub struct SchemaType {
    types: FnvHashMap<ArcStr, MetaType>,
    query_type_name: ArcStr,
    mutation_type_name: Option<ArcStr>,
    subscription_type_name: Option<ArcStr>,
    directives: FnvHashMap<ArcStr, DirectiveType>,
    typename_field: Field,
}

/// Builder of a [`SchemaType`].
#[derive(Debug)]
pub struct SchemaBuilder {
    types: Vec<MetaType>,
    query_type_name: ArcStr,
    mutation_type_name: Option<ArcStr>,
    subscription_type_name: Option<ArcStr>,
    directives: Vec<DirectiveType>,
}

/// Error of building a [`SchemaType`] out of inconsistent metadata.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum SchemaError {
    /// Two types were registered with the same name.
    #[display("Type \"{_0}\" is registered more than once")]
    DuplicateType(#[error(not(source))] ArcStr),

    /// Two directives were registered with the same name.
    #[display("Directive \"@{_0}\" is registered more than once")]
    DuplicateDirective(#[error(not(source))] ArcStr),

    /// A root operation type is not registered.
    #[display("Root {operation} type \"{name}\" is not registered")]
    MissingRootType {
        /// Operation the type is the root of.
        operation: OperationType,
        /// Name of the missing type.
        name: ArcStr,
    },

    /// A root operation type is not an object type.
    #[display("Root {operation} type \"{name}\" must be an object type")]
    NonObjectRootType {
        /// Operation the type is the root of.
        operation: OperationType,
        /// Name of the offending type.
        name: ArcStr,
    },

    /// A type references another one that is not registered.
    #[display("Type \"{referenced}\" used by \"{by}\" is not registered")]
    UnknownType {
        /// Name of the missing type.
        referenced: ArcStr,
        /// Name of the type or directive referencing it.
        by: ArcStr,
    },
}

/// Metadata for a directive
#[derive(Clone, Debug)]
pub struct DirectiveType {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub locations: Vec<DirectiveLocation>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub is_repeatable: bool,
}

/// Location a directive may be applied at.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum DirectiveLocation {
    #[display("QUERY")]
    Query,
    #[display("MUTATION")]
    Mutation,
    #[display("SUBSCRIPTION")]
    Subscription,
    #[display("FIELD")]
    Field,
    #[display("FRAGMENT_DEFINITION")]
    FragmentDefinition,
    #[display("FRAGMENT_SPREAD")]
    FragmentSpread,
    #[display("INLINE_FRAGMENT")]
    InlineFragment,
    #[display("VARIABLE_DEFINITION")]
    VariableDefinition,
    #[display("FIELD_DEFINITION")]
    FieldDefinition,
    #[display("ARGUMENT_DEFINITION")]
    ArgumentDefinition,
    #[display("INPUT_FIELD_DEFINITION")]
    InputFieldDefinition,
    #[display("ENUM_VALUE")]
    EnumValue,
}

impl From<OperationType> for DirectiveLocation {
    fn from(operation: OperationType) -> Self {
        match operation {
            OperationType::Query => Self::Query,
            OperationType::Mutation => Self::Mutation,
            OperationType::Subscription => Self::Subscription,
        }
    }
}

impl SchemaType {
    /// Starts building a schema with the provided query root type name.
    #[expect(clippy::new_ret_no_self, reason = "builder entry point")]
    pub fn new(query_type_name: impl Into<ArcStr>) -> SchemaBuilder {
        SchemaBuilder {
            types: vec![],
            query_type_name: query_type_name.into(),
            mutation_type_name: None,
            subscription_type_name: None,
            directives: vec![],
        }
    }

    /// Looks up a type by its name.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// Iterates over all the registered types, built-in ones included.
    pub fn concrete_type_list(&self) -> impl Iterator<Item = &MetaType> {
        self.types.values()
    }

    /// Root type of the provided operation type, if the schema supports it.
    pub fn root_type(&self, operation: OperationType) -> Option<&MetaType> {
        let name = match operation {
            OperationType::Query => Some(&self.query_type_name),
            OperationType::Mutation => self.mutation_type_name.as_ref(),
            OperationType::Subscription => self.subscription_type_name.as_ref(),
        }?;
        self.concrete_type_by_name(name)
    }

    /// Looks up a directive by its name.
    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name)
    }

    /// Iterates over all the registered directives, built-in ones included.
    pub fn directive_list(&self) -> impl Iterator<Item = &DirectiveType> {
        self.directives.values()
    }

    /// Looks up a field selectable on the provided type, the implicit
    /// `__typename` of composite types included.
    pub fn field_by_name<'s>(&'s self, parent: &'s MetaType, name: &str) -> Option<&'s Field> {
        if name == "__typename" && parent.is_composite() {
            Some(&self.typename_field)
        } else {
            parent.field_by_name(name)
        }
    }

    /// Concrete object types an abstract type may resolve to.
    ///
    /// Empty for non-abstract types.
    pub fn possible_types(&self, t: &MetaType) -> Vec<&MetaType> {
        match t {
            MetaType::Union(UnionMeta { of_type_names, .. }) => of_type_names
                .iter()
                .flat_map(|t| self.concrete_type_by_name(t))
                .collect(),
            MetaType::Interface(InterfaceMeta { name, .. }) => self
                .concrete_type_list()
                .filter(|t| match t {
                    MetaType::Object(ObjectMeta {
                        interface_names, ..
                    }) => interface_names.iter().any(|iname| iname == name),
                    _ => false,
                })
                .collect(),
            _ => vec![],
        }
    }

    /// Checks whether the `possible_type` is one of the
    /// [possible types](SchemaType::possible_types) of the `abstract_type`.
    pub fn is_possible_type(&self, abstract_type: &MetaType, possible_type: &MetaType) -> bool {
        self.possible_types(abstract_type)
            .into_iter()
            .any(|t| t.name() == possible_type.name())
    }

    /// Checks whether values of both types may ever be the same object.
    pub fn type_overlap(&self, t1: &MetaType, t2: &MetaType) -> bool {
        if t1.name() == t2.name() {
            return true;
        }

        match (t1.is_abstract(), t2.is_abstract()) {
            (true, true) => self
                .possible_types(t1)
                .iter()
                .any(|t| self.is_possible_type(t2, t)),
            (true, false) => self.is_possible_type(t1, t2),
            (false, true) => self.is_possible_type(t2, t1),
            (false, false) => false,
        }
    }

    /// Checks whether values of the `sub_type` are always valid values of the
    /// `super_type`.
    pub fn is_subtype(&self, sub_type: &Type, super_type: &Type) -> bool {
        use Type::*;

        if super_type == sub_type {
            return true;
        }

        match (super_type, sub_type) {
            (NonNullNamed(super_name), NonNullNamed(sub_name))
            | (Named(super_name), Named(sub_name))
            | (Named(super_name), NonNullNamed(sub_name)) => {
                self.is_named_subtype(sub_name, super_name)
            }
            (NonNullList(super_inner), NonNullList(sub_inner))
            | (List(super_inner), List(sub_inner))
            | (List(super_inner), NonNullList(sub_inner)) => {
                self.is_subtype(sub_inner, super_inner)
            }
            _ => false,
        }
    }

    /// Checks whether the named `sub_type_name` is the `super_type_name` or
    /// one of its possible types.
    pub fn is_named_subtype(&self, sub_type_name: &str, super_type_name: &str) -> bool {
        if sub_type_name == super_type_name {
            true
        } else if let (Some(sub_type), Some(super_type)) = (
            self.concrete_type_by_name(sub_type_name),
            self.concrete_type_by_name(super_type_name),
        ) {
            super_type.is_abstract() && self.is_possible_type(super_type, sub_type)
        } else {
            false
        }
    }
}

impl SchemaBuilder {
    /// Sets the mutation root type name.
    #[must_use]
    pub fn mutation(mut self, name: impl Into<ArcStr>) -> Self {
        self.mutation_type_name = Some(name.into());
        self
    }

    /// Sets the subscription root type name.
    #[must_use]
    pub fn subscription(mut self, name: impl Into<ArcStr>) -> Self {
        self.subscription_type_name = Some(name.into());
        self
    }

    /// Registers a type.
    ///
    /// Registering one of the built-in scalars replaces it.
    #[must_use]
    pub fn register(mut self, meta: MetaType) -> Self {
        self.types.push(meta);
        self
    }

    /// Registers a custom directive.
    #[must_use]
    pub fn directive(mut self, directive: DirectiveType) -> Self {
        self.directives.push(directive);
        self
    }

    /// Builds the [`SchemaType`], checking its consistency.
    ///
    /// # Errors
    ///
    /// If a type or directive is registered twice, a root type is missing or
    /// isn't an object, or a type references an unregistered one.
    pub fn build(self) -> Result<SchemaType, SchemaError> {
        let mut types = FnvHashMap::default();
        for meta in self.types {
            let name = ArcStr::from(meta.name());
            if types.insert(name.clone(), meta).is_some() {
                return Err(SchemaError::DuplicateType(name));
            }
        }
        for (name, parse_fn) in [
            ("Int", meta::parse_int as meta::ScalarParseFn),
            ("Float", meta::parse_float),
            ("String", meta::parse_string),
            ("Boolean", meta::parse_boolean),
            ("ID", meta::parse_id),
        ] {
            types
                .entry(ArcStr::from(name))
                .or_insert_with(|| ScalarMeta::new(name).parse_fn(parse_fn).into_meta());
        }

        let mut directives = FnvHashMap::default();
        for directive in [
            DirectiveType::new_skip(),
            DirectiveType::new_include(),
            DirectiveType::new_deprecated(),
        ]
        .into_iter()
        .chain(self.directives)
        {
            let name = directive.name.clone();
            if directives.insert(name.clone(), directive).is_some() {
                return Err(SchemaError::DuplicateDirective(name));
            }
        }

        let roots = [
            (OperationType::Query, Some(&self.query_type_name)),
            (OperationType::Mutation, self.mutation_type_name.as_ref()),
            (OperationType::Subscription, self.subscription_type_name.as_ref()),
        ];
        for (operation, name) in roots {
            let Some(name) = name else { continue };
            match types.get(name) {
                None => {
                    return Err(SchemaError::MissingRootType {
                        operation,
                        name: name.clone(),
                    });
                }
                Some(MetaType::Object(_)) => {}
                Some(_) => {
                    return Err(SchemaError::NonObjectRootType {
                        operation,
                        name: name.clone(),
                    });
                }
            }
        }

        for meta in types.values() {
            if let Some(referenced) = meta
                .referenced_type_names()
                .into_iter()
                .find(|n| !types.contains_key(*n))
            {
                return Err(SchemaError::UnknownType {
                    referenced: referenced.into(),
                    by: meta.name().into(),
                });
            }
        }
        for directive in directives.values() {
            if let Some(arg) = directive
                .arguments
                .iter()
                .find(|a| !types.contains_key(a.arg_type.innermost_name()))
            {
                return Err(SchemaError::UnknownType {
                    referenced: arg.arg_type.innermost_name().into(),
                    by: arcstr::format!("@{}", directive.name),
                });
            }
        }

        crate::__trace_debug!(
            types = types.len(),
            directives = directives.len(),
            "schema built",
        );

        Ok(SchemaType {
            types,
            query_type_name: self.query_type_name,
            mutation_type_name: self.mutation_type_name,
            subscription_type_name: self.subscription_type_name,
            directives,
            typename_field: Field::new("__typename", Type::non_null_named("String")),
        })
    }
}

impl DirectiveType {
    /// Builds a new non-repeatable [`DirectiveType`].
    pub fn new(
        name: impl Into<ArcStr>,
        locations: &[DirectiveLocation],
        arguments: &[Argument],
    ) -> Self {
        Self {
            name: name.into(),
            locations: locations.to_vec(),
            arguments: arguments.to_vec(),
            is_repeatable: false,
        }
    }

    fn new_skip() -> Self {
        Self::new(
            "skip",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            &[Argument::new("if", Type::non_null_named("Boolean"))],
        )
    }

    fn new_include() -> Self {
        Self::new(
            "include",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            &[Argument::new("if", Type::non_null_named("Boolean"))],
        )
    }

    fn new_deprecated() -> Self {
        Self::new(
            "deprecated",
            &[
                DirectiveLocation::FieldDefinition,
                DirectiveLocation::ArgumentDefinition,
                DirectiveLocation::InputFieldDefinition,
                DirectiveLocation::EnumValue,
            ],
            &[Argument::new("reason", Type::named("String"))
                .default_value("\"No longer supported\"")],
        )
    }

    /// Marks this directive as allowed to appear more than once per location.
    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.is_repeatable = true;
        self
    }

    /// Access an argument's meta data given its name.
    pub fn argument_by_name(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{DirectiveLocation, DirectiveType, SchemaError, SchemaType};
    use crate::{
        ast::{OperationType, Type},
        schema::meta::{
            Argument, EnumMeta, EnumValue, Field, InterfaceMeta, ObjectMeta, UnionMeta,
        },
    };

    fn pets_schema() -> SchemaType {
        SchemaType::new("Query")
            .subscription("Subscription")
            .register(
                ObjectMeta::new(
                    "Query",
                    &[
                        Field::new("pet", Type::named("Pet")),
                        Field::new("catOrDog", Type::named("CatOrDog")),
                    ],
                )
                .into_meta(),
            )
            .register(ObjectMeta::new("Subscription", &[Field::new("tick", Type::named("Int"))]).into_meta())
            .register(InterfaceMeta::new("Pet", &[Field::new("name", Type::named("String"))]).into_meta())
            .register(
                ObjectMeta::new("Dog", &[Field::new("name", Type::named("String"))])
                    .interfaces(&[Type::named("Pet")])
                    .into_meta(),
            )
            .register(
                ObjectMeta::new("Cat", &[Field::new("name", Type::named("String"))])
                    .interfaces(&[Type::named("Pet")])
                    .into_meta(),
            )
            .register(ObjectMeta::new("Human", &[Field::new("name", Type::named("String"))]).into_meta())
            .register(
                UnionMeta::new("CatOrDog", &[Type::named("Cat"), Type::named("Dog")]).into_meta(),
            )
            .register(EnumMeta::new("FurColor", &[EnumValue::new("BROWN")]).into_meta())
            .build()
            .expect("valid schema")
    }

    #[test]
    fn registers_built_ins() {
        let schema = pets_schema();

        for name in ["Int", "Float", "String", "Boolean", "ID"] {
            assert!(schema.concrete_type_by_name(name).is_some_and(|t| t.is_builtin()));
        }
        for name in ["skip", "include", "deprecated"] {
            assert!(schema.directive_by_name(name).is_some());
        }
        assert!(schema.root_type(OperationType::Query).is_some());
        assert!(schema.root_type(OperationType::Subscription).is_some());
        assert!(schema.root_type(OperationType::Mutation).is_none());
    }

    #[test]
    fn implicit_typename() {
        let schema = pets_schema();
        let dog = schema.concrete_type_by_name("Dog").expect("Dog");
        let fur = schema.concrete_type_by_name("FurColor").expect("FurColor");

        assert_eq!(
            schema.field_by_name(dog, "__typename").map(|f| f.field_type.to_string()),
            Some("String!".into()),
        );
        assert!(schema.field_by_name(fur, "__typename").is_none());
    }

    #[test]
    fn abstract_types() {
        let schema = pets_schema();
        let by_name = |n| schema.concrete_type_by_name(n).expect("registered");

        let mut pets = schema
            .possible_types(by_name("Pet"))
            .into_iter()
            .map(|t| t.name().to_owned())
            .collect::<Vec<_>>();
        pets.sort();
        assert_eq!(pets, vec!["Cat", "Dog"]);

        assert!(schema.type_overlap(by_name("Pet"), by_name("CatOrDog")));
        assert!(schema.type_overlap(by_name("Dog"), by_name("Pet")));
        assert!(!schema.type_overlap(by_name("Human"), by_name("Pet")));
        assert!(!schema.type_overlap(by_name("Human"), by_name("Dog")));
        assert!(schema.possible_types(by_name("Dog")).is_empty());
    }

    #[test]
    fn subtypes() {
        let schema = pets_schema();
        let ty = |s: &str| s.parse::<Type>().expect("valid type");

        assert!(schema.is_subtype(&ty("Dog!"), &ty("Pet")));
        assert!(schema.is_subtype(&ty("[Dog!]!"), &ty("[Pet]")));
        assert!(!schema.is_subtype(&ty("Pet"), &ty("Dog")));
        assert!(!schema.is_subtype(&ty("Dog"), &ty("Pet!")));
        assert!(!schema.is_subtype(&ty("[Dog]"), &ty("Dog")));
    }

    #[test]
    fn rejects_inconsistent_schemas() {
        assert_eq!(
            SchemaType::new("Query").build().unwrap_err(),
            SchemaError::MissingRootType {
                operation: OperationType::Query,
                name: "Query".into(),
            },
        );

        assert_eq!(
            SchemaType::new("Query")
                .mutation("FurColor")
                .register(ObjectMeta::new("Query", &[]).into_meta())
                .register(EnumMeta::new("FurColor", &[]).into_meta())
                .build()
                .unwrap_err(),
            SchemaError::NonObjectRootType {
                operation: OperationType::Mutation,
                name: "FurColor".into(),
            },
        );

        assert_eq!(
            SchemaType::new("Query")
                .register(ObjectMeta::new("Query", &[Field::new("a", Type::named("Nope"))]).into_meta())
                .build()
                .unwrap_err(),
            SchemaError::UnknownType {
                referenced: "Nope".into(),
                by: "Query".into(),
            },
        );

        assert_eq!(
            SchemaType::new("Query")
                .register(ObjectMeta::new("Query", &[]).into_meta())
                .register(ObjectMeta::new("Query", &[]).into_meta())
                .build()
                .unwrap_err(),
            SchemaError::DuplicateType("Query".into()),
        );

        assert_eq!(
            SchemaType::new("Query")
                .register(ObjectMeta::new("Query", &[]).into_meta())
                .directive(DirectiveType::new("skip", &[DirectiveLocation::Field], &[]))
                .build()
                .unwrap_err(),
            SchemaError::DuplicateDirective("skip".into()),
        );
    }

    #[test]
    fn custom_directives() {
        let schema = SchemaType::new("Query")
            .register(ObjectMeta::new("Query", &[]).into_meta())
            .directive(
                DirectiveType::new(
                    "tag",
                    &[DirectiveLocation::Field, DirectiveLocation::VariableDefinition],
                    &[Argument::new("name", Type::non_null_named("String"))],
                )
                .repeatable(),
            )
            .build()
            .expect("valid schema");

        let tag = schema.directive_by_name("tag").expect("registered");
        assert!(tag.is_repeatable);
        assert!(tag.argument_by_name("name").is_some_and(Argument::is_required));
        assert_eq!(DirectiveLocation::VariableDefinition.to_string(), "VARIABLE_DEFINITION");
    }
}
