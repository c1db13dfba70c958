use indexmap::IndexMap;

use crate::{
    ast::Type,
    document::PartId,
    parser::SourceLocation,
    schema::meta::MetaType,
};

/// Declaration of a single operation variable, e.g. `$id: ID! = "1" @tag`.
#[derive(Clone, Debug)]
pub struct VariableDeclaration<'a> {
    /// Name of the variable, without the leading `$`.
    pub name: &'a str,

    /// Declared type, `None` if it couldn't be read.
    pub type_expression: Option<Type>,

    /// Schema type named by the declared type, if it exists.
    pub graph_type: Option<&'a MetaType>,

    /// Default value part. It belongs to the operation, but is not one of
    /// its children.
    pub default_value: Option<PartId>,

    /// Directive parts applied to this declaration.
    pub directives: Vec<PartId>,

    /// Location of the `$` starting the declaration.
    pub location: SourceLocation,

    is_referenced: bool,
}

impl<'a> VariableDeclaration<'a> {
    /// Creates a new unreferenced declaration without default value nor
    /// directives.
    pub fn new(
        name: &'a str,
        type_expression: Option<Type>,
        graph_type: Option<&'a MetaType>,
        location: SourceLocation,
    ) -> Self {
        Self {
            name,
            type_expression,
            graph_type,
            default_value: None,
            directives: vec![],
            location,
            is_referenced: false,
        }
    }

    /// Indicates whether the operation has been found to use this variable.
    pub fn is_referenced(&self) -> bool {
        self.is_referenced
    }
}

/// Variables declared by an operation, in declaration order.
///
/// Redeclarations of an already declared name are kept apart, so they can
/// be reported without shadowing the first declaration.
#[derive(Clone, Debug, Default)]
pub struct VariableCollection<'a> {
    variables: IndexMap<&'a str, VariableDeclaration<'a>>,
    duplicates: Vec<VariableDeclaration<'a>>,
}

impl<'a> VariableCollection<'a> {
    /// Adds a declaration, returning `false` if its name is already declared.
    pub fn add(&mut self, declaration: VariableDeclaration<'a>) -> bool {
        if self.variables.contains_key(declaration.name) {
            self.duplicates.push(declaration);
            false
        } else {
            self.variables.insert(declaration.name, declaration);
            true
        }
    }

    /// Looks up the first declaration of the named variable.
    pub fn get(&self, name: &str) -> Option<&VariableDeclaration<'a>> {
        self.variables.get(name)
    }

    /// Indicates whether the named variable is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Iterates over the first declarations of every name.
    pub fn iter(&self) -> impl Iterator<Item = &VariableDeclaration<'a>> {
        self.variables.values()
    }

    /// Number of distinct declared names.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Indicates whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Redeclarations of already declared names.
    pub fn duplicates(&self) -> &[VariableDeclaration<'a>] {
        &self.duplicates
    }

    /// Flags the named variable as used, returning `false` if it isn't
    /// declared.
    pub fn mark_as_referenced(&mut self, name: &str) -> bool {
        match self.variables.get_mut(name) {
            Some(v) => {
                v.is_referenced = true;
                true
            }
            None => false,
        }
    }

    /// Unflags all the variables.
    pub fn clear_references(&mut self) {
        for v in self.variables.values_mut() {
            v.is_referenced = false;
        }
    }

    /// Iterates over the declared variables not flagged as used.
    pub fn unreferenced(&self) -> impl Iterator<Item = &VariableDeclaration<'a>> {
        self.iter().filter(|v| !v.is_referenced)
    }
}
