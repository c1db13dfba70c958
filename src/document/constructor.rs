use fnv::FnvHashMap;

use crate::{
    ast::{OperationType, Type},
    document::{
        DocumentPart, PartId, PartKind, QueryDocument, SuppliedValueKind, VariableCollection,
        VariableDeclaration,
    },
    parser::{ScalarValueType, SyntaxNode, SyntaxNodeType, SyntaxTree, parse_type_expression},
    schema::{
        meta::MetaType,
        model::{DirectiveLocation, SchemaType},
    },
};

/// Binds the provided syntax `tree`, parsed from the `source`, to the
/// `schema`.
///
/// Never fails: whatever can't be resolved against the `schema` is left
/// unbound (`None`) for the validation rules to report.
pub fn construct_document<'a>(
    schema: &'a SchemaType,
    source: &'a str,
    tree: &SyntaxTree,
) -> QueryDocument<'a> {
    crate::__span_trace!("construct_document");

    let root = tree.root_node();
    let mut ctx = ConstructionContext {
        document: QueryDocument::new(schema, source),
        tree,
        fragment_types: FnvHashMap::default(),
    };

    for node in tree.children(&root) {
        if node.node_type == SyntaxNodeType::NamedFragment {
            let name = ctx.primary(node);
            let type_condition = ctx.secondary(node);
            ctx.fragment_types.entry(name).or_insert(type_condition);
        }
    }

    ctx.construct_children(&root, None);

    crate::__trace!(
        parts = ctx.document.part_count(),
        operations = ctx.document.operations().len(),
        "document constructed",
    );

    ctx.document
}

/// Outcome of a [`ConstructionStep`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepResult {
    /// A part has been created, and the children of the syntax node are to be
    /// constructed under it.
    Descend(PartId),

    /// No part has been created, and the children of the syntax node are to
    /// be constructed under the current parent.
    PassThrough,

    /// The syntax node has been fully handled, children included.
    Complete,
}

/// Binder of a single kind of syntax node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConstructionStep {
    /// Operation with its root type.
    Operation,
    /// Variable declarations of an operation.
    VariableCollection,
    /// A single variable declaration, default value and directives included.
    Variable,
    /// Selection set bound to its owner's type.
    FieldCollection,
    /// Field resolved on its parent type.
    Field,
    /// Inline fragment bound to its type condition.
    InlineFragment,
    /// Named fragment bound to its type condition.
    NamedFragment,
    /// Fragment spread bound to the type condition of its fragment.
    FragmentSpread,
    /// Directive with its location.
    Directive,
    /// Arguments of a field or directive.
    InputItemCollection,
    /// Argument or input object field.
    InputItem,
    /// Any input value.
    SuppliedValue,
}

impl ConstructionStep {
    /// Returns the step binding nodes of the provided type, `None` for the
    /// document root.
    pub fn for_node_type(node_type: SyntaxNodeType) -> Option<Self> {
        use SyntaxNodeType as T;

        Some(match node_type {
            T::Document => return None,
            T::Operation => Self::Operation,
            T::NamedFragment => Self::NamedFragment,
            T::VariableCollection => Self::VariableCollection,
            T::Variable => Self::Variable,
            T::Directive => Self::Directive,
            T::FieldCollection => Self::FieldCollection,
            T::Field => Self::Field,
            T::FragmentSpread => Self::FragmentSpread,
            T::InlineFragment => Self::InlineFragment,
            T::InputItemCollection => Self::InputItemCollection,
            T::InputItem => Self::InputItem,
            T::ScalarValue
            | T::EnumValue
            | T::BooleanValue
            | T::NullValue
            | T::ListValue
            | T::ComplexValue
            | T::VariableValue => Self::SuppliedValue,
        })
    }

    /// Checks whether this step may bind a node placed under the provided
    /// `parent` part.
    pub fn should_execute(self, document: &QueryDocument<'_>, parent: Option<PartId>) -> bool {
        let parent_kind = parent.map(|p| &document.part(p).kind);
        match self {
            Self::Operation | Self::NamedFragment => parent.is_none(),
            Self::VariableCollection | Self::Variable => {
                matches!(parent_kind, Some(PartKind::Operation { .. }))
            }
            Self::FieldCollection => matches!(
                parent_kind,
                Some(
                    PartKind::Operation { .. }
                        | PartKind::Field { .. }
                        | PartKind::InlineFragment { .. }
                        | PartKind::NamedFragment { .. }
                ),
            ),
            Self::Field | Self::InlineFragment | Self::FragmentSpread => {
                matches!(parent_kind, Some(PartKind::FieldSelectionSet))
            }
            Self::Directive => matches!(
                parent_kind,
                Some(
                    PartKind::Operation { .. }
                        | PartKind::Field { .. }
                        | PartKind::InlineFragment { .. }
                        | PartKind::NamedFragment { .. }
                        | PartKind::FragmentSpread { .. }
                ),
            ),
            Self::InputItemCollection => matches!(
                parent_kind,
                Some(PartKind::Field { .. } | PartKind::Directive { .. }),
            ),
            Self::InputItem => matches!(
                parent_kind,
                Some(
                    PartKind::Field { .. }
                        | PartKind::Directive { .. }
                        | PartKind::SuppliedValue {
                            kind: SuppliedValueKind::Complex,
                            ..
                        }
                ),
            ),
            Self::SuppliedValue => matches!(
                parent_kind,
                Some(
                    PartKind::InputArgument { .. }
                        | PartKind::InputObjectField { .. }
                        | PartKind::SuppliedValue {
                            kind: SuppliedValueKind::List,
                            ..
                        }
                ),
            ),
        }
    }

    /// Binds the provided syntax `node` under the `parent` part.
    pub fn execute<'a>(
        self,
        ctx: &mut ConstructionContext<'a, '_>,
        node: &SyntaxNode,
        parent: Option<PartId>,
    ) -> StepResult {
        match self {
            Self::VariableCollection | Self::InputItemCollection => StepResult::PassThrough,
            Self::Operation => StepResult::Descend(ctx.build_operation(node)),
            Self::NamedFragment => StepResult::Descend(ctx.build_named_fragment(node)),
            Self::Variable => {
                if let Some(operation) = parent {
                    ctx.build_variable(node, operation);
                }
                StepResult::Complete
            }
            Self::FieldCollection => parent.map_or(StepResult::Complete, |p| {
                StepResult::Descend(ctx.build_field_collection(node, p))
            }),
            Self::Field => parent.map_or(StepResult::Complete, |p| {
                StepResult::Descend(ctx.build_field(node, p))
            }),
            Self::InlineFragment => parent.map_or(StepResult::Complete, |p| {
                StepResult::Descend(ctx.build_inline_fragment(node, p))
            }),
            Self::FragmentSpread => parent.map_or(StepResult::Complete, |p| {
                StepResult::Descend(ctx.build_fragment_spread(node, p))
            }),
            Self::Directive => parent.map_or(StepResult::Complete, |p| {
                let location = ctx.directive_location(p);
                StepResult::Descend(ctx.build_directive(node, p, location))
            }),
            Self::InputItem => parent.map_or(StepResult::Complete, |p| {
                StepResult::Descend(ctx.build_input_item(node, p))
            }),
            Self::SuppliedValue => parent.map_or(StepResult::Complete, |p| {
                let expected = ctx.expected_value_type(p);
                StepResult::Descend(ctx.build_value(node, Some(p), expected, true))
            }),
        }
    }
}

/// State of a single [`construct_document`] run.
#[derive(Debug)]
pub struct ConstructionContext<'a, 't> {
    document: QueryDocument<'a>,
    tree: &'t SyntaxTree,
    fragment_types: FnvHashMap<&'a str, &'a str>,
}

impl<'a> ConstructionContext<'a, '_> {
    fn schema(&self) -> &'a SchemaType {
        self.document.schema()
    }

    fn primary(&self, node: &SyntaxNode) -> &'a str {
        let source = self.document.source();
        node.primary_value.map_or("", |v| v.resolve(source))
    }

    fn secondary(&self, node: &SyntaxNode) -> &'a str {
        let source = self.document.source();
        node.secondary_value.map_or("", |v| v.resolve(source))
    }

    fn named_type(&self, name: &str) -> Option<&'a MetaType> {
        self.schema().concrete_type_by_name(name)
    }

    fn typed(&self, type_expression: Option<&Type>) -> Option<&'a MetaType> {
        type_expression.and_then(|t| self.named_type(t.innermost_name()))
    }

    fn add(
        &mut self,
        node: &SyntaxNode,
        parent: Option<PartId>,
        kind: PartKind<'a>,
        graph_type: Option<&'a MetaType>,
        type_expression: Option<Type>,
    ) -> PartId {
        self.add_with(node, parent, kind, graph_type, type_expression, true)
    }

    fn add_with(
        &mut self,
        node: &SyntaxNode,
        parent: Option<PartId>,
        kind: PartKind<'a>,
        graph_type: Option<&'a MetaType>,
        type_expression: Option<Type>,
        attach: bool,
    ) -> PartId {
        self.document.add_part(
            DocumentPart {
                parent,
                kind,
                graph_type,
                type_expression,
                location: node.location,
                children: vec![],
            },
            attach,
        )
    }

    fn construct_children(&mut self, node: &SyntaxNode, parent: Option<PartId>) {
        let tree = self.tree;
        for child in tree.children(node) {
            let Some(step) = ConstructionStep::for_node_type(child.node_type) else {
                continue;
            };
            if !step.should_execute(&self.document, parent) {
                crate::__trace_debug!(
                    node = %child.node_type,
                    location = %child.location,
                    "construction step skipped",
                );
                continue;
            }
            match step.execute(self, child, parent) {
                StepResult::Descend(id) => self.construct_children(child, Some(id)),
                StepResult::PassThrough => self.construct_children(child, parent),
                StepResult::Complete => {}
            }
        }
    }

    fn build_operation(&mut self, node: &SyntaxNode) -> PartId {
        let operation_type = node
            .primary_value
            .and_then(|v| OperationType::from_keyword(v.resolve(self.document.source())))
            .unwrap_or(OperationType::Query);
        let name = node.secondary_value.map(|_| self.secondary(node));
        let graph_type = self.schema().root_type(operation_type);

        self.add(
            node,
            None,
            PartKind::Operation {
                operation_type,
                name,
                variables: VariableCollection::default(),
            },
            graph_type,
            None,
        )
    }

    fn build_named_fragment(&mut self, node: &SyntaxNode) -> PartId {
        let name = self.primary(node);
        let type_condition = self.secondary(node);

        self.add(
            node,
            None,
            PartKind::NamedFragment {
                name,
                type_condition,
            },
            self.named_type(type_condition),
            Some(Type::named(type_condition)),
        )
    }

    fn build_variable(&mut self, node: &SyntaxNode, operation: PartId) {
        let name = self.primary(node);
        let type_expression = parse_type_expression(self.secondary(node)).ok();
        let graph_type = self.typed(type_expression.as_ref());
        let mut declaration =
            VariableDeclaration::new(name, type_expression.clone(), graph_type, node.location);

        let tree = self.tree;
        for child in tree.children(node) {
            if child.node_type == SyntaxNodeType::Directive {
                let id = self.build_directive(child, operation, DirectiveLocation::VariableDefinition);
                self.construct_children(child, Some(id));
                declaration.directives.push(id);
            } else {
                let id = self.build_value(child, Some(operation), type_expression.clone(), false);
                self.construct_children(child, Some(id));
                declaration.default_value = Some(id);
            }
        }

        if let Some(variables) = self.document.variables_mut(operation) {
            variables.add(declaration);
        }
    }

    fn build_field_collection(&mut self, node: &SyntaxNode, parent: PartId) -> PartId {
        let graph_type = self.document.part(parent).graph_type;
        self.add(node, Some(parent), PartKind::FieldSelectionSet, graph_type, None)
    }

    fn build_field(&mut self, node: &SyntaxNode, parent: PartId) -> PartId {
        let name = self.primary(node);
        let alias = node
            .secondary_value
            .map_or(name, |v| v.resolve(self.document.source()));
        let field = self
            .document
            .part(parent)
            .graph_type
            .and_then(|t| self.schema().field_by_name(t, name));
        let type_expression = field.map(|f| f.field_type.clone());

        self.add(
            node,
            Some(parent),
            PartKind::Field { name, alias, field },
            self.typed(type_expression.as_ref()),
            type_expression,
        )
    }

    fn build_inline_fragment(&mut self, node: &SyntaxNode, parent: PartId) -> PartId {
        let type_condition = node.primary_value.map(|_| self.primary(node));
        let (graph_type, type_expression) = match type_condition {
            Some(t) => (self.named_type(t), Some(Type::named(t))),
            None => (self.document.part(parent).graph_type, None),
        };

        self.add(
            node,
            Some(parent),
            PartKind::InlineFragment { type_condition },
            graph_type,
            type_expression,
        )
    }

    fn build_fragment_spread(&mut self, node: &SyntaxNode, parent: PartId) -> PartId {
        let name = self.primary(node);
        let type_condition = self.fragment_types.get(name).copied();

        self.add(
            node,
            Some(parent),
            PartKind::FragmentSpread { name },
            type_condition.and_then(|t| self.named_type(t)),
            type_condition.map(Type::named),
        )
    }

    fn directive_location(&self, parent: PartId) -> DirectiveLocation {
        match &self.document.part(parent).kind {
            PartKind::Operation { operation_type, .. } => (*operation_type).into(),
            PartKind::NamedFragment { .. } => DirectiveLocation::FragmentDefinition,
            PartKind::FragmentSpread { .. } => DirectiveLocation::FragmentSpread,
            PartKind::InlineFragment { .. } => DirectiveLocation::InlineFragment,
            _ => DirectiveLocation::Field,
        }
    }

    fn build_directive(
        &mut self,
        node: &SyntaxNode,
        parent: PartId,
        location: DirectiveLocation,
    ) -> PartId {
        let name = self.primary(node);
        let directive = self.schema().directive_by_name(name);

        self.add(
            node,
            Some(parent),
            PartKind::Directive {
                name,
                directive,
                location,
            },
            None,
            None,
        )
    }

    fn build_input_item(&mut self, node: &SyntaxNode, parent: PartId) -> PartId {
        let name = self.primary(node);
        let parent_part = self.document.part(parent);
        let kind = match &parent_part.kind {
            PartKind::Field { field, .. } => PartKind::InputArgument {
                name,
                argument: field.and_then(|f| f.argument_by_name(name)),
            },
            PartKind::Directive { directive, .. } => PartKind::InputArgument {
                name,
                argument: directive.and_then(|d| d.argument_by_name(name)),
            },
            _ => PartKind::InputObjectField {
                name,
                field: parent_part.graph_type.and_then(|t| t.input_field_by_name(name)),
            },
        };
        let type_expression = match &kind {
            PartKind::InputArgument {
                argument: Some(a), ..
            }
            | PartKind::InputObjectField { field: Some(a), .. } => Some(a.arg_type.clone()),
            _ => None,
        };

        self.add(
            node,
            Some(parent),
            kind,
            self.typed(type_expression.as_ref()),
            type_expression,
        )
    }

    fn expected_value_type(&self, parent: PartId) -> Option<Type> {
        let parent_part = self.document.part(parent);
        match parent_part.kind {
            PartKind::SuppliedValue {
                kind: SuppliedValueKind::List,
                ..
            } => parent_part
                .type_expression
                .as_ref()
                .and_then(Type::list_inner)
                .cloned(),
            _ => parent_part.type_expression.clone(),
        }
    }

    fn build_value(
        &mut self,
        node: &SyntaxNode,
        parent: Option<PartId>,
        type_expression: Option<Type>,
        attach: bool,
    ) -> PartId {
        let kind = match node.node_type {
            SyntaxNodeType::ScalarValue => SuppliedValueKind::Scalar(
                node.primary_value
                    .and_then(|v| v.value_type())
                    .unwrap_or(ScalarValueType::String),
            ),
            SyntaxNodeType::EnumValue => SuppliedValueKind::Enum,
            SyntaxNodeType::BooleanValue => SuppliedValueKind::Boolean,
            SyntaxNodeType::NullValue => SuppliedValueKind::Null,
            SyntaxNodeType::ListValue => SuppliedValueKind::List,
            SyntaxNodeType::ComplexValue => SuppliedValueKind::Complex,
            _ => SuppliedValueKind::Variable,
        };
        let text = self.primary(node);

        self.add_with(
            node,
            parent,
            PartKind::SuppliedValue { kind, text },
            self.typed(type_expression.as_ref()),
            type_expression,
            attach,
        )
    }
}
