use std::sync::Arc;

use crate::{
    ast::Type,
    parser::{
        NodeBlockPool, ParseError, ParseResult, Spanning, SyntaxNode, SyntaxNodeType,
        SyntaxNodeValue, SyntaxTree, TokenStream, TokenType, UnlocatedParseResult,
        lexer::tokenize, value::ValueMaker,
    },
};

const OPERATION_KEYWORDS: &[&str] = &["query", "mutation", "subscription"];

/// Parses the provided GraphQL `source` into a [`SyntaxTree`], checking its
/// blocks out of the [shared](NodeBlockPool::shared) pool.
///
/// # Errors
///
/// On the first lexical or syntax error. No partial tree is returned.
pub fn parse_document_source(source: &str) -> UnlocatedParseResult<SyntaxTree> {
    parse_document_source_with_pool(source, NodeBlockPool::shared())
}

/// Parses the provided GraphQL `source` into a [`SyntaxTree`], checking its
/// blocks out of the provided `pool`.
///
/// # Errors
///
/// On the first lexical or syntax error. No partial tree is returned.
pub fn parse_document_source_with_pool(
    source: &str,
    pool: Arc<NodeBlockPool>,
) -> UnlocatedParseResult<SyntaxTree> {
    crate::__span_trace!("parse_document_source");

    let mut tokens = tokenize(source).map_err(|e| e.map(ParseError::LexerError))?;
    tokens.prime();

    let mut tree = SyntaxTree::from_document_root_with_pool(pool);
    let mut root = tree.root_node();
    match NodeMaker::Document.build_node(&mut tree, &mut root, &mut tokens) {
        Ok(_) => {
            crate::__trace!(nodes = tree.node_count(), "document parsed");
            Ok(tree)
        }
        Err(e) => {
            crate::__trace_debug!(error = %e, "document rejected");
            tree.release();
            Err(e)
        }
    }
}

/// Parses a standalone type expression, such as `[String!]!`.
///
/// # Errors
///
/// If the `source` is not exactly one well-formed type expression.
pub fn parse_type_expression(source: &str) -> UnlocatedParseResult<Type> {
    let mut tokens = tokenize(source).map_err(|e| e.map(ParseError::LexerError))?;
    tokens.prime();

    let parsed = parse_type(&mut tokens)?;
    if tokens.end_of_stream() {
        Ok(parsed.item)
    } else {
        Err(tokens.unexpected("end of type expression"))
    }
}

pub(crate) fn parse_type(tokens: &mut TokenStream<'_>) -> ParseResult<Type> {
    let parsed = if let Some(open) = tokens.skip(TokenType::BracketOpen) {
        let inner = parse_type(tokens)?;
        let end_pos = tokens.expect(TokenType::BracketClose)?.end();
        Spanning::start_end(&open.start(), &end_pos, Type::list(inner.item))
    } else {
        tokens.expect_name()?.map(Type::named)
    };

    Ok(match tokens.skip(TokenType::Bang) {
        Some(bang) => Spanning::start_end(&parsed.start(), &bang.end(), parsed.item.non_null()),
        None => parsed,
    })
}

/// Builder of a single grammar production.
///
/// Every builder checks that the stream is positioned on its construct,
/// attaches its node to the provided parent and leaves the stream primed
/// right after the construct.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeMaker {
    /// One or more operations and named fragments.
    Document,

    /// `query Name($v: T) @dir { … }` or the `{ … }` shorthand.
    Operation,

    /// `($a: T, $b: U = default)`.
    VariableCollection,

    /// `$a: T = default @dir`.
    Variable,

    /// `@name(arg: value)`.
    Directive,

    /// `{ field ...spread ... on T { … } }`.
    FieldCollection,

    /// `alias: name(arg: value) @dir { … }`.
    Field,

    /// `...Name @dir` or `... on T @dir { … }`.
    Fragment,

    /// `fragment Name on T @dir { … }`.
    NamedFragment,

    /// `(name: value, …)`.
    InputItemCollection,

    /// `name: value`.
    InputItem,

    /// Any input value, see [`ValueMaker`].
    InputValue,
}

impl NodeMaker {
    /// Returns the builder responsible for nodes of the provided type.
    pub fn for_node_type(node_type: SyntaxNodeType) -> Self {
        use SyntaxNodeType as T;

        match node_type {
            T::Document => Self::Document,
            T::Operation => Self::Operation,
            T::NamedFragment => Self::NamedFragment,
            T::VariableCollection => Self::VariableCollection,
            T::Variable => Self::Variable,
            T::Directive => Self::Directive,
            T::FieldCollection => Self::FieldCollection,
            T::Field => Self::Field,
            T::FragmentSpread | T::InlineFragment => Self::Fragment,
            T::InputItemCollection => Self::InputItemCollection,
            T::InputItem => Self::InputItem,
            T::ScalarValue
            | T::EnumValue
            | T::BooleanValue
            | T::NullValue
            | T::ListValue
            | T::ComplexValue
            | T::VariableValue => Self::InputValue,
        }
    }

    /// Builds the construct at the head of the `tokens` as a child of the
    /// `parent`, returning the built node.
    ///
    /// # Errors
    ///
    /// If the `tokens` don't form the construct this builder handles.
    pub fn build_node(
        self,
        tree: &mut SyntaxTree,
        parent: &mut SyntaxNode,
        tokens: &mut TokenStream<'_>,
    ) -> UnlocatedParseResult<SyntaxNode> {
        match self {
            Self::Document => build_document(tree, parent, tokens),
            Self::Operation => build_operation(tree, parent, tokens),
            Self::VariableCollection => build_variable_collection(tree, parent, tokens),
            Self::Variable => build_variable(tree, parent, tokens),
            Self::Directive => build_directive(tree, parent, tokens),
            Self::FieldCollection => build_field_collection(tree, parent, tokens),
            Self::Field => build_field(tree, parent, tokens),
            Self::Fragment => build_fragment(tree, parent, tokens),
            Self::NamedFragment => build_named_fragment(tree, parent, tokens),
            Self::InputItemCollection => build_input_item_collection(tree, parent, tokens),
            Self::InputItem => build_input_item(tree, parent, tokens),
            Self::InputValue => ValueMaker::for_active_token(tokens)
                .ok_or_else(|| tokens.unexpected("a value"))?
                .build_node(tree, parent, tokens),
        }
    }
}

fn build_document(
    tree: &mut SyntaxTree,
    document: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    loop {
        if tokens.matches(TokenType::CurlyOpen) || tokens.matches_name(OPERATION_KEYWORDS) {
            NodeMaker::Operation.build_node(tree, document, tokens)?;
        } else if tokens.matches_name(&["fragment"]) {
            NodeMaker::NamedFragment.build_node(tree, document, tokens)?;
        } else {
            return Err(tokens.unexpected(
                "\"{\", \"query\", \"mutation\", \"subscription\" or \"fragment\"",
            ));
        }

        if tokens.end_of_stream() {
            return Ok(*document);
        }
    }
}

fn build_directives(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<()> {
    while tokens.matches(TokenType::At) {
        NodeMaker::Directive.build_node(tree, parent, tokens)?;
    }
    Ok(())
}

fn build_operation(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    let mut node = SyntaxNode::new(SyntaxNodeType::Operation, tokens.active_token().start());

    if tokens.matches_name(OPERATION_KEYWORDS) {
        node = node.with_primary(SyntaxNodeValue::from_token(&tokens.take()));
        if tokens.matches(TokenType::Name) {
            node = node.with_secondary(SyntaxNodeValue::from_token(&tokens.take()));
        }
    } else {
        tokens.match_or_throw(TokenType::CurlyOpen)?;
    }

    let mut node = tree.add_child_node(parent, node);
    if tokens.matches(TokenType::ParenOpen) {
        NodeMaker::VariableCollection.build_node(tree, &mut node, tokens)?;
    }
    build_directives(tree, &mut node, tokens)?;
    NodeMaker::FieldCollection.build_node(tree, &mut node, tokens)?;

    Ok(node)
}

fn build_variable_collection(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    let start = tokens.expect(TokenType::ParenOpen)?.start();
    let mut node = tree.add_child_node(
        parent,
        SyntaxNode::new(SyntaxNodeType::VariableCollection, start),
    );

    loop {
        NodeMaker::Variable.build_node(tree, &mut node, tokens)?;
        if tokens.skip(TokenType::ParenClose).is_some() {
            return Ok(node);
        }
    }
}

fn build_variable(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    let start = tokens.expect(TokenType::Dollar)?.start();
    let name = tokens.expect_name()?;
    tokens.expect(TokenType::Colon)?;
    let var_type = parse_type(tokens)?;

    let mut node = tree.add_child_node(
        parent,
        SyntaxNode::new(SyntaxNodeType::Variable, start)
            .with_primary(SyntaxNodeValue::from_span(&name.span))
            .with_secondary(SyntaxNodeValue::from_span(&var_type.span)),
    );

    if tokens.skip(TokenType::Equals).is_some() {
        NodeMaker::InputValue.build_node(tree, &mut node, tokens)?;
    }
    build_directives(tree, &mut node, tokens)?;

    Ok(node)
}

fn build_directive(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    let start = tokens.expect(TokenType::At)?.start();
    let name = tokens.expect_name()?;

    let mut node = tree.add_child_node(
        parent,
        SyntaxNode::new(SyntaxNodeType::Directive, start)
            .with_primary(SyntaxNodeValue::from_span(&name.span)),
    );

    if tokens.matches(TokenType::ParenOpen) {
        NodeMaker::InputItemCollection.build_node(tree, &mut node, tokens)?;
    }

    Ok(node)
}

fn build_field_collection(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    let start = tokens.expect(TokenType::CurlyOpen)?.start();
    let mut node = tree.add_child_node(
        parent,
        SyntaxNode::new(SyntaxNodeType::FieldCollection, start),
    );

    while tokens.skip(TokenType::CurlyClose).is_none() {
        if tokens.matches(TokenType::Spread) {
            NodeMaker::Fragment.build_node(tree, &mut node, tokens)?;
        } else if tokens.matches(TokenType::Name) {
            NodeMaker::Field.build_node(tree, &mut node, tokens)?;
        } else {
            return Err(tokens.unexpected("Name, \"...\" or \"}\""));
        }
    }

    Ok(node)
}

fn build_field(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    let alias = tokens.expect_name()?;
    let name = if tokens.skip(TokenType::Colon).is_some() {
        tokens.expect_name()?
    } else {
        alias
    };

    let mut node = tree.add_child_node(
        parent,
        SyntaxNode::new(SyntaxNodeType::Field, alias.start())
            .with_primary(SyntaxNodeValue::from_span(&name.span))
            .with_secondary(SyntaxNodeValue::from_span(&alias.span)),
    );

    if tokens.matches(TokenType::ParenOpen) {
        NodeMaker::InputItemCollection.build_node(tree, &mut node, tokens)?;
    }
    build_directives(tree, &mut node, tokens)?;
    if tokens.matches(TokenType::CurlyOpen) {
        NodeMaker::FieldCollection.build_node(tree, &mut node, tokens)?;
    }

    Ok(node)
}

fn build_fragment(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    let start = tokens.expect(TokenType::Spread)?.start();

    if tokens.matches(TokenType::Name) && !tokens.matches_name(&["on"]) {
        let name = tokens.expect_name()?;
        let mut node = tree.add_child_node(
            parent,
            SyntaxNode::new(SyntaxNodeType::FragmentSpread, start)
                .with_primary(SyntaxNodeValue::from_span(&name.span)),
        );
        build_directives(tree, &mut node, tokens)?;

        if tokens.matches(TokenType::CurlyOpen) {
            return Err(tokens.invalid(format!(
                "Fragment spread \"{}\" must not declare a field set",
                name.item,
            )));
        }
        return Ok(node);
    }

    let mut node = SyntaxNode::new(SyntaxNodeType::InlineFragment, start);
    if tokens.skip_name("on").is_some() {
        let type_condition = tokens.expect_name()?;
        node = node.with_primary(SyntaxNodeValue::from_span(&type_condition.span));
    }
    let mut node = tree.add_child_node(parent, node);
    build_directives(tree, &mut node, tokens)?;

    if !tokens.matches(TokenType::CurlyOpen) {
        return Err(tokens.invalid("Inline fragment must declare a field set"));
    }
    NodeMaker::FieldCollection.build_node(tree, &mut node, tokens)?;

    Ok(node)
}

fn build_named_fragment(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    tokens.match_name_or_throw(&["fragment"])?;
    let start = tokens.take().start();

    if tokens.matches_name(&["on"]) {
        let on = *tokens.active_token();
        return Err(on.map(ParseError::unexpected_token));
    }
    let name = tokens.expect_name()?;
    tokens.match_name_or_throw(&["on"])?;
    tokens.take();
    let type_condition = tokens.expect_name()?;

    let mut node = tree.add_child_node(
        parent,
        SyntaxNode::new(SyntaxNodeType::NamedFragment, start)
            .with_primary(SyntaxNodeValue::from_span(&name.span))
            .with_secondary(SyntaxNodeValue::from_span(&type_condition.span)),
    );
    build_directives(tree, &mut node, tokens)?;
    NodeMaker::FieldCollection.build_node(tree, &mut node, tokens)?;

    Ok(node)
}

fn build_input_item_collection(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    let start = tokens.expect(TokenType::ParenOpen)?.start();
    let mut node = tree.add_child_node(
        parent,
        SyntaxNode::new(SyntaxNodeType::InputItemCollection, start),
    );

    loop {
        NodeMaker::InputItem.build_node(tree, &mut node, tokens)?;
        if tokens.skip(TokenType::ParenClose).is_some() {
            return Ok(node);
        }
    }
}

pub(crate) fn build_input_item(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
) -> UnlocatedParseResult<SyntaxNode> {
    let name = tokens.expect_name()?;
    tokens.expect(TokenType::Colon)?;

    let mut node = tree.add_child_node(
        parent,
        SyntaxNode::new(SyntaxNodeType::InputItem, name.start())
            .with_primary(SyntaxNodeValue::from_span(&name.span)),
    );
    NodeMaker::InputValue.build_node(tree, &mut node, tokens)?;

    Ok(node)
}
