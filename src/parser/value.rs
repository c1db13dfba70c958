use crate::parser::{
    ScalarValueType, SyntaxNode, SyntaxNodeType, SyntaxNodeValue, SyntaxTree, TokenStream,
    TokenType, UnlocatedParseResult, document::build_input_item,
};

/// Builder of a single input value, chosen by the token the value starts
/// with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueMaker {
    /// Int, Float, String and block String literals.
    Scalar,

    /// `[value, …]`.
    List,

    /// `{ name: value, … }`.
    Complex,

    /// Any name other than `true`, `false` and `null`.
    Enum,

    /// `true` or `false`.
    Boolean,

    /// `null`.
    Null,

    /// `$name`.
    Variable,
}

impl ValueMaker {
    /// Chooses the builder for the value starting at the active token, if it
    /// can start a value at all.
    pub fn for_active_token(tokens: &TokenStream<'_>) -> Option<Self> {
        let token = tokens.active_token().item;
        Some(match token.token_type {
            TokenType::Int | TokenType::Float | TokenType::String | TokenType::BlockString => {
                Self::Scalar
            }
            TokenType::Null => Self::Null,
            TokenType::BracketOpen => Self::List,
            TokenType::CurlyOpen => Self::Complex,
            TokenType::Dollar => Self::Variable,
            TokenType::Name if matches!(token.text, "true" | "false") => Self::Boolean,
            TokenType::Name => Self::Enum,
            _ => return None,
        })
    }

    /// Builds the value at the head of the `tokens` as a child of the
    /// `parent`, returning the built node.
    ///
    /// # Errors
    ///
    /// If the `tokens` don't form a well-formed value.
    pub fn build_node(
        self,
        tree: &mut SyntaxTree,
        parent: &mut SyntaxNode,
        tokens: &mut TokenStream<'_>,
    ) -> UnlocatedParseResult<SyntaxNode> {
        match self {
            Self::Scalar => {
                let token = tokens.take();
                let value_type = match token.item.token_type {
                    TokenType::Int => ScalarValueType::Int,
                    TokenType::Float => ScalarValueType::Float,
                    _ => ScalarValueType::String,
                };
                Ok(tree.add_child_node(
                    parent,
                    SyntaxNode::new(SyntaxNodeType::ScalarValue, token.start())
                        .with_primary(SyntaxNodeValue::from_token(&token).with_type(value_type)),
                ))
            }
            Self::Enum => Ok(build_literal(tree, parent, tokens, SyntaxNodeType::EnumValue)),
            Self::Boolean => Ok(build_literal(tree, parent, tokens, SyntaxNodeType::BooleanValue)),
            Self::Null => Ok(build_literal(tree, parent, tokens, SyntaxNodeType::NullValue)),
            Self::Variable => {
                let start = tokens.expect(TokenType::Dollar)?.start();
                let name = tokens.expect_name()?;
                Ok(tree.add_child_node(
                    parent,
                    SyntaxNode::new(SyntaxNodeType::VariableValue, start)
                        .with_primary(SyntaxNodeValue::from_span(&name.span)),
                ))
            }
            Self::List => {
                let start = tokens.expect(TokenType::BracketOpen)?.start();
                let mut node =
                    tree.add_child_node(parent, SyntaxNode::new(SyntaxNodeType::ListValue, start));

                while tokens.skip(TokenType::BracketClose).is_none() {
                    let item = Self::for_active_token(tokens)
                        .ok_or_else(|| tokens.unexpected("a value or \"]\""))?;
                    item.build_node(tree, &mut node, tokens)?;
                }

                Ok(node)
            }
            Self::Complex => {
                let start = tokens.expect(TokenType::CurlyOpen)?.start();
                let mut node = tree.add_child_node(
                    parent,
                    SyntaxNode::new(SyntaxNodeType::ComplexValue, start),
                );

                while tokens.skip(TokenType::CurlyClose).is_none() {
                    tokens
                        .match_or_throw(TokenType::Name)
                        .map_err(|_| tokens.unexpected("Name or \"}\""))?;
                    build_input_item(tree, &mut node, tokens)?;
                }

                Ok(node)
            }
        }
    }
}

fn build_literal(
    tree: &mut SyntaxTree,
    parent: &mut SyntaxNode,
    tokens: &mut TokenStream<'_>,
    node_type: SyntaxNodeType,
) -> SyntaxNode {
    let token = tokens.take();
    tree.add_child_node(
        parent,
        SyntaxNode::new(node_type, token.start())
            .with_primary(SyntaxNodeValue::from_token(&token)),
    )
}
