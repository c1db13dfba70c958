//! Query parser and language utilities

mod document;
mod lexer;
mod source;
mod syntax_tree;
mod token_stream;
mod utils;
mod value;


pub use self::{
    document::{
        NodeMaker, parse_document_source, parse_document_source_with_pool, parse_type_expression,
    },
    lexer::{Lexer, LexerError, LexerResult, Token, TokenClass, TokenType, tokenize},
    source::SourceText,
    syntax_tree::{
        NodeBlockPool, ScalarValueType, SyntaxNode, SyntaxNodeCoordinates, SyntaxNodeType,
        SyntaxNodeValue, SyntaxTree,
    },
    token_stream::{ParseError, ParseResult, TokenStream, UnlocatedParseResult},
    utils::{SourceLocation, Span, Spanning},
    value::ValueMaker,
};
