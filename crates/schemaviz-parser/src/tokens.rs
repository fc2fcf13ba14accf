//! Token types for GraphQL SDL source.

use std::fmt;

use crate::span::Span;

/// SDL tokens.
///
/// Keywords (`type`, `input`, `implements`, ...) are ordinary names in
/// GraphQL; the parser recognizes them by text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    Name(&'src str),
    /// A `"..."` string with escapes resolved.
    StringValue(String),
    /// A `"""..."""` block string, dedented.
    BlockString(String),
    /// An integer or float literal, kept as written.
    Number(&'src str),

    LeftBrace,    // {
    RightBrace,   // }
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    Colon,        // :
    Bang,         // !
    Equals,       // =
    At,           // @
    Pipe,         // |
    Ampersand,    // &
    Dollar,       // $
    Comma,        // ,

    Comment(&'src str),
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Tokens that carry no meaning in SDL (commas included).
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::Comment(_) | Token::Comma
        )
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(name) => write!(f, "{name}"),
            Token::StringValue(value) => write!(f, "\"{value}\""),
            Token::BlockString(value) => write!(f, "\"\"\"{value}\"\"\""),
            Token::Number(number) => write!(f, "{number}"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Colon => write!(f, ":"),
            Token::Bang => write!(f, "!"),
            Token::Equals => write!(f, "="),
            Token::At => write!(f, "@"),
            Token::Pipe => write!(f, "|"),
            Token::Ampersand => write!(f, "&"),
            Token::Dollar => write!(f, "$"),
            Token::Comma => write!(f, ","),
            Token::Comment(text) => write!(f, "#{text}"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => writeln!(f),
        }
    }
}

/// A token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}
