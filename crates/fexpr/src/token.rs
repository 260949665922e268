//! Tokens produced by the scanner.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Eof,
    Whitespace,
    Join,
    Sign,
    Identifier,
    Function,
    Number,
    Text,
    Group,
    Comment,
    Unexpected,
}

impl TokenKind {
    /// Returns the lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Eof => "eof",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Join => "join",
            TokenKind::Sign => "sign",
            TokenKind::Identifier => "identifier",
            TokenKind::Function => "function",
            TokenKind::Number => "number",
            TokenKind::Text => "text",
            TokenKind::Group => "group",
            TokenKind::Comment => "comment",
            TokenKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scanned lexical unit.
///
/// Every literal is an owned copy of the input, decoded where the kind
/// requires it (quotes stripped for text, outer parentheses stripped for
/// groups).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "literal", rename_all = "snake_case")]
pub enum Token {
    /// End of input. Consumes nothing.
    #[default]
    Eof,

    /// A run of spaces, tabs and newlines.
    Whitespace(String),

    /// `&&` or `||`.
    Join(String),

    /// A comparison operator such as `=` or `?!~`.
    Sign(String),

    /// A column name, variable or placeholder (`name`, `@request.auth.id`).
    Identifier(String),

    /// A function call with its already-scanned arguments.
    Function {
        /// The function name.
        name: String,
        /// Identifier, number, text or nested function arguments.
        arguments: Vec<Token>,
    },

    /// An integer or decimal number, kept verbatim.
    Number(String),

    /// Quoted text with the quotes stripped and the matching quote unescaped.
    Text(String),

    /// The raw text between a pair of balanced parentheses.
    Group(String),

    /// A `//` line comment, trimmed.
    Comment(String),

    /// A character that cannot start any token.
    Unexpected(String),
}

impl Token {
    /// Returns the lexical class of the token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Eof => TokenKind::Eof,
            Token::Whitespace(_) => TokenKind::Whitespace,
            Token::Join(_) => TokenKind::Join,
            Token::Sign(_) => TokenKind::Sign,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Function { .. } => TokenKind::Function,
            Token::Number(_) => TokenKind::Number,
            Token::Text(_) => TokenKind::Text,
            Token::Group(_) => TokenKind::Group,
            Token::Comment(_) => TokenKind::Comment,
            Token::Unexpected(_) => TokenKind::Unexpected,
        }
    }

    /// Returns the token literal. For functions this is the function name.
    pub fn literal(&self) -> &str {
        match self {
            Token::Eof => "",
            Token::Function { name, .. } => name,
            Token::Whitespace(s)
            | Token::Join(s)
            | Token::Sign(s)
            | Token::Identifier(s)
            | Token::Number(s)
            | Token::Text(s)
            | Token::Group(s)
            | Token::Comment(s)
            | Token::Unexpected(s) => s,
        }
    }

    /// Returns the function arguments, or an empty slice for other kinds.
    pub fn arguments(&self) -> &[Token] {
        match self {
            Token::Function { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Returns `true` if the token can appear on either side of a sign.
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            Token::Identifier(_) | Token::Number(_) | Token::Text(_) | Token::Function { .. }
        )
    }

    /// Returns `true` for tokens the parser skips (whitespace and comments).
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace(_) | Token::Comment(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Function { name, arguments } => {
                write!(f, "{{function {name} [")?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str("]}")
            }
            other => write!(f, "{{{} {}}}", other.kind(), other.literal()),
        }
    }
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedToken {
    /// The token.
    pub token: Token,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}
