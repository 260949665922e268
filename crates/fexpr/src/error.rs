//! Error types for the scanner and the parser.

use thiserror::Error;

use crate::token::Token;

/// A specialized Result type for filter parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// The reason a single token failed to scan.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    /// A lone `-`, or a number with a leading or trailing `.`.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// Quoted text without its matching closing quote.
    #[error("invalid quoted text {0:?}")]
    InvalidText(String),

    /// An identifier ending with `.`/`:` or made of a single special character.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),

    /// A run of sign characters that is not one of the known operators.
    #[error("invalid sign operator {literal:?}{}", did_you_mean(.suggestion))]
    InvalidSign {
        /// The scanned literal.
        literal: String,
        /// The closest known sign operator, if any is close enough.
        suggestion: Option<&'static str>,
    },

    /// A run of `&`/`|` characters other than `&&` or `||`.
    #[error("invalid join operator {literal:?}{}", did_you_mean(.suggestion))]
    InvalidJoin {
        /// The scanned literal.
        literal: String,
        /// The closest known join operator, if any is close enough.
        suggestion: Option<&'static str>,
    },

    /// A `/` that is not followed by a second `/`.
    #[error("invalid comment")]
    InvalidComment,

    /// End of input reached inside a parenthesized group.
    #[error("invalid formatted group - missing {0} closing bracket(s)")]
    UnclosedGroup(usize),

    /// The text before `(` is not a valid identifier.
    #[error("invalid function name {0:?}")]
    InvalidFunctionName(String),

    /// Function calls nested deeper than the configured ceiling.
    #[error("max nested function depth reached (max: {max})")]
    MaxFunctionDepth {
        /// The configured ceiling.
        max: usize,
    },

    /// End of input reached before the closing `)` of a function call.
    #[error("invalid or incomplete function call {function:?} (expected ')')")]
    IncompleteFunction {
        /// The function name.
        function: String,
    },

    /// A comma before the first argument or right after another comma.
    #[error("unexpected comma in function {function:?}")]
    UnexpectedComma {
        /// The function name.
        function: String,
    },

    /// Two arguments without a comma between them.
    #[error("expected comma after the last argument in function {function:?}")]
    MissingComma {
        /// The function name.
        function: String,
    },

    /// A character that cannot start an argument.
    #[error("unsupported argument character {character:?} in function {function:?}")]
    UnsupportedArgument {
        /// The function name.
        function: String,
        /// The offending character.
        character: char,
    },

    /// A malformed comment between function arguments.
    #[error("invalid comment in function {function:?}")]
    InvalidFunctionComment {
        /// The function name.
        function: String,
    },

    /// An argument whose own scan failed.
    #[error("invalid argument {literal:?} in function {function:?}: {cause}")]
    InvalidArgument {
        /// The function name.
        function: String,
        /// The literal of the failed argument.
        literal: String,
        /// Why the argument failed.
        cause: Box<LexErrorKind>,
    },
}

impl LexErrorKind {
    /// Follows nested argument failures down to the original cause.
    pub fn root_cause(&self) -> &LexErrorKind {
        match self {
            LexErrorKind::InvalidArgument { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

fn did_you_mean(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean {s:?}?)"),
        None => String::new(),
    }
}

/// A lexical error, paired with the best-effort token scanned so far.
///
/// The scanner never discards partially scanned input: tolerant callers
/// (syntax highlighters, for example) can take the token out of the error
/// and keep going.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} at position {position}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Byte offset where the offending token starts.
    pub position: usize,
    /// The partial token.
    pub token: Token,
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, position: usize, token: Token) -> Self {
        Self {
            kind,
            position,
            token,
        }
    }

    /// Returns the best-effort token scanned before the failure.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Consumes the error and returns the best-effort token.
    pub fn into_token(self) -> Token {
        self.token
    }

    /// Returns the offending literal.
    pub fn literal(&self) -> &str {
        self.token.literal()
    }
}

/// Errors that can occur while parsing a filter expression.
///
/// Any of these invalidates the whole input; no partial AST is produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The filter expression is empty (or only whitespace and comments).
    #[error("filter expression is empty")]
    Empty,

    /// A token failed to scan.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A comparison was expected to start, but something else was found.
    #[error(
        "expected left operand (identifier, function, text or number), got {found} at position {position}"
    )]
    ExpectedLeftOperand {
        /// Description of the token that was found.
        found: String,
        /// Byte offset of that token.
        position: usize,
    },

    /// A sign operator was not followed by an operand.
    #[error(
        "expected right operand (identifier, function, text or number), got {found} at position {position}"
    )]
    ExpectedRightOperand {
        /// Description of the token that was found.
        found: String,
        /// Byte offset of that token.
        position: usize,
    },

    /// A left operand was not followed by a sign operator.
    #[error("expected a sign operator, got {found} at position {position}")]
    ExpectedOperator {
        /// Description of the token that was found.
        found: String,
        /// Byte offset of that token.
        position: usize,
    },

    /// A complete item was not followed by `&&`, `||` or the end of input.
    #[error("expected && or ||, got {found} at position {position}")]
    ExpectedJoin {
        /// Description of the token that was found.
        found: String,
        /// Byte offset of that token.
        position: usize,
    },

    /// A join operator with nothing after it.
    #[error("dangling join operator at position {position}")]
    DanglingJoin {
        /// Byte offset of the join operator.
        position: usize,
    },

    /// `()` with nothing inside.
    #[error("empty group at position {position}")]
    EmptyGroup {
        /// Byte offset of the opening parenthesis.
        position: usize,
    },

    /// The content of a parenthesized group failed to parse.
    #[error("invalid group at position {position}: {source}")]
    Group {
        /// Byte offset of the opening parenthesis.
        position: usize,
        /// The error from the group content.
        source: Box<ParseError>,
    },

    /// The input exceeds the configured maximum length.
    #[error("filter expression is too long ({length} bytes, max: {max})")]
    InputTooLong {
        /// Length of the input in bytes.
        length: usize,
        /// The configured maximum.
        max: usize,
    },

    /// Parenthesized groups nested deeper than the configured maximum.
    #[error("max nested group depth reached (max: {max}) at position {position}")]
    GroupTooDeep {
        /// The configured maximum.
        max: usize,
        /// Byte offset of the group that crossed the limit.
        position: usize,
    },
}

impl ParseError {
    /// Returns the byte offset the error points at, when it has one.
    ///
    /// Group errors report the position of the innermost failure.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Empty | ParseError::InputTooLong { .. } => None,
            ParseError::Lex(e) => Some(e.position),
            ParseError::Group { source, position } => source.position().or(Some(*position)),
            ParseError::ExpectedLeftOperand { position, .. }
            | ParseError::ExpectedRightOperand { position, .. }
            | ParseError::ExpectedOperator { position, .. }
            | ParseError::ExpectedJoin { position, .. }
            | ParseError::DanglingJoin { position }
            | ParseError::EmptyGroup { position }
            | ParseError::GroupTooDeep { position, .. } => Some(*position),
        }
    }

    /// Returns the innermost error, unwrapping group nesting.
    pub fn root_cause(&self) -> &ParseError {
        match self {
            ParseError::Group { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns `true` for errors raised by the scanner.
    pub fn is_lexical(&self) -> bool {
        matches!(self.root_cause(), ParseError::Lex(_))
    }
}
