//! Scanner and parser for SQL-`WHERE`-like filter expressions.
//!
//! This crate turns a human-typed filter such as
//! `name ~ 'demo' && (age >= 18 || @request.auth.id != '')` into an AST
//! that other code can translate into a concrete query language. It never
//! evaluates anything: it only recognizes tokens and assembles them.
//!
//! # Supported Syntax
//!
//! ## Operands
//! - Identifiers: `name`, `@request.auth.id`, `_id`, `#tag`, `a:b`
//! - Numbers: `12`, `-3`, `4.5`
//! - Quoted text: `'it\'s'`, `"say \"hi\""`
//! - Functions: `lower(name)`, `geo(lat, lon, 'km')`, nested up to 3 levels
//!
//! ## Sign Operators
//! - `=`, `!=`, `~`, `!~`, `<`, `<=`, `>`, `>=`
//! - "any/array" variants: `?=`, `?!=`, `?~`, `?!~`, `?<`, `?<=`, `?>`, `?>=`
//!
//! ## Joins and Grouping
//! - `&&` - AND
//! - `||` - OR
//! - `()` - Grouping
//!
//! ## Comments
//! - `// ...` to the end of the line
//!
//! # Example
//!
//! ```
//! use fexpr_rs::{parse, Scanner, Token};
//!
//! let filter = parse("id > 123").unwrap();
//! assert_eq!(filter.to_string(), "[{&& {{identifier id} > {number 123}}}]");
//!
//! // Raw tokens, for syntax highlighting and similar tools
//! let tokens: Vec<Token> = Scanner::new("id > 123").tokens().map(|t| t.unwrap()).collect();
//! assert_eq!(tokens.len(), 5);
//! ```

mod ast;
mod error;
mod options;
mod parser;
mod scanner;
mod token;

pub use ast::{Comparison, Filter, JoinContent, JoinItem, JoinOp, SignOp};
pub use error::{LexError, LexErrorKind, ParseError, ParseResult};
pub use options::{ParseOptions, ScanOptions, DEFAULT_MAX_FUNCTION_DEPTH, DEFAULT_MAX_GROUP_DEPTH};
pub use parser::{parse, parse_with_options, FilterParser};
pub use scanner::{ScanOutput, Scanner, Tokens};
pub use token::{PositionedToken, Token, TokenKind};
