//! Recursive descent parser for filter expressions.

use tracing::{debug, trace};

use crate::ast::{Comparison, Filter, JoinItem, JoinOp, SignOp};
use crate::error::{ParseError, ParseResult};
use crate::options::ParseOptions;
use crate::scanner::Scanner;
use crate::token::Token;

/// Parses a filter expression with the default options.
///
/// Shorthand for [`FilterParser::parse`].
pub fn parse(input: &str) -> ParseResult<Filter> {
    FilterParser::parse(input)
}

/// Parses a filter expression with custom limits.
///
/// Shorthand for [`FilterParser::parse_with_options`].
pub fn parse_with_options(input: &str, options: &ParseOptions) -> ParseResult<Filter> {
    FilterParser::parse_with_options(input, options)
}

/// Parser for filter expressions.
///
/// # Grammar
///
/// ```text
/// filter     ::= item (join item)*
/// item       ::= comparison | group
/// comparison ::= operand sign operand
/// group      ::= "(" filter ")"
/// operand    ::= identifier | number | text | function
/// join       ::= "&&" | "||"
/// ```
///
/// There is no precedence: items form a flat sequence, each tagged with the
/// join that precedes it (`&&` for the first one). Whitespace and comments
/// are skipped. Any error rejects the whole input.
///
/// # Example
///
/// ```
/// use fexpr_rs::{FilterParser, JoinOp, SignOp};
///
/// let filter = FilterParser::parse("id > 123 || name ~ 'demo'").unwrap();
/// assert_eq!(filter.len(), 2);
/// assert_eq!(filter.items()[1].join, JoinOp::Or);
///
/// let first = filter.items()[0].as_comparison().unwrap();
/// assert_eq!(first.operator, Some(SignOp::Gt));
/// ```
pub struct FilterParser<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
    /// Absolute position of `input` within the top-level filter.
    offset: usize,
    /// Group nesting level of this parser (0 at top level).
    depth: usize,
    options: ParseOptions,
}

/// What the parser expects next, carrying the comparison built so far.
enum Step {
    LeftOperand,
    Operator { left: Token },
    RightOperand { left: Token, operator: SignOp },
    JoinOrEnd,
}

impl<'a> FilterParser<'a> {
    /// Parses a filter expression string into a [`Filter`] AST.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Empty`] if the input has no items,
    /// [`ParseError::Lex`] if a token fails to scan, and one of the syntax
    /// variants when tokens appear out of order.
    pub fn parse(input: &str) -> ParseResult<Filter> {
        Self::parse_with_options(input, &ParseOptions::default())
    }

    /// Parses a filter expression with custom limits.
    ///
    /// # Errors
    ///
    /// Same as [`FilterParser::parse`], plus [`ParseError::InputTooLong`]
    /// and [`ParseError::GroupTooDeep`] when a limit is exceeded.
    pub fn parse_with_options(input: &str, options: &ParseOptions) -> ParseResult<Filter> {
        if let Some(max) = options.max_input_length {
            if input.len() > max {
                return Err(ParseError::InputTooLong {
                    length: input.len(),
                    max,
                });
            }
        }

        let result = FilterParser::new(input, 0, 0, options).parse_sequence();
        if let Err(e) = &result {
            debug!(error = %e, "filter rejected");
        }
        result
    }

    fn new(input: &'a str, offset: usize, depth: usize, options: &ParseOptions) -> Self {
        Self {
            input,
            scanner: Scanner::with_options(input, &options.scan_options()).with_offset(offset),
            offset,
            depth,
            options: *options,
        }
    }

    /// Returns the next token that is neither whitespace nor a comment.
    fn next_significant(&mut self) -> ParseResult<(Token, usize)> {
        loop {
            let position = self.scanner.position();
            let token = self.scanner.scan()?;
            if !token.is_trivia() {
                trace!(position, kind = %token.kind(), literal = token.literal(), "token");
                return Ok((token, position));
            }
        }
    }

    /// Parses `item (join item)*` up to the end of this parser's input.
    fn parse_sequence(&mut self) -> ParseResult<Filter> {
        let mut filter = Filter::default();
        let mut join = JoinOp::And;
        let mut join_position = 0;
        let mut step = Step::LeftOperand;

        loop {
            let (token, position) = self.next_significant()?;

            step = match step {
                Step::LeftOperand => match token {
                    Token::Eof if filter.is_empty() => return Err(ParseError::Empty),
                    Token::Eof => {
                        return Err(ParseError::DanglingJoin {
                            position: join_position,
                        })
                    }
                    Token::Group(literal) => {
                        let group = self.parse_group(&literal, position)?;
                        filter.push(JoinItem::group(join, group));
                        Step::JoinOrEnd
                    }
                    left if left.is_operand() => Step::Operator { left },
                    other => {
                        return Err(ParseError::ExpectedLeftOperand {
                            found: describe(&other),
                            position,
                        })
                    }
                },

                Step::Operator { left } => match sign_operator(&token) {
                    Some(operator) => Step::RightOperand { left, operator },
                    None => {
                        return Err(ParseError::ExpectedOperator {
                            found: describe(&token),
                            position,
                        })
                    }
                },

                Step::RightOperand { left, operator } => {
                    if !token.is_operand() {
                        return Err(ParseError::ExpectedRightOperand {
                            found: describe(&token),
                            position,
                        });
                    }
                    let comparison = Comparison::new(left, operator, token);
                    filter.push(JoinItem::comparison(join, comparison));
                    Step::JoinOrEnd
                }

                Step::JoinOrEnd => match token {
                    Token::Eof => return Ok(filter),
                    Token::Join(ref literal) => match JoinOp::from_literal(literal) {
                        Some(op) => {
                            join = op;
                            join_position = position;
                            Step::LeftOperand
                        }
                        None => {
                            return Err(ParseError::ExpectedJoin {
                                found: describe(&token),
                                position,
                            })
                        }
                    },
                    other => {
                        return Err(ParseError::ExpectedJoin {
                            found: describe(&other),
                            position,
                        })
                    }
                },
            };
        }
    }

    /// Parses the content of a group token starting at `position`.
    ///
    /// The group literal is exactly the input between the two parentheses,
    /// so the child parser runs over that sub-slice and reports absolute
    /// positions.
    fn parse_group(&self, literal: &str, position: usize) -> ParseResult<Filter> {
        let depth = self.depth + 1;
        if let Some(max) = self.options.max_group_depth {
            if depth > max {
                return Err(ParseError::GroupTooDeep { max, position });
            }
        }

        let start = position - self.offset + 1;
        let inner = self
            .input
            .get(start..start + literal.len())
            .unwrap_or(literal);

        debug!(position, depth, "entering group");

        match FilterParser::new(inner, position + 1, depth, &self.options).parse_sequence() {
            Ok(group) => Ok(group),
            Err(ParseError::Empty) => Err(ParseError::EmptyGroup { position }),
            Err(e) => Err(ParseError::Group {
                position,
                source: Box::new(e),
            }),
        }
    }
}

fn sign_operator(token: &Token) -> Option<SignOp> {
    match token {
        Token::Sign(literal) => SignOp::from_literal(literal),
        _ => None,
    }
}

/// Describes a token for error messages.
fn describe(token: &Token) -> String {
    match token {
        Token::Eof => "end of input".to_string(),
        other => format!("{:?} ({})", other.literal(), other.kind()),
    }
}
