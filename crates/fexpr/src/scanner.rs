//! Scanner (tokenizer) for filter expressions.
//!
//! The scanner walks the input one code point at a time and hands out one
//! [`Token`] per [`Scanner::scan`] call. Parenthesized groups and function
//! calls are bundled into single tokens here, since only character-level
//! lookahead can tell a `)` inside quoted text from a closing bracket.

use strsim::levenshtein;
use tracing::debug;

use crate::ast::{JoinOp, SignOp};
use crate::error::{LexError, LexErrorKind};
use crate::options::ScanOptions;
use crate::token::{PositionedToken, Token};

/// Maximum Levenshtein distance for an operator suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 1;

/// A sub-scanner result: the token, or the partial token and why it failed.
type SubScan = Result<Token, (Token, LexErrorKind)>;

/// Result of tokenizing a whole filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutput {
    /// Every scanned token with its position, errored ones included.
    pub tokens: Vec<PositionedToken>,
    /// The errors, in input order.
    pub errors: Vec<LexError>,
}

/// Scanner for tokenizing filter expressions.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
    /// Byte width of the last character read, so `unread` steps back exactly
    /// one code point.
    last_width: usize,
    /// Added to every reported position.
    offset: usize,
    max_function_depth: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, &ScanOptions::default())
    }

    /// Creates a new scanner with custom options.
    pub fn with_options(input: &'a str, options: &ScanOptions) -> Self {
        Self {
            input,
            position: 0,
            last_width: 0,
            offset: 0,
            max_function_depth: options.max_function_depth,
        }
    }

    /// Reports positions relative to `offset` instead of the slice start.
    pub(crate) fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the current byte position.
    pub fn position(&self) -> usize {
        self.offset + self.position
    }

    /// Reads and returns the next token.
    ///
    /// Returns [`Token::Eof`] once the input is exhausted, on every call.
    /// On failure the error carries the best-effort token.
    pub fn scan(&mut self) -> Result<Token, LexError> {
        let start = self.position();

        let Some(ch) = self.peek() else {
            return Ok(Token::Eof);
        };

        let scanned = if is_whitespace(ch) {
            Ok(self.scan_whitespace())
        } else if is_group_start(ch) {
            self.scan_group()
        } else if is_identifier_start(ch) {
            self.scan_identifier(self.max_function_depth)
        } else if is_number_start(ch) {
            self.scan_number()
        } else if is_text_start(ch) {
            self.scan_text(false)
        } else if is_sign_char(ch) {
            self.scan_sign()
        } else if is_join_char(ch) {
            self.scan_join()
        } else if is_comment_start(ch) {
            self.scan_comment()
        } else {
            self.read();
            Err((
                Token::Unexpected(ch.to_string()),
                LexErrorKind::UnexpectedCharacter(ch),
            ))
        };

        scanned.map_err(|(token, kind)| LexError::new(kind, start, token))
    }

    /// Turns the scanner into an iterator over the remaining tokens.
    pub fn tokens(self) -> Tokens<'a> {
        Tokens { scanner: self }
    }

    /// Collects all tokens and any errors encountered.
    ///
    /// Unlike the parser, this keeps going after an error, so callers such as
    /// syntax highlighters always see the whole input.
    pub fn tokenize_with_errors(mut self) -> ScanOutput {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            let position = self.position();
            match self.scan() {
                Ok(Token::Eof) => break,
                Ok(token) => tokens.push(PositionedToken { token, position }),
                Err(err) => {
                    tokens.push(PositionedToken {
                        token: err.token.clone(),
                        position,
                    });
                    errors.push(err);
                }
            }
        }

        if !errors.is_empty() {
            debug!(errors = errors.len(), "tokenized with errors");
        }

        ScanOutput { tokens, errors }
    }

    /// Consumes and returns the next character.
    fn read(&mut self) -> Option<char> {
        match self.input[self.position..].chars().next() {
            Some(ch) => {
                self.last_width = ch.len_utf8();
                self.position += self.last_width;
                Some(ch)
            }
            None => {
                self.last_width = 0;
                None
            }
        }
    }

    /// Steps back over the last character read. Only one step is ever pending.
    fn unread(&mut self) {
        self.position -= self.last_width;
        self.last_width = 0;
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Reads a maximal run of characters accepted by `accept`.
    fn read_run(&mut self, accept: fn(char) -> bool) -> String {
        let mut buf = String::new();
        while let Some(ch) = self.read() {
            if !accept(ch) {
                self.unread();
                break;
            }
            buf.push(ch);
        }
        buf
    }

    fn scan_whitespace(&mut self) -> Token {
        Token::Whitespace(self.read_run(is_whitespace))
    }

    /// Scans an integer or decimal number (no exponents).
    fn scan_number(&mut self) -> SubScan {
        let mut buf = String::new();
        let mut had_dot = false;

        while let Some(ch) = self.read() {
            let accepted = ch.is_ascii_digit()
                || (ch == '-' && buf.is_empty())
                || (ch == '.' && !had_dot);
            if !accepted {
                self.unread();
                break;
            }
            had_dot |= ch == '.';
            buf.push(ch);
        }

        if buf.is_empty() || buf == "-" || buf.starts_with('.') || buf.ends_with('.') {
            let kind = LexErrorKind::InvalidNumber(buf.clone());
            return Err((Token::Number(buf), kind));
        }

        Ok(Token::Number(buf))
    }

    /// Scans `'...'` or `"..."` text.
    ///
    /// With `preserve_quotes` the literal keeps its quotes and escapes, which
    /// is what group scanning needs to hand the raw text to the parser.
    fn scan_text(&mut self, preserve_quotes: bool) -> SubScan {
        let Some(quote) = self.read() else {
            return Err((
                Token::Text(String::new()),
                LexErrorKind::InvalidText(String::new()),
            ));
        };

        let mut buf = String::from(quote);
        let mut prev = None;
        let mut closed = false;

        while let Some(ch) = self.read() {
            buf.push(ch);
            if ch == quote && prev != Some('\\') {
                closed = true;
                break;
            }
            prev = Some(ch);
        }

        if !closed {
            let kind = LexErrorKind::InvalidText(buf.clone());
            return Err((Token::Text(buf), kind));
        }

        if preserve_quotes {
            return Ok(Token::Text(buf));
        }

        let width = quote.len_utf8();
        let inner = &buf[width..buf.len() - width];
        Ok(Token::Text(unescape_quote(inner, quote)))
    }

    /// Scans a `//` comment up to the end of the line.
    fn scan_comment(&mut self) -> SubScan {
        self.read();
        match self.read() {
            Some('/') => {}
            Some(_) => {
                self.unread();
                return Err((Token::Comment(String::new()), LexErrorKind::InvalidComment));
            }
            None => return Err((Token::Comment(String::new()), LexErrorKind::InvalidComment)),
        }

        let mut buf = String::new();
        while let Some(ch) = self.read() {
            if ch == '\n' {
                break;
            }
            buf.push(ch);
        }

        Ok(Token::Comment(buf.trim().to_string()))
    }

    /// Scans an identifier, or a function call when a `(` follows the name.
    ///
    /// `depth` is the remaining function nesting budget. When the name is not
    /// a valid function name or the budget is spent, the `(` is left
    /// unconsumed, so the next [`Scanner::scan`] returns the parenthesized
    /// text as a [`Token::Group`].
    fn scan_identifier(&mut self, depth: usize) -> SubScan {
        let mut buf = String::new();

        // the first character was already validated by the caller
        if let Some(first) = self.read() {
            buf.push(first);
        }

        while let Some(ch) = self.read() {
            if is_group_start(ch) {
                self.unread();
                if !is_valid_identifier(&buf) {
                    let kind = LexErrorKind::InvalidFunctionName(buf.clone());
                    return function_error(buf, Vec::new(), kind);
                }
                if depth == 0 {
                    let kind = LexErrorKind::MaxFunctionDepth {
                        max: self.max_function_depth,
                    };
                    return function_error(buf, Vec::new(), kind);
                }
                return self.scan_function_args(buf, depth);
            }

            if !is_identifier_char(ch) {
                self.unread();
                break;
            }

            buf.push(ch);
        }

        if !is_valid_identifier(&buf) {
            let kind = LexErrorKind::InvalidIdentifier(buf.clone());
            return Err((Token::Identifier(buf), kind));
        }

        Ok(Token::Identifier(buf))
    }

    /// Scans a parenthesized, comma separated argument list.
    fn scan_function_args(&mut self, name: String, depth: usize) -> SubScan {
        let mut args = Vec::new();

        if self.read() != Some('(') {
            let kind = LexErrorKind::IncompleteFunction {
                function: name.clone(),
            };
            return function_error(name, args, kind);
        }

        let mut expect_comma = false;

        loop {
            let Some(ch) = self.read() else {
                let kind = LexErrorKind::IncompleteFunction {
                    function: name.clone(),
                };
                return function_error(name, args, kind);
            };

            if ch == ')' {
                return Ok(Token::Function {
                    name,
                    arguments: args,
                });
            }

            if is_whitespace(ch) {
                self.scan_whitespace();
                continue;
            }

            if is_comment_start(ch) {
                self.unread();
                if self.scan_comment().is_err() {
                    let kind = LexErrorKind::InvalidFunctionComment {
                        function: name.clone(),
                    };
                    return function_error(name, args, kind);
                }
                continue;
            }

            let is_comma = ch == ',';

            if expect_comma && !is_comma {
                let kind = LexErrorKind::MissingComma {
                    function: name.clone(),
                };
                return function_error(name, args, kind);
            }

            if !expect_comma && is_comma {
                let kind = LexErrorKind::UnexpectedComma {
                    function: name.clone(),
                };
                return function_error(name, args, kind);
            }

            expect_comma = false;

            if is_comma {
                continue;
            }

            let scanned = if is_identifier_start(ch) {
                self.unread();
                self.scan_identifier(depth - 1)
            } else if is_number_start(ch) {
                self.unread();
                self.scan_number()
            } else if is_text_start(ch) {
                self.unread();
                self.scan_text(false)
            } else {
                let kind = LexErrorKind::UnsupportedArgument {
                    function: name.clone(),
                    character: ch,
                };
                return function_error(name, args, kind);
            };

            match scanned {
                Ok(arg) => {
                    args.push(arg);
                    expect_comma = true;
                }
                Err((arg, cause)) => {
                    let kind = LexErrorKind::InvalidArgument {
                        function: name.clone(),
                        literal: arg.literal().to_string(),
                        cause: Box::new(cause),
                    };
                    return function_error(name, args, kind);
                }
            }
        }
    }

    fn scan_sign(&mut self) -> SubScan {
        let literal = self.read_run(is_sign_char);

        if SignOp::from_literal(&literal).is_some() {
            return Ok(Token::Sign(literal));
        }

        let suggestion = suggest_operator(&literal, SignOp::ALL.iter().map(SignOp::as_str));
        let kind = LexErrorKind::InvalidSign {
            literal: literal.clone(),
            suggestion,
        };
        Err((Token::Sign(literal), kind))
    }

    fn scan_join(&mut self) -> SubScan {
        let literal = self.read_run(is_join_char);

        if JoinOp::from_literal(&literal).is_some() {
            return Ok(Token::Join(literal));
        }

        let suggestion = suggest_operator(&literal, JoinOp::ALL.iter().map(JoinOp::as_str));
        let kind = LexErrorKind::InvalidJoin {
            literal: literal.clone(),
            suggestion,
        };
        Err((Token::Join(literal), kind))
    }

    /// Scans everything between a `(` and its matching `)`.
    ///
    /// Neither outer parenthesis is written into the literal. Quoted text is
    /// copied verbatim, quotes included, so brackets inside strings are not
    /// counted.
    fn scan_group(&mut self) -> SubScan {
        self.read();

        let mut buf = String::new();
        let mut open_groups = 1usize;

        while let Some(ch) = self.read() {
            if is_group_start(ch) {
                open_groups += 1;
                buf.push(ch);
            } else if is_text_start(ch) {
                self.unread();
                match self.scan_text(true) {
                    Ok(text) => buf.push_str(text.literal()),
                    Err((text, kind)) => {
                        buf.push_str(text.literal());
                        return Err((Token::Group(buf), kind));
                    }
                }
            } else if ch == ')' {
                open_groups -= 1;
                if open_groups == 0 {
                    return Ok(Token::Group(buf));
                }
                buf.push(ch);
            } else {
                buf.push(ch);
            }
        }

        Err((Token::Group(buf), LexErrorKind::UnclosedGroup(open_groups)))
    }
}

/// Iterator over the tokens of a [`Scanner`], returned by [`Scanner::tokens`].
///
/// Yields tokens until EOF. Errors do not stop the iteration.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    scanner: Scanner<'a>,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.scanner.scan() {
            Ok(Token::Eof) => None,
            other => Some(other),
        }
    }
}

fn function_error(name: String, arguments: Vec<Token>, kind: LexErrorKind) -> SubScan {
    Err((Token::Function { name, arguments }, kind))
}

/// Strips the escaping backslash from `\<quote>`; other escapes stay as written.
fn unescape_quote(text: &str, quote: char) -> String {
    let escaped = format!("\\{quote}");
    text.replace(&escaped, &quote.to_string())
}

/// Finds the known operator closest to `literal`, if it is a near miss.
fn suggest_operator<'s>(
    literal: &str,
    candidates: impl Iterator<Item = &'s str>,
) -> Option<&'s str> {
    let (best, distance) = candidates
        .map(|candidate| (candidate, levenshtein(literal, candidate)))
        .min_by_key(|(_, d)| *d)?;

    if distance > 0 && distance <= MAX_SUGGESTION_DISTANCE {
        Some(best)
    } else {
        None
    }
}

// Character classes
// -------------------------------------------------------------------

fn is_whitespace(ch: char) -> bool {
    ch == ' ' || ch == '\t' || ch == '\n'
}

fn is_group_start(ch: char) -> bool {
    ch == '('
}

fn is_text_start(ch: char) -> bool {
    ch == '\'' || ch == '"'
}

fn is_number_start(ch: char) -> bool {
    ch == '-' || ch.is_ascii_digit()
}

fn is_sign_char(ch: char) -> bool {
    matches!(ch, '=' | '?' | '!' | '>' | '<' | '~')
}

fn is_join_char(ch: char) -> bool {
    ch == '&' || ch == '|'
}

fn is_comment_start(ch: char) -> bool {
    ch == '/'
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || is_identifier_special_start(ch)
}

fn is_identifier_special_start(ch: char) -> bool {
    ch == '@' || ch == '_' || ch == '#'
}

fn is_identifier_combine(ch: char) -> bool {
    ch == '.' || ch == ':'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || is_identifier_combine(ch)
}

/// An identifier must not end with `.`/`:` nor be a lone special start
/// character.
fn is_valid_identifier(literal: &str) -> bool {
    let mut chars = literal.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let last = literal.chars().last().unwrap_or(first);

    !is_identifier_combine(last) && !(chars.next().is_none() && is_identifier_special_start(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(print: &str) -> (bool, String) {
        (false, print.to_string())
    }

    fn err(print: &str) -> (bool, String) {
        (true, print.to_string())
    }

    /// Scans everything up to EOF, returning (errored, printed token) pairs.
    fn scan_all(input: &str) -> Vec<(bool, String)> {
        let mut scanner = Scanner::new(input);
        let mut out = Vec::new();
        loop {
            match scanner.scan() {
                Ok(Token::Eof) => break,
                Ok(token) => out.push((false, token.to_string())),
                Err(e) => out.push((true, e.token().to_string())),
            }
        }
        out
    }

    fn scan_one(input: &str) -> Result<Token, LexError> {
        Scanner::new(input).scan()
    }

    // ==================== Whitespace ====================

    #[test]
    fn test_scan_whitespace() {
        assert_eq!(scan_all("   "), vec![ok("{whitespace    }")]);
        assert_eq!(scan_all(" \t\n"), vec![ok("{whitespace  \t\n}")]);
        assert_eq!(
            scan_all("test 123"),
            vec![ok("{identifier test}"), ok("{whitespace  }"), ok("{number 123}")]
        );
    }

    #[test]
    fn test_eof_is_repeatable() {
        let mut scanner = Scanner::new("a");
        assert_eq!(scanner.scan(), Ok(Token::Identifier("a".into())));
        assert_eq!(scanner.scan(), Ok(Token::Eof));
        assert_eq!(scanner.scan(), Ok(Token::Eof));
        assert_eq!(Scanner::new("").scan(), Ok(Token::Eof));
    }

    #[test]
    fn test_tokens_resumes_from_current_position() {
        let mut scanner = Scanner::new("a = 1");
        assert_eq!(scanner.scan(), Ok(Token::Identifier("a".into())));
        assert_eq!(scanner.position(), 1);

        let rest: Vec<Token> = scanner.tokens().map(|t| t.unwrap()).collect();
        assert_eq!(
            rest,
            vec![
                Token::Whitespace(" ".into()),
                Token::Sign("=".into()),
                Token::Whitespace(" ".into()),
                Token::Number("1".into()),
            ]
        );
    }

    // ==================== Identifiers ====================

    #[test]
    fn test_scan_identifiers() {
        assert_eq!(scan_all("test"), vec![ok("{identifier test}")]);
        assert_eq!(scan_all("@test.123"), vec![ok("{identifier @test.123}")]);
        assert_eq!(scan_all("_test.123"), vec![ok("{identifier _test.123}")]);
        assert_eq!(scan_all("#test.123"), vec![ok("{identifier #test.123}")]);
        assert_eq!(scan_all("a:b_c"), vec![ok("{identifier a:b_c}")]);
    }

    #[test]
    fn test_scan_invalid_identifiers() {
        assert_eq!(
            scan_all(".test.123"),
            vec![err("{unexpected .}"), ok("{identifier test.123}")]
        );
        assert_eq!(
            scan_all("test#@"),
            vec![ok("{identifier test}"), err("{identifier #}"), err("{identifier @}")]
        );
        assert_eq!(scan_all("test."), vec![err("{identifier test.}")]);
        assert_eq!(scan_all("test:"), vec![err("{identifier test:}")]);
        assert_eq!(scan_all("_"), vec![err("{identifier _}")]);

        let e = scan_one("@").unwrap_err();
        assert_eq!(e.kind, LexErrorKind::InvalidIdentifier("@".into()));
    }

    #[test]
    fn test_scan_identifier_followed_by_quote() {
        assert_eq!(scan_all("test'"), vec![ok("{identifier test}"), err("{text '}")]);
        assert_eq!(scan_all("test\"d"), vec![ok("{identifier test}"), err("{text \"d}")]);
    }

    // ==================== Numbers ====================

    #[test]
    fn test_scan_numbers() {
        assert_eq!(scan_all("123"), vec![ok("{number 123}")]);
        assert_eq!(scan_all("-123"), vec![ok("{number -123}")]);
        assert_eq!(scan_all("-123.456"), vec![ok("{number -123.456}")]);
        assert_eq!(scan_all("123.456"), vec![ok("{number 123.456}")]);
        assert_eq!(scan_all("12-3"), vec![ok("{number 12}"), ok("{number -3}")]);
    }

    #[test]
    fn test_scan_invalid_numbers() {
        assert_eq!(scan_all(".123"), vec![err("{unexpected .}"), ok("{number 123}")]);
        assert_eq!(
            scan_all("- 123"),
            vec![err("{number -}"), ok("{whitespace  }"), ok("{number 123}")]
        );
        assert_eq!(
            scan_all("123.abc"),
            vec![err("{number 123.}"), ok("{identifier abc}")]
        );
        assert_eq!(
            scan_all("1.2.3"),
            vec![ok("{number 1.2}"), err("{unexpected .}"), ok("{number 3}")]
        );

        let e = scan_one("-").unwrap_err();
        assert_eq!(e.kind, LexErrorKind::InvalidNumber("-".into()));
        assert_eq!(e.to_string(), "invalid number \"-\" at position 0");
    }

    // ==================== Text ====================

    #[test]
    fn test_scan_text() {
        assert_eq!(scan_all(r#""""#), vec![ok("{text }")]);
        assert_eq!(scan_all("''"), vec![ok("{text }")]);
        assert_eq!(scan_all("'test'"), vec![ok("{text test}")]);
        assert_eq!(scan_all(r"'te\'st'"), vec![ok("{text te'st}")]);
        assert_eq!(scan_all(r#""te\"st""#), vec![ok(r#"{text te"st}"#)]);
        assert_eq!(
            scan_all(r#""tes@#,;!@#%^'\"t""#),
            vec![ok(r#"{text tes@#,;!@#%^'"t}"#)]
        );
        assert_eq!(
            scan_all(r#"'tes@#,;!@#%^\'"t'"#),
            vec![ok(r#"{text tes@#,;!@#%^'"t}"#)]
        );
    }

    #[test]
    fn test_scan_text_only_unescapes_matching_quote() {
        assert_eq!(scan_one(r#""te\'st""#), Ok(Token::Text(r"te\'st".into())));
        assert_eq!(scan_one(r"'a\nb'"), Ok(Token::Text(r"a\nb".into())));
    }

    #[test]
    fn test_scan_unterminated_text() {
        assert_eq!(scan_all(r#""test"#), vec![err(r#"{text "test}"#)]);
        assert_eq!(scan_all("'test"), vec![err("{text 'test}")]);

        let e = scan_one("'demo\"").unwrap_err();
        assert_eq!(e.kind, LexErrorKind::InvalidText("'demo\"".into()));
    }

    #[test]
    fn test_text_round_trip() {
        let original = r"'it\'s a \'quoted\' word'";
        let Ok(Token::Text(literal)) = scan_one(original) else {
            panic!("expected text token");
        };
        assert_eq!(literal, "it's a 'quoted' word");

        let reescaped = format!("'{}'", literal.replace('\'', r"\'"));
        assert_eq!(reescaped, original);
        assert_eq!(scan_one(&reescaped), Ok(Token::Text(literal)));
    }

    // ==================== Joins and signs ====================

    #[test]
    fn test_scan_joins() {
        assert_eq!(scan_all("&&||"), vec![err("{join &&||}")]);
        assert_eq!(
            scan_all("&& ||"),
            vec![ok("{join &&}"), ok("{whitespace  }"), ok("{join ||}")]
        );
        assert_eq!(
            scan_all("'||test&&'&&123"),
            vec![ok("{text ||test&&}"), ok("{join &&}"), ok("{number 123}")]
        );
    }

    #[test]
    fn test_scan_invalid_join_suggests() {
        let e = scan_one("&").unwrap_err();
        assert_eq!(
            e.kind,
            LexErrorKind::InvalidJoin {
                literal: "&".into(),
                suggestion: Some("&&"),
            }
        );
        assert_eq!(
            e.to_string(),
            "invalid join operator \"&\" (did you mean \"&&\"?) at position 0"
        );
    }

    #[test]
    fn test_scan_all_signs() {
        let input = "= != ~ !~ > >= < <= ?= ?!= ?~ ?!~ ?> ?>= ?< ?<=";
        let signs: Vec<String> = Scanner::new(input)
            .tokens()
            .map(|t| t.unwrap())
            .filter(|t| !t.is_trivia())
            .map(|t| t.literal().to_string())
            .collect();
        let expected: Vec<&str> = input.split(' ').collect();
        assert_eq!(signs, expected);
        assert_eq!(signs.len(), 16);
    }

    #[test]
    fn test_scan_invalid_signs() {
        assert_eq!(scan_all("=!="), vec![err("{sign =!=}")]);

        let e = scan_one("==").unwrap_err();
        assert_eq!(
            e.kind,
            LexErrorKind::InvalidSign {
                literal: "==".into(),
                suggestion: Some("="),
            }
        );

        let e = scan_one("!!!!").unwrap_err();
        assert!(matches!(e.kind, LexErrorKind::InvalidSign { suggestion: None, .. }));
    }

    // ==================== Comments ====================

    #[test]
    fn test_scan_comments() {
        assert_eq!(scan_all("// demo "), vec![ok("{comment demo}")]);
        assert_eq!(scan_all("//"), vec![ok("{comment }")]);
        assert_eq!(
            scan_all("a // c\nb"),
            vec![
                ok("{identifier a}"),
                ok("{whitespace  }"),
                ok("{comment c}"),
                ok("{identifier b}")
            ]
        );
    }

    #[test]
    fn test_scan_lone_slash() {
        assert_eq!(
            scan_all("/ demo"),
            vec![err("{comment }"), ok("{whitespace  }"), ok("{identifier demo}")]
        );
        assert_eq!(scan_all("/"), vec![err("{comment }")]);
        assert_eq!(
            scan_one("/a").unwrap_err().kind,
            LexErrorKind::InvalidComment
        );
    }

    // ==================== Groups ====================

    #[test]
    fn test_scan_groups() {
        assert_eq!(scan_all("(a b c)"), vec![ok("{group a b c}")]);
        assert_eq!(scan_all("((a b c))"), vec![ok("{group (a b c)}")]);
        assert_eq!(
            scan_all("((a )b c))"),
            vec![ok("{group (a )b c}"), err("{unexpected )}")]
        );
        assert_eq!(scan_all(r#"("ab)("c)"#), vec![ok(r#"{group "ab)("c}"#)]);
        assert_eq!(scan_all("(a='\\'')"), vec![ok("{group a='\\''}")]);
        assert_eq!(scan_all("()"), vec![ok("{group }")]);
    }

    #[test]
    fn test_scan_invalid_groups() {
        assert_eq!(scan_all("a)"), vec![ok("{identifier a}"), err("{unexpected )}")]);
        assert_eq!(scan_all("(a b c"), vec![err("{group a b c}")]);
        assert_eq!(scan_all(r#"("ab)(c)"#), vec![err(r#"{group "ab)(c)}"#)]);

        let e = scan_one("((a)").unwrap_err();
        assert_eq!(e.kind, LexErrorKind::UnclosedGroup(1));
        assert_eq!(
            e.to_string(),
            "invalid formatted group - missing 1 closing bracket(s) at position 0"
        );
        assert_eq!(scan_one("(((").unwrap_err().kind, LexErrorKind::UnclosedGroup(3));
    }

    #[test]
    fn test_balanced_groups_never_report_missing_brackets() {
        for input in ["(a)", "((a)(b))", "(a(b(c)d)e)", "(()())", "('(' = \")\")"] {
            let result = scan_one(input);
            assert!(
                !matches!(
                    result,
                    Err(LexError {
                        kind: LexErrorKind::UnclosedGroup(_),
                        ..
                    })
                ),
                "{input}: {result:?}"
            );
        }
    }

    // ==================== Functions ====================

    #[test]
    fn test_scan_function() {
        assert_eq!(
            scan_one("test(a, b)"),
            Ok(Token::Function {
                name: "test".into(),
                arguments: vec![Token::Identifier("a".into()), Token::Identifier("b".into())],
            })
        );
        assert_eq!(
            scan_all("test()"),
            vec![ok("{function test []}")]
        );
    }

    #[test]
    fn test_scan_function_mixed_arguments() {
        assert_eq!(
            scan_all("f(a.b, 'x)', -1.5, g(1),)"),
            vec![ok("{function f [{identifier a.b} {text x)} {number -1.5} {function g [{number 1}]}]}")]
        );
        assert_eq!(
            scan_all("f( // first\n  a , // second\n b )"),
            vec![ok("{function f [{identifier a} {identifier b}]}")]
        );
    }

    #[test]
    fn test_scan_function_comma_errors() {
        let e = scan_one("f(,a)").unwrap_err();
        assert_eq!(e.kind, LexErrorKind::UnexpectedComma { function: "f".into() });

        let e = scan_one("f(a,,b)").unwrap_err();
        assert_eq!(e.kind, LexErrorKind::UnexpectedComma { function: "f".into() });
        assert_eq!(e.token().arguments(), &[Token::Identifier("a".into())]);

        let e = scan_one("f(a b)").unwrap_err();
        assert_eq!(e.kind, LexErrorKind::MissingComma { function: "f".into() });
    }

    #[test]
    fn test_scan_function_incomplete() {
        let e = scan_one("f(a, 1").unwrap_err();
        assert_eq!(e.kind, LexErrorKind::IncompleteFunction { function: "f".into() });
        assert_eq!(e.token().arguments().len(), 2);
    }

    #[test]
    fn test_scan_function_bad_arguments() {
        let e = scan_one("f(a, %)").unwrap_err();
        assert_eq!(
            e.kind,
            LexErrorKind::UnsupportedArgument {
                function: "f".into(),
                character: '%',
            }
        );

        let e = scan_one("f(1.)").unwrap_err();
        assert_eq!(
            e.kind,
            LexErrorKind::InvalidArgument {
                function: "f".into(),
                literal: "1.".into(),
                cause: Box::new(LexErrorKind::InvalidNumber("1.".into())),
            }
        );

        let e = scan_one("f(a / b)").unwrap_err();
        assert_eq!(e.kind, LexErrorKind::InvalidFunctionComment { function: "f".into() });
    }

    #[test]
    fn test_scan_invalid_function_name() {
        assert_eq!(
            scan_all("test.(a)"),
            vec![err("{function test. []}"), ok("{group a}")]
        );
        assert_eq!(
            scan_one("@(1)").unwrap_err().kind,
            LexErrorKind::InvalidFunctionName("@".into())
        );
    }

    #[test]
    fn test_rejected_function_leaves_group_for_tolerant_scan() {
        let output = Scanner::new("@(1) = 2").tokenize_with_errors();
        let tokens: Vec<&Token> = output.tokens.iter().map(|t| &t.token).collect();

        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].kind, LexErrorKind::InvalidFunctionName("@".into()));
        assert_eq!(tokens[1], &Token::Group("1".into()));
        assert_eq!(output.tokens[1].position, 1);
        assert_eq!(tokens.last(), Some(&&Token::Number("2".into())));
    }

    #[test]
    fn test_scan_function_depth_ceiling() {
        let token = scan_one("a(b(c(1)))").unwrap();
        assert_eq!(token.to_string(), "{function a [{function b [{function c [{number 1}]}]}]}");

        let e = scan_one("a(b(c(d(1))))").unwrap_err();
        assert_eq!(e.kind.root_cause(), &LexErrorKind::MaxFunctionDepth { max: 3 });
        assert_eq!(e.token().literal(), "a");
    }

    #[test]
    fn test_scan_custom_function_depth() {
        let options = ScanOptions {
            max_function_depth: 0,
        };
        let mut scanner = Scanner::with_options("f(1)", &options);
        let e = scanner.scan().unwrap_err();
        assert_eq!(e.kind, LexErrorKind::MaxFunctionDepth { max: 0 });
        assert_eq!(scanner.scan(), Ok(Token::Group("1".into())));

        let options = ScanOptions {
            max_function_depth: 5,
        };
        assert!(Scanner::with_options("a(b(c(d(e(1)))))", &options).scan().is_ok());
    }

    // ==================== Multi-byte input ====================

    #[test]
    fn test_step_back_over_multibyte_characters() {
        assert_eq!(
            scan_all("abcé"),
            vec![ok("{identifier abc}"), err("{unexpected é}")]
        );
        assert_eq!(scan_all("1€"), vec![ok("{number 1}"), err("{unexpected €}")]);
        assert_eq!(scan_all("=🙂"), vec![ok("{sign =}"), err("{unexpected 🙂}")]);
        assert_eq!(scan_all("'héllo'"), vec![ok("{text héllo}")]);
        assert_eq!(scan_all("(ü = 1)"), vec![ok("{group ü = 1}")]);
    }

    // ==================== Positions and tolerance ====================

    #[test]
    fn test_tokenize_with_errors_positions() {
        let output = Scanner::new("a = 'x'").tokenize_with_errors();
        assert!(output.errors.is_empty());
        let positions: Vec<usize> = output.tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_tokenize_with_errors_keeps_going() {
        let output = Scanner::new("a == 1. && é").tokenize_with_errors();
        assert_eq!(output.errors.len(), 3);
        assert_eq!(output.errors[0].position, 2);
        assert_eq!(output.errors[1].position, 5);
        assert_eq!(output.errors[2].position, 11);
        assert_eq!(output.tokens.len(), 9);
        assert_eq!(output.tokens[8].token, Token::Unexpected("é".into()));
    }

    #[test]
    fn test_scanning_is_deterministic() {
        let input = "a(b, 'c') ?!~ (d = 1 || e) // note";
        let first = Scanner::new(input).tokenize_with_errors();
        let second = Scanner::new(input).tokenize_with_errors();
        assert_eq!(first, second);
    }
}
