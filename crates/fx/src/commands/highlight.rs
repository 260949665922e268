//! Highlight command implementation.
//!
//! Echoes a filter with syntax colors. Group contents are scanned again so
//! that everything inside parentheses is colored too.

use fexpr_rs::{ScanOptions, Scanner, Token, TokenKind};

use super::{read_filter, CommandContext, CommandError, Result};
use crate::output::{format_highlight_json, format_highlighted, Span};

/// Executes the highlight command.
pub fn execute(ctx: &CommandContext, filter: &str) -> Result<()> {
    let input = read_filter(filter)?;
    let spans = collect_spans(&input, &ctx.parse_options.scan_options());

    if ctx.json_output {
        println!("{}", format_highlight_json(&input, &spans)?);
    } else if !ctx.quiet {
        print!("{}", format_highlighted(&input, &spans, ctx.use_colors));
    }

    let errors: Vec<&Span> = spans.iter().filter(|s| s.error.is_some()).collect();
    match errors.first() {
        Some(first) => Err(CommandError::Tokens {
            count: errors.len(),
            first: format!(
                "{} at position {}",
                first.error.as_deref().unwrap_or_default(),
                first.start
            ),
        }),
        None => Ok(()),
    }
}

/// Splits `input` into contiguous spans covering every byte.
pub fn collect_spans(input: &str, options: &ScanOptions) -> Vec<Span> {
    let mut spans = Vec::new();
    collect_into(&mut spans, input, 0, options);
    spans
}

fn collect_into(spans: &mut Vec<Span>, input: &str, offset: usize, options: &ScanOptions) {
    let scanned = Scanner::with_options(input, options).tokenize_with_errors();

    let ends: Vec<usize> = scanned
        .tokens
        .iter()
        .skip(1)
        .map(|t| t.position)
        .chain(std::iter::once(input.len()))
        .collect();

    for (positioned, end) in scanned.tokens.iter().zip(ends) {
        let start = positioned.position;
        let error = scanned
            .errors
            .iter()
            .find(|e| e.position == start)
            .map(|e| e.kind.to_string());

        match (&positioned.token, error) {
            // a well-formed group is "(" inner ")"
            (Token::Group(_), None) if end > start + 1 => {
                spans.push(group_bracket(offset + start));
                collect_into(spans, &input[start + 1..end - 1], offset + start + 1, options);
                spans.push(group_bracket(offset + end - 1));
            }
            (token, error) => spans.push(Span {
                start: offset + start,
                end: offset + end,
                kind: token.kind(),
                error,
            }),
        }
    }
}

fn group_bracket(start: usize) -> Span {
    Span {
        start,
        end: start + 1,
        kind: TokenKind::Group,
        error: None,
    }
}
