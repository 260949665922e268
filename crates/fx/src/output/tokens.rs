//! Token listing output formatting.

use fexpr_rs::{LexError, Token, TokenKind};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::ast::format_operand;
use super::helpers::{paint, truncate_str};

/// Maximum characters shown in the literal column.
const LITERAL_WIDTH: usize = 24;

/// One scanned token with the error it produced, if any.
pub struct TokenRow<'a> {
    pub position: usize,
    pub token: &'a Token,
    pub error: Option<&'a LexError>,
}

/// JSON output structure for the tokens command.
#[derive(Serialize)]
pub struct TokensListOutput<'a> {
    pub filter: &'a str,
    pub tokens: Vec<TokenOutput<'a>>,
    pub error_count: usize,
}

/// JSON output structure for a single token.
#[derive(Serialize)]
pub struct TokenOutput<'a> {
    pub position: usize,
    pub kind: TokenKind,
    pub literal: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<&'a [Token]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Formats tokens as JSON.
pub fn format_tokens_json(input: &str, rows: &[TokenRow]) -> Result<String, serde_json::Error> {
    let tokens: Vec<TokenOutput> = rows
        .iter()
        .map(|row| TokenOutput {
            position: row.position,
            kind: row.token.kind(),
            literal: row.token.literal(),
            arguments: match row.token {
                Token::Function { arguments, .. } => Some(arguments.as_slice()),
                _ => None,
            },
            error: row.error.map(|e| e.kind.to_string()),
        })
        .collect();

    let output = TokensListOutput {
        filter: input,
        error_count: rows.iter().filter(|row| row.error.is_some()).count(),
        tokens,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats tokens as a table.
pub fn format_tokens_table(rows: &[TokenRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No tokens found.\n".to_string();
    }

    let mut output = String::new();

    // Header
    let header = format!(
        "{:<5} {:<11} {:<width$} {}",
        "Pos",
        "Kind",
        "Literal",
        "Error",
        width = LITERAL_WIDTH
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for row in rows {
        let kind = row.token.kind();
        let literal = truncate_str(&display_literal(row.token), LITERAL_WIDTH);
        // padding is computed on the plain text, escape codes have no width
        let kind_cell = format!("{:<11}", kind.as_str());
        let literal_cell = format!("{:<width$}", literal, width = LITERAL_WIDTH);

        let (kind_cell, literal_cell) = if use_colors {
            (
                paint(&kind_cell, kind, true),
                paint(&literal_cell, kind, true),
            )
        } else {
            (kind_cell, literal_cell)
        };

        let error = match row.error {
            Some(e) if use_colors => e.kind.to_string().red().to_string(),
            Some(e) => e.kind.to_string(),
            None => String::new(),
        };

        let line = format!("{:<5} {} {} {}", row.position, kind_cell, literal_cell, error);
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// Renders a literal on one line: functions as calls, control characters
/// escaped.
fn display_literal(token: &Token) -> String {
    match token {
        Token::Function { .. } => format_operand(token, false),
        other => other.literal().escape_debug().to_string(),
    }
}
