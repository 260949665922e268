//! Syntax highlighting output formatting.

use fexpr_rs::TokenKind;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{caret_snippet, paint, paint_error};

/// A highlighted byte range of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON output structure for the highlight command.
#[derive(Serialize)]
pub struct HighlightOutput<'a> {
    pub filter: &'a str,
    pub spans: &'a [Span],
}

/// Formats highlight spans as JSON.
pub fn format_highlight_json(input: &str, spans: &[Span]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&HighlightOutput {
        filter: input,
        spans,
    })
}

/// Echoes the input with each span colored by kind, followed by one caret
/// snippet per errored span.
pub fn format_highlighted(input: &str, spans: &[Span], use_colors: bool) -> String {
    let mut output = String::new();

    for span in spans {
        let text = input.get(span.start..span.end).unwrap_or_default();
        if span.error.is_some() {
            output.push_str(&paint_error(text, use_colors));
        } else {
            output.push_str(&paint(text, span.kind, use_colors));
        }
    }
    output.push('\n');

    let errors: Vec<&Span> = spans.iter().filter(|s| s.error.is_some()).collect();
    if !errors.is_empty() {
        output.push('\n');
        for span in errors {
            let message = span.error.as_deref().unwrap_or_default();
            let line = format!("error at position {}: {}", span.start, message);
            if use_colors {
                output.push_str(&format!("{}\n", line.red()));
            } else {
                output.push_str(&line);
                output.push('\n');
            }
            output.push_str(&caret_snippet(input, span.start, use_colors));
        }
    }

    output
}
