//! Filter AST output formatting.

use fexpr_rs::{Filter, JoinContent, Token, TokenKind};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::paint;

/// JSON output structure for the parse command.
#[derive(Serialize)]
pub struct ParseOutput<'a> {
    pub filter: &'a str,
    pub ast: &'a Filter,
    pub canonical: String,
}

/// Formats a parsed filter as JSON.
pub fn format_filter_json(input: &str, filter: &Filter) -> Result<String, serde_json::Error> {
    let output = ParseOutput {
        filter: input,
        ast: filter,
        canonical: filter.to_string(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a parsed filter in its canonical one-line form.
pub fn format_filter_canonical(filter: &Filter) -> String {
    format!("{filter}\n")
}

/// Formats a parsed filter as an indented tree, one item per line.
///
/// ```text
/// && (
///   && a = 1
///   || b ~ 'x'
/// )
/// && lower(c) != 2
/// ```
pub fn format_filter_tree(filter: &Filter, use_colors: bool) -> String {
    let mut output = String::new();
    write_tree(&mut output, filter, 0, use_colors);
    output
}

fn write_tree(output: &mut String, filter: &Filter, depth: usize, use_colors: bool) {
    let indent = "  ".repeat(depth);

    for item in filter {
        let join = if use_colors {
            item.join.as_str().bold().to_string()
        } else {
            item.join.as_str().to_string()
        };

        match &item.content {
            JoinContent::Comparison(c) => {
                let operator = paint(c.operator_str(), TokenKind::Sign, use_colors);
                output.push_str(&format!(
                    "{indent}{join} {} {operator} {}\n",
                    format_operand(&c.left, use_colors),
                    format_operand(&c.right, use_colors),
                ));
            }
            JoinContent::Group(group) => {
                output.push_str(&format!("{indent}{join} (\n"));
                write_tree(output, group, depth + 1, use_colors);
                output.push_str(&format!("{indent})\n"));
            }
        }
    }
}

/// Formats an operand the way it could be written back in a filter.
pub fn format_operand(token: &Token, use_colors: bool) -> String {
    match token {
        Token::Text(text) => {
            let quoted = format!("'{}'", text.replace('\'', "\\'"));
            paint(&quoted, token.kind(), use_colors)
        }
        Token::Function { name, arguments } => {
            let args: Vec<String> = arguments
                .iter()
                .map(|arg| format_operand(arg, use_colors))
                .collect();
            format!(
                "{}({})",
                paint(name, token.kind(), use_colors),
                args.join(", ")
            )
        }
        other => paint(other.literal(), other.kind(), use_colors),
    }
}
