//! Common helper functions for output formatting.

use fexpr_rs::TokenKind;
use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Colors a span of filter text by the kind of token it belongs to.
pub fn paint(text: &str, kind: TokenKind, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }

    match kind {
        TokenKind::Identifier => text.cyan().to_string(),
        TokenKind::Function => text.blue().to_string(),
        TokenKind::Number => text.yellow().to_string(),
        TokenKind::Text => text.green().to_string(),
        TokenKind::Sign => text.magenta().to_string(),
        TokenKind::Join => text.bold().to_string(),
        TokenKind::Comment => text.dimmed().to_string(),
        TokenKind::Unexpected => text.red().to_string(),
        TokenKind::Whitespace | TokenKind::Group | TokenKind::Eof => text.to_string(),
    }
}

/// Marks a span that failed to scan.
pub fn paint_error(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.red().underline().to_string()
    } else {
        text.to_string()
    }
}

/// Renders the line of `input` containing byte `position` with a caret
/// under that position.
///
/// Positions past the end point just after the last character.
pub fn caret_snippet(input: &str, position: usize, use_colors: bool) -> String {
    let position = clamp_to_boundary(input, position);

    let line_start = input[..position].rfind('\n').map_or(0, |i| i + 1);
    let line_end = input[position..]
        .find('\n')
        .map_or(input.len(), |i| position + i);

    let line = &input[line_start..line_end];
    let column = input[line_start..position].chars().count();
    let caret = format!("{}^", " ".repeat(column));

    if use_colors {
        format!("  {line}\n  {}\n", caret.red().bold())
    } else {
        format!("  {line}\n  {caret}\n")
    }
}

fn clamp_to_boundary(input: &str, position: usize) -> usize {
    let mut position = position.min(input.len());
    while !input.is_char_boundary(position) {
        position -= 1;
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a long literal", 8), "a lon...");
        assert_eq!(truncate_str("ééééé", 4), "é...");
    }

    #[test]
    fn test_paint_without_colors_is_identity() {
        assert_eq!(paint("name", TokenKind::Identifier, false), "name");
        assert_eq!(paint_error("%", false), "%");
    }

    #[test]
    fn test_paint_with_colors_wraps_text() {
        let painted = paint("name", TokenKind::Identifier, true);
        assert!(painted.contains("name"));
        assert_ne!(painted, "name");
        assert_eq!(paint(" ", TokenKind::Whitespace, true), " ");
    }

    #[test]
    fn test_caret_snippet_single_line() {
        assert_eq!(caret_snippet("a = %", 4, false), "  a = %\n      ^\n");
        // end of input
        assert_eq!(caret_snippet("a =", 3, false), "  a =\n     ^\n");
    }

    #[test]
    fn test_caret_snippet_multi_line() {
        let input = "a = 1 &&\nb >";
        assert_eq!(caret_snippet(input, 12, false), "  b >\n     ^\n");
        assert_eq!(caret_snippet(input, 6, false), "  a = 1 &&\n        ^\n");
    }

    #[test]
    fn test_caret_snippet_counts_characters() {
        assert_eq!(caret_snippet("é = %", 5, false), "  é = %\n      ^\n");
        assert_eq!(caret_snippet("é", 1, false), "  é\n  ^\n");
    }
}
