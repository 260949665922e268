//! Tokens command implementation.
//!
//! Tokenizes a filter without parsing it, keeping going past errors.

use fexpr_rs::{ScanOutput, Scanner};

use super::{read_filter, CommandContext, CommandError, Result};
use crate::output::{format_tokens_json, format_tokens_table, TokenRow};

/// Options for the tokens command.
pub struct TokensOptions {
    /// Filter expression, or `-` for stdin.
    pub filter: String,
    /// Hide whitespace and comment tokens.
    pub skip_trivia: bool,
}

/// Executes the tokens command.
///
/// The listing is printed even when some tokens fail to scan; the command
/// then returns [`CommandError::Tokens`] so the exit code reflects it.
pub fn execute(ctx: &CommandContext, opts: &TokensOptions) -> Result<()> {
    let input = read_filter(&opts.filter)?;
    let scanned = Scanner::with_options(&input, &ctx.parse_options.scan_options())
        .tokenize_with_errors();

    let rows = build_rows(&scanned, opts.skip_trivia);

    if ctx.json_output {
        println!("{}", format_tokens_json(&input, &rows)?);
    } else if !ctx.quiet {
        print!("{}", format_tokens_table(&rows, ctx.use_colors));
    }

    if ctx.verbose {
        eprintln!(
            "{} token(s), {} error(s)",
            scanned.tokens.len(),
            scanned.errors.len()
        );
    }

    match scanned.errors.first() {
        Some(first) => Err(CommandError::Tokens {
            count: scanned.errors.len(),
            first: first.to_string(),
        }),
        None => Ok(()),
    }
}

/// Pairs every token with its error. Errored tokens are always kept, even
/// with `skip_trivia`.
fn build_rows(scanned: &ScanOutput, skip_trivia: bool) -> Vec<TokenRow<'_>> {
    scanned
        .tokens
        .iter()
        .map(|t| TokenRow {
            position: t.position,
            token: &t.token,
            error: scanned.errors.iter().find(|e| e.position == t.position),
        })
        .filter(|row| !(skip_trivia && row.error.is_none() && row.token.is_trivia()))
        .collect()
}
