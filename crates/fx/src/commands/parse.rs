//! Parse command implementation.
//!
//! Parses a filter and prints its AST.

use fexpr_rs::{parse_with_options, Filter};
use tracing::debug;

use super::{read_filter, CommandContext, Result};
use crate::output::helpers::caret_snippet;
use crate::output::{format_filter_canonical, format_filter_json, format_filter_tree};

/// Options for the parse command.
pub struct ParseCommandOptions {
    /// Filter expression, or `-` for stdin.
    pub filter: String,
    /// Print the indented tree view.
    pub tree: bool,
}

/// Executes the parse command.
pub fn execute(ctx: &CommandContext, opts: &ParseCommandOptions) -> Result<()> {
    let input = read_filter(&opts.filter)?;
    let filter = parse_input(ctx, &input)?;

    debug!(
        items = filter.len(),
        depth = filter.depth(),
        comparisons = filter.comparisons().len(),
        "parsed filter"
    );

    if ctx.json_output {
        println!("{}", format_filter_json(&input, &filter)?);
    } else if !ctx.quiet {
        let output = if opts.tree {
            format_filter_tree(&filter, ctx.use_colors)
        } else {
            format_filter_canonical(&filter)
        };
        print!("{output}");
    }

    Ok(())
}

/// Parses `input` with the context's limits, pointing at the failure on
/// stderr in text mode.
fn parse_input(ctx: &CommandContext, input: &str) -> Result<Filter> {
    match parse_with_options(input, &ctx.parse_options) {
        Ok(filter) => Ok(filter),
        Err(e) => {
            if !ctx.json_output {
                if let Some(position) = e.position() {
                    eprint!("{}", caret_snippet(input, position, ctx.use_colors));
                }
            }
            Err(e.into())
        }
    }
}
