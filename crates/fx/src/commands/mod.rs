//! Command implementations for the fx CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod highlight;
pub mod parse;
pub mod tokens;

use std::env;
use std::io::{self, Read};

use fexpr_rs::{ParseError, ParseOptions};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] ParseError),

    /// One or more tokens failed to scan.
    #[error("filter has {count} invalid token(s), first: {first}")]
    Tokens {
        /// Number of lexical errors.
        count: usize,
        /// Message of the first error.
        first: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Limits passed to the scanner and parser.
    pub parse_options: ParseOptions,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::from_cli_and_config(cli, &Config::default())
    }

    /// Creates a command context from CLI arguments layered over the config
    /// file. Flags win over the file.
    pub fn from_cli_and_config(cli: &Cli, config: &Config) -> Self {
        let mut parse_options = config.parser;
        if let Some(depth) = cli.max_function_depth {
            parse_options.max_function_depth = depth;
        }

        let use_colors = !cli.no_color
            && env::var_os("NO_COLOR").is_none()
            && config.output.color.unwrap_or(true);

        Self {
            json_output: cli.json,
            use_colors,
            quiet: cli.quiet,
            verbose: cli.verbose,
            parse_options,
        }
    }
}

/// Returns the filter text, reading stdin when the argument is `-`.
///
/// A single trailing newline from stdin is dropped so positions line up with
/// what the user typed.
pub fn read_filter(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    Ok(input)
}
