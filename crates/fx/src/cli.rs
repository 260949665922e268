//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the fx CLI.

use clap::{Parser, Subcommand, ValueEnum};

/// fx - Inspect, tokenize and highlight filter expressions
#[derive(Parser, Debug)]
#[command(name = "fx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (log scanner and parser activity to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Maximum nesting of function calls (default: from config, or 3)
    #[arg(long, global = true, value_name = "N")]
    pub max_function_depth: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a filter and print its AST
    #[command(alias = "p")]
    Parse {
        /// Filter expression ("-" reads it from stdin)
        filter: String,

        /// Print an indented tree instead of the canonical one-line form
        #[arg(long)]
        tree: bool,
    },

    /// List the tokens of a filter, errors included
    #[command(alias = "t")]
    Tokens {
        /// Filter expression ("-" reads it from stdin)
        filter: String,

        /// Hide whitespace and comment tokens
        #[arg(long)]
        skip_trivia: bool,
    },

    /// Print a filter with syntax highlighting
    #[command(alias = "hl")]
    Highlight {
        /// Filter expression ("-" reads it from stdin)
        filter: String,
    },

    /// View and create the configuration file
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
