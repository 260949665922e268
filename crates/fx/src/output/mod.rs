//! Output formatting utilities for the fx CLI.
//!
//! This module provides functions for formatting results as text or JSON.
//! It is organized into submodules by command:
//!
//! - [`ast`] - Parsed filter output (canonical form, tree, JSON)
//! - [`tokens`] - Token listing (table, JSON)
//! - [`highlight`] - Syntax highlighted echo of the input
//! - [`helpers`] - Common formatting utilities (truncation, colors, carets)

mod ast;
pub mod helpers;
mod highlight;
mod tokens;

// Parsed filters
pub use ast::{format_filter_canonical, format_filter_json, format_filter_tree};

// Tokens
pub use tokens::{format_tokens_json, format_tokens_table, TokenRow};

// Highlighting
pub use highlight::{format_highlight_json, format_highlighted, Span};
