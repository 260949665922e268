//! Scanner and parser limits.

use serde::{Deserialize, Serialize};

/// Default ceiling for nested function calls.
pub const DEFAULT_MAX_FUNCTION_DEPTH: usize = 3;

/// Default ceiling for nested parenthesized groups.
pub const DEFAULT_MAX_GROUP_DEPTH: usize = 128;

/// Options for the [`Scanner`](crate::Scanner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// How deep function calls may nest (`a(b(c(1)))` is depth 3).
    pub max_function_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_function_depth: DEFAULT_MAX_FUNCTION_DEPTH,
        }
    }
}

/// Options for [`parse_with_options`](crate::parse_with_options).
///
/// Group nesting recurses once per level, so it is capped at
/// [`DEFAULT_MAX_GROUP_DEPTH`] by default. Setting `max_group_depth` to
/// `None` lifts the cap. The length limit is off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// How deep function calls may nest.
    pub max_function_depth: usize,
    /// How deep parenthesized groups may nest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_group_depth: Option<usize>,
    /// Maximum input length in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_input_length: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_function_depth: DEFAULT_MAX_FUNCTION_DEPTH,
            max_group_depth: Some(DEFAULT_MAX_GROUP_DEPTH),
            max_input_length: None,
        }
    }
}

impl ParseOptions {
    /// Returns the scanner options implied by these parser options.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_function_depth: self.max_function_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.max_function_depth, 3);
        assert_eq!(options.max_group_depth, Some(DEFAULT_MAX_GROUP_DEPTH));
        assert_eq!(options.max_input_length, None);
        assert_eq!(options.scan_options(), ScanOptions::default());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let options: ParseOptions = toml::from_str("max_group_depth = 8").unwrap();
        assert_eq!(options.max_function_depth, 3);
        assert_eq!(options.max_group_depth, Some(8));
    }
}
