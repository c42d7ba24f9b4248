//! Decoding limits.
//!
//! Bounds applied by [`ObjParser`](crate::parser::ObjParser) while scanning
//! input, so hostile documents are rejected before any value is built.

use serde::{Deserialize, Serialize};

/// Limits applied while decoding a field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Limits {
    /// Maximum total input size in bytes
    pub max_input_size: usize,
    /// Maximum nesting depth of arrays/objects inside a single value
    pub max_nesting_depth: usize,
}

impl Limits {
    /// Tight limits for untrusted input.
    pub const fn strict() -> Self {
        Self {
            max_input_size: 1024 * 1024, // 1 MiB
            max_nesting_depth: 32,
        }
    }

    /// Generous limits for trusted input.
    pub const fn lenient() -> Self {
        Self {
            max_input_size: 256 * 1024 * 1024, // 256 MiB
            // serde_json refuses to go deeper than 128 on its own
            max_nesting_depth: 127,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_size: 16 * 1024 * 1024, // 16 MiB
            max_nesting_depth: 64,
        }
    }
}
