//! # Error Contexts
//!
//! Structured metadata attached to errors so callers can react programmatically.

use serde::{Deserialize, Serialize};

/// Structured context for machine-readable errors.
///
/// Each variant provides specific fields relevant to that error type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// Context for ORABRIDGE-2001 (SyntaxError)
    SyntaxError {
        line: Option<u64>,
        column: Option<u64>,
        snippet: String,
    },

    /// Context for ORABRIDGE-1003 (LobReadFailed)
    Lob {
        column: Option<String>,
        kind: String,
    },

    /// Context for ORABRIDGE-3001/3002 (config errors)
    Config {
        file_path: Option<String>,
        /// Offending key, dotted for nested sections (`dialect.schema`)
        field: Option<String>,
    },

    /// Generic key-value context for extensibility
    Generic {
        #[serde(flatten)]
        data: std::collections::HashMap<String, serde_json::Value>,
    },
}
