use orabridge_error::{ErrorCode, ErrorContext, OrabridgeError};
use orabridge_sql::TranslateError;
use std::string::FromUtf8Error;
use thiserror::Error;

use crate::value::LobKind;

/// Errors raised while preparing, binding, executing or fetching.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// Failure reported by the underlying driver, passed through untouched.
    #[error("Driver error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to read {kind} value: {source}")]
    LobRead {
        kind: LobKind,
        #[source]
        source: std::io::Error,
    },

    #[error("CLOB content is not valid UTF-8: {0}")]
    InvalidClob(#[source] FromUtf8Error),

    #[error("Expected exactly one statement, found {0}")]
    StatementCount(usize),
}

impl DriverError {
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        DriverError::Backend(err.into())
    }

    pub fn to_orabridge_error(self) -> OrabridgeError {
        match self {
            DriverError::Translate(e) => e.to_orabridge_error("oracle"),
            DriverError::Backend(e) => {
                OrabridgeError::new(ErrorCode::DriverFailure, e.to_string())
            }
            DriverError::LobRead { kind, source } => {
                OrabridgeError::new(ErrorCode::LobReadFailed, source.to_string()).with_context(
                    ErrorContext::Lob {
                        column: None,
                        kind: kind.to_string(),
                    },
                )
            }
            DriverError::InvalidClob(e) => OrabridgeError::new(ErrorCode::TypeMismatch, e.to_string())
                .with_context(ErrorContext::Lob {
                    column: None,
                    kind: LobKind::Clob.to_string(),
                })
                .with_hint("Store binary content in a BLOB column"),
            DriverError::StatementCount(n) => OrabridgeError::new(
                ErrorCode::UnsupportedStatement,
                format!("Expected exactly one statement, found {}", n),
            )
            .with_hint("Prepare statements one at a time"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_passthrough() {
        let err = DriverError::backend("ORA-00942: table or view does not exist");
        assert_eq!(err.to_string(), "Driver error: ORA-00942: table or view does not exist");
        assert_eq!(err.to_orabridge_error().code, ErrorCode::DriverFailure);
    }

    #[test]
    fn test_statement_count_mapping() {
        let mapped = DriverError::StatementCount(2).to_orabridge_error();
        assert_eq!(mapped.code, ErrorCode::UnsupportedStatement);
    }
}
