use orabridge_error::{ErrorCode, ErrorContext, OrabridgeError};
use sqlparser::parser::ParserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("SQL Parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("Malformed rewrite template: {0}")]
    Template(String),
}

impl TranslateError {
    pub fn to_orabridge_error(self, dialect_name: &str) -> OrabridgeError {
        match self {
            TranslateError::Parser(e) => OrabridgeError::from(e)
                .with_hint("The statement could not be parsed before translation"),
            TranslateError::Template(e) => {
                let mut data = std::collections::HashMap::new();
                data.insert("error".to_string(), serde_json::Value::String(e.clone()));
                data.insert(
                    "dialect".to_string(),
                    serde_json::Value::String(dialect_name.to_string()),
                );

                OrabridgeError::new(
                    ErrorCode::InternalPanic,
                    format!("Malformed rewrite template: {}", e),
                )
                .with_context(ErrorContext::Generic { data })
                .with_hint("The dialect's built-in statement template no longer has the expected shape")
            }
        }
    }
}
