use crate::{ErrorCode, ErrorContext, OrabridgeError};
use sqlparser::parser::ParserError;
use validator::{ValidationErrors, ValidationErrorsKind};

impl From<ParserError> for OrabridgeError {
    fn from(err: ParserError) -> Self {
        match &err {
            ParserError::RecursionLimitExceeded => {
                OrabridgeError::new(ErrorCode::UnsupportedStatement, err.to_string())
                    .with_hint("The statement is nested too deeply to be translated")
            }
            ParserError::TokenizerError(msg) | ParserError::ParserError(msg) => {
                OrabridgeError::new(ErrorCode::SyntaxError, msg.clone()).with_context(
                    ErrorContext::SyntaxError {
                        line: location_of(msg, "Line: "),
                        column: location_of(msg, "Column: "),
                        snippet: msg.clone(),
                    },
                )
            }
        }
    }
}

impl From<std::io::Error> for OrabridgeError {
    fn from(err: std::io::Error) -> Self {
        OrabridgeError::new(ErrorCode::LobReadFailed, err.to_string())
    }
}

impl From<serde_json::Error> for OrabridgeError {
    fn from(err: serde_json::Error) -> Self {
        OrabridgeError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

impl From<config::ConfigError> for OrabridgeError {
    fn from(err: config::ConfigError) -> Self {
        let (file_path, field) = match &err {
            config::ConfigError::FileParse { uri, .. } => (uri.clone(), None),
            config::ConfigError::Type { origin, key, .. } => (origin.clone(), key.clone()),
            config::ConfigError::NotFound(key) => (None, Some(key.clone())),
            _ => (None, None),
        };

        OrabridgeError::new(ErrorCode::InvalidConfigFile, err.to_string())
            .with_context(ErrorContext::Config { file_path, field })
    }
}

impl From<ValidationErrors> for OrabridgeError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        invalid_fields(&errors, "", &mut fields);
        fields.sort();

        let listed = fields.join(", ");
        OrabridgeError::new(
            ErrorCode::ConfigValidation,
            format!("Configuration validation failed for {}", listed),
        )
        .with_context(ErrorContext::Config {
            file_path: None,
            field: Some(listed),
        })
    }
}

fn invalid_fields(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(_) => out.push(path),
            ValidationErrorsKind::Struct(nested) => invalid_fields(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    invalid_fields(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

// sqlparser reports positions as "... at Line: 1, Column: 8"
fn location_of(message: &str, marker: &str) -> Option<u64> {
    let start = message.rfind(marker)? + marker.len();
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
