use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following ORABRIDGE-XXXX format.
///
/// ## Code Ranges
/// - **1000-1999**: Driver / connection errors
/// - **2000-2999**: Query translation and binding errors
/// - **3000-3999**: Configuration errors
/// - **5000-5999**: Internal/System errors
///
/// Codes are stable across versions (semver contract). Retired numbers are
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Driver Errors (1000-1999) ===
    /// ORABRIDGE-1001: The underlying driver reported a failure
    DriverFailure = 1001,
    /// ORABRIDGE-1003: Reading a LOB column failed
    LobReadFailed = 1003,

    // === Query Errors (2000-2999) ===
    /// ORABRIDGE-2001: SQL syntax error
    SyntaxError = 2001,
    /// ORABRIDGE-2002: Statement shape cannot be translated
    UnsupportedStatement = 2002,
    /// ORABRIDGE-2004: Value does not fit the requested type
    TypeMismatch = 2004,

    // === Configuration Errors (3000-3999) ===
    /// ORABRIDGE-3001: Configuration file could not be read or parsed
    InvalidConfigFile = 3001,
    /// ORABRIDGE-3002: Configuration failed validation
    ConfigValidation = 3002,

    // === Internal Errors (5000-5999) ===
    /// ORABRIDGE-5001: Unexpected internal state
    InternalPanic = 5001,
    /// ORABRIDGE-5002: Serialization/deserialization failed
    SerializationFailed = 5002,

    /// ORABRIDGE-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "ORABRIDGE-2001")
    pub fn as_str(&self) -> String {
        format!("ORABRIDGE-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            1000..=1999 => ErrorCategory::Driver,
            2000..=2999 => ErrorCategory::Query,
            3000..=3999 => ErrorCategory::Config,
            _ => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> String {
        code.as_str()
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        let num: u16 = s
            .strip_prefix("ORABRIDGE-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| "Invalid format".to_string())?;
        Self::try_from(num).map_err(|_| "Unknown code".to_string())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(n: u16) -> std::result::Result<Self, Self::Error> {
        match n {
            1001 => Ok(Self::DriverFailure),
            1003 => Ok(Self::LobReadFailed),
            2001 => Ok(Self::SyntaxError),
            2002 => Ok(Self::UnsupportedStatement),
            2004 => Ok(Self::TypeMismatch),
            3001 => Ok(Self::InvalidConfigFile),
            3002 => Ok(Self::ConfigValidation),
            5001 => Ok(Self::InternalPanic),
            5002 => Ok(Self::SerializationFailed),
            9999 => Ok(Self::Unknown),
            _ => Err(format!("Unknown error code: {}", n)),
        }
    }
}

/// High-level error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
    Driver,
    Query,
    Config,
    Internal,
}
