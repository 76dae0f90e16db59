use anyhow::{Context, Result};
use orabridge_error::OrabridgeError;
use serde::Deserialize;
use validator::Validate;

// Default constants
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 30;
pub const DEFAULT_SHORTENED_IDENTIFIER_PREFIX: &str = "XXAUTO_SHORTENED_ID";
pub const DEFAULT_AUTO_QUOTE: bool = false;
pub const DEFAULT_BUFFER_RESULTS: bool = true;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const ENV_PREFIX: &str = "ORABRIDGE";

#[derive(Debug, Deserialize, Default, Clone, Validate)]
pub struct AppConfig {
    #[serde(default)]
    #[validate(nested)]
    pub dialect: DialectConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    #[validate(nested)]
    pub logging: LoggingConfig,
}

/// Settings consumed by the Oracle dialect.
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct DialectConfig {
    /// Schema used to scope foreign key toggling. `None` means the current user.
    #[serde(default)]
    #[validate(custom(function = "validate_schema_name"))]
    pub schema: Option<String>,

    /// Quote and shorten every identifier, not only aliases.
    #[serde(default = "default_auto_quote")]
    pub auto_quote: bool,

    #[serde(default = "default_max_identifier_length")]
    #[validate(range(min = 1, max = 128))]
    pub max_identifier_length: usize,

    #[serde(default = "default_shortened_identifier_prefix")]
    #[validate(length(min = 1, max = 20))]
    pub shortened_identifier_prefix: String,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            schema: None,
            auto_quote: default_auto_quote(),
            max_identifier_length: default_max_identifier_length(),
            shortened_identifier_prefix: default_shortened_identifier_prefix(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct DriverConfig {
    /// Buffer fetched rows so a statement can be iterated again after exhaustion.
    #[serde(default = "default_buffer_results")]
    pub buffer_results: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            buffer_results: default_buffer_results(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    #[validate(length(min = 1))]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_auto_quote() -> bool {
    DEFAULT_AUTO_QUOTE
}

fn default_max_identifier_length() -> usize {
    DEFAULT_MAX_IDENTIFIER_LENGTH
}

fn default_shortened_identifier_prefix() -> String {
    DEFAULT_SHORTENED_IDENTIFIER_PREFIX.to_string()
}

fn default_buffer_results() -> bool {
    DEFAULT_BUFFER_RESULTS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

// The schema is embedded in a PL/SQL string literal and in `alter table` targets.
fn validate_schema_name(schema: &str) -> Result<(), validator::ValidationError> {
    if schema.is_empty() {
        return Ok(()); // Treated like an absent schema
    }

    let valid = schema
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#'));
    if valid && schema.len() <= 128 {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_schema_name"))
    }
}

impl DialectConfig {
    /// Schema name with empty strings treated as unset.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref().filter(|s| !s.is_empty())
    }
}

impl AppConfig {
    /// Load settings from `path` (when it exists) overlaid with `ORABRIDGE__*` variables.
    ///
    /// Failures carry an [`OrabridgeError`] with a config code, reachable via
    /// `downcast_ref`.
    pub fn from_file(path: &str) -> Result<Self> {
        let builder = config::Config::builder();

        let builder = if std::path::Path::new(path).exists() {
            builder.add_source(config::File::with_name(path))
        } else {
            builder
        };

        // Map ORABRIDGE__DIALECT__SCHEMA to dialect.schema, etc.
        let builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder
            .build()
            .map_err(|e| OrabridgeError::from(e).in_config_file(path))
            .context("Failed to build configuration")?;

        let app_config: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| OrabridgeError::from(e).in_config_file(path))
            .context("Failed to deserialize configuration")?;

        app_config
            .validate()
            .map_err(|e| OrabridgeError::from(e).in_config_file(path))?;

        Ok(app_config)
    }
}
