//! Execution side of orabridge.
//!
//! [`Driver`] translates SQL with an [`OracleDialect`](orabridge_sql::OracleDialect)
//! and prepares it on a [`Connection`]. The [`OracleStatement`] it returns maps
//! bind parameters onto the rewritten placeholders, can buffer results for
//! replay and hands back rows with LOBs read and original column names.
pub mod buffered;
pub mod driver;
pub mod error;
pub mod oracle_statement;
pub mod statement;
pub mod value;

pub use buffered::BufferedStatement;
pub use driver::{Driver, OracleDriver};
pub use error::DriverError;
pub use oracle_statement::OracleStatement;
pub use orabridge_sql::ParamKey;
pub use statement::{Connection, Statement};
pub use value::{FetchMode, LobKind, LobLocator, ParamType, Row, Value};
