//! Oracle dialect translation for orabridge.
//!
//! Statements are parsed with `sqlparser` and rewritten into SQL Oracle accepts:
//! - **Functions**: MySQL-style calls such as `CONCAT`, `NOW` and `DATE_ADD` (`dialects`).
//! - **Paging**: `LIMIT`/`OFFSET` emulated with `ROWNUM` (`translator`).
//! - **Inserts**: multi-row `VALUES` turned into `UNION ALL` selects from `DUAL`.
//! - **Identifiers**: names over the length limit shortened and restored (`identifiers`).
//! - **Constraints**: PL/SQL to toggle foreign keys (`constraints`).
pub mod constraints;
pub mod dialect;
pub mod dialects;
pub mod error;
pub mod identifiers;
pub mod params;
pub mod render;
pub mod translator;

pub use dialect::{AnsiDialect, SqlDialect};
pub use dialects::{FunctionMapper, OracleDialect};
pub use error::TranslateError;
pub use params::{ParamKey, ParamMap};
pub use translator::{RowDecoration, TranslatedStatement};
