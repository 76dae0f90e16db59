//! Contracts for the underlying database driver.

use orabridge_sql::ParamKey;

use crate::error::DriverError;
use crate::value::{FetchMode, ParamType, Row, Value};

/// A prepared statement as exposed by the database driver.
pub trait Statement {
    fn bind_value(&mut self, key: &ParamKey, value: &Value, ty: ParamType) -> Result<(), DriverError>;

    /// Run the statement, binding `params` first when given.
    fn execute(&mut self, params: Option<&[(ParamKey, Value)]>) -> Result<bool, DriverError>;

    /// Next row, or `None` once the cursor is exhausted.
    fn fetch(&mut self, mode: FetchMode) -> Result<Option<Row>, DriverError>;

    fn fetch_all(&mut self, mode: FetchMode) -> Result<Vec<Row>, DriverError> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch(mode)? {
            rows.push(row);
        }
        Ok(rows)
    }

    fn close_cursor(&mut self) -> Result<(), DriverError>;

    fn query_string(&self) -> &str;
}

/// Source of prepared statements.
pub trait Connection {
    type Statement: Statement;

    fn prepare(&mut self, sql: &str) -> Result<Self::Statement, DriverError>;
}

impl<S: Statement + ?Sized> Statement for Box<S> {
    fn bind_value(&mut self, key: &ParamKey, value: &Value, ty: ParamType) -> Result<(), DriverError> {
        (**self).bind_value(key, value, ty)
    }

    fn execute(&mut self, params: Option<&[(ParamKey, Value)]>) -> Result<bool, DriverError> {
        (**self).execute(params)
    }

    fn fetch(&mut self, mode: FetchMode) -> Result<Option<Row>, DriverError> {
        (**self).fetch(mode)
    }

    fn fetch_all(&mut self, mode: FetchMode) -> Result<Vec<Row>, DriverError> {
        (**self).fetch_all(mode)
    }

    fn close_cursor(&mut self) -> Result<(), DriverError> {
        (**self).close_cursor()
    }

    fn query_string(&self) -> &str {
        (**self).query_string()
    }
}
