//! In-memory connection that records what the driver asks of it.

use std::sync::Arc;

use orabridge_driver::{
    Connection, DriverError, FetchMode, ParamKey, ParamType, Row, Statement, Value,
};
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct Log {
    pub prepared: Vec<String>,
    pub binds: Vec<(ParamKey, Value, ParamType)>,
    pub executed: usize,
    pub closed: usize,
}

#[derive(Clone, Default)]
pub struct MockConnection {
    pub log: Arc<Mutex<Log>>,
    rows: Vec<Row>,
    fail_bind: Option<String>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every statement prepared afterwards returns these rows.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// Binding the named parameter fails the way a driver would.
    pub fn failing_bind(mut self, name: &str) -> Self {
        self.fail_bind = Some(name.to_string());
        self
    }
}

impl Connection for MockConnection {
    type Statement = MockStatement;

    fn prepare(&mut self, sql: &str) -> Result<MockStatement, DriverError> {
        self.log.lock().prepared.push(sql.to_string());
        Ok(MockStatement {
            sql: sql.to_string(),
            log: Arc::clone(&self.log),
            rows: self.rows.clone(),
            next: 0,
            fail_bind: self.fail_bind.clone(),
        })
    }
}

#[derive(Debug)]
pub struct MockStatement {
    sql: String,
    log: Arc<Mutex<Log>>,
    rows: Vec<Row>,
    next: usize,
    fail_bind: Option<String>,
}

impl Statement for MockStatement {
    fn bind_value(&mut self, key: &ParamKey, value: &Value, ty: ParamType) -> Result<(), DriverError> {
        if matches!((key, &self.fail_bind), (ParamKey::Name(n), Some(f)) if n == f) {
            return Err(DriverError::backend("ORA-01036: illegal variable name/number"));
        }
        self.log.lock().binds.push((key.clone(), value.clone(), ty));
        Ok(())
    }

    fn execute(&mut self, _params: Option<&[(ParamKey, Value)]>) -> Result<bool, DriverError> {
        self.log.lock().executed += 1;
        self.next = 0;
        Ok(true)
    }

    fn fetch(&mut self, mode: FetchMode) -> Result<Option<Row>, DriverError> {
        let row = self.rows.get(self.next).cloned();
        if row.is_some() {
            self.next += 1;
        }
        Ok(row.map(|row| row.into_mode(mode)))
    }

    fn close_cursor(&mut self) -> Result<(), DriverError> {
        self.log.lock().closed += 1;
        Ok(())
    }

    fn query_string(&self) -> &str {
        &self.sql
    }
}

pub fn assoc(cells: &[(&str, Value)]) -> Row {
    cells
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
