//! Result buffering for statements that are iterated more than once.

use orabridge_sql::ParamKey;
use std::mem;

use crate::error::DriverError;
use crate::statement::Statement;
use crate::value::{FetchMode, ParamType, Row, Value};

#[derive(Debug, Default)]
enum BufferState {
    /// Rows go straight to the caller.
    #[default]
    Passthrough,
    /// Rows are materialized and kept as they are read from the inner cursor.
    Buffering { rows: Vec<Row> },
    /// The inner cursor is closed; rows replay from memory.
    Exhausted { rows: Vec<Row>, cursor: usize },
}

/// Wraps a driver statement and optionally keeps every fetched row.
///
/// Once the inner cursor runs dry it is closed and later fetches are served
/// from the buffer. Every time a replay reaches the end it reports `None` and
/// starts over from the first row.
#[derive(Debug)]
pub struct BufferedStatement<S> {
    inner: S,
    state: BufferState,
}

impl<S: Statement> BufferedStatement<S> {
    /// A statement that does not buffer until [`reset`](Self::reset) says so.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: BufferState::Passthrough,
        }
    }

    pub fn buffered(inner: S) -> Self {
        Self {
            inner,
            state: BufferState::Buffering { rows: Vec::new() },
        }
    }

    /// Drop any buffered rows and start a fresh run.
    pub fn reset(&mut self, buffered: bool) {
        self.state = if buffered {
            BufferState::Buffering { rows: Vec::new() }
        } else {
            BufferState::Passthrough
        };
    }

    /// Move the replay cursor back to the first buffered row.
    pub fn rewind(&mut self) {
        if let BufferState::Exhausted { cursor, .. } = &mut self.state {
            *cursor = 0;
        }
    }

    pub fn is_buffered(&self) -> bool {
        !matches!(self.state, BufferState::Passthrough)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, BufferState::Exhausted { .. })
    }

    pub fn buffered_rows(&self) -> &[Row] {
        match &self.state {
            BufferState::Passthrough => &[],
            BufferState::Buffering { rows } | BufferState::Exhausted { rows, .. } => rows,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn finish_buffering(&mut self, cursor: usize) -> Result<(), DriverError> {
        if let BufferState::Buffering { rows } = &mut self.state {
            let rows = mem::take(rows);
            tracing::trace!(target: "oracle_statement", rows = rows.len(), "Result set buffered");
            self.state = BufferState::Exhausted { rows, cursor };
            self.inner.close_cursor()?;
        }
        Ok(())
    }
}

impl<S: Statement> Statement for BufferedStatement<S> {
    fn bind_value(&mut self, key: &ParamKey, value: &Value, ty: ParamType) -> Result<(), DriverError> {
        self.inner.bind_value(key, value, ty)
    }

    fn execute(&mut self, params: Option<&[(ParamKey, Value)]>) -> Result<bool, DriverError> {
        self.reset(self.is_buffered());
        self.inner.execute(params)
    }

    fn fetch(&mut self, mode: FetchMode) -> Result<Option<Row>, DriverError> {
        match &mut self.state {
            BufferState::Passthrough => self.inner.fetch(mode),
            BufferState::Buffering { rows } => match self.inner.fetch(mode)? {
                Some(row) => {
                    let row = row.materialize()?;
                    rows.push(row.clone());
                    Ok(Some(row))
                }
                None => {
                    self.finish_buffering(0)?;
                    Ok(None)
                }
            },
            BufferState::Exhausted { rows, cursor } => match rows.get(*cursor) {
                Some(row) => {
                    *cursor += 1;
                    Ok(Some(row.clone().into_mode(mode)))
                }
                None => {
                    // End of a replay; the next fetch starts over
                    *cursor = 0;
                    Ok(None)
                }
            },
        }
    }

    /// Every buffered row, including those already handed out by `fetch`.
    fn fetch_all(&mut self, mode: FetchMode) -> Result<Vec<Row>, DriverError> {
        match &mut self.state {
            BufferState::Passthrough => self.inner.fetch_all(mode),
            BufferState::Buffering { rows } => {
                for row in self.inner.fetch_all(mode)? {
                    rows.push(row.materialize()?);
                }
                let all = rows.clone();
                self.finish_buffering(all.len())?;
                Ok(all)
            }
            BufferState::Exhausted { rows, cursor } => {
                *cursor = rows.len();
                Ok(rows.iter().cloned().map(|row| row.into_mode(mode)).collect())
            }
        }
    }

    fn close_cursor(&mut self) -> Result<(), DriverError> {
        match self.state {
            // Already closed when the buffer filled
            BufferState::Exhausted { .. } => Ok(()),
            _ => self.inner.close_cursor(),
        }
    }

    fn query_string(&self) -> &str {
        self.inner.query_string()
    }
}
