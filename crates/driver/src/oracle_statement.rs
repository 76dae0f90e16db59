//! Statement wrapper that undoes on the way out what the dialect did on the way in.

use orabridge_sql::identifiers::IdentifierShortener;
use orabridge_sql::{ParamKey, ParamMap, RowDecoration, TranslatedStatement};

use crate::buffered::BufferedStatement;
use crate::error::DriverError;
use crate::statement::Statement;
use crate::value::{FetchMode, ParamType, Row, Value};

/// Decorates a driver statement prepared from translated SQL.
///
/// Binds go through the placeholder map of the INSERT rewrite, fetched rows
/// get LOB cells read into memory, shortened column names restored and helper
/// columns dropped.
#[derive(Debug)]
pub struct OracleStatement<S> {
    inner: BufferedStatement<S>,
    shortener: Option<IdentifierShortener>,
    buffer_results: bool,
    param_map: ParamMap,
    bindings: Vec<(ParamKey, Value)>,
    decorations: Vec<RowDecoration>,
    query_string: Option<String>,
}

impl<S: Statement> OracleStatement<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner: BufferedStatement::new(inner),
            shortener: None,
            buffer_results: false,
            param_map: ParamMap::new(),
            bindings: Vec::new(),
            decorations: Vec::new(),
            query_string: None,
        }
    }

    /// Carry over the placeholder map, literal bindings and row decorations.
    pub fn with_translation(mut self, translated: &TranslatedStatement) -> Self {
        self.param_map = translated.param_map.clone();
        self.bindings = translated
            .bindings
            .iter()
            .map(|(name, value)| (ParamKey::name(name.as_str()), Value::from(value)))
            .collect();
        self.decorations = translated.decorations.clone();
        self
    }

    pub fn with_shortener(mut self, shortener: IdentifierShortener) -> Self {
        self.shortener = Some(shortener);
        self
    }

    pub fn buffer_results(mut self, enabled: bool) -> Self {
        self.buffer_results = enabled;
        self
    }

    pub fn is_buffering(&self) -> bool {
        self.buffer_results
    }

    pub fn set_query_string(&mut self, sql: impl Into<String>) {
        self.query_string = Some(sql.into());
    }

    pub fn param_map(&self) -> &ParamMap {
        &self.param_map
    }

    pub fn decorations(&self) -> &[RowDecoration] {
        &self.decorations
    }

    /// Replay buffered rows from the start.
    pub fn rewind(&mut self) {
        self.inner.rewind();
    }

    pub fn inner(&self) -> &S {
        self.inner.inner()
    }

    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }

    /// Bind every `(key, value)` pair, with a type hint from `types` when present.
    pub fn bind(
        &mut self,
        params: &[(ParamKey, Value)],
        types: &[(ParamKey, ParamType)],
    ) -> Result<(), DriverError> {
        if params.is_empty() {
            return Ok(());
        }

        for (key, value) in params {
            let ty = types
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, ty)| *ty)
                .unwrap_or_else(|| ParamType::for_value(value));
            self.bind_value(key, value, ty)?;
        }
        Ok(())
    }

    fn decode(&self, row: Row) -> Result<Row, DriverError> {
        let row = row.materialize()?;
        let Row::Assoc(map) = row else {
            return Ok(row);
        };

        let mut map = match &self.shortener {
            Some(shortener) if !shortener.is_empty() => map
                .into_iter()
                .map(|(column, value)| (shortener.restore_name(&column).into_owned(), value))
                .collect(),
            _ => map,
        };

        for decoration in &self.decorations {
            match decoration {
                RowDecoration::DropColumn(column) => {
                    map.shift_remove(column);
                }
            }
        }
        Ok(Row::Assoc(map))
    }
}

impl<S: Statement> Statement for OracleStatement<S> {
    fn bind_value(&mut self, key: &ParamKey, value: &Value, ty: ParamType) -> Result<(), DriverError> {
        let mapped = self.param_map.resolve(key);
        let ty = match ty {
            ParamType::Boolean => ParamType::Integer,
            other => other,
        };

        tracing::trace!(target: "oracle_statement", parameter = %key, mapped_to = %mapped, ?ty, "Binding value");
        self.inner.bind_value(&mapped, value, ty).inspect_err(|e| {
            tracing::warn!(target: "oracle_statement", parameter = %key, mapped_to = %mapped, error = %e, "Bind failed");
        })
    }

    fn execute(&mut self, params: Option<&[(ParamKey, Value)]>) -> Result<bool, DriverError> {
        self.inner.reset(self.buffer_results);

        for (key, value) in &self.bindings {
            let ty = ParamType::for_value(value);
            self.inner.bind_value(key, value, ty).inspect_err(|e| {
                tracing::warn!(target: "oracle_statement", parameter = %key, error = %e, "Binding a lifted literal failed");
            })?;
        }
        if let Some(params) = params {
            self.bind(params, &[])?;
        }

        tracing::debug!(
            target: "oracle_statement",
            sql = self.query_string(),
            buffered = self.buffer_results,
            "Executing statement"
        );
        self.inner.execute(None)
    }

    fn fetch(&mut self, mode: FetchMode) -> Result<Option<Row>, DriverError> {
        match self.inner.fetch(mode)? {
            Some(row) => self.decode(row).map(Some),
            None => Ok(None),
        }
    }

    fn fetch_all(&mut self, mode: FetchMode) -> Result<Vec<Row>, DriverError> {
        self.inner
            .fetch_all(mode)?
            .into_iter()
            .map(|row| self.decode(row))
            .collect()
    }

    fn close_cursor(&mut self) -> Result<(), DriverError> {
        self.inner.close_cursor()
    }

    /// The text set with `set_query_string`, else the prepared statement's own.
    fn query_string(&self) -> &str {
        match &self.query_string {
            Some(sql) => sql,
            None => self.inner.query_string(),
        }
    }
}
