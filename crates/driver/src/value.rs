//! Values crossing the driver boundary and the rows that carry them.

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use crate::error::DriverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobKind {
    Clob,
    Blob,
}

impl fmt::Display for LobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LobKind::Clob => f.write_str("CLOB"),
            LobKind::Blob => f.write_str("BLOB"),
        }
    }
}

/// A streamed large object as handed out by the driver.
///
/// The stream can only be consumed once; clones share it.
#[derive(Clone)]
pub struct LobLocator {
    kind: LobKind,
    reader: Arc<Mutex<Box<dyn Read + Send>>>,
}

impl LobLocator {
    pub fn new(kind: LobKind, reader: impl Read + Send + 'static) -> Self {
        Self {
            kind,
            reader: Arc::new(Mutex::new(Box::new(reader))),
        }
    }

    pub fn clob(reader: impl Read + Send + 'static) -> Self {
        Self::new(LobKind::Clob, reader)
    }

    pub fn blob(reader: impl Read + Send + 'static) -> Self {
        Self::new(LobKind::Blob, reader)
    }

    pub fn kind(&self) -> LobKind {
        self.kind
    }

    /// Read the remaining content into memory.
    pub fn read_to_value(&self) -> Result<Value, DriverError> {
        let mut buf = Vec::new();
        self.reader
            .lock()
            .read_to_end(&mut buf)
            .map_err(|source| DriverError::LobRead {
                kind: self.kind,
                source,
            })?;

        match self.kind {
            LobKind::Clob => String::from_utf8(buf)
                .map(Value::Text)
                .map_err(DriverError::InvalidClob),
            LobKind::Blob => Ok(Value::Bytes(buf)),
        }
    }
}

impl fmt::Debug for LobLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LobLocator").field("kind", &self.kind).finish()
    }
}

impl PartialEq for LobLocator {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && Arc::ptr_eq(&self.reader, &other.reader)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Lob(LobLocator),
}

impl Value {
    pub fn is_lob(&self) -> bool {
        matches!(self, Value::Lob(_))
    }

    /// Replace a LOB with its fully read content; other values are returned as is.
    pub fn materialize(self) -> Result<Value, DriverError> {
        match self {
            Value::Lob(lob) => lob.read_to_value(),
            other => Ok(other),
        }
    }
}

impl From<&sqlparser::ast::Value> for Value {
    fn from(value: &sqlparser::ast::Value) -> Self {
        use sqlparser::ast::Value as Sql;

        match value {
            Sql::Null => Value::Null,
            Sql::Boolean(b) => Value::Bool(*b),
            Sql::Number(n, _) => match n.parse::<i64>() {
                Ok(i) => Value::Int(i),
                // Decimal text keeps its precision as a string bind
                Err(_) => match n.parse::<f64>() {
                    Ok(f) if f.is_finite() && !n.contains(['.', 'e', 'E']) => Value::Float(f),
                    _ => Value::Text(n.clone()),
                },
            },
            Sql::SingleQuotedString(s)
            | Sql::DoubleQuotedString(s)
            | Sql::NationalStringLiteral(s)
            | Sql::EscapedStringLiteral(s) => Value::Text(s.clone()),
            Sql::HexStringLiteral(h) => match decode_hex(h) {
                Some(bytes) => Value::Bytes(bytes),
                None => Value::Text(h.clone()),
            },
            other => Value::Text(other.to_string()),
        }
    }
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Type hint passed along with a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    Binary,
    Date,
    DateTime,
    Null,
}

impl ParamType {
    /// Hint matching the shape of `value` when the caller gave none.
    pub fn for_value(value: &Value) -> Self {
        match value {
            Value::Null => ParamType::Null,
            Value::Bool(_) => ParamType::Boolean,
            Value::Int(_) => ParamType::Integer,
            Value::Float(_) => ParamType::Float,
            Value::Text(_) => ParamType::String,
            Value::Bytes(_) => ParamType::Binary,
            Value::Lob(lob) => match lob.kind() {
                LobKind::Clob => ParamType::String,
                LobKind::Blob => ParamType::Binary,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    #[default]
    Num,
    Assoc,
}

/// A fetched row, keyed by column name or by position.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Num(Vec<Value>),
    Assoc(IndexMap<String, Value>),
}

impl Row {
    pub fn len(&self) -> usize {
        match self {
            Row::Num(values) => values.len(),
            Row::Assoc(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        match self {
            Row::Num(_) => None,
            Row::Assoc(map) => map.get(column),
        }
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Row::Num(values) => values.get(index),
            Row::Assoc(map) => map.get_index(index).map(|(_, v)| v),
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            Row::Num(values) => values,
            Row::Assoc(map) => map.into_values().collect(),
        }
    }

    /// Associative rows asked for in `Num` mode lose their column names.
    pub fn into_mode(self, mode: FetchMode) -> Row {
        match (mode, self) {
            (FetchMode::Num, row @ Row::Assoc(_)) => Row::Num(row.into_values()),
            (_, row) => row,
        }
    }

    /// Read every LOB cell into memory.
    pub fn materialize(self) -> Result<Row, DriverError> {
        match self {
            Row::Num(values) => values
                .into_iter()
                .map(Value::materialize)
                .collect::<Result<Vec<_>, _>>()
                .map(Row::Num),
            Row::Assoc(map) => map
                .into_iter()
                .map(|(k, v)| v.materialize().map(|v| (k, v)))
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Row::Assoc),
        }
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Row::Assoc(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_clob_materializes_to_text() {
        let value = Value::Lob(LobLocator::clob(Cursor::new(b"long text".to_vec())));
        assert!(value.is_lob());
        assert_eq!(value.materialize().unwrap(), Value::Text("long text".to_string()));
    }

    #[test]
    fn test_blob_materializes_to_bytes() {
        let value = Value::Lob(LobLocator::blob(Cursor::new(vec![0u8, 159, 146, 150])));
        assert_eq!(value.materialize().unwrap(), Value::Bytes(vec![0, 159, 146, 150]));
    }

    #[test]
    fn test_invalid_clob() {
        let value = Value::Lob(LobLocator::clob(Cursor::new(vec![0xff, 0xfe])));
        assert!(matches!(
            value.materialize(),
            Err(DriverError::InvalidClob(_))
        ));
    }

    #[test]
    fn test_assoc_row_in_num_mode() {
        let row: Row = vec![
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::from("x")),
        ]
        .into_iter()
        .collect();

        assert_eq!(row.get("b"), Some(&Value::Text("x".to_string())));
        assert_eq!(
            row.into_mode(FetchMode::Num),
            Row::Num(vec![Value::Int(1), Value::Text("x".to_string())])
        );
    }

    #[test]
    fn test_from_sql_literal() {
        use sqlparser::ast::Value as Sql;

        assert_eq!(Value::from(&Sql::Number("42".to_string(), false)), Value::Int(42));
        assert_eq!(
            Value::from(&Sql::Number("1.50".to_string(), false)),
            Value::Text("1.50".to_string())
        );
        assert_eq!(Value::from(&Sql::Null), Value::Null);
        assert_eq!(Value::from(&Sql::Boolean(true)), Value::Bool(true));
        assert_eq!(
            Value::from(&Sql::SingleQuotedString("a".to_string())),
            Value::Text("a".to_string())
        );
        assert_eq!(
            Value::from(&Sql::HexStringLiteral("0AFF".to_string())),
            Value::Bytes(vec![0x0a, 0xff])
        );
    }

    #[test]
    fn test_param_type_for_value() {
        assert_eq!(ParamType::for_value(&Value::Int(1)), ParamType::Integer);
        assert_eq!(ParamType::for_value(&Value::Null), ParamType::Null);
        assert_eq!(ParamType::default(), ParamType::String);
    }
}
