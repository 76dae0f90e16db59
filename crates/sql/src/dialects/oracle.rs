//! Oracle Dialect
//!
//! Rewrites statements into SQL Oracle accepts: MySQL-style date and string
//! functions, LIMIT/OFFSET, multi-row VALUES and identifiers over 30 bytes.

use super::FunctionMapper;
use crate::constraints::{foreign_key_toggle_sql, ConstraintMode};
use crate::dialect::SqlDialect;
use crate::error::TranslateError;
use crate::identifiers::{IdentifierQuoter, IdentifierShortener};
use crate::translator::{TranslatedStatement, Translator};
use orabridge_common::config::DialectConfig;
use sqlparser::ast::{
    BinaryOperator, DateTimeField, Expr as SqlExpr, Ident, Interval, Statement, Value,
};

/// Oracle-specific SQL dialect.
///
/// Clones share one identifier shortening table, so names shortened while
/// translating can be restored by any statement created from the same dialect.
#[derive(Debug, Clone)]
pub struct OracleDialect {
    config: DialectConfig,
    quoter: IdentifierQuoter,
    shortener: IdentifierShortener,
    mapper: FunctionMapper,
}

impl Default for OracleDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl OracleDialect {
    pub fn new() -> Self {
        Self::with_config(DialectConfig::default())
    }

    pub fn with_config(config: DialectConfig) -> Self {
        let shortener = IdentifierShortener::new(
            config.shortened_identifier_prefix.clone(),
            config.max_identifier_length,
        );
        Self {
            config,
            quoter: IdentifierQuoter::default(),
            shortener,
            mapper: oracle_function_rules(),
        }
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    /// Access the function mapper for custom translations
    pub fn mapper(&self) -> &FunctionMapper {
        &self.mapper
    }

    pub fn shortener(&self) -> &IdentifierShortener {
        &self.shortener
    }

    /// Rewrite a single function call node in place.
    ///
    /// Returns false when `expr` is not a call with an Oracle rule.
    pub fn translate_function(&self, expr: &mut SqlExpr) -> bool {
        let replacement = match &*expr {
            SqlExpr::Function(func) => self.mapper.translate_call(func),
            _ => None,
        };
        match replacement {
            Some(replacement) => {
                *expr = replacement;
                true
            }
            None => false,
        }
    }

    fn translator(&self) -> Translator<'_> {
        Translator::new(
            &self.mapper,
            &self.shortener,
            self.quoter,
            self.config.auto_quote,
        )
    }
}

impl SqlDialect for OracleDialect {
    fn name(&self) -> &str {
        "oracle"
    }

    fn quoter(&self) -> IdentifierQuoter {
        self.quoter
    }

    /// Shorten the identifier if needed, then quote it.
    fn quote_identifier(&self, identifier: &str) -> String {
        self.quoter.quote(&self.shortener.shorten(identifier))
    }

    fn translate(&self, statement: Statement) -> Result<TranslatedStatement, TranslateError> {
        self.translator().translate(statement)
    }

    fn identifier_shortener(&self) -> Option<&IdentifierShortener> {
        Some(&self.shortener)
    }

    fn enable_foreign_key_sql(&self) -> Option<String> {
        Some(foreign_key_toggle_sql(
            ConstraintMode::Enable,
            self.config.schema(),
            &self.quoter,
        ))
    }

    fn disable_foreign_key_sql(&self) -> Option<String> {
        Some(foreign_key_toggle_sql(
            ConstraintMode::Disable,
            self.config.schema(),
            &self.quoter,
        ))
    }
}

/// Oracle function translation rules
fn oracle_function_rules() -> FunctionMapper {
    FunctionMapper::new()
        .transform("concat", |args| {
            nested(join(args.to_vec(), BinaryOperator::StringConcat))
        })
        .transform("datediff", |args| {
            let args = args
                .iter()
                .map(|arg| match arg {
                    SqlExpr::Value(_) => FunctionMapper::build_func("TO_DATE", vec![arg.clone()]),
                    other => other.clone(),
                })
                .collect();
            nested(join(args, BinaryOperator::Minus))
        })
        .transform("current_date", |_| {
            FunctionMapper::build_func("TO_CHAR", vec![local_timestamp(), string("YYYY-MM-DD")])
        })
        .transform("current_time", |_| {
            FunctionMapper::build_func(
                "TO_CHAR",
                vec![local_timestamp(), string("YYYY-MM-DD HH24:MI:SS")],
            )
        })
        .transform("now", |_| local_timestamp())
        .transform("date_add", |args| {
            let date = args.first().cloned().unwrap_or_else(null);
            let interval = args
                .get(1)
                .map(|arg| oracle_interval(&interval_text(arg)))
                .unwrap_or_else(null);
            FunctionMapper::build_func(
                "TO_CHAR",
                vec![SqlExpr::BinaryOp {
                    left: Box::new(date),
                    op: BinaryOperator::Plus,
                    right: Box::new(interval),
                }],
            )
        })
        .transform("dayofweek", |args| {
            let date = args.first().cloned().unwrap_or_else(null);
            FunctionMapper::build_func("TO_CHAR", vec![date, string("d")])
        })
}

fn join(args: Vec<SqlExpr>, op: BinaryOperator) -> Option<SqlExpr> {
    args.into_iter().reduce(|left, right| SqlExpr::BinaryOp {
        left: Box::new(left),
        op: op.clone(),
        right: Box::new(right),
    })
}

fn nested(expr: Option<SqlExpr>) -> SqlExpr {
    match expr {
        Some(expr) => SqlExpr::Nested(Box::new(expr)),
        None => null(),
    }
}

fn local_timestamp() -> SqlExpr {
    FunctionMapper::build_func(
        "LOCALTIMESTAMP",
        vec![SqlExpr::Value(Value::Number("0".to_string(), false).into())],
    )
}

fn string(s: impl Into<String>) -> SqlExpr {
    SqlExpr::Value(Value::SingleQuotedString(s.into()).into())
}

fn null() -> SqlExpr {
    SqlExpr::Value(Value::Null.into())
}

/// Text of a MySQL interval argument: `'3 DAY'` or `INTERVAL 3 DAY`.
fn interval_text(expr: &SqlExpr) -> String {
    match expr {
        SqlExpr::Value(v) => match &v.value {
            Value::SingleQuotedString(s) | Value::DoubleQuotedString(s) => s.clone(),
            other => other.to_string(),
        },
        SqlExpr::Interval(interval) => {
            let value = interval_text(&interval.value);
            match &interval.leading_field {
                Some(field) => format!("{} {}", value, field),
                None => value,
            }
        }
        other => other.to_string(),
    }
}

/// `N UNIT` becomes `INTERVAL 'N' UNIT`.
fn oracle_interval(text: &str) -> SqlExpr {
    let text = text.replace('\'', "");
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    let unit = tokens.pop();

    SqlExpr::Interval(Interval {
        value: Box::new(string(tokens.join(" "))),
        leading_field: unit.map(|u| DateTimeField::Custom(Ident::new(u))),
        leading_precision: None,
        last_field: None,
        fractional_seconds_precision: None,
    })
}
