//! Statement translation for Oracle.
//!
//! A statement passes through four rewrites, in this order: function calls,
//! multi-row INSERT, LIMIT/OFFSET paging, then identifier shortening and quoting.
//! Each pass works on the sqlparser AST; nothing is re-parsed from rendered text.

use crate::dialects::FunctionMapper;
use crate::error::TranslateError;
use crate::identifiers::{IdentifierQuoter, IdentifierRewriter, IdentifierShortener};
use crate::params::ParamMap;
use crate::render::to_oracle_sql;
use sqlparser::ast::{Query, Select, SetExpr, Statement, Value};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use std::fmt;

pub(crate) mod functions;
pub(crate) mod insert;
pub(crate) mod paging;

pub use insert::PLACEHOLDER_PREFIX;
pub use paging::PAGE_ROWNUM_COLUMN;

/// Post-processing a result row needs before it reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDecoration {
    /// Remove a helper column added by the rewrite.
    DropColumn(String),
}

/// A rewritten statement plus what the execution layer needs to run it.
#[derive(Debug, Clone)]
pub struct TranslatedStatement {
    pub statement: Statement,
    /// Caller parameter keys remapped by the INSERT rewrite.
    pub param_map: ParamMap,
    /// Literal values lifted out of a multi-row INSERT, keyed by placeholder name.
    pub bindings: Vec<(String, Value)>,
    pub decorations: Vec<RowDecoration>,
}

impl TranslatedStatement {
    pub fn new(statement: Statement) -> Self {
        Self {
            statement,
            param_map: ParamMap::new(),
            bindings: Vec::new(),
            decorations: Vec::new(),
        }
    }

    /// Oracle text for the rewritten statement.
    pub fn sql(&self) -> String {
        to_oracle_sql(&self.statement)
    }
}

impl fmt::Display for TranslatedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

pub struct Translator<'a> {
    mapper: &'a FunctionMapper,
    shortener: &'a IdentifierShortener,
    quoter: IdentifierQuoter,
    auto_quote: bool,
}

impl<'a> Translator<'a> {
    pub fn new(
        mapper: &'a FunctionMapper,
        shortener: &'a IdentifierShortener,
        quoter: IdentifierQuoter,
        auto_quote: bool,
    ) -> Self {
        Self {
            mapper,
            shortener,
            quoter,
            auto_quote,
        }
    }

    pub fn translate(&self, mut statement: Statement) -> Result<TranslatedStatement, TranslateError> {
        functions::rewrite_functions(&mut statement, self.mapper);

        let rewrite = match &mut statement {
            Statement::Insert(insert) => insert::rewrite_insert(insert)?,
            _ => insert::InsertRewrite::default(),
        };

        let mut decorations = paging::paginate_statement(&mut statement)?;
        if !matches!(statement, Statement::Query(_)) {
            decorations.clear();
        }

        IdentifierRewriter::new(self.shortener, self.quoter, self.auto_quote)
            .rewrite_statement(&mut statement);

        let translated = TranslatedStatement {
            statement,
            param_map: rewrite.param_map,
            bindings: rewrite.bindings,
            decorations,
        };
        tracing::debug!(target: "oracle_dialect", sql = %translated, "Translated statement");
        Ok(translated)
    }
}

pub fn parse_statements(sql: &str) -> Result<Vec<Statement>, TranslateError> {
    Ok(Parser::parse_sql(&GenericDialect {}, sql)?)
}

pub(crate) fn parse_template(sql: &str) -> Result<Query, TranslateError> {
    let dialect = GenericDialect {};
    Ok(*Parser::new(&dialect).try_with_sql(sql)?.parse_query()?)
}

/// `SELECT * FROM DUAL`, ready to have its projection replaced.
pub(crate) fn dual_select() -> Result<Select, TranslateError> {
    let query = parse_template("SELECT * FROM DUAL")?;
    match *query.body {
        SetExpr::Select(select) => Ok(*select),
        other => Err(TranslateError::Template(format!(
            "expected SELECT FROM DUAL, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dual_select_template() {
        let select = dual_select().unwrap();
        assert_eq!(select.from.len(), 1);
        assert_eq!(select.to_string(), "SELECT * FROM DUAL");
    }

    #[test]
    fn test_passthrough_statement() {
        let statement = parse_statements("SELECT a FROM t").unwrap().remove(0);
        let translated = TranslatedStatement::new(statement);
        assert_eq!(translated.sql(), "SELECT a FROM t");
        assert!(translated.decorations.is_empty());
        assert!(translated.param_map.is_empty());
    }
}
