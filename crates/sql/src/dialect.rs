use crate::error::TranslateError;
use crate::identifiers::{IdentifierQuoter, IdentifierShortener};
use crate::translator::{parse_statements, TranslatedStatement};
use sqlparser::ast::Statement;

/// What the execution layer needs from a SQL dialect.
///
/// Defaults describe a dialect that accepts statements as written.
pub trait SqlDialect: Send + Sync {
    fn name(&self) -> &str;

    fn quoter(&self) -> IdentifierQuoter {
        IdentifierQuoter::default()
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        self.quoter().quote(identifier)
    }

    fn translate(&self, statement: Statement) -> Result<TranslatedStatement, TranslateError> {
        Ok(TranslatedStatement::new(statement))
    }

    fn translate_sql(&self, sql: &str) -> Result<Vec<TranslatedStatement>, TranslateError> {
        parse_statements(sql)?
            .into_iter()
            .map(|statement| self.translate(statement))
            .collect()
    }

    /// Table used to put shortened column names back, if the dialect shortens.
    fn identifier_shortener(&self) -> Option<&IdentifierShortener> {
        None
    }

    fn enable_foreign_key_sql(&self) -> Option<String> {
        None
    }

    fn disable_foreign_key_sql(&self) -> Option<String> {
        None
    }
}

/// Pass-through dialect for databases that need no rewriting.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl SqlDialect for AnsiDialect {
    fn name(&self) -> &str {
        "ansi"
    }
}
