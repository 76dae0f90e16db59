use orabridge_common::config::{AppConfig, DriverConfig};
use orabridge_sql::{OracleDialect, SqlDialect, TranslatedStatement};

use crate::error::DriverError;
use crate::oracle_statement::OracleStatement;
use crate::statement::{Connection, Statement};

/// Owns a connection and the dialect every statement on it is translated with.
///
/// All statements prepared here share the dialect's identifier shortening
/// table, so names shortened in one statement are restored in its results.
#[derive(Debug)]
pub struct Driver<C, D = OracleDialect> {
    connection: C,
    dialect: D,
    config: DriverConfig,
}

pub type OracleDriver<C> = Driver<C, OracleDialect>;

impl<C: Connection> Driver<C, OracleDialect> {
    pub fn oracle(connection: C, config: &AppConfig) -> Self {
        Self::new(
            connection,
            OracleDialect::with_config(config.dialect.clone()),
            config.driver,
        )
    }
}

impl<C: Connection, D: SqlDialect> Driver<C, D> {
    pub fn new(connection: C, dialect: D, config: DriverConfig) -> Self {
        Self {
            connection,
            dialect,
            config,
        }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Translate and prepare a parsed statement.
    pub fn prepare(
        &mut self,
        statement: sqlparser::ast::Statement,
    ) -> Result<OracleStatement<C::Statement>, DriverError> {
        let translated = self.dialect.translate(statement)?;
        self.prepare_translated(&translated)
    }

    /// Parse, translate and prepare exactly one statement of SQL text.
    pub fn prepare_sql(&mut self, sql: &str) -> Result<OracleStatement<C::Statement>, DriverError> {
        let mut translated = self.dialect.translate_sql(sql)?;
        if translated.len() != 1 {
            return Err(DriverError::StatementCount(translated.len()));
        }
        let translated = translated.remove(0);
        self.prepare_translated(&translated)
    }

    pub fn prepare_translated(
        &mut self,
        translated: &TranslatedStatement,
    ) -> Result<OracleStatement<C::Statement>, DriverError> {
        let sql = translated.sql();
        tracing::debug!(target: "oracle_driver", dialect = self.dialect.name(), sql = %sql, "Preparing statement");

        let inner = self.connection.prepare(&sql)?;
        let mut statement = OracleStatement::new(inner)
            .with_translation(translated)
            .buffer_results(self.config.buffer_results);
        if let Some(shortener) = self.dialect.identifier_shortener() {
            statement = statement.with_shortener(shortener.clone());
        }
        Ok(statement)
    }

    /// Enable every foreign key constraint. Returns false when the dialect has no such block.
    pub fn enable_foreign_keys(&mut self) -> Result<bool, DriverError> {
        let sql = self.dialect.enable_foreign_key_sql();
        self.run_block(sql, "enable")
    }

    /// Disable every foreign key constraint. Returns false when the dialect has no such block.
    pub fn disable_foreign_keys(&mut self) -> Result<bool, DriverError> {
        let sql = self.dialect.disable_foreign_key_sql();
        self.run_block(sql, "disable")
    }

    fn run_block(&mut self, sql: Option<String>, action: &str) -> Result<bool, DriverError> {
        let Some(sql) = sql else {
            tracing::debug!(target: "oracle_driver", dialect = self.dialect.name(), action, "Foreign key toggling not supported");
            return Ok(false);
        };

        tracing::info!(target: "oracle_driver", action, "Toggling foreign key constraints");
        let mut statement = self.connection.prepare(&sql)?;
        statement.execute(None)?;
        statement.close_cursor()?;
        Ok(true)
    }
}
