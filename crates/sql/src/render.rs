//! Rendering of statements as Oracle SQL.
//!
//! sqlparser prints table aliases as `<relation> AS <alias>`. Oracle only accepts
//! `<relation> <alias>` and fails with ORA-00933 otherwise, so the keyword is
//! dropped in front of every table alias found in the statement.

use sqlparser::ast::{Statement, TableFactor, Visit, Visitor};
use std::collections::HashSet;
use std::ops::ControlFlow;

const ALIAS_KEYWORD: &str = " AS ";

pub fn to_oracle_sql(statement: &Statement) -> String {
    let sql = statement.to_string();
    let aliases = table_aliases(statement);
    if aliases.is_empty() {
        return sql;
    }
    strip_alias_keyword(&sql, &aliases)
}

fn table_aliases(statement: &Statement) -> HashSet<String> {
    let mut collector = AliasCollector::default();
    let _ = statement.visit(&mut collector);
    collector.aliases
}

#[derive(Default)]
struct AliasCollector {
    aliases: HashSet<String>,
}

impl Visitor for AliasCollector {
    type Break = ();

    fn pre_visit_table_factor(&mut self, table_factor: &TableFactor) -> ControlFlow<Self::Break> {
        match table_factor {
            TableFactor::Table { alias, .. } | TableFactor::Derived { alias, .. } => {
                if let Some(alias) = alias {
                    self.aliases.insert(alias.to_string());
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}

fn strip_alias_keyword(sql: &str, aliases: &HashSet<String>) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut in_string = false;
    let mut in_ident = false;
    let mut rest = sql;

    while let Some(c) = rest.chars().next() {
        if !in_string && !in_ident && rest.starts_with(ALIAS_KEYWORD) {
            let after = &rest[ALIAS_KEYWORD.len()..];
            if aliases.iter().any(|alias| is_alias_at(after, alias)) {
                out.push(' ');
                rest = after;
                continue;
            }
        }

        match c {
            '\'' if !in_ident => in_string = !in_string,
            '"' if !in_string => in_ident = !in_ident,
            _ => {}
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn is_alias_at(text: &str, alias: &str) -> bool {
    match text.strip_prefix(alias) {
        Some(tail) => !tail
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '#')),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::parse_statements;

    fn render(sql: &str) -> String {
        to_oracle_sql(&parse_statements(sql).unwrap()[0])
    }

    #[test]
    fn test_table_alias_keyword_dropped() {
        assert_eq!(
            render(r#"SELECT "u".id FROM users AS "u""#),
            r#"SELECT "u".id FROM users "u""#
        );
        assert_eq!(
            render("SELECT x.a FROM (SELECT a FROM t) AS x"),
            "SELECT x.a FROM (SELECT a FROM t) x"
        );
    }

    #[test]
    fn test_column_aliases_kept() {
        assert_eq!(
            render("SELECT a AS b, CAST(a AS INT) FROM t"),
            "SELECT a AS b, CAST(a AS INT) FROM t"
        );
    }

    #[test]
    fn test_string_literals_untouched() {
        assert_eq!(
            render("SELECT ' AS x' FROM t AS x"),
            "SELECT ' AS x' FROM t x"
        );
    }

    #[test]
    fn test_alias_prefix_not_matched() {
        assert_eq!(
            render("SELECT a AS xy FROM t AS x"),
            "SELECT a AS xy FROM t x"
        );
    }
}
