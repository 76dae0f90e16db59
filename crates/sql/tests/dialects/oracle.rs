//! Oracle Dialect Tests
//!
//! Function rewrites, one rule at a time, then inside full statements.

use orabridge_sql::{OracleDialect, SqlDialect};
use sqlparser::ast::{Expr as SqlExpr, Ident};

fn id(name: &str) -> SqlExpr {
    SqlExpr::Identifier(Ident::new(name))
}

fn lit(s: &str) -> SqlExpr {
    SqlExpr::Value(sqlparser::ast::Value::SingleQuotedString(s.to_string()).into())
}

fn translate_expr(name: &str, args: &[SqlExpr]) -> Option<String> {
    OracleDialect::new()
        .mapper()
        .translate(name, args)
        .map(|r| r.to_string())
}

fn translate_sql(sql: &str) -> String {
    OracleDialect::new()
        .translate_sql(sql)
        .expect("translates")
        .remove(0)
        .sql()
}

// ----------------------------------------------------------------------------
// String functions
// ----------------------------------------------------------------------------

#[test]
fn concat_uses_pipe_operator() {
    assert_eq!(
        translate_expr("concat", &[id("a"), id("b"), id("c")]),
        Some("(a || b || c)".to_string())
    );
}

#[test]
fn concat_keeps_precedence_inside_expressions() {
    assert_eq!(
        translate_sql("SELECT UPPER(CONCAT(a, b)) = 'AB' FROM t"),
        "SELECT UPPER((a || b)) = 'AB' FROM t"
    );
}

#[test]
fn concat_single_argument() {
    assert_eq!(translate_expr("CONCAT", &[id("a")]), Some("(a)".to_string()));
}

// ----------------------------------------------------------------------------
// Date functions
// ----------------------------------------------------------------------------

#[test]
fn datediff_wraps_literals_in_to_date() {
    assert_eq!(
        translate_expr("datediff", &[lit("2020-01-02"), lit("2020-01-01")]),
        Some("(TO_DATE('2020-01-02') - TO_DATE('2020-01-01'))".to_string())
    );
}

#[test]
fn datediff_leaves_expressions_alone() {
    assert_eq!(
        translate_expr("DateDiff", &[id("created"), lit("2020-01-01")]),
        Some("(created - TO_DATE('2020-01-01'))".to_string())
    );
}

#[test]
fn current_date_to_char() {
    assert_eq!(
        translate_expr("current_date", &[]),
        Some("TO_CHAR(LOCALTIMESTAMP(0), 'YYYY-MM-DD')".to_string())
    );
}

#[test]
fn current_time_to_char() {
    assert_eq!(
        translate_expr("CURRENT_TIME", &[]),
        Some("TO_CHAR(LOCALTIMESTAMP(0), 'YYYY-MM-DD HH24:MI:SS')".to_string())
    );
}

#[test]
fn now_to_localtimestamp() {
    assert_eq!(
        translate_expr("now", &[]),
        Some("LOCALTIMESTAMP(0)".to_string())
    );
}

#[test]
fn date_add_with_string_interval() {
    assert_eq!(
        translate_expr("date_add", &[id("created"), lit("3 DAY")]),
        Some("TO_CHAR(created + INTERVAL '3' DAY)".to_string())
    );
}

#[test]
fn date_add_with_multi_token_value() {
    assert_eq!(
        translate_expr("date_add", &[id("d"), lit("1 2 MONTH")]),
        Some("TO_CHAR(d + INTERVAL '1 2' MONTH)".to_string())
    );
}

#[test]
fn date_add_with_interval_expression() {
    assert_eq!(
        translate_sql("SELECT DATE_ADD(created, INTERVAL 3 DAY) FROM t"),
        "SELECT TO_CHAR(created + INTERVAL '3' DAY) FROM t"
    );
}

#[test]
fn dayofweek_to_char() {
    assert_eq!(
        translate_expr("dayofweek", &[id("created")]),
        Some("TO_CHAR(created, 'd')".to_string())
    );
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

#[test]
fn time_functions_in_select() {
    assert_eq!(
        translate_sql("SELECT NOW(), CURRENT_DATE() FROM DUAL"),
        "SELECT LOCALTIMESTAMP(0), TO_CHAR(LOCALTIMESTAMP(0), 'YYYY-MM-DD') FROM DUAL"
    );
}

#[test]
fn bare_date_keywords_untouched() {
    assert_eq!(
        translate_sql("SELECT a FROM t WHERE created > CURRENT_DATE"),
        "SELECT a FROM t WHERE created > CURRENT_DATE"
    );
    assert_eq!(
        translate_sql("SELECT CURRENT_TIME FROM DUAL"),
        "SELECT CURRENT_TIME FROM DUAL"
    );
}

#[test]
fn functions_in_where_clause() {
    assert_eq!(
        translate_sql("SELECT id FROM events WHERE DAYOFWEEK(created) = '1'"),
        "SELECT id FROM events WHERE TO_CHAR(created, 'd') = '1'"
    );
}

#[test]
fn nested_function_rewrites() {
    assert_eq!(
        translate_sql("SELECT CONCAT(name, NOW()) FROM t"),
        "SELECT (name || LOCALTIMESTAMP(0)) FROM t"
    );
}

#[test]
fn other_functions_untouched() {
    assert_eq!(translate_expr("coalesce", &[id("a"), id("b")]), None);
    assert_eq!(
        translate_sql("SELECT COALESCE(a, b), UPPER(c) FROM t"),
        "SELECT COALESCE(a, b), UPPER(c) FROM t"
    );
}

#[test]
fn quote_identifier_shortens_first() {
    let dialect = OracleDialect::new();
    assert_eq!(dialect.quote_identifier("users.name"), r#""users"."name""#);
    assert_eq!(
        dialect.quote_identifier("an_identifier_longer_than_thirty_bytes"),
        r#""XXAUTO_SHORTENED_ID1""#
    );
    assert_eq!(dialect.quote_identifier("*"), "*");
}
