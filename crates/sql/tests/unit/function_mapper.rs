//! FunctionMapper Unit Tests
//!
//! Tests for the core FunctionMapper registry logic.

use orabridge_sql::dialects::FunctionMapper;
use orabridge_sql::translator::parse_statements;
use sqlparser::ast::{BinaryOperator, Expr as SqlExpr, Ident, SelectItem, SetExpr, Statement};

fn id(name: &str) -> SqlExpr {
    SqlExpr::Identifier(Ident::new(name))
}

/// First projected expression of a parsed SELECT.
fn first_projection(sql: &str) -> SqlExpr {
    let statement = parse_statements(sql).expect("parses").remove(0);
    let Statement::Query(query) = statement else {
        panic!("expected a query");
    };
    let SetExpr::Select(select) = *query.body else {
        panic!("expected a select");
    };
    match select.projection.into_iter().next() {
        Some(SelectItem::UnnamedExpr(expr)) => expr,
        other => panic!("unexpected projection {:?}", other),
    }
}

#[test]
fn rename_creates_function_call() {
    let mapper = FunctionMapper::new().rename("old", "NEW");
    let result = mapper
        .translate("old", &[id("a"), id("b")])
        .expect("translated");
    assert_eq!(result.to_string(), "NEW(a, b)");
}

#[test]
fn translate_is_case_insensitive() {
    let mapper = FunctionMapper::new().rename("concat", "CONCAT_WS");
    assert!(mapper.translate("CONCAT", &[id("a")]).is_some());
    assert!(mapper.translate("Concat", &[id("a")]).is_some());
    assert!(mapper.translate("concat", &[id("a")]).is_some());
}

#[test]
fn unknown_function_returns_none() {
    let mapper = FunctionMapper::new();
    assert_eq!(mapper.translate("unknown_func", &[id("x")]), None);
    assert!(mapper.is_empty());
}

#[test]
fn transform_can_reorder_args() {
    let mapper = FunctionMapper::new().transform("swap", |args| {
        FunctionMapper::build_func(
            "SWAPPED",
            vec![
                args.get(1).cloned().unwrap_or_else(|| id("")),
                args.first().cloned().unwrap_or_else(|| id("")),
            ],
        )
    });
    let result = mapper
        .translate("swap", &[id("first"), id("second")])
        .expect("translated");
    assert_eq!(result.to_string(), "SWAPPED(second, first)");
}

#[test]
fn transform_can_change_to_operator() {
    let mapper = FunctionMapper::new().transform("concat", |args| SqlExpr::BinaryOp {
        left: Box::new(args[0].clone()),
        op: BinaryOperator::StringConcat,
        right: Box::new(args[1].clone()),
    });
    let result = mapper
        .translate("concat", &[id("a"), id("b")])
        .expect("translated");
    assert_eq!(result.to_string(), "a || b");
}

#[test]
fn empty_args_handled() {
    let mapper = FunctionMapper::new().rename("now", "SYSDATE");
    let result = mapper.translate("now", &[]).expect("translated");
    assert_eq!(result.to_string(), "SYSDATE()");
}

#[test]
fn translate_call_uses_last_name_part() {
    let mapper = FunctionMapper::new().rename("now", "SYSDATE");
    let SqlExpr::Function(func) = first_projection("SELECT pkg.now(1)") else {
        panic!("expected a function");
    };
    let result = mapper.translate_call(&func).expect("translated");
    assert_eq!(result.to_string(), "SYSDATE(1)");
}

#[test]
fn translate_call_skips_wildcard_arguments() {
    let mapper = FunctionMapper::new().rename("f", "G");
    let SqlExpr::Function(func) = first_projection("SELECT f(*)") else {
        panic!("expected a function");
    };
    assert_eq!(mapper.translate_call(&func), None);
}
