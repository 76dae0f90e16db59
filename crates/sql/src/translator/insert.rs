//! Multi-row INSERT emulation.
//!
//! `INSERT INTO t (a, b) VALUES (1, 2), (3, 4)` becomes
//! `INSERT INTO t (a, b) SELECT :c0 AS a, :c1 AS b FROM DUAL UNION ALL SELECT :c2 AS a, :c3 AS b FROM DUAL`.
//!
//! Every literal or placeholder cell becomes a fresh `:cN` placeholder. Literal
//! values are returned as bindings, existing placeholders are recorded in the
//! parameter map so callers can keep binding by their original keys.

use super::dual_select;
use crate::error::TranslateError;
use crate::params::{ParamKey, ParamMap};
use sqlparser::ast::{
    visit_expressions, Expr, Insert, SelectItem, SetExpr, SetOperator, SetQuantifier, Value,
};
use std::ops::ControlFlow;

pub const PLACEHOLDER_PREFIX: &str = "c";

#[derive(Debug, Default)]
pub(crate) struct InsertRewrite {
    pub param_map: ParamMap,
    pub bindings: Vec<(String, Value)>,
}

pub(crate) fn rewrite_insert(insert: &mut Insert) -> Result<InsertRewrite, TranslateError> {
    let Some(source) = insert.source.as_mut() else {
        return Ok(InsertRewrite::default());
    };
    let rows = match source.body.as_mut() {
        SetExpr::Values(values) if values.rows.len() > 1 => std::mem::take(&mut values.rows),
        _ => return Ok(InsertRewrite::default()),
    };

    let template = dual_select()?;
    let columns = &insert.columns;
    let row_count = rows.len();

    let mut rewrite = InsertRewrite::default();
    let mut next_placeholder = 0usize;
    let mut next_position = 0usize;
    let mut selects = Vec::with_capacity(row_count);

    for mut row in rows {
        if row.len() < columns.len() {
            row.resize(columns.len(), null());
        } else if !columns.is_empty() && row.len() > columns.len() {
            tracing::warn!(
                target: "oracle_dialect",
                columns = columns.len(),
                values = row.len(),
                "INSERT row has more values than columns"
            );
        }

        let mut projection = Vec::with_capacity(row.len());
        for (index, cell) in row.into_iter().enumerate() {
            let expr = match cell {
                Expr::Value(value) => {
                    let name = format!("{}{}", PLACEHOLDER_PREFIX, next_placeholder);
                    next_placeholder += 1;

                    match value.value {
                        Value::Placeholder(text) => {
                            let key = ParamKey::from_placeholder(&text, &mut next_position);
                            rewrite.param_map.insert(key, ParamKey::Name(name.clone()));
                        }
                        literal => rewrite.bindings.push((name.clone(), literal)),
                    }
                    placeholder(&name)
                }
                other => {
                    next_position += anonymous_placeholders(&other);
                    other
                }
            };

            projection.push(match columns.get(index) {
                Some(column) => SelectItem::ExprWithAlias {
                    expr,
                    alias: column.clone(),
                },
                None => SelectItem::UnnamedExpr(expr),
            });
        }

        let mut select = template.clone();
        select.projection = projection;
        selects.push(SetExpr::Select(Box::new(select)));
    }

    let mut selects = selects.into_iter();
    let Some(mut body) = selects.next() else {
        return Ok(rewrite);
    };
    for next in selects {
        body = SetExpr::SetOperation {
            op: SetOperator::Union,
            set_quantifier: SetQuantifier::All,
            left: Box::new(body),
            right: Box::new(next),
        };
    }
    source.body = Box::new(body);

    tracing::debug!(
        target: "oracle_dialect",
        rows = row_count,
        placeholders = next_placeholder,
        "Rewrote multi-row INSERT as UNION ALL"
    );
    Ok(rewrite)
}

fn null() -> Expr {
    Expr::Value(Value::Null.into())
}

fn placeholder(name: &str) -> Expr {
    Expr::Value(Value::Placeholder(format!(":{}", name)).into())
}

/// Bare `?` markers inside an expression cell, which still consume positions.
fn anonymous_placeholders(expr: &Expr) -> usize {
    let mut count = 0;
    let _ = visit_expressions(expr, |e| {
        if let Expr::Value(v) = e {
            if let Value::Placeholder(text) = &v.value {
                if ParamKey::is_anonymous_placeholder(text) {
                    count += 1;
                }
            }
        }
        ControlFlow::<()>::Continue(())
    });
    count
}
