//! LIMIT/OFFSET emulation with ROWNUM.
//!
//! A paged query is wrapped twice:
//!
//! ```sql
//! SELECT * FROM (
//!     SELECT "paging".*, ROWNUM AS "_page_rownum_" FROM (<query>) "paging"
//! ) "paging_out"
//! WHERE "paging_out"."_page_rownum_" > <offset>
//!   AND "paging_out"."_page_rownum_" <= <offset + limit>
//! ```
//!
//! The helper column is reported as a [`RowDecoration`] so the execution layer
//! can strip it from result rows.

use super::{parse_template, RowDecoration};
use crate::error::TranslateError;
use sqlparser::ast::{
    BinaryOperator, Expr, Ident, LimitClause, Query, SetExpr, Statement, TableFactor, Value,
    VisitMut, VisitorMut,
};
use std::ops::ControlFlow;

pub const PAGE_ROWNUM_COLUMN: &str = "_page_rownum_";
const PAGING_ALIAS: &str = "paging";
const PAGING_OUTER_ALIAS: &str = "paging_out";

/// Names used by one paging wrapper.
///
/// Wrappers nested in the same statement get a numeric suffix so an outer
/// `SELECT *` never sees two columns called `_page_rownum_`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PagingNames {
    inner: String,
    outer: String,
    rownum: String,
}

impl PagingNames {
    fn for_level(level: usize) -> Self {
        if level == 0 {
            return Self {
                inner: PAGING_ALIAS.to_string(),
                outer: PAGING_OUTER_ALIAS.to_string(),
                rownum: PAGE_ROWNUM_COLUMN.to_string(),
            };
        }
        Self {
            inner: format!("{}_{}", PAGING_ALIAS, level),
            outer: format!("{}_{}", PAGING_OUTER_ALIAS, level),
            rownum: format!("{}{}", PAGE_ROWNUM_COLUMN, level),
        }
    }

    fn template(&self) -> String {
        format!(
            r#"SELECT * FROM (SELECT "{inner}".*, ROWNUM AS "{rownum}" FROM (SELECT 1 FROM DUAL) "{inner}") "{outer}""#,
            inner = self.inner,
            rownum = self.rownum,
            outer = self.outer,
        )
    }
}

pub(crate) struct Paged {
    pub query: Query,
    pub decoration: Option<RowDecoration>,
}

/// Page every query in `statement` that carries LIMIT or OFFSET.
///
/// Returns one decoration per helper column added, since a paged derived
/// table read with `SELECT *` passes its helper column up to the caller.
pub(crate) fn paginate_statement(
    statement: &mut Statement,
) -> Result<Vec<RowDecoration>, TranslateError> {
    let mut pass = PagingPass {
        decorations: Vec::new(),
    };
    match statement.visit(&mut pass) {
        ControlFlow::Continue(()) => Ok(pass.decorations),
        ControlFlow::Break(e) => Err(e),
    }
}

struct PagingPass {
    decorations: Vec<RowDecoration>,
}

impl VisitorMut for PagingPass {
    type Break = TranslateError;

    // Post-order so inner queries are paged before the query that contains them.
    fn post_visit_query(&mut self, query: &mut Query) -> ControlFlow<Self::Break> {
        if query.limit_clause.is_none() {
            return ControlFlow::Continue(());
        }

        match paginate_level(query.clone(), self.decorations.len()) {
            Ok(paged) => {
                self.decorations.extend(paged.decoration);
                *query = paged.query;
                ControlFlow::Continue(())
            }
            Err(e) => ControlFlow::Break(e),
        }
    }
}

/// Rewrite a single query's LIMIT/OFFSET into the ROWNUM wrapper.
///
/// Queries without a limit clause are returned unchanged with no decoration.
pub(crate) fn paginate(query: Query) -> Result<Paged, TranslateError> {
    paginate_level(query, 0)
}

fn paginate_level(mut query: Query, level: usize) -> Result<Paged, TranslateError> {
    let Some((limit, offset)) = take_limit_offset(&mut query) else {
        return Ok(Paged {
            query,
            decoration: None,
        });
    };

    let names = PagingNames::for_level(level);
    let mut wrapper = parse_template(&names.template())?;
    {
        let middle = derived_subquery_mut(&mut wrapper)?;
        let innermost = derived_subquery_mut(middle)?;
        *innermost = query;
    }

    let mut bounds = Vec::with_capacity(2);
    if is_nonzero(offset.as_ref()) {
        if let Some(offset) = offset.clone() {
            bounds.push(rownum_condition(&names, BinaryOperator::Gt, offset));
        }
    }
    if let Some(limit) = limit.filter(|l| is_nonzero(Some(l))) {
        bounds.push(rownum_condition(
            &names,
            BinaryOperator::LtEq,
            upper_bound(offset, limit),
        ));
    }

    match wrapper.body.as_mut() {
        SetExpr::Select(select) => {
            select.selection = bounds.into_iter().reduce(|left, right| Expr::BinaryOp {
                left: Box::new(left),
                op: BinaryOperator::And,
                right: Box::new(right),
            });
        }
        _ => {
            return Err(TranslateError::Template(
                "paging wrapper is not a SELECT".to_string(),
            ))
        }
    }

    tracing::trace!(target: "oracle_dialect", sql = %wrapper, level, "Paged query");
    Ok(Paged {
        query: wrapper,
        decoration: Some(RowDecoration::DropColumn(names.rownum)),
    })
}

fn take_limit_offset(query: &mut Query) -> Option<(Option<Expr>, Option<Expr>)> {
    let (limit, offset) = match query.limit_clause.take()? {
        LimitClause::LimitOffset { limit, offset, .. } => (limit, offset.map(|o| o.value)),
        LimitClause::OffsetCommaLimit { offset, limit } => (Some(limit), Some(offset)),
    };
    if limit.is_none() && offset.is_none() {
        return None;
    }
    Some((limit, offset))
}

fn derived_subquery_mut(query: &mut Query) -> Result<&mut Query, TranslateError> {
    let SetExpr::Select(select) = query.body.as_mut() else {
        return Err(TranslateError::Template(
            "paging wrapper is not a SELECT".to_string(),
        ));
    };
    match select.from.first_mut().map(|table| &mut table.relation) {
        Some(TableFactor::Derived { subquery, .. }) => Ok(subquery.as_mut()),
        _ => Err(TranslateError::Template(
            "paging wrapper has no derived table".to_string(),
        )),
    }
}

fn literal_number(expr: &Expr) -> Option<i64> {
    match expr {
        Expr::Value(v) => match &v.value {
            Value::Number(n, _) => n.parse().ok(),
            _ => None,
        },
        _ => None,
    }
}

/// Absent and literal zero bounds add no condition.
fn is_nonzero(expr: Option<&Expr>) -> bool {
    match expr {
        None => false,
        Some(expr) => literal_number(expr) != Some(0),
    }
}

fn upper_bound(offset: Option<Expr>, limit: Expr) -> Expr {
    let Some(offset) = offset else {
        return limit;
    };

    match (literal_number(&offset), literal_number(&limit)) {
        (Some(o), Some(l)) => number(o.saturating_add(l)),
        (Some(0), None) => limit,
        _ => Expr::BinaryOp {
            left: Box::new(offset),
            op: BinaryOperator::Plus,
            right: Box::new(limit),
        },
    }
}

fn number(n: i64) -> Expr {
    Expr::Value(Value::Number(n.to_string(), false).into())
}

fn rownum_condition(names: &PagingNames, op: BinaryOperator, bound: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(Expr::CompoundIdentifier(vec![
            Ident::with_quote('"', names.outer.as_str()),
            Ident::with_quote('"', names.rownum.as_str()),
        ])),
        op,
        right: Box::new(bound),
    }
}
