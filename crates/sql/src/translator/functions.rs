use crate::dialects::FunctionMapper;
use sqlparser::ast::{visit_expressions_mut, Expr, Statement};
use std::ops::ControlFlow;

/// Replace every mapped function call in `statement`, innermost calls first.
///
/// Returns the number of calls rewritten.
pub(crate) fn rewrite_functions(statement: &mut Statement, mapper: &FunctionMapper) -> usize {
    if mapper.is_empty() {
        return 0;
    }

    let mut rewritten = 0;
    let _ = visit_expressions_mut(statement, |expr| {
        let replacement = match &*expr {
            Expr::Function(func) => mapper.translate_call(func),
            _ => None,
        };
        if let Some(replacement) = replacement {
            tracing::trace!(
                target: "oracle_dialect",
                from = %expr,
                to = %replacement,
                "Rewrote function call"
            );
            *expr = replacement;
            rewritten += 1;
        }
        ControlFlow::<()>::Continue(())
    });
    rewritten
}
