//! Function Mapper
//!
//! Declarative registry for rewriting function calls found in a parsed statement
//! into the target dialect's syntax.

use sqlparser::ast::{
    Expr as SqlExpr, Function, FunctionArg, FunctionArgExpr, FunctionArgumentList,
    FunctionArguments, Ident, ObjectName, ObjectNamePart,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Type alias for transform function closures.
///
/// A transform receives the call's positional arguments (already rewritten)
/// and returns the replacement expression.
pub type TransformFn = Arc<dyn Fn(&[SqlExpr]) -> SqlExpr + Send + Sync>;

/// A translation rule for converting a function to target dialect
pub enum Translation {
    /// Simple rename: "coalesce" → "NVL"
    Rename(&'static str),
    /// Custom transform with access to arguments
    Transform(TransformFn),
}

impl Clone for Translation {
    fn clone(&self) -> Self {
        match self {
            Translation::Rename(s) => Translation::Rename(s),
            Translation::Transform(f) => Translation::Transform(Arc::clone(f)),
        }
    }
}

/// Registry of function translations keyed by lowercase function name
pub struct FunctionMapper {
    rules: HashMap<&'static str, Translation>,
}

impl std::fmt::Debug for FunctionMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionMapper")
            .field("rules_count", &self.rules.len())
            .finish()
    }
}

impl Clone for FunctionMapper {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }
}

impl Default for FunctionMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionMapper {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add a simple rename rule
    pub fn rename(mut self, from: &'static str, to: &'static str) -> Self {
        self.rules.insert(from, Translation::Rename(to));
        self
    }

    /// Add a custom transform rule
    pub fn transform<F>(mut self, from: &'static str, f: F) -> Self
    where
        F: Fn(&[SqlExpr]) -> SqlExpr + Send + Sync + 'static,
    {
        self.rules.insert(from, Translation::Transform(Arc::new(f)));
        self
    }

    /// Translate a function call to target dialect syntax
    /// Returns None if no translation rule exists (use default rendering).
    pub fn translate(&self, func: &str, args: &[SqlExpr]) -> Option<SqlExpr> {
        let func_lower = func.to_lowercase();
        match self.rules.get(func_lower.as_str()) {
            Some(Translation::Rename(new_name)) => Some(Self::build_func(new_name, args.to_vec())),
            Some(Translation::Transform(f)) => Some(f(args)),
            None => None,
        }
    }

    /// Translate a parsed function call.
    ///
    /// Only the last part of a qualified name is matched. Calls with named,
    /// wildcard or subquery arguments are left alone, and so are bare keywords
    /// such as `CURRENT_DATE` that sqlparser reports as calls without parentheses.
    pub fn translate_call(&self, func: &Function) -> Option<SqlExpr> {
        let name = match func.name.0.last()? {
            ObjectNamePart::Identifier(ident) => ident.value.as_str(),
            #[allow(unreachable_patterns)]
            _ => return None,
        };
        if !self.has_rule(name) {
            return None;
        }

        let args = positional_args(&func.args)?;
        self.translate(name, &args)
    }

    /// Check if a function has a translation rule
    pub fn has_rule(&self, func: &str) -> bool {
        self.rules.contains_key(func.to_lowercase().as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Helper to build a function AST node
    pub fn build_func(name: &str, args: Vec<SqlExpr>) -> SqlExpr {
        let sql_args = args
            .into_iter()
            .map(|arg| FunctionArg::Unnamed(FunctionArgExpr::Expr(arg)))
            .collect();

        let func_args = FunctionArguments::List(FunctionArgumentList {
            duplicate_treatment: None,
            args: sql_args,
            clauses: vec![],
        });

        SqlExpr::Function(Function {
            name: ObjectName(vec![ObjectNamePart::Identifier(Ident::new(name))]),
            args: func_args,
            filter: None,
            null_treatment: None,
            over: None,
            within_group: vec![],
            parameters: FunctionArguments::None,
            uses_odbc_syntax: false,
        })
    }
}

fn positional_args(args: &FunctionArguments) -> Option<Vec<SqlExpr>> {
    match args {
        FunctionArguments::None => None,
        FunctionArguments::List(list) => {
            if list.duplicate_treatment.is_some() || !list.clauses.is_empty() {
                return None;
            }
            list.args
                .iter()
                .map(|arg| match arg {
                    FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => Some(expr.clone()),
                    _ => None,
                })
                .collect()
        }
        FunctionArguments::Subquery(_) => None,
    }
}
