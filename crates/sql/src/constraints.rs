//! PL/SQL blocks that enable or disable every foreign key constraint in a schema.

use crate::identifiers::IdentifierQuoter;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintMode {
    Enable,
    Disable,
}

impl ConstraintMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintMode::Enable => "enable",
            ConstraintMode::Disable => "disable",
        }
    }
}

impl fmt::Display for ConstraintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anonymous block toggling the referential (`R`) constraints visible to the session.
///
/// With a schema, only constraints owned by it are touched; the name is
/// upper-cased to match the data dictionary. Without one, the block walks
/// `user_constraints`.
pub fn foreign_key_toggle_sql(
    mode: ConstraintMode,
    schema: Option<&str>,
    quoter: &IdentifierQuoter,
) -> String {
    let from_where = match schema.filter(|s| !s.is_empty()) {
        Some(schema) => format!(
            "from all_constraints\n        where owner = '{}' and constraint_type = 'R'",
            schema.to_uppercase().replace('\'', "''")
        ),
        None => "from user_constraints\n        where constraint_type = 'R'".to_string(),
    };
    let (start, end) = (quoter.start, quoter.end);

    format!(
        "declare\n    \
         cursor c is select owner, table_name, constraint_name\n        \
         {from_where};\n\
         begin\n    \
         for r in c loop\n        \
         execute immediate 'alter table {start}' || r.owner || '{end}.{start}' || r.table_name || '{end} {mode} constraint {start}' || r.constraint_name || '{end}';\n    \
         end loop;\n\
         end;"
    )
}
