//! Identifier shortening and quoting.
//!
//! Oracle rejects identifiers longer than 30 bytes (ORA-00972). Long aliases are
//! swapped for stable `<prefix><n>` keys before the statement is rendered and the
//! original names are put back when rows are read. The table of shortened names
//! lives as long as the dialect that owns it and is shared by every clone.

use parking_lot::RwLock;
use sqlparser::ast::{
    Expr, Ident, ObjectName, ObjectNamePart, Query, SelectItem, SetExpr, Statement, TableFactor,
    VisitMut, VisitorMut,
};
use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Names Oracle resolves specially; quoting them would turn them into column lookups.
const PSEUDO_COLUMNS: &[&str] = &[
    "ROWNUM",
    "ROWID",
    "LEVEL",
    "SYSDATE",
    "SYSTIMESTAMP",
    "LOCALTIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIMESTAMP",
    "USER",
    "UID",
    "DUAL",
];

pub fn is_pseudo_column(name: &str) -> bool {
    PSEUDO_COLUMNS.iter().any(|p| p.eq_ignore_ascii_case(name))
}

/// Bidirectional table between original identifiers and their shortened keys.
///
/// Key `<prefix><n>` always refers to `originals[n - 1]`.
#[derive(Debug, Clone)]
pub struct ShortenedIdentifiers {
    prefix: String,
    max_length: usize,
    originals: Vec<String>,
    keys: HashMap<String, usize>,
}

impl ShortenedIdentifiers {
    pub fn new(prefix: impl Into<String>, max_length: usize) -> Self {
        Self {
            prefix: prefix.into(),
            max_length,
            originals: Vec::new(),
            keys: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Plain word characters or hyphens, longer than the limit in bytes.
    pub fn is_shortenable(&self, identifier: &str) -> bool {
        identifier.len() > self.max_length
            && identifier
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    }

    /// Key for `identifier`, allocating one on first sight.
    ///
    /// Returns `None` when the identifier is left as is.
    pub fn shorten(&mut self, identifier: &str) -> Option<String> {
        if !self.is_shortenable(identifier) {
            return None;
        }

        if let Some(key) = self.key_for(identifier) {
            return Some(key);
        }

        self.originals.push(identifier.to_string());
        let n = self.originals.len();
        self.keys.insert(identifier.to_string(), n);

        let key = self.key(n);
        tracing::debug!(
            target: "oracle_dialect",
            key = %key,
            identifier = %identifier,
            "Shortened identifier"
        );
        Some(key)
    }

    pub fn key_for(&self, identifier: &str) -> Option<String> {
        self.keys.get(identifier).map(|n| self.key(*n))
    }

    /// Original identifier behind a shortened key.
    pub fn original(&self, key: &str) -> Option<&str> {
        let suffix = key.strip_prefix(self.prefix.as_str())?;
        let n: usize = suffix.parse().ok()?;
        // Reject "+1" and "01", which parse but are not keys we produced
        if n == 0 || n.to_string() != suffix {
            return None;
        }
        self.originals.get(n - 1).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, &str)> {
        self.originals
            .iter()
            .enumerate()
            .map(|(i, original)| (self.key(i + 1), original.as_str()))
    }

    fn key(&self, n: usize) -> String {
        format!("{}{}", self.prefix, n)
    }
}

/// Shared handle to a [`ShortenedIdentifiers`] table.
#[derive(Debug, Clone)]
pub struct IdentifierShortener {
    table: Arc<RwLock<ShortenedIdentifiers>>,
}

impl IdentifierShortener {
    pub fn new(prefix: impl Into<String>, max_length: usize) -> Self {
        Self {
            table: Arc::new(RwLock::new(ShortenedIdentifiers::new(prefix, max_length))),
        }
    }

    /// Shortened key for `identifier`, or the identifier itself when it fits.
    pub fn shorten<'a>(&self, identifier: &'a str) -> Cow<'a, str> {
        if let Some(key) = self.table.read().key_for(identifier) {
            return Cow::Owned(key);
        }
        match self.table.write().shorten(identifier) {
            Some(key) => Cow::Owned(key),
            None => Cow::Borrowed(identifier),
        }
    }

    pub fn restore(&self, key: &str) -> Option<String> {
        self.table.read().original(key).map(str::to_string)
    }

    /// Original name for a result column, or the name unchanged.
    pub fn restore_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self.restore(name) {
            Some(original) => Cow::Owned(original),
            None => Cow::Borrowed(name),
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Copy of the current `(key, original)` pairs in allocation order.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.table
            .read()
            .iter()
            .map(|(key, original)| (key, original.to_string()))
            .collect()
    }
}

/// Wraps identifiers in the dialect's quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierQuoter {
    pub start: char,
    pub end: char,
}

impl Default for IdentifierQuoter {
    fn default() -> Self {
        Self {
            start: '"',
            end: '"',
        }
    }
}

impl IdentifierQuoter {
    pub fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    /// Quote a possibly dotted identifier.
    ///
    /// `*` and `t.*` keep the star bare. Already quoted names and anything that
    /// looks like an expression are returned unchanged.
    pub fn quote(&self, identifier: &str) -> String {
        if identifier.is_empty() || identifier == "*" || self.is_quoted(identifier) {
            return identifier.to_string();
        }
        if identifier.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
            return identifier.to_string();
        }

        if let Some(qualifier) = identifier.strip_suffix(".*") {
            return format!("{}.*", self.quote(qualifier));
        }

        identifier
            .split('.')
            .map(|part| self.quote_part(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn quote_part(&self, part: &str) -> String {
        let escaped_end = format!("{}{}", self.end, self.end);
        format!(
            "{}{}{}",
            self.start,
            part.replace(self.end, &escaped_end),
            self.end
        )
    }

    fn is_quoted(&self, identifier: &str) -> bool {
        identifier.len() > 1 && identifier.starts_with(self.start) && identifier.ends_with(self.end)
    }
}

/// Shortens and quotes identifiers in a statement.
///
/// Select-list aliases are always handled. With `auto_quote` set, table
/// aliases, column references, relation names and INSERT column lists are too.
pub(crate) struct IdentifierRewriter<'a> {
    shortener: &'a IdentifierShortener,
    quote: char,
    auto_quote: bool,
}

impl<'a> IdentifierRewriter<'a> {
    pub(crate) fn new(
        shortener: &'a IdentifierShortener,
        quoter: IdentifierQuoter,
        auto_quote: bool,
    ) -> Self {
        Self {
            shortener,
            quote: quoter.start,
            auto_quote,
        }
    }

    pub(crate) fn rewrite_statement(&mut self, statement: &mut Statement) {
        let _ = statement.visit(self);
    }

    fn rewrite(&self, ident: &mut Ident) {
        if ident.quote_style.is_none() && is_pseudo_column(&ident.value) {
            return;
        }
        if let Cow::Owned(key) = self.shortener.shorten(&ident.value) {
            ident.value = key;
        }
        ident.quote_style = Some(self.quote);
    }

    fn rewrite_object_name(&self, name: &mut ObjectName) {
        for part in name.0.iter_mut() {
            #[allow(irrefutable_let_patterns)]
            if let ObjectNamePart::Identifier(ident) = part {
                self.rewrite(ident);
            }
        }
    }

    fn rewrite_select_aliases(&self, body: &mut SetExpr) {
        match body {
            SetExpr::Select(select) => {
                for item in select.projection.iter_mut() {
                    if let SelectItem::ExprWithAlias { alias, .. } = item {
                        self.rewrite(alias);
                    }
                }
            }
            SetExpr::SetOperation { left, right, .. } => {
                self.rewrite_select_aliases(left);
                self.rewrite_select_aliases(right);
            }
            _ => {}
        }
    }
}

impl VisitorMut for IdentifierRewriter<'_> {
    type Break = ();

    fn pre_visit_query(&mut self, query: &mut Query) -> ControlFlow<Self::Break> {
        self.rewrite_select_aliases(&mut query.body);
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, table_factor: &mut TableFactor) -> ControlFlow<Self::Break> {
        if !self.auto_quote {
            return ControlFlow::Continue(());
        }
        match table_factor {
            TableFactor::Table { alias, .. } | TableFactor::Derived { alias, .. } => {
                if let Some(alias) = alias {
                    self.rewrite(&mut alias.name);
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &mut ObjectName) -> ControlFlow<Self::Break> {
        if self.auto_quote {
            self.rewrite_object_name(relation);
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &mut Expr) -> ControlFlow<Self::Break> {
        if self.auto_quote {
            match expr {
                Expr::Identifier(ident) => self.rewrite(ident),
                Expr::CompoundIdentifier(parts) => {
                    for ident in parts.iter_mut() {
                        self.rewrite(ident);
                    }
                }
                _ => {}
            }
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_statement(&mut self, statement: &mut Statement) -> ControlFlow<Self::Break> {
        if self.auto_quote {
            if let Statement::Insert(insert) = statement {
                for column in insert.columns.iter_mut() {
                    self.rewrite(column);
                }
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "a_very_long_column_alias_exceeding_limit";

    #[test]
    fn test_shorten_assigns_sequential_keys() {
        let mut table = ShortenedIdentifiers::new("XXAUTO_SHORTENED_ID", 30);
        assert_eq!(table.shorten(LONG).as_deref(), Some("XXAUTO_SHORTENED_ID1"));
        assert_eq!(
            table.shorten("another_very_long_identifier_name_here").as_deref(),
            Some("XXAUTO_SHORTENED_ID2")
        );
        assert_eq!(table.shorten(LONG).as_deref(), Some("XXAUTO_SHORTENED_ID1"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_short_and_irregular_names_untouched() {
        let mut table = ShortenedIdentifiers::new("K", 30);
        assert_eq!(table.shorten("short_name"), None);
        // Exactly at the limit
        assert_eq!(table.shorten(&"a".repeat(30)), None);
        // Long but not a plain word
        assert_eq!(
            table.shorten("this is an expression that is definitely long"),
            None
        );
        assert_eq!(table.shorten("table.column_name_that_is_much_too_long"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_length_is_measured_in_bytes() {
        let table = ShortenedIdentifiers::new("K", 30);
        // 16 characters, 32 bytes, but not ASCII word characters
        assert!(!table.is_shortenable(&"é".repeat(16)));
        assert!(table.is_shortenable(&"a-".repeat(16)));
    }

    #[test]
    fn test_original_rejects_unknown_keys() {
        let mut table = ShortenedIdentifiers::new("XX", 5);
        table.shorten("abcdefgh");
        assert_eq!(table.original("XX1"), Some("abcdefgh"));
        assert_eq!(table.original("XX2"), None);
        assert_eq!(table.original("XX0"), None);
        assert_eq!(table.original("XX01"), None);
        assert_eq!(table.original("XX+1"), None);
        assert_eq!(table.original("YY1"), None);
        assert_eq!(table.original("XX"), None);
    }

    #[test]
    fn test_shared_handle() {
        let shortener = IdentifierShortener::new("XXAUTO_SHORTENED_ID", 30);
        let clone = shortener.clone();

        assert_eq!(shortener.shorten(LONG), "XXAUTO_SHORTENED_ID1");
        assert_eq!(clone.restore("XXAUTO_SHORTENED_ID1").as_deref(), Some(LONG));
        assert_eq!(clone.restore_name("plain"), "plain");
        assert_eq!(
            shortener.snapshot(),
            vec![("XXAUTO_SHORTENED_ID1".to_string(), LONG.to_string())]
        );
    }

    #[test]
    fn test_quote() {
        let quoter = IdentifierQuoter::default();
        assert_eq!(quoter.quote("name"), r#""name""#);
        assert_eq!(quoter.quote("users.name"), r#""users"."name""#);
        assert_eq!(quoter.quote("*"), "*");
        assert_eq!(quoter.quote("users.*"), r#""users".*"#);
        assert_eq!(quoter.quote(r#""done""#), r#""done""#);
        assert_eq!(quoter.quote("COUNT(*)"), "COUNT(*)");
        assert_eq!(quoter.quote(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn test_pseudo_columns() {
        assert!(is_pseudo_column("rownum"));
        assert!(is_pseudo_column("DUAL"));
        assert!(!is_pseudo_column("rownum_total"));
    }
}
