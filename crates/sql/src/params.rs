//! Bind parameter keys and the placeholder map built while rewriting a statement.

use std::collections::HashMap;
use std::fmt;

/// A bind parameter as referenced by the caller or by the execution layer.
///
/// Positions are 0-based indexes into the caller's parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKey {
    Position(usize),
    Name(String),
}

impl ParamKey {
    pub fn name(name: impl Into<String>) -> Self {
        ParamKey::Name(name.into())
    }

    /// Interpret placeholder text found in a statement.
    ///
    /// `?` takes the next anonymous position from `next_position`; `?3`, `:3` and
    /// `$3` are 1-based positions; `:name`, `@name` and `$name` are named.
    pub fn from_placeholder(text: &str, next_position: &mut usize) -> Self {
        if text == "?" {
            let position = *next_position;
            *next_position += 1;
            return ParamKey::Position(position);
        }

        let body = text
            .strip_prefix(['?', ':', '@', '$'])
            .unwrap_or(text);

        match body.parse::<usize>() {
            Ok(n) if n > 0 => ParamKey::Position(n - 1),
            _ => ParamKey::Name(body.to_string()),
        }
    }

    /// True for a bare `?`, which consumes an anonymous position.
    pub fn is_anonymous_placeholder(text: &str) -> bool {
        text == "?"
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Position(p) => write!(f, "#{}", p),
            ParamKey::Name(n) => write!(f, ":{}", n),
        }
    }
}

/// Maps caller-side parameter keys to the keys the rewritten statement expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: HashMap<ParamKey, ParamKey>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: ParamKey, to: ParamKey) {
        self.entries.insert(from, to);
    }

    /// Mapped key, or the key itself when it was not remapped.
    pub fn resolve(&self, key: &ParamKey) -> ParamKey {
        self.entries.get(key).cloned().unwrap_or_else(|| key.clone())
    }

    pub fn get(&self, key: &ParamKey) -> Option<&ParamKey> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, &ParamKey)> {
        self.entries.iter()
    }
}
