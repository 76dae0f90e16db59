//! Identifier shortening properties.

use orabridge_sql::identifiers::{IdentifierShortener, ShortenedIdentifiers};
use proptest::prelude::*;
use std::collections::HashSet;

const PREFIX: &str = "XXAUTO_SHORTENED_ID";

proptest! {
    #[test]
    fn shortened_names_restore(names in proptest::collection::vec("[a-z_][a-z0-9_-]{30,60}", 1..20)) {
        let shortener = IdentifierShortener::new(PREFIX, 30);
        let keys: Vec<String> = names
            .iter()
            .map(|name| shortener.shorten(name).into_owned())
            .collect();

        for (name, key) in names.iter().zip(&keys) {
            prop_assert!(key.starts_with(PREFIX));
            prop_assert!(key.len() <= 30);
            let restored = shortener.restore(key);
            prop_assert_eq!(restored.as_deref(), Some(name.as_str()));
            // Stable on repeat
            let again = shortener.shorten(name).into_owned();
            prop_assert_eq!(&again, key);
        }

        let distinct_names: HashSet<&String> = names.iter().collect();
        let distinct_keys: HashSet<&String> = keys.iter().collect();
        prop_assert_eq!(distinct_names.len(), distinct_keys.len());
        prop_assert_eq!(shortener.len(), distinct_names.len());
    }

    #[test]
    fn short_names_pass_through(name in "[a-z_][a-z0-9_]{0,29}") {
        let shortener = IdentifierShortener::new(PREFIX, 30);
        prop_assert_eq!(shortener.shorten(&name).into_owned(), name.clone());
        prop_assert_eq!(shortener.restore_name(&name).into_owned(), name);
        prop_assert!(shortener.is_empty());
    }
}

#[test]
fn keys_follow_insertion_order() {
    let mut table = ShortenedIdentifiers::new(PREFIX, 30);
    let first = "first_identifier_that_is_far_too_long";
    let second = "second_identifier_that_is_far_too_long";

    assert_eq!(table.shorten(first).as_deref(), Some("XXAUTO_SHORTENED_ID1"));
    assert_eq!(table.shorten(second).as_deref(), Some("XXAUTO_SHORTENED_ID2"));

    let entries: Vec<(String, &str)> = table.iter().collect();
    assert_eq!(
        entries,
        vec![
            ("XXAUTO_SHORTENED_ID1".to_string(), first),
            ("XXAUTO_SHORTENED_ID2".to_string(), second),
        ]
    );
}

#[test]
fn unknown_keys_pass_through() {
    let shortener = IdentifierShortener::new(PREFIX, 30);
    assert_eq!(shortener.restore("XXAUTO_SHORTENED_ID7"), None);
    assert_eq!(shortener.restore_name("id"), "id");
}
