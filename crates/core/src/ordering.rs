//! Client-side ordering of filtered lists.
//!
//! Stores are only asked to filter (e.g. `is_public = true`); ordering is a
//! separate in-memory step so it needs no composite index and can be tested
//! without a backend.

use crate::types::Timestamp;

/// Implemented by anything that can be ordered by creation time.
pub trait Chronological {
    fn created_at(&self) -> Timestamp;
}

/// Stable sort by `created_at`, newest first.
///
/// Records with equal timestamps keep the order the store returned them in.
pub fn sort_newest_first<T: Chronological>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.created_at()));
}

/// Fetch-then-sort in one call: take ownership of a store result and return
/// it newest first.
pub fn newest_first<T: Chronological>(mut items: Vec<T>) -> Vec<T> {
    sort_newest_first(&mut items);
    items
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[derive(Debug)]
    struct Row {
        label: &'static str,
        created_at: Timestamp,
    }

    impl Chronological for Row {
        fn created_at(&self) -> Timestamp {
            self.created_at
        }
    }

    fn at(label: &'static str, minutes: i64) -> Row {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Row {
            label,
            created_at: base + Duration::minutes(minutes),
        }
    }

    fn labels(rows: &[Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.label).collect()
    }

    #[test]
    fn newest_comes_first() {
        let rows = newest_first(vec![at("old", 1), at("newest", 30), at("mid", 10)]);
        assert_eq!(labels(&rows), ["newest", "mid", "old"]);
    }

    #[test]
    fn ties_keep_store_order() {
        let rows = newest_first(vec![at("a", 5), at("b", 5), at("c", 9), at("d", 5)]);
        assert_eq!(labels(&rows), ["c", "a", "b", "d"]);
    }

    #[test]
    fn empty_input_is_fine() {
        let rows: Vec<Row> = newest_first(Vec::new());
        assert!(rows.is_empty());
    }
}
