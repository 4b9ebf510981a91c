//! Secondary indexing over a dataset's segments (§4.5): the `ondisk2`/
//! `iseg` flavour keeps a per-message sqlite index; the `manifest` flavour
//! keeps only a per-segment summary roll-up and leaves per-message lookup
//! to a full segment scan.

pub mod manifest;
pub mod sqlite;

pub use manifest::ManifestIndex;
pub use sqlite::SqliteIndex;

use crate::{matcher::Matcher, types::ItemSet};

/// One indexed message: where it lives and what it's about.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub segment: String,
    pub offset: u64,
    pub size: u64,
    pub metadata: ItemSet,
}

/// A query against an index: an optional matcher restriction plus sort
/// order (§4.7's reader query shape).
#[derive(Debug, Clone, Default)]
pub struct DataQuery {
    pub matcher: Option<Matcher>,
}

impl DataQuery {
    pub fn all() -> DataQuery {
        DataQuery { matcher: None }
    }

    pub fn matching(matcher: Matcher) -> DataQuery {
        DataQuery { matcher: Some(matcher) }
    }

    pub fn accepts(&self, set: &ItemSet) -> bool {
        match &self.matcher {
            Some(m) => m.matches(set),
            None => true,
        }
    }
}

/// Kinds whose values, taken together, must be unique across a dataset's
/// index (§4.5's "uniqueness enforcement"). An absent value for a
/// unique-listed kind is treated as a fixed sentinel rather than SQL NULL,
/// so two messages that both lack e.g. `Proddef` collide as duplicates
/// instead of silently coexisting (Open Question resolution, see
/// `SPEC_FULL.md`).
pub const ABSENT_SENTINEL: &str = "\u{0}absent\u{0}";

pub fn unique_key(set: &ItemSet, unique_kinds: &[crate::types::KindCode]) -> String {
    unique_kinds
        .iter()
        .map(|k| set.get(*k).map(|item| item.to_text()).unwrap_or_else(|| ABSENT_SENTINEL.to_string()))
        .collect::<Vec<_>>()
        .join("\u{1}")
}
