//! The tag rewriting engine.
//!
//! [`patch`] is a pure function of the existing entries, the field name and a
//! [`TagConfig`]. Running it on its own output with the same config yields
//! the same entries.

use crate::naming::NamingStyle;
use crate::tag::lexer::TagEntry;
use std::collections::HashSet;

/// A tag key to add, with the style its value is derived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    pub key: String,
    pub style: NamingStyle,
}

impl AddRequest {
    pub fn new(key: impl Into<String>, style: NamingStyle) -> Self {
        Self {
            key: key.into(),
            style,
        }
    }
}

/// A tag key to strip from the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRequest {
    pub key: String,
}

impl RemoveRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Where new entries go relative to the existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionIndex {
    /// Drop every existing entry, then add.
    ReplaceAll,
    /// Insert after the first `n` existing entries (clamped to the count).
    After(usize),
}

impl Default for InsertionIndex {
    fn default() -> Self {
        InsertionIndex::After(0)
    }
}

impl InsertionIndex {
    /// Position inside a sequence of `len` existing entries, or `None` when
    /// existing entries are discarded.
    pub fn resolve(self, len: usize) -> Option<usize> {
        match self {
            InsertionIndex::ReplaceAll => None,
            InsertionIndex::After(n) => Some(n.min(len)),
        }
    }
}

impl From<i64> for InsertionIndex {
    fn from(index: i64) -> Self {
        match index {
            i if i < 0 => InsertionIndex::ReplaceAll,
            n => InsertionIndex::After(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }
}

/// Everything the engine needs to rewrite one field's tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagConfig {
    pub adds: Vec<AddRequest>,
    pub removes: Vec<RemoveRequest>,
    pub index: InsertionIndex,
}

impl TagConfig {
    pub fn new(adds: Vec<AddRequest>, removes: Vec<RemoveRequest>, index: InsertionIndex) -> Self {
        Self {
            adds,
            removes,
            index,
        }
    }

    /// True when the config would never change a tag.
    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.removes.is_empty()
    }

    fn is_removed(&self, key: &str) -> bool {
        self.removes.iter().any(|r| r.key == key)
    }
}

/// Compute the new entries for a field named `field_name`.
///
/// 1. A [`InsertionIndex::ReplaceAll`] index discards `old` entirely.
/// 2. An add is skipped when `old` already carries a well-formed entry with
///    the same key anywhere (not only before the insertion point), or when an
///    earlier add in the same config used the key.
/// 3. The remaining adds are inserted as one block at the resolved index.
/// 4. Entries whose key is removed are filtered out, wherever they came from.
pub fn patch(old: &[TagEntry], field_name: &str, config: &TagConfig) -> Vec<TagEntry> {
    let (kept, at) = match config.index.resolve(old.len()) {
        Some(at) => (old, at),
        None => (&old[..0], 0),
    };

    let present: HashSet<&str> = kept
        .iter()
        .filter(|e| e.is_well_formed())
        .map(|e| e.key.as_str())
        .collect();

    let mut queued: HashSet<&str> = HashSet::new();
    let mut to_insert = Vec::with_capacity(config.adds.len());
    for add in &config.adds {
        if present.contains(add.key.as_str()) || !queued.insert(add.key.as_str()) {
            continue;
        }
        to_insert.push(TagEntry::new(&add.key, add.style.apply(field_name)));
    }

    kept[..at]
        .iter()
        .cloned()
        .chain(to_insert)
        .chain(kept[at..].iter().cloned())
        .filter(|e| !config.is_removed(&e.key))
        .collect()
}
