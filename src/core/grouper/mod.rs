//! # Grouper Module
//!
//! Groups index entries by exact keys: identical basename and identical
//! content digest. The ordering rules matter more than the grouping
//! itself: the first-seen member of a group becomes its canonical file.

use crate::core::index::IndexEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// The classification signal that produced a duplicate map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Identical basename
    Name,
    /// Byte-identical content
    Content,
    /// Visually similar content
    Visual,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Name => write!(f, "Name"),
            MatchKind::Content => write!(f, "Content"),
            MatchKind::Visual => write!(f, "Visual"),
        }
    }
}

/// Files sharing one classification key, in first-seen order.
///
/// The first member is the canonical file: it is kept in place when the
/// group is acted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The shared key: a basename, a digest hex, or a seed fingerprint hex
    pub key: String,
    /// Member paths, insertion order = discovery order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    pub fn new(key: String) -> Self {
        Self {
            key,
            paths: Vec::new(),
        }
    }

    /// A group only matters once it has at least two members
    pub fn is_actionable(&self) -> bool {
        self.paths.len() >= 2
    }

    /// The kept file for this group
    pub fn canonical(&self) -> Option<&PathBuf> {
        self.paths.first()
    }
}

/// All groups produced by one classification signal, in first-seen key order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMap {
    pub kind: MatchKind,
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateMap {
    pub fn new(kind: MatchKind) -> Self {
        Self {
            kind,
            groups: Vec::new(),
        }
    }

    /// Groups with at least two members
    pub fn actionable_groups(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(|g| g.is_actionable())
    }

    /// Total number of non-canonical members across actionable groups
    pub fn duplicate_count(&self) -> usize {
        self.actionable_groups()
            .map(|g| g.paths.len() - 1)
            .sum()
    }
}

/// Group entries by a key function, preserving first-seen order of both
/// keys and members. Entries for which the key is absent are skipped.
fn group_by<F>(entries: &[IndexEntry], kind: MatchKind, key_fn: F) -> DuplicateMap
where
    F: Fn(&IndexEntry) -> Option<String>,
{
    let mut map = DuplicateMap::new(kind);
    let mut slots: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some(key) = key_fn(entry) else { continue };

        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            map.groups.push(DuplicateGroup::new(key));
            map.groups.len() - 1
        });
        map.groups[slot].paths.push(entry.path.clone());
    }

    map
}

/// Group entries by identical basename
pub fn group_by_name(entries: &[IndexEntry]) -> DuplicateMap {
    group_by(entries, MatchKind::Name, |e| Some(e.name.clone()))
}

/// Group entries by identical content digest.
///
/// Entries without a digest (unreadable files) do not participate.
pub fn group_by_digest(entries: &[IndexEntry]) -> DuplicateMap {
    group_by(entries, MatchKind::Content, |e| {
        e.digest.map(|d| d.to_hex())
    })
}
