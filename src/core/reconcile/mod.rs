//! # Reconcile Module
//!
//! Merges the per-signal duplicate maps into one removal plan.
//!
//! Each actionable group keeps its first-seen member in place; the rest
//! are removal candidates. The plan is the union of candidates across all
//! maps, deduplicated by path: once a file is flagged as a duplicate
//! anywhere it is removable, even if another map considers it the
//! canonical member of a different group. The union semantics are what
//! keep three independently computed maps from double-moving or losing a
//! file when they disagree about which member came first.
//!
//! Pure data transformation - no I/O, deterministic for fixed inputs.

use crate::core::grouper::DuplicateMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// One planned removal and the canonical file it duplicates.
///
/// When several maps flag the same path, `kept` records the canonical
/// member of whichever group flagged it first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Removal {
    /// The file to relocate
    pub path: PathBuf,
    /// The canonical counterpart left in place
    pub kept: PathBuf,
}

/// The reconciled set of files to remove, in first-flagged order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemovalPlan {
    pub removals: Vec<Removal>,
}

impl RemovalPlan {
    pub fn len(&self) -> usize {
        self.removals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    pub fn contains(&self, path: &PathBuf) -> bool {
        self.removals.iter().any(|r| &r.path == path)
    }

    /// Planned paths in order
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.removals.iter().map(|r| &r.path)
    }
}

/// Fold the duplicate maps into a removal plan.
///
/// Maps are visited in the given order, groups and members in theirs, so
/// the plan order (and each removal's recorded canonical) is fully
/// determined by the inputs.
pub fn reconcile(maps: &[&DuplicateMap]) -> RemovalPlan {
    let mut plan = RemovalPlan::default();
    let mut flagged: HashSet<PathBuf> = HashSet::new();

    for map in maps {
        for group in map.actionable_groups() {
            let Some(canonical) = group.canonical() else {
                continue;
            };

            for path in &group.paths[1..] {
                if flagged.insert(path.clone()) {
                    plan.removals.push(Removal {
                        path: path.clone(),
                        kept: canonical.clone(),
                    });
                }
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grouper::{DuplicateGroup, MatchKind};

    fn map_of(kind: MatchKind, groups: &[(&str, &[&str])]) -> DuplicateMap {
        let mut map = DuplicateMap::new(kind);
        for (key, paths) in groups {
            let mut group = DuplicateGroup::new(key.to_string());
            group.paths = paths.iter().map(PathBuf::from).collect();
            map.groups.push(group);
        }
        map
    }

    #[test]
    fn empty_maps_produce_empty_plan() {
        let content = map_of(MatchKind::Content, &[]);
        let visual = map_of(MatchKind::Visual, &[]);

        let plan = reconcile(&[&content, &visual]);

        assert!(plan.is_empty());
    }

    #[test]
    fn canonical_member_is_never_removed() {
        let content = map_of(
            MatchKind::Content,
            &[("d1", &["/a.jpg", "/b.jpg", "/c.jpg"])],
        );

        let plan = reconcile(&[&content]);

        assert!(!plan.contains(&PathBuf::from("/a.jpg")));
        assert!(plan.contains(&PathBuf::from("/b.jpg")));
        assert!(plan.contains(&PathBuf::from("/c.jpg")));
    }

    #[test]
    fn singleton_groups_trigger_nothing() {
        let content = map_of(MatchKind::Content, &[("d1", &["/a.jpg"])]);

        let plan = reconcile(&[&content]);

        assert!(plan.is_empty());
    }

    #[test]
    fn kept_records_the_canonical_counterpart() {
        let content = map_of(MatchKind::Content, &[("d1", &["/keep.jpg", "/move.jpg"])]);

        let plan = reconcile(&[&content]);

        assert_eq!(plan.removals.len(), 1);
        assert_eq!(plan.removals[0].path, PathBuf::from("/move.jpg"));
        assert_eq!(plan.removals[0].kept, PathBuf::from("/keep.jpg"));
    }

    #[test]
    fn path_flagged_by_two_maps_appears_once() {
        let content = map_of(MatchKind::Content, &[("d1", &["/a.jpg", "/b.jpg"])]);
        let visual = map_of(MatchKind::Visual, &[("f1", &["/a.jpg", "/b.jpg"])]);

        let plan = reconcile(&[&content, &visual]);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.removals[0].path, PathBuf::from("/b.jpg"));
    }

    #[test]
    fn removal_wins_over_canonical_status_elsewhere() {
        // /b.jpg is non-canonical by content but canonical in its visual
        // cluster: flagged anywhere means removable, and it appears exactly
        // once. Its visual follower is flagged too, against /b.jpg.
        let content = map_of(MatchKind::Content, &[("d1", &["/a.jpg", "/b.jpg"])]);
        let visual = map_of(MatchKind::Visual, &[("f1", &["/b.jpg", "/c.jpg"])]);

        let plan = reconcile(&[&content, &visual]);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.removals[0].path, PathBuf::from("/b.jpg"));
        assert_eq!(plan.removals[0].kept, PathBuf::from("/a.jpg"));
        assert_eq!(plan.removals[1].path, PathBuf::from("/c.jpg"));
        assert_eq!(plan.removals[1].kept, PathBuf::from("/b.jpg"));
        assert!(!plan.contains(&PathBuf::from("/a.jpg")));
    }

    #[test]
    fn plan_order_follows_map_order() {
        let content = map_of(MatchKind::Content, &[("d1", &["/a.jpg", "/x.jpg"])]);
        let visual = map_of(MatchKind::Visual, &[("f1", &["/b.jpg", "/y.jpg"])]);

        let forward = reconcile(&[&content, &visual]);
        let paths: Vec<_> = forward.paths().cloned().collect();
        assert_eq!(paths, vec![PathBuf::from("/x.jpg"), PathBuf::from("/y.jpg")]);

        let reversed = reconcile(&[&visual, &content]);
        let paths: Vec<_> = reversed.paths().cloned().collect();
        assert_eq!(paths, vec![PathBuf::from("/y.jpg"), PathBuf::from("/x.jpg")]);
    }
}
