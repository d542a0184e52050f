//! # Cluster Module
//!
//! Groups visually similar images by greedy, seed-based clustering.
//!
//! ## How It Works
//! Walk the fingerprinted files in scan order. The first file not yet
//! absorbed into a cluster becomes a seed; every later unabsorbed file
//! within the Hamming threshold of the seed joins its cluster and is
//! marked claimed. A cluster is kept only once it has at least two
//! members, and its key is the seed fingerprint's hex form - so the
//! seed, being first-seen, is the member later designated canonical.
//!
//! This is single-linkage-to-seed, not transitive closure: membership is
//! always measured against the seed, never between followers. Seeds
//! themselves are never marked claimed; a path can only become a seed if
//! no earlier cluster absorbed it, and each index is visited as a seed
//! candidate exactly once, so no file ever lands in two clusters.
//!
//! Complexity is O(n^2) fingerprint comparisons. Fine for a directory's
//! worth of images; a BK-tree over Hamming space could replace the inner
//! scan without changing this contract if it ever had to scale.

use crate::core::grouper::{DuplicateGroup, DuplicateMap, MatchKind};
use crate::core::index::VisualFingerprint;
use crate::events::{ClusterEvent, Event, EventSender};
use std::path::PathBuf;

/// Default Hamming distance threshold for visual similarity
pub const DEFAULT_THRESHOLD: u32 = 5;

/// Cluster fingerprinted files within `threshold` bits of a seed.
///
/// Input order is significant: it decides seeds, and with them the
/// canonical member of every cluster. The result only contains clusters
/// with two or more members.
pub fn cluster(
    fingerprinted: &[(VisualFingerprint, PathBuf)],
    threshold: u32,
    events: &EventSender,
) -> DuplicateMap {
    events.send(Event::Cluster(ClusterEvent::Started {
        total_fingerprints: fingerprinted.len(),
    }));

    let mut map = DuplicateMap::new(MatchKind::Visual);
    let mut claimed = vec![false; fingerprinted.len()];

    for i in 0..fingerprinted.len() {
        if claimed[i] {
            continue;
        }

        let (seed_fingerprint, seed_path) = &fingerprinted[i];
        let mut group = DuplicateGroup::new(seed_fingerprint.to_hex());
        group.paths.push(seed_path.clone());

        for j in (i + 1)..fingerprinted.len() {
            if claimed[j] {
                continue;
            }

            let (fingerprint, path) = &fingerprinted[j];
            if seed_fingerprint.distance(fingerprint) <= threshold {
                group.paths.push(path.clone());
                claimed[j] = true;
            }
        }

        if group.is_actionable() {
            map.groups.push(group);
        }
    }

    events.send(Event::Cluster(ClusterEvent::Completed {
        clusters_found: map.groups.len(),
    }));

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::null_sender;

    fn fp(byte: u8) -> VisualFingerprint {
        VisualFingerprint::from_bytes(vec![byte])
    }

    fn input(bytes: &[(u8, &str)]) -> Vec<(VisualFingerprint, PathBuf)> {
        bytes
            .iter()
            .map(|(b, p)| (fp(*b), PathBuf::from(p)))
            .collect()
    }

    #[test]
    fn empty_input_produces_no_clusters() {
        let map = cluster(&[], DEFAULT_THRESHOLD, &null_sender());
        assert!(map.groups.is_empty());
    }

    #[test]
    fn single_file_forms_no_cluster() {
        let map = cluster(&input(&[(0b0000, "/a.jpg")]), 5, &null_sender());
        assert!(map.groups.is_empty());
    }

    #[test]
    fn close_pair_clusters_distant_file_drops() {
        // Fingerprints 0000, 0001, 1111 at threshold 1: the seed absorbs
        // its 1-bit neighbor, the 4-bit-distant file is left alone and its
        // singleton cluster is dropped.
        let map = cluster(
            &input(&[(0b0000, "/a.jpg"), (0b0001, "/b.jpg"), (0b1111, "/c.jpg")]),
            1,
            &null_sender(),
        );

        assert_eq!(map.groups.len(), 1);
        assert_eq!(
            map.groups[0].paths,
            vec![PathBuf::from("/a.jpg"), PathBuf::from("/b.jpg")]
        );
        assert_eq!(map.groups[0].canonical(), Some(&PathBuf::from("/a.jpg")));
    }

    #[test]
    fn cluster_key_is_seed_fingerprint_hex() {
        let map = cluster(
            &input(&[(0xA0, "/a.jpg"), (0xA1, "/b.jpg")]),
            1,
            &null_sender(),
        );

        assert_eq!(map.groups[0].key, "a0");
    }

    #[test]
    fn threshold_zero_degenerates_to_exact_equality() {
        let map = cluster(
            &input(&[
                (0x0F, "/a.jpg"),
                (0x0F, "/b.jpg"),
                (0x0E, "/almost.jpg"),
            ]),
            0,
            &null_sender(),
        );

        assert_eq!(map.groups.len(), 1);
        assert_eq!(map.groups[0].paths.len(), 2);
    }

    #[test]
    fn clustering_is_deterministic() {
        let items = input(&[
            (0x00, "/a.jpg"),
            (0x01, "/b.jpg"),
            (0x03, "/c.jpg"),
            (0xF0, "/d.jpg"),
            (0xF1, "/e.jpg"),
        ]);

        let first = cluster(&items, 2, &null_sender());
        for _ in 0..10 {
            let again = cluster(&items, 2, &null_sender());
            assert_eq!(again.groups.len(), first.groups.len());
            for (a, b) in again.groups.iter().zip(first.groups.iter()) {
                assert_eq!(a.key, b.key);
                assert_eq!(a.paths, b.paths);
            }
        }
    }

    #[test]
    fn no_path_appears_in_two_clusters() {
        // A spread of fingerprints that produces several overlapping-radius
        // neighborhoods; every path must still land in at most one cluster.
        let items = input(&[
            (0b0000_0000, "/p0.jpg"),
            (0b0000_0001, "/p1.jpg"),
            (0b0000_0011, "/p2.jpg"),
            (0b0000_0111, "/p3.jpg"),
            (0b0000_1111, "/p4.jpg"),
            (0b0001_1111, "/p5.jpg"),
            (0b1111_1111, "/p6.jpg"),
        ]);

        let map = cluster(&items, 2, &null_sender());

        let mut seen = std::collections::HashSet::new();
        for group in &map.groups {
            for path in &group.paths {
                assert!(seen.insert(path.clone()), "{path:?} in two clusters");
            }
        }
    }

    #[test]
    fn membership_is_measured_against_the_seed_only() {
        // d(a,b)=1, d(b,c)=1, d(a,c)=2 at threshold 1: the seed absorbs b,
        // c is outside the seed's radius even though it is within b's, and
        // c's own cluster stays a dropped singleton. Single-linkage-to-seed,
        // not transitive closure.
        let map = cluster(
            &input(&[(0b000, "/a.jpg"), (0b001, "/b.jpg"), (0b011, "/c.jpg")]),
            1,
            &null_sender(),
        );

        assert_eq!(map.groups.len(), 1);
        assert_eq!(map.groups[0].paths.len(), 2);
    }

    #[test]
    fn raising_the_threshold_never_shrinks_membership() {
        let items = input(&[
            (0x00, "/a.jpg"),
            (0x01, "/b.jpg"),
            (0x07, "/c.jpg"),
            (0xFF, "/d.jpg"),
        ]);

        let mut previous_member_count = 0;
        for threshold in 0..=8 {
            let map = cluster(&items, threshold, &null_sender());
            let member_count: usize = map.groups.iter().map(|g| g.paths.len()).sum();
            assert!(
                member_count >= previous_member_count,
                "membership shrank at threshold {threshold}"
            );
            previous_member_count = member_count;
        }
    }
}
