//! Parallel cable set resolution.
//!
//! Schedules accumulate parallel-run data in two forms: entries written by
//! the current app carry an explicit `parallel_group_id`, while legacy rows
//! only encode membership implicitly through a shared tag and routing. The
//! resolver reconciles both into consistent annotations (shared group id,
//! contiguous 1..=k numbering, set cardinality) without ever rejecting the
//! input: whatever is persisted must render.

use std::collections::HashMap;
use std::sync::OnceLock;

use log::warn;
use regex::Regex;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::api::{CableEntry, ParallelGroupId, ScheduleId};

/// Trailing display suffix like " (2/3)" that legacy rows bake into the tag.
fn display_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\(\d+/\d+\)$").expect("display suffix regex is valid"))
}

/// Base tag for clustering: the explicit base tag when present, otherwise
/// the entry's own tag with any baked-in `" (n/m)"` suffix stripped.
pub(crate) fn derived_base_tag(entry: &CableEntry) -> String {
    match &entry.base_cable_tag {
        Some(base) => base.clone(),
        None => display_suffix_regex()
            .replace(&entry.cable_tag, "")
            .into_owned(),
    }
}

/// Deterministic group id for an implicitly clustered set.
///
/// Derived from the cluster key rather than drawn at random so that
/// resolving the same snapshot twice annotates identical ids. The id is
/// a projection only and is never written back to storage.
fn implicit_group_id(schedule_id: ScheduleId, base_tag: &str, from: &str, to: &str) -> ParallelGroupId {
    let mut hasher = Sha256::new();
    hasher.update(schedule_id.value().to_le_bytes());
    hasher.update([0x1f]);
    hasher.update(base_tag.as_bytes());
    hasher.update([0x1f]);
    hasher.update(from.as_bytes());
    hasher.update([0x1f]);
    hasher.update(to.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    ParallelGroupId::new(Uuid::from_bytes(bytes))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ClusterKey {
    Explicit(ParallelGroupId),
    Implicit {
        schedule_id: ScheduleId,
        base_tag: String,
        from: String,
        to: String,
    },
}

fn cluster_key(entry: &CableEntry) -> ClusterKey {
    match entry.parallel_group_id {
        Some(group_id) => ClusterKey::Explicit(group_id),
        None => ClusterKey::Implicit {
            schedule_id: entry.schedule_id,
            base_tag: derived_base_tag(entry),
            from: entry.from_location.clone(),
            to: entry.to_location.clone(),
        },
    }
}

/// True when the cluster's numbering is already a contiguous 1..=k
/// permutation.
fn numbering_is_valid(members: &[&CableEntry]) -> bool {
    let k = members.len() as i32;
    let mut seen = vec![false; members.len()];
    for member in members {
        let n = member.cable_number;
        if n < 1 || n > k {
            return false;
        }
        let idx = (n - 1) as usize;
        if seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}

/// Resolve parallel set annotations over a snapshot of entries.
///
/// Entries sharing an explicit `parallel_group_id` form a cluster; entries
/// without one cluster implicitly on `(schedule, base tag, from, to)`. An
/// explicit id carried by only one row is stale (its siblings were deleted
/// or never imported) and is dropped before clustering, so the row can
/// still join its route twins.
/// Every cluster of two or more comes out with a shared group id, shared
/// base tag, `parallel_total` equal to the cluster size, and numbering
/// repaired to 1..=k (ordered by `display_order`, input position breaking
/// ties) whenever the stored numbering is not already a valid permutation.
/// Size-one clusters are normalized back to plain entries.
///
/// Input order is preserved. The operation is idempotent: resolving an
/// already resolved snapshot changes nothing.
pub fn resolve_parallel_groups(entries: Vec<CableEntry>) -> Vec<CableEntry> {
    let mut resolved = entries;

    // Drop stale ids first, so their rows take part in implicit clustering.
    let mut id_frequency: HashMap<ParallelGroupId, usize> = HashMap::new();
    for entry in &resolved {
        if let Some(group_id) = entry.parallel_group_id {
            *id_frequency.entry(group_id).or_default() += 1;
        }
    }
    for entry in &mut resolved {
        if let Some(group_id) = entry.parallel_group_id {
            if id_frequency[&group_id] == 1 {
                entry.parallel_group_id = None;
            }
        }
    }

    // Cluster membership as indices into the input, preserving input order.
    let mut clusters: HashMap<ClusterKey, Vec<usize>> = HashMap::new();
    for (idx, entry) in resolved.iter().enumerate() {
        clusters.entry(cluster_key(entry)).or_default().push(idx);
    }

    for (key, member_indices) in clusters {
        if member_indices.len() == 1 {
            let entry = &mut resolved[member_indices[0]];
            // Singleton: nothing to be parallel with.
            entry.parallel_group_id = None;
            entry.cable_number = 1;
            entry.parallel_total = None;
            continue;
        }

        let group_id = match &key {
            ClusterKey::Explicit(id) => *id,
            ClusterKey::Implicit {
                schedule_id,
                base_tag,
                from,
                to,
            } => implicit_group_id(*schedule_id, base_tag, from, to),
        };

        // All members share the first materialized base tag.
        let base_tag = member_indices
            .iter()
            .find_map(|&i| resolved[i].base_cable_tag.clone())
            .unwrap_or_else(|| derived_base_tag(&resolved[member_indices[0]]));

        let total = member_indices.len() as i32;

        let keep_numbering = {
            let members: Vec<&CableEntry> = member_indices.iter().map(|&i| &resolved[i]).collect();
            numbering_is_valid(&members)
        };

        if !keep_numbering {
            warn!(
                "repairing parallel numbering for set '{}' ({} members, group {})",
                base_tag, total, group_id
            );
        }

        // Renumber by display_order, input position breaking ties.
        let mut ordered = member_indices;
        ordered.sort_by_key(|&i| (resolved[i].display_order, i));

        for (position, &i) in ordered.iter().enumerate() {
            let entry = &mut resolved[i];
            entry.parallel_group_id = Some(group_id);
            entry.base_cable_tag = Some(base_tag.clone());
            entry.parallel_total = Some(total);
            if !keep_numbering {
                entry.cable_number = position as i32 + 1;
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EntryId;

    fn create_test_entry(tag: &str, from: &str, to: &str, order: i32) -> CableEntry {
        CableEntry {
            id: EntryId::generate(),
            schedule_id: ScheduleId::new(1),
            display_order: order,
            cable_tag: tag.to_string(),
            base_cable_tag: None,
            cable_number: 1,
            parallel_group_id: None,
            parallel_total: None,
            from_location: from.to_string(),
            to_location: to.to_string(),
            voltage: "400V".to_string(),
            cable_type: "XLPE/SWA".to_string(),
            cable_size: "4x95".to_string(),
            installation_method: "Tray".to_string(),
            load_amps: None,
            quantity: 1,
            measured_length: Some(50.0),
            extra_length: None,
            total_length: None,
            supply_cost: Some(10.0),
            install_cost: None,
            total_cost: None,
            notes: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_singleton_left_plain() {
        let entries = vec![create_test_entry("C-1", "MSB", "DB-1", 0)];
        let resolved = resolve_parallel_groups(entries);

        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].parallel_group_id.is_none());
        assert_eq!(resolved[0].cable_number, 1);
        assert!(resolved[0].parallel_total.is_none());
    }

    #[test]
    fn test_singleton_with_stale_group_normalized() {
        let mut entry = create_test_entry("C-1", "MSB", "DB-1", 0);
        entry.parallel_group_id = Some(ParallelGroupId::generate());
        entry.cable_number = 2;
        entry.parallel_total = Some(3);

        let resolved = resolve_parallel_groups(vec![entry]);
        assert!(resolved[0].parallel_group_id.is_none());
        assert_eq!(resolved[0].cable_number, 1);
        assert!(resolved[0].parallel_total.is_none());
    }

    #[test]
    fn test_stale_group_id_rejoins_route_twins() {
        // One sibling of a former set was deleted; the survivor still carries
        // the old group id but must cluster with its unannotated route twin.
        let mut a = create_test_entry("P-104", "MSB", "Shop 45", 0);
        a.parallel_group_id = Some(ParallelGroupId::generate());
        a.parallel_total = Some(2);
        let b = create_test_entry("P-104", "MSB", "Shop 45", 1);

        let resolved = resolve_parallel_groups(vec![a, b]);
        assert!(resolved[0].parallel_group_id.is_some());
        assert_eq!(resolved[0].parallel_group_id, resolved[1].parallel_group_id);
        assert!(resolved.iter().all(|e| e.parallel_total == Some(2)));
    }

    #[test]
    fn test_implicit_cluster_formed() {
        let entries = vec![
            create_test_entry("P-104", "MSB", "Shop 45", 0),
            create_test_entry("P-104", "MSB", "Shop 45", 1),
            create_test_entry("P-104", "MSB", "Shop 45", 2),
        ];
        let resolved = resolve_parallel_groups(entries);

        let group_id = resolved[0].parallel_group_id.expect("should be grouped");
        assert!(resolved.iter().all(|e| e.parallel_group_id == Some(group_id)));
        assert!(resolved.iter().all(|e| e.parallel_total == Some(3)));

        let mut numbers: Vec<i32> = resolved.iter().map(|e| e.cable_number).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_implicit_cluster_requires_matching_route() {
        // Same tag, different destination: separate runs, not a parallel set
        let entries = vec![
            create_test_entry("P-104", "MSB", "Shop 45", 0),
            create_test_entry("P-104", "MSB", "Shop 46", 1),
        ];
        let resolved = resolve_parallel_groups(entries);

        assert!(resolved[0].parallel_group_id.is_none());
        assert!(resolved[1].parallel_group_id.is_none());
    }

    #[test]
    fn test_legacy_suffixed_tags_cluster_together() {
        let entries = vec![
            create_test_entry("P-104 (1/2)", "MSB", "Shop 45", 0),
            create_test_entry("P-104 (2/2)", "MSB", "Shop 45", 1),
        ];
        let resolved = resolve_parallel_groups(entries);

        assert!(resolved[0].parallel_group_id.is_some());
        assert_eq!(resolved[0].parallel_group_id, resolved[1].parallel_group_id);
        assert_eq!(resolved[0].base_cable_tag.as_deref(), Some("P-104"));
        assert_eq!(resolved[0].display_tag(), "P-104 (1/2)");
        assert_eq!(resolved[1].display_tag(), "P-104 (2/2)");
    }

    #[test]
    fn test_explicit_cluster_valid_numbering_kept() {
        let group = ParallelGroupId::generate();
        let mut a = create_test_entry("F-1", "MSB", "Roof", 0);
        let mut b = create_test_entry("F-1", "MSB", "Roof", 1);
        // Stored in reverse: b is number 1, a is number 2
        a.parallel_group_id = Some(group);
        a.cable_number = 2;
        b.parallel_group_id = Some(group);
        b.cable_number = 1;

        let resolved = resolve_parallel_groups(vec![a, b]);
        assert_eq!(resolved[0].cable_number, 2);
        assert_eq!(resolved[1].cable_number, 1);
        assert!(resolved.iter().all(|e| e.parallel_total == Some(2)));
    }

    #[test]
    fn test_duplicate_numbering_repaired() {
        let group = ParallelGroupId::generate();
        let mut entries: Vec<CableEntry> = (0..3)
            .map(|i| {
                let mut e = create_test_entry("F-2", "MSB", "Plant", i);
                e.parallel_group_id = Some(group);
                e.cable_number = 1; // All claim position 1
                e
            })
            .collect();
        entries[1].display_order = 10;
        entries[2].display_order = 5;

        let resolved = resolve_parallel_groups(entries);

        // Renumbered by display_order: orders 0, 5, 10 -> numbers 1, 3, 2
        assert_eq!(resolved[0].cable_number, 1);
        assert_eq!(resolved[1].cable_number, 3);
        assert_eq!(resolved[2].cable_number, 2);
        assert_eq!(
            resolved.iter().filter(|e| e.cable_number == 1).count(),
            1
        );
    }

    #[test]
    fn test_out_of_range_numbering_repaired() {
        let group = ParallelGroupId::generate();
        let mut a = create_test_entry("F-3", "MSB", "Plant", 0);
        let mut b = create_test_entry("F-3", "MSB", "Plant", 1);
        a.parallel_group_id = Some(group);
        a.cable_number = 0;
        b.parallel_group_id = Some(group);
        b.cable_number = 7;

        let resolved = resolve_parallel_groups(vec![a, b]);
        assert_eq!(resolved[0].cable_number, 1);
        assert_eq!(resolved[1].cable_number, 2);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let entries = vec![
            create_test_entry("P-104", "MSB", "Shop 45", 0),
            create_test_entry("P-104", "MSB", "Shop 45", 1),
            create_test_entry("C-9", "MSB", "DB-9", 2),
        ];
        let once = resolve_parallel_groups(entries);
        let twice = resolve_parallel_groups(once.clone());

        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.parallel_group_id, b.parallel_group_id);
            assert_eq!(a.cable_number, b.cable_number);
            assert_eq!(a.parallel_total, b.parallel_total);
            assert_eq!(a.base_cable_tag, b.base_cable_tag);
        }
    }

    #[test]
    fn test_implicit_group_id_deterministic_across_calls() {
        let make = || {
            vec![
                create_test_entry("P-104", "MSB", "Shop 45", 0),
                create_test_entry("P-104", "MSB", "Shop 45", 1),
            ]
        };
        let first = resolve_parallel_groups(make());
        let second = resolve_parallel_groups(make());
        assert_eq!(first[0].parallel_group_id, second[0].parallel_group_id);
    }

    #[test]
    fn test_implicit_clusters_do_not_cross_schedules() {
        let mut a = create_test_entry("P-104", "MSB", "Shop 45", 0);
        let mut b = create_test_entry("P-104", "MSB", "Shop 45", 1);
        a.schedule_id = ScheduleId::new(1);
        b.schedule_id = ScheduleId::new(2);

        let resolved = resolve_parallel_groups(vec![a, b]);
        assert!(resolved[0].parallel_group_id.is_none());
        assert!(resolved[1].parallel_group_id.is_none());
    }

    #[test]
    fn test_input_order_preserved() {
        let entries = vec![
            create_test_entry("Z-9", "MSB", "DB-9", 5),
            create_test_entry("P-104", "MSB", "Shop 45", 0),
            create_test_entry("A-1", "MSB", "DB-1", 3),
            create_test_entry("P-104", "MSB", "Shop 45", 1),
        ];
        let tags: Vec<String> = entries.iter().map(|e| e.cable_tag.clone()).collect();
        let resolved = resolve_parallel_groups(entries);
        let resolved_tags: Vec<String> = resolved.iter().map(|e| e.cable_tag.clone()).collect();
        assert_eq!(tags, resolved_tags);
    }

    #[test]
    fn test_derived_base_tag_strips_suffix_only_at_end() {
        let mut entry = create_test_entry("P-104 (1/2)", "MSB", "Shop 45", 0);
        assert_eq!(derived_base_tag(&entry), "P-104");

        entry.cable_tag = "P-104 (1/2) spare".to_string();
        assert_eq!(derived_base_tag(&entry), "P-104 (1/2) spare");

        entry.cable_tag = "P-104".to_string();
        entry.base_cable_tag = Some("P".to_string());
        assert_eq!(derived_base_tag(&entry), "P");
    }
}
