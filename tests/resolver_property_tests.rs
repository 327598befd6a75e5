//! Property tests for the parallel set resolver, shop grouping, and paging.
//!
//! These check the structural invariants that must hold for any input:
//! idempotent resolution, complete cluster numbering, partition-shaped
//! grouping, and clamped page windows.

use std::collections::HashMap;

use proptest::prelude::*;
use uuid::Uuid;

use csm_rust::api::{CableEntry, EntryId, ParallelGroupId, ScheduleId};
use csm_rust::services::{compute_window, group_by_shop, resolve_parallel_groups, split_entry};

fn entry_strategy() -> impl Strategy<Value = CableEntry> {
    (
        prop::sample::select(vec!["C1", "C2", "C1 (1/2)", "F-10", "P-7"]),
        prop::sample::select(vec!["MSB-1", "MSB-2"]),
        prop::sample::select(vec!["DB-1", "Shop 4", "Shop 12 - North", "Roof"]),
        prop::option::of(0.0..500.0f64),
        prop::option::of(0.0..100.0f64),
        0..20i32,
        prop::option::of(0u8..3u8),
        1..5i32,
        prop::option::of(1..5i32),
        1..3i64,
    )
        .prop_map(
            |(tag, from, to, measured, cost, order, group_sel, number, total, schedule)| {
                // A tiny pool of explicit group ids forces collisions.
                let parallel_group_id = group_sel
                    .map(|i| ParallelGroupId::new(Uuid::from_u128(0x1000 + u128::from(i))));

                CableEntry {
                    id: EntryId::generate(),
                    schedule_id: ScheduleId::new(schedule),
                    display_order: order,
                    cable_tag: tag.to_string(),
                    base_cable_tag: None,
                    cable_number: number,
                    parallel_group_id,
                    parallel_total: total,
                    from_location: from.to_string(),
                    to_location: to.to_string(),
                    voltage: String::new(),
                    cable_type: String::new(),
                    cable_size: String::new(),
                    installation_method: String::new(),
                    load_amps: None,
                    quantity: 1,
                    measured_length: measured,
                    extra_length: None,
                    total_length: None,
                    supply_cost: None,
                    install_cost: cost,
                    total_cost: None,
                    notes: String::new(),
                    created_at: None,
                    updated_at: None,
                }
            },
        )
}

fn entries_strategy() -> impl Strategy<Value = Vec<CableEntry>> {
    prop::collection::vec(entry_strategy(), 0..40)
}

proptest! {
    #[test]
    fn prop_resolution_is_idempotent(entries in entries_strategy()) {
        let once = resolve_parallel_groups(entries);
        let twice = resolve_parallel_groups(once.clone());

        let once_json = serde_json::to_value(&once).unwrap();
        let twice_json = serde_json::to_value(&twice).unwrap();
        prop_assert_eq!(once_json, twice_json);
    }

    #[test]
    fn prop_resolution_preserves_rows(entries in entries_strategy()) {
        let input_ids: Vec<EntryId> = entries.iter().map(|e| e.id).collect();
        let resolved = resolve_parallel_groups(entries);
        let output_ids: Vec<EntryId> = resolved.iter().map(|e| e.id).collect();

        // Same rows, same order; resolution only annotates.
        prop_assert_eq!(input_ids, output_ids);
    }

    #[test]
    fn prop_cluster_numbering_is_complete(entries in entries_strategy()) {
        let resolved = resolve_parallel_groups(entries);

        let mut clusters: HashMap<ParallelGroupId, Vec<&CableEntry>> = HashMap::new();
        for entry in &resolved {
            if let Some(group_id) = entry.parallel_group_id {
                clusters.entry(group_id).or_default().push(entry);
            }
        }

        for members in clusters.values() {
            let k = members.len();
            // Resolution never leaves a one-member group behind.
            prop_assert!(k >= 2);

            let mut numbers: Vec<i32> = members.iter().map(|e| e.cable_number).collect();
            numbers.sort_unstable();
            let expected: Vec<i32> = (1..=k as i32).collect();
            prop_assert_eq!(numbers, expected);

            for member in members {
                prop_assert_eq!(member.parallel_total, Some(k as i32));
            }
        }
    }

    #[test]
    fn prop_singletons_carry_no_annotations(entries in entries_strategy()) {
        let resolved = resolve_parallel_groups(entries);

        for entry in &resolved {
            if entry.parallel_group_id.is_none() {
                prop_assert_eq!(entry.parallel_total, None);
                prop_assert_eq!(entry.cable_number, 1);
            }
        }
    }

    #[test]
    fn prop_shop_grouping_is_a_partition(entries in entries_strategy()) {
        let groups = group_by_shop(&entries, None);

        let mut seen: Vec<EntryId> = groups
            .iter()
            .flat_map(|g| g.entries.iter().map(|e| e.id))
            .collect();
        seen.sort();

        let mut expected: Vec<EntryId> = entries.iter().map(|e| e.id).collect();
        expected.sort();

        // Every entry lands in exactly one group.
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_window_stays_in_range(
        page in 0u32..200,
        page_size in 1u32..300,
        total_count in 0u64..10_000,
    ) {
        let window = compute_window(page, page_size, total_count).unwrap();

        prop_assert!(window.page >= 1);
        prop_assert!(window.page <= window.total_pages.max(1));
        prop_assert!(window.len() <= u64::from(page_size));
        prop_assert!(window.offset() + window.len() <= total_count);
        if total_count == 0 {
            prop_assert_eq!(window.total_pages, 0);
            prop_assert!(window.is_empty());
        } else {
            // A non-empty data set always yields a non-empty clamped window.
            prop_assert!(!window.is_empty());
        }
    }

    #[test]
    fn prop_split_siblings_keep_full_values(entry in entry_strategy(), count in 2i32..6) {
        let siblings = split_entry(&entry, count).unwrap();

        prop_assert_eq!(siblings.len(), count as usize);

        let mut numbers: Vec<i32> = siblings.iter().map(|e| e.cable_number).collect();
        numbers.sort_unstable();
        let expected: Vec<i32> = (1..=count).collect();
        prop_assert_eq!(numbers, expected);

        for sibling in &siblings {
            prop_assert_eq!(sibling.effective_length(), entry.effective_length());
            prop_assert_eq!(sibling.effective_cost(), entry.effective_cost());
            prop_assert!(sibling.parallel_group_id.is_some());
        }
    }
}
