//! Length and cost aggregation over entry subsets.

use crate::api::{round2, AggregateTotals, CableEntry};

/// Sum effective length and cost over any entry subset.
///
/// Works the same whether the subset is a page, a shop group, or the
/// whole project; the caller decides the scope by what it passes in.
/// Pure fold: empty input yields zeros, and any entry whose effective
/// value comes out non-finite contributes zero instead of poisoning
/// the sum. Totals are rounded to 2 decimal places.
pub fn aggregate(entries: &[CableEntry]) -> AggregateTotals {
    let mut total_length = 0.0;
    let mut total_cost = 0.0;

    for entry in entries {
        let length = entry.effective_length();
        if length.is_finite() {
            total_length += length;
        }
        let cost = entry.effective_cost();
        if cost.is_finite() {
            total_cost += cost;
        }
    }

    AggregateTotals {
        total_length: round2(total_length),
        total_cost: round2(total_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EntryId, ScheduleId};

    fn create_test_entry(length: Option<f64>, cost: Option<f64>) -> CableEntry {
        CableEntry {
            id: EntryId::generate(),
            schedule_id: ScheduleId::new(1),
            display_order: 0,
            cable_tag: "C-1".to_string(),
            base_cable_tag: None,
            cable_number: 1,
            parallel_group_id: None,
            parallel_total: None,
            from_location: "MSB".to_string(),
            to_location: "DB-1".to_string(),
            voltage: "230V".to_string(),
            cable_type: "TPS".to_string(),
            cable_size: "2.5mm".to_string(),
            installation_method: "Clipped".to_string(),
            load_amps: None,
            quantity: 1,
            measured_length: length,
            extra_length: None,
            total_length: None,
            supply_cost: cost,
            install_cost: None,
            total_cost: None,
            notes: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_empty_input_yields_zero_totals() {
        let totals = aggregate(&[]);
        assert_eq!(totals.total_length, 0.0);
        assert_eq!(totals.total_cost, 0.0);
    }

    #[test]
    fn test_sums_effective_values() {
        let entries = vec![
            create_test_entry(Some(50.0), Some(100.0)),
            create_test_entry(Some(30.5), Some(20.25)),
        ];
        let totals = aggregate(&entries);
        assert_eq!(totals.total_length, 80.5);
        assert_eq!(totals.total_cost, 120.25);
    }

    #[test]
    fn test_missing_fields_count_as_zero() {
        let entries = vec![
            create_test_entry(None, None),
            create_test_entry(Some(50.0), Some(50.0)),
            create_test_entry(Some(100.0), Some(100.0)),
            create_test_entry(None, None),
            create_test_entry(Some(25.0), Some(25.0)),
        ];
        let totals = aggregate(&entries);
        assert_eq!(totals.total_cost, 175.0);
        assert_eq!(totals.total_length, 175.0);
    }

    #[test]
    fn test_nan_inputs_never_poison_the_sum() {
        let mut poisoned = create_test_entry(Some(10.0), Some(10.0));
        poisoned.total_length = Some(f64::NAN);
        poisoned.total_cost = Some(f64::INFINITY);

        let entries = vec![poisoned, create_test_entry(Some(5.0), Some(7.0))];
        let totals = aggregate(&entries);

        assert!(totals.total_length.is_finite());
        assert!(totals.total_cost.is_finite());
        assert_eq!(totals.total_length, 5.0);
        assert_eq!(totals.total_cost, 7.0);
    }

    #[test]
    fn test_authoritative_totals_take_precedence() {
        let mut entry = create_test_entry(Some(10.0), Some(10.0));
        entry.total_length = Some(99.0);
        entry.total_cost = Some(42.5);

        let totals = aggregate(&[entry]);
        assert_eq!(totals.total_length, 99.0);
        assert_eq!(totals.total_cost, 42.5);
    }

    #[test]
    fn test_totals_rounded_to_two_decimals() {
        let entries = vec![
            create_test_entry(Some(0.105), Some(0.1)),
            create_test_entry(Some(0.2), Some(0.2)),
        ];
        let totals = aggregate(&entries);
        // 0.105 rounds to 0.11 per entry, then 0.11 + 0.2
        assert_eq!(totals.total_length, 0.31);
        assert_eq!(totals.total_cost, 0.3);
    }
}
