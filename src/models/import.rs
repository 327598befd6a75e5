// ============================================================================
// JSON Parsing Functions
// ============================================================================
//
// Grid exports arrive as a single JSON blob holding the schedule rows. These
// functions validate and deserialize that blob into API types, assigning ids
// and display positions where the export left them out.

use crate::api;
use crate::api::{EntryId, ParallelGroupId, ScheduleId};
use crate::db::checksum::calculate_checksum;
use anyhow::{Context, Result};
use uuid::Uuid;

#[derive(serde::Deserialize)]
struct EntriesInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub entries: Vec<EntryInput>,
}

/// One exported grid row. Everything is optional because exports from older
/// app versions omit columns that did not exist yet.
#[derive(serde::Deserialize)]
struct EntryInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub display_order: Option<i32>,
    #[serde(default)]
    pub cable_tag: String,
    #[serde(default)]
    pub base_cable_tag: Option<String>,
    #[serde(default)]
    pub cable_number: Option<i32>,
    #[serde(default)]
    pub parallel_group_id: Option<Uuid>,
    #[serde(default)]
    pub parallel_total: Option<i32>,
    #[serde(default)]
    pub from_location: String,
    #[serde(default)]
    pub to_location: String,
    #[serde(default)]
    pub voltage: String,
    #[serde(default)]
    pub cable_type: String,
    #[serde(default)]
    pub cable_size: String,
    #[serde(default)]
    pub installation_method: String,
    #[serde(default)]
    pub load_amps: Option<f64>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub measured_length: Option<f64>,
    #[serde(default)]
    pub extra_length: Option<f64>,
    #[serde(default)]
    pub total_length: Option<f64>,
    #[serde(default)]
    pub supply_cost: Option<f64>,
    #[serde(default)]
    pub install_cost: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

fn validate_input_entries(entries_json: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(entries_json).context("Invalid schedule JSON")?;
    let has_entries = value
        .as_object()
        .and_then(|obj| obj.get("entries"))
        .is_some();
    if !has_entries {
        anyhow::bail!("Missing required 'entries' field");
    }
    Ok(())
}

/// Parse a cable schedule from an exported JSON string.
///
/// This function deserializes the export using Serde, assigns fresh ids to
/// rows that carry none, numbers rows without an explicit display position by
/// their order in the file, and computes the content checksum when the export
/// did not embed one.
///
/// # Arguments
///
/// * `entries_json` - Exported schedule JSON (snake_case format matching schema)
/// * `default_name` - Schedule name used when the export carries none
///
/// # Returns
///
/// A fully populated `Schedule` ready to store.
pub fn parse_entries_json_str(entries_json: &str, default_name: &str) -> Result<api::Schedule> {
    validate_input_entries(entries_json)?;

    let input: EntriesInput = serde_json::from_str(entries_json)
        .context("Failed to deserialize schedule JSON using Serde")?;

    let name = if input.name.is_empty() {
        default_name.to_string()
    } else {
        input.name
    };

    let entries = input
        .entries
        .into_iter()
        .enumerate()
        .map(|(position, row)| convert_row(row, position))
        .collect();

    let mut schedule = api::Schedule {
        id: None,
        name,
        checksum: input.checksum,
        entries,
    };

    // Compute checksum if not provided
    if schedule.checksum.is_empty() {
        schedule.checksum = calculate_checksum(entries_json);
    }

    Ok(schedule)
}

fn convert_row(row: EntryInput, position: usize) -> api::CableEntry {
    api::CableEntry {
        id: row.id.map(EntryId::new).unwrap_or_else(EntryId::generate),
        // The store stamps the real schedule id on insert.
        schedule_id: ScheduleId::new(0),
        display_order: row.display_order.unwrap_or(position as i32),
        cable_tag: row.cable_tag,
        base_cable_tag: row.base_cable_tag,
        cable_number: row.cable_number.unwrap_or(1),
        parallel_group_id: row.parallel_group_id.map(ParallelGroupId::new),
        parallel_total: row.parallel_total,
        from_location: row.from_location,
        to_location: row.to_location,
        voltage: row.voltage,
        cable_type: row.cable_type,
        cable_size: row.cable_size,
        installation_method: row.installation_method,
        load_amps: row.load_amps,
        quantity: row.quantity.unwrap_or(1),
        measured_length: row.measured_length,
        extra_length: row.extra_length,
        total_length: row.total_length,
        supply_cost: row.supply_cost,
        install_cost: row.install_cost,
        total_cost: row.total_cost,
        notes: row.notes,
        created_at: None,
        updated_at: None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_entries() {
        let entries_json = r#"{
            "entries": [
                {
                    "cable_tag": "P-101",
                    "from_location": "MSB-1",
                    "to_location": "Shop 12 - Bakery",
                    "measured_length": 85.0,
                    "extra_length": 10.0,
                    "supply_cost": 40.0
                }
            ]
        }"#;

        let result = parse_entries_json_str(entries_json, "import");
        assert!(
            result.is_ok(),
            "Should parse minimal entries: {:?}",
            result.err()
        );

        let schedule = result.unwrap();
        assert_eq!(schedule.entries.len(), 1);
        assert_eq!(schedule.entries[0].cable_tag, "P-101");
        assert_eq!(schedule.entries[0].measured_length, Some(85.0));
        assert_eq!(schedule.entries[0].quantity, 1);
    }

    #[test]
    fn test_parse_assigns_ids_and_positions() {
        let entries_json = r#"{
            "entries": [
                { "cable_tag": "A-1" },
                { "cable_tag": "A-2" },
                { "cable_tag": "A-3" }
            ]
        }"#;

        let schedule = parse_entries_json_str(entries_json, "import").unwrap();
        assert_eq!(schedule.entries.len(), 3);
        assert_eq!(schedule.entries[0].display_order, 0);
        assert_eq!(schedule.entries[2].display_order, 2);

        // Fresh ids, all distinct.
        assert_ne!(schedule.entries[0].id, schedule.entries[1].id);
        assert_ne!(schedule.entries[1].id, schedule.entries[2].id);
    }

    #[test]
    fn test_parse_keeps_provided_ids_and_positions() {
        let entries_json = r#"{
            "entries": [
                {
                    "id": "9a16f1a4-95b3-4a72-9f32-43a2bfb3e1a7",
                    "display_order": 7,
                    "cable_tag": "B-1"
                }
            ]
        }"#;

        let schedule = parse_entries_json_str(entries_json, "import").unwrap();
        assert_eq!(schedule.entries[0].display_order, 7);
        assert_eq!(
            schedule.entries[0].id.value().to_string(),
            "9a16f1a4-95b3-4a72-9f32-43a2bfb3e1a7"
        );
    }

    #[test]
    fn test_parse_computes_checksum_when_absent() {
        let entries_json = r#"{ "entries": [ { "cable_tag": "C-1" } ] }"#;

        let schedule = parse_entries_json_str(entries_json, "import").unwrap();
        assert_eq!(schedule.checksum, calculate_checksum(entries_json));
    }

    #[test]
    fn test_parse_keeps_provided_checksum() {
        let entries_json = r#"{
            "checksum": "abc123",
            "entries": [ { "cable_tag": "C-1" } ]
        }"#;

        let schedule = parse_entries_json_str(entries_json, "import").unwrap();
        assert_eq!(schedule.checksum, "abc123");
    }

    #[test]
    fn test_parse_name_fallback() {
        let unnamed = r#"{ "entries": [] }"#;
        let named = r#"{ "name": "riser_west", "entries": [] }"#;

        let schedule = parse_entries_json_str(unnamed, "from_filename").unwrap();
        assert_eq!(schedule.name, "from_filename");

        let schedule = parse_entries_json_str(named, "from_filename").unwrap();
        assert_eq!(schedule.name, "riser_west");
    }

    #[test]
    fn test_parse_sparse_row_defaults() {
        let entries_json = r#"{ "entries": [ {} ] }"#;

        let schedule = parse_entries_json_str(entries_json, "import").unwrap();
        let entry = &schedule.entries[0];
        assert_eq!(entry.cable_tag, "");
        assert_eq!(entry.cable_number, 1);
        assert_eq!(entry.quantity, 1);
        assert!(entry.parallel_group_id.is_none());
        assert!(entry.total_length.is_none());
    }

    #[test]
    fn test_missing_entries_key() {
        let entries_json = r#"{"SomeOtherKey": []}"#;
        let result = parse_entries_json_str(entries_json, "import");
        assert!(result.is_err(), "Should fail without entries key");
    }

    #[test]
    fn test_invalid_json() {
        let entries_json = "not valid json {";
        let result = parse_entries_json_str(entries_json, "import");
        assert!(result.is_err(), "Should fail with invalid JSON");
    }
}
