//! Public API surface for the Rust backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::routes::landing::ScheduleInfo;
pub use crate::routes::schedule_page::SchedulePageData;
pub use crate::routes::shop_groups::ShopGroupsView;
pub use crate::routes::totals::ScheduleTotalsView;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schedule identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ScheduleId(pub i64);

/// Cable entry identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

/// Parallel cable set identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParallelGroupId(pub Uuid);

impl ScheduleId {
    pub fn new(value: i64) -> Self {
        ScheduleId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl EntryId {
    pub fn new(value: Uuid) -> Self {
        EntryId(value)
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        EntryId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl ParallelGroupId {
    pub fn new(value: Uuid) -> Self {
        ParallelGroupId(value)
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        ParallelGroupId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ParallelGroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ScheduleId> for i64 {
    fn from(id: ScheduleId) -> Self {
        id.0
    }
}

impl From<Uuid> for EntryId {
    fn from(value: Uuid) -> Self {
        EntryId(value)
    }
}

impl From<Uuid> for ParallelGroupId {
    fn from(value: Uuid) -> Self {
        ParallelGroupId(value)
    }
}

/// Round to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn default_quantity() -> i32 {
    1
}

fn default_cable_number() -> i32 {
    1
}

/// One conductor run in a cable schedule, or one member of a parallel set.
///
/// Lengths are metres; costs are currency-agnostic amounts. The stored
/// numeric fields are all optional because imported schedules are routinely
/// incomplete; the `effective_*` accessors apply the canonical fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CableEntry {
    /// Database ID
    pub id: EntryId,
    /// Owning schedule
    pub schedule_id: ScheduleId,
    /// Stable sort key within the schedule
    #[serde(default)]
    pub display_order: i32,
    /// The entry's own tag
    pub cable_tag: String,
    /// Tag shared by all members of a parallel set.
    /// Absent means equal to `cable_tag`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_cable_tag: Option<String>,
    /// 1-based position within the entry's parallel set
    #[serde(default = "default_cable_number")]
    pub cable_number: i32,
    /// Parallel set membership; absent for non-parallel entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_group_id: Option<ParallelGroupId>,
    /// Cardinality of the entry's parallel set; absent for non-parallel entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_total: Option<i32>,
    /// Origin, free text
    #[serde(default)]
    pub from_location: String,
    /// Destination, free text; may embed a shop code ("Shop 45 - Bakery")
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
    /// Design load in amps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_amps: Option<f64>,
    /// Number of identical cores/runs
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Measured route length in metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_length: Option<f64>,
    /// Slack/termination allowance in metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_length: Option<f64>,
    /// Authoritative total length when present; derived otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_cost: Option<f64>,
    /// Authoritative total cost when present; derived otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub notes: String,
    /// Set by the store on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set by the store on every update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CableEntry {
    /// Effective length in metres.
    ///
    /// `total_length` is authoritative when present. Otherwise the length is
    /// derived as `round2(max(measured, 0) + max(extra, 0))`; missing inputs
    /// count as zero.
    pub fn effective_length(&self) -> f64 {
        if let Some(total) = self.total_length {
            return total;
        }
        let measured = self.measured_length.unwrap_or(0.0).max(0.0);
        let extra = self.extra_length.unwrap_or(0.0).max(0.0);
        round2(measured + extra)
    }

    /// Effective cost.
    ///
    /// `total_cost` is authoritative when present; otherwise
    /// `max(supply, 0) + max(install, 0)` with missing inputs as zero.
    pub fn effective_cost(&self) -> f64 {
        if let Some(total) = self.total_cost {
            return total;
        }
        let supply = self.supply_cost.unwrap_or(0.0).max(0.0);
        let install = self.install_cost.unwrap_or(0.0).max(0.0);
        supply + install
    }

    /// The tag shared by the entry's parallel set.
    pub fn base_tag(&self) -> &str {
        self.base_cable_tag.as_deref().unwrap_or(&self.cable_tag)
    }

    /// Presentation tag.
    ///
    /// Members of a resolved parallel set render as `"BASE (n/m)"`; everything
    /// else renders the stored `cable_tag`. The numbered form needs the
    /// resolver to have annotated `parallel_total`.
    pub fn display_tag(&self) -> String {
        match (self.parallel_group_id.is_some(), self.parallel_total) {
            (true, Some(total)) => {
                format!("{} ({}/{})", self.base_tag(), self.cable_number, total)
            }
            _ => self.cable_tag.clone(),
        }
    }

    /// True when the entry belongs to a parallel set.
    pub fn is_parallel(&self) -> bool {
        self.parallel_group_id.is_some()
    }
}

/// Partial update applied to a batch of entries.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_amps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EntryUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.from_location.is_none()
            && self.to_location.is_none()
            && self.voltage.is_none()
            && self.cable_type.is_none()
            && self.cable_size.is_none()
            && self.installation_method.is_none()
            && self.load_amps.is_none()
            && self.quantity.is_none()
            && self.measured_length.is_none()
            && self.extra_length.is_none()
            && self.total_length.is_none()
            && self.supply_cost.is_none()
            && self.install_cost.is_none()
            && self.total_cost.is_none()
            && self.notes.is_none()
    }
}

/// Summed effective values over a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateTotals {
    /// Total effective length in metres
    pub total_length: f64,
    /// Total effective cost
    pub total_cost: f64,
}

/// Named partition of entries sharing a destination shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CableGroup {
    /// Lowercased shop key; empty string for the ungrouped bucket
    pub shop_number: String,
    /// Display label for the group header
    pub shop_name: String,
    /// Presentation copies of the member entries, input order preserved
    pub entries: Vec<CableEntry>,
}

/// Top-level cable schedule with its entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Database ID
    pub id: Option<i64>,
    /// Schedule name
    #[serde(default)]
    pub name: String,
    /// SHA256 checksum of the imported schedule data
    #[serde(default)]
    pub checksum: String,
    /// Cable entries in display order
    #[serde(default)]
    pub entries: Vec<CableEntry>,
}

impl Schedule {
    pub fn new(id: Option<i64>, name: String, checksum: String, entries: Vec<CableEntry>) -> Self {
        Self {
            id,
            name,
            checksum,
            entries,
        }
    }
}
