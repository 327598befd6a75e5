//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Most view DTOs are re-exported from the routes module since they already
//! derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

use crate::api::{EntryId, EntryUpdate};

// Re-export existing DTOs that are already serializable
pub use crate::api::{AggregateTotals, CableEntry, CableGroup, Schedule, ScheduleInfo};
pub use crate::routes::schedule_page::SchedulePageData;
pub use crate::routes::shop_groups::ShopGroupsView;
pub use crate::routes::totals::ScheduleTotalsView;

/// Request body for creating a new schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    /// Name for the schedule
    pub name: String,
    /// Exported grid JSON (must carry an `entries` array)
    pub entries_json: serde_json::Value,
}

/// Response for schedule creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleResponse {
    /// ID of the stored schedule
    pub schedule_id: i64,
    /// Name of the stored schedule
    pub schedule_name: String,
    /// Number of entries in the stored schedule
    pub entry_count: u64,
}

/// Query parameters for the entry page endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntryPageQuery {
    /// 1-based page number (default: 1)
    #[serde(default)]
    pub page: Option<u32>,
    /// Rows per page (default: 100)
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Request body for splitting an entry into a parallel set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    /// Number of parallel conductors, at least 2
    pub count: i32,
}

/// Response for a split operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitResponse {
    /// The replacement siblings in cable-number order
    pub entries: Vec<CableEntry>,
}

/// Request body for batch reassignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignRequest {
    /// Entries to update
    pub entry_ids: Vec<EntryId>,
    /// Field values to set; omitted fields are left unchanged
    pub update: EntryUpdate,
}

/// Response for a batch reassignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignResponse {
    /// Number of entries actually updated
    pub updated: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Schedule list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    /// List of schedules
    pub schedules: Vec<ScheduleInfoDto>,
    /// Total count
    pub total: usize,
}

/// Schedule info DTO for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInfoDto {
    /// Schedule ID
    pub schedule_id: i64,
    /// Schedule name
    pub schedule_name: String,
    /// Number of entries
    pub entry_count: u64,
}

impl From<crate::api::ScheduleInfo> for ScheduleInfoDto {
    fn from(info: crate::api::ScheduleInfo) -> Self {
        Self {
            schedule_id: info.schedule_id.value(),
            schedule_name: info.schedule_name,
            entry_count: info.entry_count,
        }
    }
}
