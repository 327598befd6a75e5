//! High-level repository service layer.
//!
//! This module provides repository-agnostic operations that work with any
//! implementation of the repository traits. These functions contain the
//! business logic that must stay consistent regardless of the storage
//! backend: import deduplication, parallel set resolution, paging math and
//! aggregate assembly.
//!
//! # Architecture
//!
//! The database module follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, embedding callers)        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Checksum deduplication on import                     │
//! │  - Parallel set resolution on every read                │
//! │  - Page window computation and totals assembly          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! │  - ScheduleRepository (schedule lifecycle)              │
//! │  - EntryRepository (paged reads, aggregates, mutations) │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ Hosted Repository│     │ Local Repository        │
//! │ (REST client)    │     │ (in-memory)             │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use csm_rust::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create local repository
//!     let repo = LocalRepository::new();
//!
//!     // Use service layer functions
//!     let schedules = services::list_schedules(&repo).await?;
//!     println!("Found {} schedules", schedules.len());
//!
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;

use log::{debug, info};

use super::repository::{FetchWindow, FullRepository, RepositoryResult};
use crate::api::{CableEntry, EntryId, EntryUpdate, Schedule, ScheduleId, ScheduleInfo};
use crate::routes::schedule_page::SchedulePageData;
use crate::routes::shop_groups::ShopGroupsView;
use crate::routes::totals::ScheduleTotalsView;
use crate::services::{aggregate, compute_window, group_by_shop, resolve_parallel_groups};

// ==================== Health & Connection ====================

/// Check if the backing store is healthy.
///
/// This is a simple pass-through to the repository's health check.
///
/// # Arguments
/// * `repo` - Repository implementation
///
/// # Returns
/// * `Ok(true)` if the store is healthy
/// * `Err` if check fails
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Schedule Operations ====================

/// Store a new schedule with import deduplication.
///
/// If a schedule with the same content checksum is already stored, its
/// metadata is returned instead of creating a duplicate.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `schedule` - The schedule to store
///
/// # Returns
/// * `Ok(ScheduleInfo)` - Metadata of the stored schedule (new or existing)
/// * `Err` if storage fails
pub async fn store_schedule<R: FullRepository + ?Sized>(
    repo: &R,
    schedule: &Schedule,
) -> RepositoryResult<ScheduleInfo> {
    info!(
        "Service layer: storing schedule '{}' (checksum {}, {} entries)",
        schedule.name,
        schedule.checksum,
        schedule.entries.len(),
    );

    if let Some(existing) = repo.find_schedule_by_checksum(&schedule.checksum).await? {
        info!(
            "Service layer: checksum already stored as schedule_id={}, returning existing",
            existing.schedule_id
        );
        return Ok(existing);
    }

    repo.store_schedule(schedule).await
}

/// Retrieve a complete schedule by ID.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `schedule_id` - The ID of the schedule to retrieve
///
/// # Returns
/// * `Ok(Schedule)` - The schedule with all its entries
/// * `Err` if schedule not found or retrieval fails
pub async fn get_schedule<R: FullRepository + ?Sized>(
    repo: &R,
    schedule_id: ScheduleId,
) -> RepositoryResult<Schedule> {
    info!("Service layer: fetching schedule {}", schedule_id);
    repo.get_schedule(schedule_id).await
}

/// List all schedules with basic metadata.
///
/// # Arguments
/// * `repo` - Repository implementation
///
/// # Returns
/// * `Ok(Vec<ScheduleInfo>)` - Schedule metadata ordered by ID
/// * `Err` if listing fails
pub async fn list_schedules<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<ScheduleInfo>> {
    info!("Service layer: listing all schedules");
    repo.list_schedules().await
}

// ==================== Entry Page & Aggregates ====================

/// Fetch one page of entries with page-local totals.
///
/// The window is clamped against the live entry count, so a stale page
/// number (rows deleted, page size changed) degrades to the nearest valid
/// page instead of failing. Fetched rows pass through parallel set
/// resolution before they are returned; the page totals cover exactly the
/// rows of this page.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `schedule_ids` - Schedules backing the view
/// * `page` - 1-based page number
/// * `page_size` - Rows per page, must be non-zero
///
/// # Returns
/// * `Ok(SchedulePageData)` - Resolved entries, the clamped window, page totals
/// * `Err` if the page size is zero or a fetch fails
pub async fn fetch_entry_page<R: FullRepository + ?Sized>(
    repo: &R,
    schedule_ids: &[ScheduleId],
    page: u32,
    page_size: u32,
) -> RepositoryResult<SchedulePageData> {
    let total_count = repo.fetch_entry_count(schedule_ids).await?;
    let window = compute_window(page, page_size, total_count)?;

    debug!(
        "Service layer: fetching page {}/{} ({} rows at offset {})",
        window.page,
        window.total_pages,
        window.limit(),
        window.offset()
    );

    let fetched = repo
        .fetch_entries(schedule_ids, FetchWindow::new(window.offset(), window.limit()))
        .await?;
    let entries = resolve_parallel_groups(fetched);
    let page_totals = aggregate(&entries);

    Ok(SchedulePageData {
        entries,
        window,
        page_totals,
    })
}

/// Fetch whole-schedule totals, independent of any page window.
///
/// Prefers a server-side aggregate when the repository offers one and
/// falls back to fetching every row and folding locally.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `schedule_ids` - Schedules to aggregate over
///
/// # Returns
/// * `Ok(ScheduleTotalsView)` - Totals and the overall entry count
/// * `Err` if a fetch fails
pub async fn fetch_schedule_totals<R: FullRepository + ?Sized>(
    repo: &R,
    schedule_ids: &[ScheduleId],
) -> RepositoryResult<ScheduleTotalsView> {
    let entry_count = repo.fetch_entry_count(schedule_ids).await?;

    let totals = match repo.fetch_schedule_aggregate(schedule_ids).await? {
        Some(totals) => totals,
        None => {
            debug!("Service layer: no aggregate fast path, folding all rows");
            let entries = repo.fetch_all_entries_for_aggregate(schedule_ids).await?;
            aggregate(&entries)
        }
    };

    Ok(ScheduleTotalsView {
        totals,
        entry_count,
    })
}

/// Fetch the shop-grouped view of the given schedules.
///
/// All entries are fetched, resolved, and partitioned by destination shop.
/// `grouped` is false when no entry carried a recognizable shop code, in
/// which case the caller renders a flat table instead.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `schedule_ids` - Schedules backing the view
/// * `tenant_names` - Optional lookup from shop key to tenant name
///
/// # Returns
/// * `Ok(ShopGroupsView)` - Groups in first-appearance order
/// * `Err` if a fetch fails
pub async fn fetch_shop_groups<R: FullRepository + ?Sized>(
    repo: &R,
    schedule_ids: &[ScheduleId],
    tenant_names: Option<&HashMap<String, String>>,
) -> RepositoryResult<ShopGroupsView> {
    let fetched = repo.fetch_all_entries_for_aggregate(schedule_ids).await?;
    let resolved = resolve_parallel_groups(fetched);
    let groups = group_by_shop(&resolved, tenant_names);
    let grouped = groups.iter().any(|g| !g.shop_number.is_empty());

    Ok(ShopGroupsView { grouped, groups })
}

// ==================== Entry Mutations ====================

/// Split an entry into a parallel set and persist the replacement.
///
/// The stored source entry is fetched, split into `count` siblings, and
/// replaced atomically. Returns the new siblings in cable-number order.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `entry_id` - The entry being split
/// * `count` - Number of parallel conductors, at least 2
///
/// # Returns
/// * `Ok(Vec<CableEntry>)` - The replacement sibling set
/// * `Err` if the entry is missing, the count invalid, or persistence fails
pub async fn split_entry<R: FullRepository + ?Sized>(
    repo: &R,
    entry_id: EntryId,
    count: i32,
) -> RepositoryResult<Vec<CableEntry>> {
    info!(
        "Service layer: splitting entry {} into {} conductors",
        entry_id, count
    );

    let source = repo.get_entry(entry_id).await?;
    let siblings = crate::services::split_entry(&source, count)?;
    repo.persist_split(entry_id, &siblings).await?;

    Ok(siblings)
}

/// Apply one field update to a batch of entries.
///
/// An empty update is a no-op and reports zero rows touched.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `entry_ids` - The entries to update
/// * `update` - Field values to set
///
/// # Returns
/// * `Ok(u64)` - Number of entries actually updated
/// * `Err` if persistence fails
pub async fn reassign_entries<R: FullRepository + ?Sized>(
    repo: &R,
    entry_ids: &[EntryId],
    update: &EntryUpdate,
) -> RepositoryResult<u64> {
    if update.is_empty() {
        debug!("Service layer: reassignment with no fields set, skipping");
        return Ok(0);
    }

    info!(
        "Service layer: reassigning {} entries",
        entry_ids.len()
    );
    repo.persist_reassignment(entry_ids, update).await
}
