//! Entry repository trait for paged reads, aggregates and mutations.
//!
//! Cable entries are fetched in windows rather than whole schedules at a
//! time; projects run to tens of thousands of rows and the grid only ever
//! renders one page. Whole-set reads exist solely for aggregation and the
//! grouped view.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{AggregateTotals, CableEntry, EntryId, EntryUpdate, ParallelGroupId, ScheduleId};

/// Offset/limit window for a paged entry fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// Rows to skip before the window starts.
    pub offset: u64,
    /// Maximum rows in the window.
    pub limit: u64,
}

impl FetchWindow {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }
}

/// Repository trait for cable entry reads and mutations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    // ==================== Paged Reads ====================

    /// Fetch one window of entries across the given schedules.
    ///
    /// Entries are ordered by `display_order` within each schedule, with
    /// schedules in the order given. The window applies to the combined
    /// ordered sequence.
    ///
    /// # Arguments
    /// * `schedule_ids` - Schedules to read from
    /// * `window` - Offset/limit window into the combined sequence
    ///
    /// # Returns
    /// * `Ok(Vec<CableEntry>)` - The entries in the window, possibly fewer than `limit`
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_entries(
        &self,
        schedule_ids: &[ScheduleId],
        window: FetchWindow,
    ) -> RepositoryResult<Vec<CableEntry>>;

    /// Count entries across the given schedules.
    ///
    /// # Arguments
    /// * `schedule_ids` - Schedules to count over
    ///
    /// # Returns
    /// * `Ok(u64)` - Total entry count, independent of any window
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_entry_count(&self, schedule_ids: &[ScheduleId]) -> RepositoryResult<u64>;

    // ==================== Whole-Set Reads ====================

    /// Fetch every entry of the given schedules, ignoring pagination.
    ///
    /// Used for whole-project totals and the shop-grouped view, both of
    /// which are deliberately independent of the current page window.
    ///
    /// # Arguments
    /// * `schedule_ids` - Schedules to read from
    ///
    /// # Returns
    /// * `Ok(Vec<CableEntry>)` - All entries in display order
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_all_entries_for_aggregate(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> RepositoryResult<Vec<CableEntry>>;

    /// Fetch pre-computed totals for the given schedules, if the store
    /// can provide them without shipping every row.
    ///
    /// # Arguments
    /// * `schedule_ids` - Schedules to aggregate over
    ///
    /// # Returns
    /// * `Ok(Some(AggregateTotals))` - Server-side totals
    /// * `Ok(None)` - No fast path; caller falls back to a full fetch
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_schedule_aggregate(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> RepositoryResult<Option<AggregateTotals>>;

    /// Fetch all members of a parallel group, ordered by cable number.
    ///
    /// # Arguments
    /// * `group_id` - The parallel group to read
    ///
    /// # Returns
    /// * `Ok(Vec<CableEntry>)` - The group members, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn fetch_entries_in_group(
        &self,
        group_id: ParallelGroupId,
    ) -> RepositoryResult<Vec<CableEntry>>;

    /// Get a single entry by ID.
    ///
    /// # Arguments
    /// * `entry_id` - The ID of the entry to retrieve
    ///
    /// # Returns
    /// * `Ok(CableEntry)` - The entry
    /// * `Err(RepositoryError::NotFound)` - If the entry doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn get_entry(&self, entry_id: EntryId) -> RepositoryResult<CableEntry>;

    // ==================== Mutations ====================

    /// Insert entries into a schedule.
    ///
    /// # Arguments
    /// * `schedule_id` - The schedule receiving the entries
    /// * `entries` - The entries to insert
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of entries inserted
    /// * `Err(RepositoryError)` - If the operation fails
    async fn insert_entries(
        &self,
        schedule_id: ScheduleId,
        entries: &[CableEntry],
    ) -> RepositoryResult<u64>;

    /// Replace a source entry (and any parallel siblings it already has)
    /// with a new set of entries, atomically.
    ///
    /// # Arguments
    /// * `source_id` - The entry being split
    /// * `replacements` - The sibling set taking its place
    ///
    /// # Returns
    /// * `Ok(())` - The set was replaced
    /// * `Err(RepositoryError::NotFound)` - If the source entry doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn persist_split(
        &self,
        source_id: EntryId,
        replacements: &[CableEntry],
    ) -> RepositoryResult<()>;

    /// Apply one field update to many entries.
    ///
    /// Entry IDs that no longer exist are skipped, not errors; the grid
    /// may hold a stale selection.
    ///
    /// # Arguments
    /// * `entry_ids` - The entries to update
    /// * `update` - Field values to set; `None` fields are left unchanged
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of entries actually updated
    /// * `Err(RepositoryError)` - If the operation fails
    async fn persist_reassignment(
        &self,
        entry_ids: &[EntryId],
        update: &EntryUpdate,
    ) -> RepositoryResult<u64>;
}
