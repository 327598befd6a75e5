//! Core schedule repository trait for CRUD operations.
//!
//! This trait defines the fundamental persistence operations for schedules
//! as named containers of cable entries.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Schedule, ScheduleId, ScheduleInfo};

/// Repository trait for core schedule operations.
///
/// This trait handles the basic lifecycle of schedules: storing an imported
/// schedule, fetching it back, and listing what exists. Entry-level reads
/// and mutations are in [`super::entries::EntryRepository`].
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the backing store is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if the store is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Schedule Operations ====================

    /// Store a new schedule and its entries.
    ///
    /// # Arguments
    /// * `schedule` - The schedule to store, including all entries
    ///
    /// # Returns
    /// * `Ok(ScheduleInfo)` - Metadata of the stored schedule including assigned ID
    /// * `Err(RepositoryError)` - If the operation fails
    async fn store_schedule(&self, schedule: &Schedule) -> RepositoryResult<ScheduleInfo>;

    /// Retrieve a complete schedule by ID.
    ///
    /// # Arguments
    /// * `schedule_id` - The ID of the schedule to retrieve
    ///
    /// # Returns
    /// * `Ok(Schedule)` - The schedule with all its entries
    /// * `Err(RepositoryError::NotFound)` - If the schedule doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn get_schedule(&self, schedule_id: ScheduleId) -> RepositoryResult<Schedule>;

    /// List all schedules with basic metadata.
    ///
    /// # Returns
    /// * `Ok(Vec<ScheduleInfo>)` - List of schedule metadata (id, name, entry count)
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_schedules(&self) -> RepositoryResult<Vec<ScheduleInfo>>;

    /// Look up a schedule by content checksum.
    ///
    /// Used for import deduplication: a re-upload of identical content
    /// resolves to the already stored schedule instead of a copy.
    ///
    /// # Arguments
    /// * `checksum` - The content checksum to look for
    ///
    /// # Returns
    /// * `Ok(Some(ScheduleInfo))` - An existing schedule with this checksum
    /// * `Ok(None)` - No schedule with this checksum is stored
    /// * `Err(RepositoryError)` - If the operation fails
    async fn find_schedule_by_checksum(
        &self,
        checksum: &str,
    ) -> RepositoryResult<Option<ScheduleInfo>>;
}
