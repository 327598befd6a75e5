//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in memory
//! using HashMap structures, providing fast, deterministic, and isolated execution.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::{
    AggregateTotals, CableEntry, EntryId, EntryUpdate, ParallelGroupId, Schedule, ScheduleId,
    ScheduleInfo,
};
use crate::db::repository::{
    EntryRepository, FetchWindow, RepositoryError, RepositoryResult, ScheduleRepository,
};

/// In-memory local repository.
///
/// This implementation stores all data in memory using HashMaps, making it
/// ideal for unit tests and local development that need isolation and speed.
///
/// # Example
/// ```
/// use csm_rust::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.schedule_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

/// Schedule metadata kept separately from its entries.
struct ScheduleRecord {
    name: String,
    checksum: String,
}

struct LocalData {
    schedules: HashMap<ScheduleId, ScheduleRecord>,
    entries: HashMap<EntryId, CableEntry>,

    // ID counter
    next_schedule_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            schedules: HashMap::new(),
            entries: HashMap::new(),
            next_schedule_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Add a schedule to the repository.
    ///
    /// This is a helper method for setting up data. The schedule is assigned
    /// an ID automatically and its entries are stamped with it.
    ///
    /// # Arguments
    /// * `schedule` - Schedule to add (id will be overwritten)
    ///
    /// # Returns
    /// The ID assigned to the schedule
    pub fn store_schedule_impl(&self, schedule: Schedule) -> ScheduleId {
        let mut data = self.data.write().unwrap();
        let schedule_id = ScheduleId::new(data.next_schedule_id);
        data.next_schedule_id += 1;

        data.schedules.insert(
            schedule_id,
            ScheduleRecord {
                name: schedule.name.clone(),
                checksum: schedule.checksum.clone(),
            },
        );

        let now = Utc::now();
        for entry in schedule.entries {
            let mut entry = entry;
            entry.schedule_id = schedule_id;
            entry.created_at = Some(now);
            entry.updated_at = Some(now);
            data.entries.insert(entry.id, entry);
        }

        schedule_id
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of schedules stored.
    pub fn schedule_count(&self) -> usize {
        self.data.read().unwrap().schedules.len()
    }

    /// Check if a schedule exists.
    pub fn has_schedule(&self, schedule_id: ScheduleId) -> bool {
        self.data
            .read()
            .unwrap()
            .schedules
            .contains_key(&schedule_id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read().unwrap();
        if !data.is_healthy {
            return Err(RepositoryError::connection("Repository is not healthy"));
        }
        Ok(())
    }

    /// Entries of the given schedules in display order.
    ///
    /// Schedules come out in the order requested; within a schedule, rows
    /// sort by display order, then cable number, then ID as the final
    /// deterministic tie-break.
    fn ordered_entries(&self, schedule_ids: &[ScheduleId]) -> Vec<CableEntry> {
        let data = self.data.read().unwrap();
        let mut entries: Vec<CableEntry> = data
            .entries
            .values()
            .filter(|e| schedule_ids.contains(&e.schedule_id))
            .cloned()
            .collect();
        entries.sort_by_key(|e| {
            let position = schedule_ids
                .iter()
                .position(|&id| id == e.schedule_id)
                .unwrap_or(usize::MAX);
            (position, e.display_order, e.cable_number, e.id)
        });
        entries
    }

    fn entry_count(&self, schedule_ids: &[ScheduleId]) -> u64 {
        let data = self.data.read().unwrap();
        data.entries
            .values()
            .filter(|e| schedule_ids.contains(&e.schedule_id))
            .count() as u64
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data.is_healthy)
    }

    async fn store_schedule(&self, schedule: &Schedule) -> RepositoryResult<ScheduleInfo> {
        self.check_health()?;

        let schedule_id = self.store_schedule_impl(schedule.clone());

        Ok(ScheduleInfo {
            schedule_id,
            schedule_name: schedule.name.clone(),
            entry_count: schedule.entries.len() as u64,
        })
    }

    async fn get_schedule(&self, schedule_id: ScheduleId) -> RepositoryResult<Schedule> {
        let entries = self.ordered_entries(&[schedule_id]);

        let data = self.data.read().unwrap();
        let record = data.schedules.get(&schedule_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Schedule {} not found", schedule_id))
        })?;

        Ok(Schedule {
            id: Some(schedule_id.value()),
            name: record.name.clone(),
            checksum: record.checksum.clone(),
            entries,
        })
    }

    async fn list_schedules(&self) -> RepositoryResult<Vec<ScheduleInfo>> {
        let data = self.data.read().unwrap();

        let mut counts: HashMap<ScheduleId, u64> = HashMap::new();
        for entry in data.entries.values() {
            *counts.entry(entry.schedule_id).or_default() += 1;
        }

        let mut schedules: Vec<ScheduleInfo> = data
            .schedules
            .iter()
            .map(|(&schedule_id, record)| ScheduleInfo {
                schedule_id,
                schedule_name: record.name.clone(),
                entry_count: counts.get(&schedule_id).copied().unwrap_or(0),
            })
            .collect();

        schedules.sort_by_key(|s| s.schedule_id);
        Ok(schedules)
    }

    async fn find_schedule_by_checksum(
        &self,
        checksum: &str,
    ) -> RepositoryResult<Option<ScheduleInfo>> {
        if checksum.is_empty() {
            return Ok(None);
        }

        let data = self.data.read().unwrap();
        let found = data
            .schedules
            .iter()
            .filter(|(_, record)| record.checksum == checksum)
            .min_by_key(|(&schedule_id, _)| schedule_id);

        let Some((&schedule_id, record)) = found else {
            return Ok(None);
        };

        let entry_count = data
            .entries
            .values()
            .filter(|e| e.schedule_id == schedule_id)
            .count() as u64;

        Ok(Some(ScheduleInfo {
            schedule_id,
            schedule_name: record.name.clone(),
            entry_count,
        }))
    }
}

#[async_trait]
impl EntryRepository for LocalRepository {
    async fn fetch_entries(
        &self,
        schedule_ids: &[ScheduleId],
        window: FetchWindow,
    ) -> RepositoryResult<Vec<CableEntry>> {
        let entries = self.ordered_entries(schedule_ids);
        Ok(entries
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect())
    }

    async fn fetch_entry_count(&self, schedule_ids: &[ScheduleId]) -> RepositoryResult<u64> {
        Ok(self.entry_count(schedule_ids))
    }

    async fn fetch_all_entries_for_aggregate(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> RepositoryResult<Vec<CableEntry>> {
        Ok(self.ordered_entries(schedule_ids))
    }

    async fn fetch_schedule_aggregate(
        &self,
        _schedule_ids: &[ScheduleId],
    ) -> RepositoryResult<Option<AggregateTotals>> {
        // No server-side fast path in memory; callers aggregate the rows
        Ok(None)
    }

    async fn fetch_entries_in_group(
        &self,
        group_id: ParallelGroupId,
    ) -> RepositoryResult<Vec<CableEntry>> {
        let data = self.data.read().unwrap();
        let mut members: Vec<CableEntry> = data
            .entries
            .values()
            .filter(|e| e.parallel_group_id == Some(group_id))
            .cloned()
            .collect();
        members.sort_by_key(|e| (e.cable_number, e.id));
        Ok(members)
    }

    async fn get_entry(&self, entry_id: EntryId) -> RepositoryResult<CableEntry> {
        let data = self.data.read().unwrap();
        data.entries
            .get(&entry_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Entry {} not found", entry_id)))
    }

    async fn insert_entries(
        &self,
        schedule_id: ScheduleId,
        entries: &[CableEntry],
    ) -> RepositoryResult<u64> {
        let mut data = self.data.write().unwrap();
        if !data.schedules.contains_key(&schedule_id) {
            return Err(RepositoryError::not_found(format!(
                "Schedule {} not found",
                schedule_id
            )));
        }

        let now = Utc::now();
        for entry in entries {
            let mut entry = entry.clone();
            entry.schedule_id = schedule_id;
            entry.created_at = Some(now);
            entry.updated_at = Some(now);
            data.entries.insert(entry.id, entry);
        }

        Ok(entries.len() as u64)
    }

    async fn persist_split(
        &self,
        source_id: EntryId,
        replacements: &[CableEntry],
    ) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();

        let source = data.entries.get(&source_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Entry {} not found", source_id))
        })?;
        let source_group = source.parallel_group_id;

        // The source and any siblings it already has leave together
        data.entries.remove(&source_id);
        if let Some(group_id) = source_group {
            data.entries
                .retain(|_, e| e.parallel_group_id != Some(group_id));
        }

        let now = Utc::now();
        for replacement in replacements {
            let mut entry = replacement.clone();
            entry.created_at = Some(now);
            entry.updated_at = Some(now);
            data.entries.insert(entry.id, entry);
        }

        Ok(())
    }

    async fn persist_reassignment(
        &self,
        entry_ids: &[EntryId],
        update: &EntryUpdate,
    ) -> RepositoryResult<u64> {
        let mut data = self.data.write().unwrap();
        let now = Utc::now();
        let mut updated = 0u64;

        for entry_id in entry_ids {
            // Stale selections may reference deleted rows; skip them
            let Some(entry) = data.entries.get_mut(entry_id) else {
                continue;
            };

            if let Some(ref value) = update.from_location {
                entry.from_location = value.clone();
            }
            if let Some(ref value) = update.to_location {
                entry.to_location = value.clone();
            }
            if let Some(ref value) = update.voltage {
                entry.voltage = value.clone();
            }
            if let Some(ref value) = update.cable_type {
                entry.cable_type = value.clone();
            }
            if let Some(ref value) = update.cable_size {
                entry.cable_size = value.clone();
            }
            if let Some(ref value) = update.installation_method {
                entry.installation_method = value.clone();
            }
            if let Some(value) = update.load_amps {
                entry.load_amps = Some(value);
            }
            if let Some(value) = update.quantity {
                entry.quantity = value;
            }
            if let Some(value) = update.measured_length {
                entry.measured_length = Some(value);
            }
            if let Some(value) = update.extra_length {
                entry.extra_length = Some(value);
            }
            if let Some(value) = update.total_length {
                entry.total_length = Some(value);
            }
            if let Some(value) = update.supply_cost {
                entry.supply_cost = Some(value);
            }
            if let Some(value) = update.install_cost {
                entry.install_cost = Some(value);
            }
            if let Some(value) = update.total_cost {
                entry.total_cost = Some(value);
            }
            if let Some(ref value) = update.notes {
                entry.notes = value.clone();
            }
            entry.updated_at = Some(now);
            updated += 1;
        }

        Ok(updated)
    }
}
