//! Hosted REST repository implementation.
//!
//! Talks to a PostgREST-style HTTP API in front of the hosted database.
//! Tables are exposed as `/schedules` and `/cable_entries`; multi-row
//! mutations go through `/rpc/` functions so they apply atomically on the
//! server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{
    AggregateTotals, CableEntry, EntryId, EntryUpdate, ParallelGroupId, Schedule, ScheduleId,
    ScheduleInfo,
};
use crate::db::repository::{
    EntryRepository, ErrorContext, FetchWindow, RepositoryError, RepositoryResult,
    ScheduleRepository,
};

const DEFAULT_TIMEOUT_SEC: u64 = 30;

/// Connection settings for the hosted repository.
#[derive(Debug, Clone)]
pub struct HostedConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub base_url: String,
    /// Bearer token sent with every request, if the API requires one.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_sec: u64,
}

impl HostedConfig {
    /// Create settings for a given base URL with default timeout and no key.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_sec: DEFAULT_TIMEOUT_SEC,
        }
    }

    /// Read connection settings from the environment.
    ///
    /// `CSM_HOSTED_URL` is required. `CSM_HOSTED_API_KEY` and
    /// `CSM_HOSTED_TIMEOUT_SEC` are optional.
    pub fn from_env() -> RepositoryResult<Self> {
        let base_url = std::env::var("CSM_HOSTED_URL").map_err(|_| {
            RepositoryError::configuration(
                "CSM_HOSTED_URL is not set; required for the hosted repository",
            )
        })?;
        let api_key = std::env::var("CSM_HOSTED_API_KEY").ok();
        let timeout_sec = std::env::var("CSM_HOSTED_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SEC);

        Ok(Self {
            base_url,
            api_key,
            timeout_sec,
        })
    }
}

/// Wire shape of a `/schedules` row.
#[derive(Debug, Deserialize)]
struct ScheduleRow {
    id: i64,
    name: String,
    #[serde(default)]
    checksum: String,
    #[serde(default)]
    entry_count: u64,
}

impl From<ScheduleRow> for ScheduleInfo {
    fn from(row: ScheduleRow) -> Self {
        ScheduleInfo {
            schedule_id: ScheduleId::new(row.id),
            schedule_name: row.name,
            entry_count: row.entry_count,
        }
    }
}

/// REST-backed repository for the hosted database.
pub struct HostedRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HostedRepository {
    /// Create a repository from connection settings.
    ///
    /// Fails only if the HTTP client cannot be constructed; reachability
    /// of the remote shows up in `health_check`, not here.
    pub fn new(config: &HostedConfig) -> RepositoryResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(ref key) = config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|e| {
                RepositoryError::configuration(format!("Invalid API key header: {}", e))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                RepositoryError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Comma list for a PostgREST `in.(...)` filter, ascending and deduped.
    ///
    /// The combined sequence therefore orders schedules by ID; callers pass
    /// ascending IDs so this matches the declared fetch order.
    fn id_list(schedule_ids: &[ScheduleId]) -> String {
        let mut ids: Vec<i64> = schedule_ids.iter().map(|id| id.value()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    async fn expect_success(
        response: reqwest::Response,
        operation: &str,
    ) -> RepositoryResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<empty response>".to_string());
        let message = format!("{} failed ({}): {}", operation, status, body.trim());
        let context = ErrorContext::new(operation);

        if status == StatusCode::NOT_FOUND {
            Err(RepositoryError::not_found_with_context(message, context))
        } else {
            Err(RepositoryError::query_with_context(message, context))
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: &str,
    ) -> RepositoryResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = Self::expect_success(response, operation).await?;
        Ok(response.json().await?)
    }

    /// Call a server-side function under `/rpc/`.
    async fn rpc<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        function: &str,
        body: &B,
    ) -> RepositoryResult<T> {
        let path = format!("/rpc/{}", function);
        let response = self.client.post(self.url(&path)).json(body).send().await?;
        let response = Self::expect_success(response, function).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ScheduleRepository for HostedRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        // Unreachable means unhealthy, not an error
        match self.client.get(self.url("/")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(err) if err.is_connect() || err.is_timeout() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn store_schedule(&self, schedule: &Schedule) -> RepositoryResult<ScheduleInfo> {
        let body = json!({
            "name": schedule.name,
            "checksum": schedule.checksum,
            "entries": schedule.entries,
        });
        let row: ScheduleRow = self.rpc("store_schedule", &body).await?;
        Ok(row.into())
    }

    async fn get_schedule(&self, schedule_id: ScheduleId) -> RepositoryResult<Schedule> {
        let path = format!("/schedules?id=eq.{}", schedule_id.value());
        let rows: Vec<ScheduleRow> = self.get_json(&path, "get_schedule").await?;
        let row = rows.into_iter().next().ok_or_else(|| {
            RepositoryError::not_found(format!("Schedule {} not found", schedule_id))
        })?;

        let path = format!(
            "/cable_entries?schedule_id=eq.{}&order=display_order.asc,cable_number.asc",
            schedule_id.value()
        );
        let entries: Vec<CableEntry> = self.get_json(&path, "get_schedule_entries").await?;

        Ok(Schedule {
            id: Some(row.id),
            name: row.name,
            checksum: row.checksum,
            entries,
        })
    }

    async fn list_schedules(&self) -> RepositoryResult<Vec<ScheduleInfo>> {
        let rows: Vec<ScheduleRow> = self
            .get_json("/schedules?order=id.asc", "list_schedules")
            .await?;
        Ok(rows.into_iter().map(ScheduleInfo::from).collect())
    }

    async fn find_schedule_by_checksum(
        &self,
        checksum: &str,
    ) -> RepositoryResult<Option<ScheduleInfo>> {
        if checksum.is_empty() {
            return Ok(None);
        }

        let path = format!("/schedules?checksum=eq.{}&limit=1", checksum);
        let rows: Vec<ScheduleRow> = self.get_json(&path, "find_schedule_by_checksum").await?;
        Ok(rows.into_iter().next().map(ScheduleInfo::from))
    }
}

#[async_trait]
impl EntryRepository for HostedRepository {
    async fn fetch_entries(
        &self,
        schedule_ids: &[ScheduleId],
        window: FetchWindow,
    ) -> RepositoryResult<Vec<CableEntry>> {
        if schedule_ids.is_empty() {
            return Ok(Vec::new());
        }

        let path = format!(
            "/cable_entries?schedule_id=in.({})&order=schedule_id.asc,display_order.asc,cable_number.asc&offset={}&limit={}",
            Self::id_list(schedule_ids),
            window.offset,
            window.limit
        );
        self.get_json(&path, "fetch_entries").await
    }

    async fn fetch_entry_count(&self, schedule_ids: &[ScheduleId]) -> RepositoryResult<u64> {
        if schedule_ids.is_empty() {
            return Ok(0);
        }

        let body = json!({ "schedule_ids": schedule_ids });
        self.rpc("entry_count", &body).await
    }

    async fn fetch_all_entries_for_aggregate(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> RepositoryResult<Vec<CableEntry>> {
        if schedule_ids.is_empty() {
            return Ok(Vec::new());
        }

        let path = format!(
            "/cable_entries?schedule_id=in.({})&order=schedule_id.asc,display_order.asc,cable_number.asc",
            Self::id_list(schedule_ids)
        );
        self.get_json(&path, "fetch_all_entries_for_aggregate").await
    }

    async fn fetch_schedule_aggregate(
        &self,
        schedule_ids: &[ScheduleId],
    ) -> RepositoryResult<Option<AggregateTotals>> {
        if schedule_ids.is_empty() {
            return Ok(Some(AggregateTotals::default()));
        }

        let body = json!({ "schedule_ids": schedule_ids });
        let totals: AggregateTotals = self.rpc("schedule_totals", &body).await?;
        Ok(Some(totals))
    }

    async fn fetch_entries_in_group(
        &self,
        group_id: ParallelGroupId,
    ) -> RepositoryResult<Vec<CableEntry>> {
        let path = format!(
            "/cable_entries?parallel_group_id=eq.{}&order=cable_number.asc",
            group_id
        );
        self.get_json(&path, "fetch_entries_in_group").await
    }

    async fn get_entry(&self, entry_id: EntryId) -> RepositoryResult<CableEntry> {
        let path = format!("/cable_entries?id=eq.{}", entry_id);
        let entries: Vec<CableEntry> = self.get_json(&path, "get_entry").await?;
        entries
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::not_found(format!("Entry {} not found", entry_id)))
    }

    async fn insert_entries(
        &self,
        schedule_id: ScheduleId,
        entries: &[CableEntry],
    ) -> RepositoryResult<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        let rows: Vec<CableEntry> = entries
            .iter()
            .map(|entry| {
                let mut entry = entry.clone();
                entry.schedule_id = schedule_id;
                entry
            })
            .collect();

        let response = self
            .client
            .post(self.url("/cable_entries"))
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await?;
        Self::expect_success(response, "insert_entries").await?;
        Ok(rows.len() as u64)
    }

    async fn persist_split(
        &self,
        source_id: EntryId,
        replacements: &[CableEntry],
    ) -> RepositoryResult<()> {
        let body = json!({
            "source_id": source_id,
            "replacements": replacements,
        });
        // The function returns no body, so skip JSON decoding here. A failed
        // replace is a broken transaction, not a plain bad query.
        let response = self
            .client
            .post(self.url("/rpc/replace_parallel_set"))
            .json(&body)
            .send()
            .await?;
        match Self::expect_success(response, "replace_parallel_set").await {
            Ok(_) => Ok(()),
            Err(RepositoryError::QueryError { message, context }) => {
                Err(RepositoryError::TransactionError { message, context })
            }
            Err(other) => Err(other),
        }
    }

    async fn persist_reassignment(
        &self,
        entry_ids: &[EntryId],
        update: &EntryUpdate,
    ) -> RepositoryResult<u64> {
        if entry_ids.is_empty() {
            return Ok(0);
        }

        let body = json!({
            "entry_ids": entry_ids,
            "update": update,
        });
        self.rpc("reassign_entries", &body).await
    }
}
