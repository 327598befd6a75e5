//! Schedule views assembled from the initialized repository.
//!
//! Thin async wrappers over the repository service layer for callers that
//! do not hold a repository handle themselves. Each resolves the process
//! repository and delegates; the engines stay pure and repository-free.

use std::collections::HashMap;

use crate::api::ScheduleId;
use crate::db::get_repository;
use crate::routes::schedule_page::SchedulePageData;
use crate::routes::shop_groups::ShopGroupsView;
use crate::routes::totals::ScheduleTotalsView;

/// Get one page of entries with page-local totals.
pub async fn get_schedule_page(
    schedule_ids: &[ScheduleId],
    page: u32,
    page_size: u32,
) -> Result<SchedulePageData, String> {
    let repo = get_repository().map_err(|e| format!("Failed to get repository: {}", e))?;
    crate::db::fetch_entry_page(repo.as_ref(), schedule_ids, page, page_size)
        .await
        .map_err(|e| format!("Failed to fetch entry page: {}", e))
}

/// Get whole-schedule totals, independent of any page window.
pub async fn get_schedule_totals(
    schedule_ids: &[ScheduleId],
) -> Result<ScheduleTotalsView, String> {
    let repo = get_repository().map_err(|e| format!("Failed to get repository: {}", e))?;
    crate::db::fetch_schedule_totals(repo.as_ref(), schedule_ids)
        .await
        .map_err(|e| format!("Failed to fetch schedule totals: {}", e))
}

/// Get the shop-grouped view of the given schedules.
pub async fn get_shop_groups(
    schedule_ids: &[ScheduleId],
    tenant_names: Option<&HashMap<String, String>>,
) -> Result<ShopGroupsView, String> {
    let repo = get_repository().map_err(|e| format!("Failed to get repository: {}", e))?;
    crate::db::fetch_shop_groups(repo.as_ref(), schedule_ids, tenant_names)
        .await
        .map_err(|e| format!("Failed to fetch shop groups: {}", e))
}
