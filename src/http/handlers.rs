//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! existing service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use super::dto::{
    CreateScheduleRequest, CreateScheduleResponse, EntryPageQuery, HealthResponse, ReassignRequest,
    ReassignResponse, ScheduleInfoDto, ScheduleListResponse, SplitRequest, SplitResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{EntryId, Schedule, ScheduleId};
use crate::db::services as db_services;
use crate::routes::schedule_page::SchedulePageData;
use crate::routes::shop_groups::ShopGroupsView;
use crate::routes::totals::ScheduleTotalsView;
use crate::services::paging::DEFAULT_PAGE_SIZE;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Schedule CRUD
// =============================================================================

/// GET /v1/schedules
///
/// List all schedules in the store.
pub async fn list_schedules(State(state): State<AppState>) -> HandlerResult<ScheduleListResponse> {
    let schedules = db_services::list_schedules(state.repository.as_ref()).await?;

    let schedule_dtos: Vec<ScheduleInfoDto> = schedules.into_iter().map(Into::into).collect();
    let total = schedule_dtos.len();

    Ok(Json(ScheduleListResponse {
        schedules: schedule_dtos,
        total,
    }))
}

/// POST /v1/schedules
///
/// Parse and store an exported schedule. Re-uploading identical content
/// returns the already-stored schedule instead of creating a duplicate.
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<(axum::http::StatusCode, Json<CreateScheduleResponse>), AppError> {
    // Convert the JSON value to a string for the parser
    let entries_json_str = serde_json::to_string(&request.entries_json)
        .map_err(|e| AppError::BadRequest(format!("Invalid schedule JSON: {}", e)))?;

    let schedule = crate::models::parse_entries_json_str(&entries_json_str, &request.name)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let info = db_services::store_schedule(state.repository.as_ref(), &schedule).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(CreateScheduleResponse {
            schedule_id: info.schedule_id.value(),
            schedule_name: info.schedule_name,
            entry_count: info.entry_count,
        }),
    ))
}

/// GET /v1/schedules/{schedule_id}
///
/// Get a complete schedule with all its entries.
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> HandlerResult<Schedule> {
    let schedule_id = ScheduleId::new(schedule_id);

    let schedule = db_services::get_schedule(state.repository.as_ref(), schedule_id).await?;
    Ok(Json(schedule))
}

// =============================================================================
// Grid Views
// =============================================================================

/// GET /v1/schedules/{schedule_id}/entries
///
/// Get one page of resolved entries with page-local totals.
pub async fn get_entry_page(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
    Query(query): Query<EntryPageQuery>,
) -> HandlerResult<SchedulePageData> {
    let schedule_id = ScheduleId::new(schedule_id);
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let data =
        db_services::fetch_entry_page(state.repository.as_ref(), &[schedule_id], page, page_size)
            .await?;

    Ok(Json(data))
}

/// GET /v1/schedules/{schedule_id}/totals
///
/// Get whole-schedule totals, independent of any page window.
pub async fn get_schedule_totals(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> HandlerResult<ScheduleTotalsView> {
    let schedule_id = ScheduleId::new(schedule_id);

    let data = db_services::fetch_schedule_totals(state.repository.as_ref(), &[schedule_id]).await?;
    Ok(Json(data))
}

/// GET /v1/schedules/{schedule_id}/shop-groups
///
/// Get entries grouped by destination shop.
pub async fn get_shop_groups(
    State(state): State<AppState>,
    Path(schedule_id): Path<i64>,
) -> HandlerResult<ShopGroupsView> {
    let schedule_id = ScheduleId::new(schedule_id);

    let data =
        db_services::fetch_shop_groups(state.repository.as_ref(), &[schedule_id], None).await?;
    Ok(Json(data))
}

// =============================================================================
// Entry Mutations
// =============================================================================

/// POST /v1/entries/{entry_id}/split
///
/// Split an entry into a parallel set of identical conductors.
pub async fn split_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    Json(request): Json<SplitRequest>,
) -> HandlerResult<SplitResponse> {
    let entry_id = EntryId::new(entry_id);

    let entries =
        db_services::split_entry(state.repository.as_ref(), entry_id, request.count).await?;
    Ok(Json(SplitResponse { entries }))
}

/// PATCH /v1/entries
///
/// Apply one field update to a batch of entries.
pub async fn reassign_entries(
    State(state): State<AppState>,
    Json(request): Json<ReassignRequest>,
) -> HandlerResult<ReassignResponse> {
    let updated = db_services::reassign_entries(
        state.repository.as_ref(),
        &request.entry_ids,
        &request.update,
    )
    .await?;

    Ok(Json(ReassignResponse { updated }))
}
