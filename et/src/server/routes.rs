//! REST handlers
//!
//! Thin translation between HTTP and [`StateManager`] calls. Every rule lives
//! in the catalog; handlers only pick status codes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::{CategoryUpdate, ItemUpdate, NewCategory, NewItem, SettingsUpdate};
use crate::scheduler::ScheduleStatus;

use super::ApiState;
use super::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct CheckedBody {
    pub checked: bool,
}

// === Categories ===

pub async fn list_categories(State(api): State<ApiState>) -> ApiResult<impl IntoResponse> {
    debug!("list_categories: called");
    Ok(Json(api.state.list_categories().await?))
}

pub async fn create_category(
    State(api): State<ApiState>,
    payload: Result<Json<NewCategory>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    debug!(name = %input.name, "create_category: called");
    let category = api.state.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(api): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(update) = payload?;
    debug!(%id, "update_category: called");
    Ok(Json(api.state.update_category(&id, update).await?))
}

pub async fn delete_category(State(api): State<ApiState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    debug!(%id, "delete_category: called");
    api.state.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_all_categories(State(api): State<ApiState>) -> ApiResult<StatusCode> {
    debug!("delete_all_categories: called");
    api.state.delete_all_categories().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_category_checked(
    State(api): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<CheckedBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;
    debug!(%id, checked = body.checked, "set_category_checked: called");
    let updated = api.state.set_category_checked(&id, body.checked).await?;
    Ok(Json(json!({ "updated": updated })))
}

// === Items ===

pub async fn list_items(State(api): State<ApiState>) -> ApiResult<impl IntoResponse> {
    debug!("list_items: called");
    Ok(Json(api.state.list_items().await?))
}

pub async fn list_items_by_category(
    State(api): State<ApiState>,
    Path(category_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    debug!(%category_id, "list_items_by_category: called");
    Ok(Json(api.state.list_items_by_category(&category_id).await?))
}

pub async fn create_item(
    State(api): State<ApiState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    debug!(name = %input.name, "create_item: called");
    let item = api.state.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(api): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<ItemUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(update) = payload?;
    debug!(%id, "update_item: called");
    Ok(Json(api.state.update_item(&id, update).await?))
}

pub async fn delete_item(State(api): State<ApiState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    debug!(%id, "delete_item: called");
    api.state.delete_item(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_all_items(State(api): State<ApiState>) -> ApiResult<StatusCode> {
    debug!("delete_all_items: called");
    api.state.delete_all_items().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Manual "reset now"; leaves the notification time alone
pub async fn reset_items(State(api): State<ApiState>) -> ApiResult<StatusCode> {
    debug!("reset_items: called");
    let today = api.clock.now().date();
    let outcome = api.state.reset(today).await?;
    info!(cleared = outcome.cleared, "Manual reset");
    Ok(StatusCode::NO_CONTENT)
}

// === Settings ===

pub async fn get_settings(State(api): State<ApiState>) -> ApiResult<impl IntoResponse> {
    debug!("get_settings: called");
    Ok(Json(api.state.get_settings().await?))
}

pub async fn update_settings(
    State(api): State<ApiState>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(update) = payload?;
    debug!(?update, "update_settings: called");
    Ok(Json(api.state.update_settings(update).await?))
}

// === Schedule & notifications ===

pub async fn status(State(api): State<ApiState>) -> ApiResult<impl IntoResponse> {
    debug!("status: called");
    let settings = api.state.get_settings().await?;
    Ok(Json(ScheduleStatus::new(api.clock.now(), &settings)))
}

/// Send the reminder now, through the same gates as the scheduled one
pub async fn test_notification(State(api): State<ApiState>) -> ApiResult<impl IntoResponse> {
    debug!("test_notification: called");
    let settings = api.state.get_settings().await?;
    Ok(Json(api.reminder.send(settings.notifications).await))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
