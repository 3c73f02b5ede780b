//! HTTP request handlers - thin layer that delegates to the dispatcher

use super::{dto::*, error::Problem};
use crate::api::dispatch::{dispatch, dispatch_request, SettingsOperation, SettingsResponse};
use crate::domain::SettingsStore;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

fn into_response(response: SettingsResponse) -> Response {
    match response {
        SettingsResponse::Document(document) => Json(document).into_response(),
        SettingsResponse::Completed => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn run(
    store: &SettingsStore,
    operation: SettingsOperation,
    payload: Value,
) -> Result<Response, Problem> {
    let response = dispatch(store, operation, payload).await?;
    Ok(into_response(response))
}

// ===== Settings Handlers =====

/// Overwrite a settings document
#[utoipa::path(
    post,
    path = "/settings/replace",
    tag = "settings",
    request_body = WriteSettingsRequest,
    responses(
        (status = 204, description = "Settings replaced"),
        (status = 400, description = "Invalid uri or payload", body = Problem)
    )
)]
pub async fn replace(
    store: Arc<SettingsStore>,
    Json(payload): Json<Value>,
) -> Result<Response, Problem> {
    run(&store, SettingsOperation::Replace, payload).await
}

/// Merge into a settings document, creating it if absent
#[utoipa::path(
    post,
    path = "/settings/import",
    tag = "settings",
    request_body = WriteSettingsRequest,
    responses(
        (status = 204, description = "Settings imported"),
        (status = 400, description = "Invalid uri or payload", body = Problem)
    )
)]
pub async fn import(
    store: Arc<SettingsStore>,
    Json(payload): Json<Value>,
) -> Result<Response, Problem> {
    run(&store, SettingsOperation::Import, payload).await
}

/// Merge several settings documents
#[utoipa::path(
    post,
    path = "/settings/import-multiple",
    tag = "settings",
    request_body = SettingsMapDto,
    responses(
        (status = 204, description = "Settings imported"),
        (status = 400, description = "Payload is not an object", body = Problem)
    )
)]
pub async fn import_multiple(
    store: Arc<SettingsStore>,
    Json(payload): Json<Value>,
) -> Result<Response, Problem> {
    run(&store, SettingsOperation::ImportMultiple, payload).await
}

/// Read a raw settings document
#[utoipa::path(
    post,
    path = "/settings/get",
    tag = "settings",
    request_body = GetSettingsRequest,
    responses(
        (status = 200, description = "Settings document, empty object if absent"),
        (status = 400, description = "Invalid uri or payload", body = Problem)
    )
)]
pub async fn get_settings(
    store: Arc<SettingsStore>,
    Json(payload): Json<Value>,
) -> Result<Response, Problem> {
    run(&store, SettingsOperation::GetSettings, payload).await
}

/// Overlay a backup snapshot
#[utoipa::path(
    post,
    path = "/settings/restore-backup",
    tag = "settings",
    request_body = SettingsMapDto,
    responses(
        (status = 204, description = "Snapshot restored"),
        (status = 400, description = "Payload is not an object", body = Problem)
    )
)]
pub async fn restore_backup(
    store: Arc<SettingsStore>,
    Json(payload): Json<Value>,
) -> Result<Response, Problem> {
    run(&store, SettingsOperation::RestoreBackup, payload).await
}

/// Current snapshot of all settings
#[utoipa::path(
    get,
    path = "/settings/backup",
    tag = "settings",
    responses(
        (status = 200, description = "Snapshot of the settings map", body = SettingsMapDto)
    )
)]
pub async fn create_backup(store: Arc<SettingsStore>) -> Json<SettingsMapDto> {
    Json(store.create_backup().await.into())
}

// ===== Envelope Handler =====

/// Run any operation through the generic envelope
#[utoipa::path(
    post,
    path = "/settings/rpc",
    tag = "settings",
    request_body = RpcRequest,
    responses(
        (status = 200, description = "Operation result", body = RpcResponse),
        (status = 400, description = "Invalid uri or payload", body = Problem),
        (status = 404, description = "Unknown operation", body = Problem)
    )
)]
pub async fn rpc(
    store: Arc<SettingsStore>,
    Json(req): Json<RpcRequest>,
) -> Result<Json<RpcResponse>, Problem> {
    let response = dispatch_request(&store, req.into()).await?;
    Ok(Json(response.into()))
}
