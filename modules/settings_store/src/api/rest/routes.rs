//! Route registration with OpenAPI documentation

use super::{dto::*, error::Problem, handlers};
use crate::domain::SettingsStore;
use axum::{
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

/// OpenAPI document of the settings endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::replace,
        handlers::import,
        handlers::import_multiple,
        handlers::get_settings,
        handlers::restore_backup,
        handlers::create_backup,
        handlers::rpc,
    ),
    components(schemas(
        WriteSettingsRequest,
        GetSettingsRequest,
        SettingsMapDto,
        RpcRequest,
        RpcResponse,
        Problem,
    )),
    tags((name = "settings", description = "Settings store"))
)]
pub struct ApiDoc;

/// Register all REST routes
pub fn register_routes(router: Router, store: Arc<SettingsStore>) -> Router {
    router
        .route("/settings/replace", post(replace_handler))
        .route("/settings/import", post(import_handler))
        .route("/settings/import-multiple", post(import_multiple_handler))
        .route("/settings/get", post(get_settings_handler))
        .route("/settings/restore-backup", post(restore_backup_handler))
        .route("/settings/backup", get(create_backup_handler))
        .route("/settings/rpc", post(rpc_handler))
        .route("/settings/openapi.json", get(openapi_handler))
        // Add store as extension for handlers
        .layer(Extension(store))
}

// ===== Handler wrappers that extract the store from Extension =====

async fn replace_handler(
    Extension(store): Extension<Arc<SettingsStore>>,
    json: Json<Value>,
) -> Result<Response, Problem> {
    handlers::replace(store, json).await
}

async fn import_handler(
    Extension(store): Extension<Arc<SettingsStore>>,
    json: Json<Value>,
) -> Result<Response, Problem> {
    handlers::import(store, json).await
}

async fn import_multiple_handler(
    Extension(store): Extension<Arc<SettingsStore>>,
    json: Json<Value>,
) -> Result<Response, Problem> {
    handlers::import_multiple(store, json).await
}

async fn get_settings_handler(
    Extension(store): Extension<Arc<SettingsStore>>,
    json: Json<Value>,
) -> Result<Response, Problem> {
    handlers::get_settings(store, json).await
}

async fn restore_backup_handler(
    Extension(store): Extension<Arc<SettingsStore>>,
    json: Json<Value>,
) -> Result<Response, Problem> {
    handlers::restore_backup(store, json).await
}

async fn create_backup_handler(
    Extension(store): Extension<Arc<SettingsStore>>,
) -> Json<SettingsMapDto> {
    handlers::create_backup(store).await
}

async fn rpc_handler(
    Extension(store): Extension<Arc<SettingsStore>>,
    json: Json<RpcRequest>,
) -> Result<Json<RpcResponse>, Problem> {
    handlers::rpc(store, json).await
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
