//! Catalog handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::CatalogService;
use crate::AppState;
use shared::models::{CatalogEntry, CreateCatalogEntryInput, UpdateCatalogEntryInput};
use shared::types::{PaginatedResponse, Pagination};

/// List the authenticated business's catalog entries
pub async fn list_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<CatalogEntry>>, AppError> {
    let service = CatalogService::new(state.db.clone());
    let page = service
        .list_entries_paged(user.business_id, &pagination)
        .await?;
    Ok(Json(page))
}

/// Get a single catalog entry
pub async fn get_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(entry_id): Path<Uuid>,
) -> Result<Json<CatalogEntry>, AppError> {
    let service = CatalogService::new(state.db.clone());
    let entry = service.get_entry(user.business_id, entry_id).await?;
    Ok(Json(entry))
}

/// Create a catalog entry
pub async fn create_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateCatalogEntryInput>,
) -> Result<(StatusCode, Json<CatalogEntry>), AppError> {
    let service = CatalogService::new(state.db.clone());
    let entry = service
        .create_entry(user.business_id, user.role, body)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Update a catalog entry
pub async fn update_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<UpdateCatalogEntryInput>,
) -> Result<Json<CatalogEntry>, AppError> {
    let service = CatalogService::new(state.db.clone());
    let entry = service
        .update_entry(user.business_id, user.role, entry_id, body)
        .await?;
    Ok(Json(entry))
}
