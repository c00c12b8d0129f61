//! Dashboard handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::{analytics::DashboardResponse, AnalyticsService};
use crate::AppState;

/// Get the sales analytics dashboard for the authenticated business
pub async fn get_dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let threshold = state.config.analytics.low_stock_threshold(user.role);
    let service = AnalyticsService::new(state.db.clone());
    let dashboard = service
        .dashboard(user.business_id, user.role, threshold)
        .await?;
    Ok(Json(dashboard))
}

/// Export the per-product sales breakdown as a CSV download
pub async fn export_products_csv(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    let threshold = state.config.analytics.low_stock_threshold(user.role);
    let service = AnalyticsService::new(state.db.clone());
    let csv = service
        .export_products_csv(user.business_id, user.role, threshold)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"products.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
