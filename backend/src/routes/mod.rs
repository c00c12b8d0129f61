//! Route definitions for the Marketplace Business Portal

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - business profile and payout configuration
        .nest("/profile", profile_routes())
        // Protected routes - catalog management
        .nest("/catalog", catalog_routes())
        // Protected routes - analytics dashboard
        .nest("/dashboard", dashboard_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/verify-email", post(handlers::verify_email))
        .route("/password-reset", post(handlers::request_password_reset))
        .route(
            "/password-reset/confirm",
            post(handlers::confirm_password_reset),
        )
}

/// Profile routes (protected)
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route(
            "/payout",
            get(handlers::get_payout_config).put(handlers::update_payout_config),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Catalog routes (protected)
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            "/:entry_id",
            get(handlers::get_entry).put(handlers::update_entry),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/products.csv", get(handlers::export_products_csv))
        .route_layer(middleware::from_fn(auth_middleware))
}
