//! Service health handler

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Liveness probe with a database reachability check. Answers 503 when the
/// pool cannot execute a query, 200 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    let (code, status, database) = if database_ok {
        (StatusCode::OK, "ok", "reachable")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
    };

    (
        code,
        Json(HealthResponse {
            status,
            service: "marketplace-portal-backend",
            version: env!("CARGO_PKG_VERSION"),
            database,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_payload_names_the_portal_service() {
        let body = serde_json::to_value(HealthResponse {
            status: "ok",
            service: "marketplace-portal-backend",
            version: env!("CARGO_PKG_VERSION"),
            database: "reachable",
        })
        .unwrap();

        assert_eq!(body["service"], "marketplace-portal-backend");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "reachable");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
