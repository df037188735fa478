//! Health check endpoint

use axum::{Json, extract::State, http::StatusCode};

use crate::state::AppState;

pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let db_up = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    let status = if db_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "status": if db_up { "ok" } else { "degraded" },
            "service": "bookhub-server",
            "version": env!("CARGO_PKG_VERSION"),
            "database": if db_up { "up" } else { "down" },
        })),
    )
}
