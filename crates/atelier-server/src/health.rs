use axum::response::IntoResponse;
use http::StatusCode;

/// Liveness probe; the relay holds no state that could be unhealthy
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
