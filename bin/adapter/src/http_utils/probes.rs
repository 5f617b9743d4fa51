use axum::response::IntoResponse;
use http::StatusCode;

pub async fn health_check_handler() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn not_found_handler() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}
