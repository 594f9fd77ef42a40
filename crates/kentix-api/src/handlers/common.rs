//! Common API handler utilities.

use axum::response::Json;

use crate::models::{ApiResponse, ErrorResponse};

/// Unified Result type for all API handlers.
///
/// The success value is wrapped in [`ApiResponse`].
pub type HandlerResult<T> = Result<Json<ApiResponse<T>>, ErrorResponse>;

/// Result type for helpers that return parsed values rather than responses.
pub type ExtractResult<T> = Result<T, ErrorResponse>;

/// Parse a path parameter or return a 400 error.
pub fn extract_path<T>(value: &str) -> ExtractResult<T>
where
    T: std::str::FromStr,
{
    value
        .parse::<T>()
        .map_err(|_| ErrorResponse::bad_request(format!("Invalid path parameter: {}", value)))
}

/// Create a successful response with data.
pub fn ok<T: serde::Serialize>(data: T) -> HandlerResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
