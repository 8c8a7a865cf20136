//! Error response envelope.
//!
//! Every error leaves the service as `{"error": <code>, "message": <first
//! violated precondition>}` with the status the taxonomy assigns; internal
//! detail stays in the logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use recibo_shared::AppError;

/// Renders an application error as its JSON envelope.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code().to_ascii_lowercase(),
            "message": err.message()
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_code_follow_taxonomy() {
        let response = error_response(&AppError::Forbidden("Access denied".into()));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = error_response(&AppError::Validation("Quantity must be greater than 0".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_response(&AppError::NotFound("Expense not found".into()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
