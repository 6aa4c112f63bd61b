use axum::{http::StatusCode, response::IntoResponse, Json};
use crate::errors::RiskError;
use super::models::ErrorResponse;

impl IntoResponse for RiskError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            RiskError::InputValidation(_) | RiskError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
            error_type: Some(self.classify().error_type.to_string()),
            role: self.role().map(|r| r.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
