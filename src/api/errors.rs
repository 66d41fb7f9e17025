use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::domain::order::OrderError;

/// HTTP face of `OrderError`
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub OrderError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            OrderError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            OrderError::StoreFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            e if e.is_remote() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.0.to_string(),
        }))
    }
}
