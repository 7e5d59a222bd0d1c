use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::customer::errors::CustomerError;
use service::token::TokenError;

/// HTTP-facing error wrapper mapping business errors onto status codes.
#[derive(Debug)]
pub enum ApiError {
    Customer(CustomerError),
    Token(TokenError),
    Internal(String),
}

impl From<CustomerError> for ApiError {
    fn from(e: CustomerError) -> Self {
        Self::Customer(e)
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        Self::Token(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Customer(e) => {
                let status = match e {
                    CustomerError::NotFound(_) | CustomerError::NoImage(_) => StatusCode::NOT_FOUND,
                    CustomerError::DuplicateEmail(_) => StatusCode::CONFLICT,
                    CustomerError::NoChanges | CustomerError::Validation(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    CustomerError::Unauthorized => StatusCode::UNAUTHORIZED,
                    CustomerError::Upload(_)
                    | CustomerError::Hash(_)
                    | CustomerError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            ApiError::Token(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        // Root causes stay in the logs; callers get a generic message on 5xx
        if status.is_server_error() {
            match &self {
                ApiError::Customer(e) => error!(code = e.code(), error = ?e, "request failed"),
                other => error!(error = ?other, "request failed"),
            }
            return (
                status,
                Json(serde_json::json!({"error": "internal error"})),
            )
                .into_response();
        }
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}
