use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;

use service::customer::domain::LoginRequest;
use service::customer::repo::seaorm::SeaOrmCustomerRepository;
use service::customer::CustomerService;
use service::token::TokenIssuer;

use crate::errors::ApiError;
use crate::routes::customers::CustomerResponse;

#[derive(Clone)]
pub struct ServerState {
    pub customers: Arc<CustomerService<SeaOrmCustomerRepository>>,
    pub tokens: Arc<TokenIssuer>,
}

/// Login result: token in the body and mirrored in the Authorization header.
#[derive(serde::Serialize)]
pub struct AuthenticationResponse {
    pub token: String,
    pub customer: CustomerResponse,
}

pub(crate) fn authorization_header(token: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(token)
        .map_err(|e| ApiError::Internal(format!("token not header-safe: {e}")))?;
    headers.insert(header::AUTHORIZATION, value);
    Ok(headers)
}

#[utoipa::path(post, path = "/api/v1/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequestDoc,
    responses((status = 200, description = "Logged in"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthenticationResponse>), ApiError> {
    let customer = state.customers.authenticate(&input.email, &input.password).await?;
    let token = state.tokens.issue(&customer.email, &["ROLE_USER"])?;
    let headers = authorization_header(&token)?;
    Ok((headers, Json(AuthenticationResponse { token, customer: customer.into() })))
}

/// Global middleware: outside the allow-list, require `Authorization:
/// Bearer <token>` and verify it. Registration and login are the token
/// bootstrap points and stay open, as do health, docs, and CORS preflight.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    if path == "/health"
        || path == "/api/v1/auth/login"
        || (path == "/api/v1/customers" && method == axum::http::Method::POST)
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == axum::http::Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    let authz = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match authz {
        Some(h) => {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(StatusCode::UNAUTHORIZED);
            }
            h[prefix.len()..].to_string()
        }
        None => {
            tracing::warn!(path = %path, "missing Authorization header");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    match state.tokens.verify(&token) {
        Ok(_claims) => Ok(next.run(req).await),
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "bearer token rejected");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
