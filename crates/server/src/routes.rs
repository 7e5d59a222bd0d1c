use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub mod auth;
pub mod customers;

use auth::ServerState;

/// Uploaded profile images are capped well below this; the limit guards the
/// multipart reader against unbounded bodies.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is healthy")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health + docs public, customer routes
/// behind the bearer-token middleware.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let docs = SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi());

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/customers",
            get(customers::list).post(customers::register),
        )
        .route(
            "/api/v1/customers/:customer_id",
            get(customers::get_by_id)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/api/v1/customers/email/:email", get(customers::get_by_email))
        .route(
            "/api/v1/customers/:customer_id/profile-image",
            get(customers::get_profile_image).post(customers::upload_profile_image),
        )
        .route("/api/v1/auth/login", axum::routing::post(auth::login))
        .merge(docs)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
