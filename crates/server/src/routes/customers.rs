use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;

use service::customer::domain::{Customer, RegistrationRequest, UpdateCustomerRequest};
use service::customer::errors::CustomerError;

use crate::errors::ApiError;
use crate::routes::auth::{authorization_header, ServerState};

/// Customer view returned over the API; never exposes the credential hash.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub profile_image_id: Option<String>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            age: c.age,
            gender: c.gender.as_str().to_string(),
            profile_image_id: c.profile_image_id,
        }
    }
}

#[utoipa::path(get, path = "/api/v1/customers", tag = "customers",
    responses((status = 200, description = "All customers")))]
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.customers.get_all_customers().await?;
    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

#[utoipa::path(get, path = "/api/v1/customers/{customer_id}", tag = "customers",
    responses((status = 200, description = "Customer"), (status = 404, description = "Not Found")))]
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state.customers.get_customer_by_id(customer_id).await?;
    Ok(Json(customer.into()))
}

#[utoipa::path(get, path = "/api/v1/customers/email/{email}", tag = "customers",
    responses((status = 200, description = "Customer"), (status = 404, description = "Not Found")))]
pub async fn get_by_email(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state.customers.get_customer_by_email(&email).await?;
    Ok(Json(customer.into()))
}

/// Register a customer. The issued bearer token travels in the
/// Authorization response header; the body stays empty.
#[utoipa::path(post, path = "/api/v1/customers", tag = "customers",
    request_body = crate::openapi::RegisterRequestDoc,
    responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegistrationRequest>,
) -> Result<(StatusCode, HeaderMap), ApiError> {
    let customer = state.customers.register(input).await?;
    let token = state.tokens.issue(&customer.email, &["ROLE_USER"])?;
    let headers = authorization_header(&token)?;
    Ok((StatusCode::OK, headers))
}

#[utoipa::path(put, path = "/api/v1/customers/{customer_id}", tag = "customers",
    request_body = crate::openapi::UpdateRequestDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "No changes"), (status = 404, description = "Not Found"), (status = 409, description = "Conflict")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(customer_id): Path<i32>,
    Json(input): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let updated = state.customers.update_customer(customer_id, input).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(delete, path = "/api/v1/customers/{customer_id}", tag = "customers",
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(customer_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.customers.delete_customer_by_id(customer_id).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(post, path = "/api/v1/customers/{customer_id}/profile-image", tag = "customers",
    responses((status = 200, description = "Uploaded"), (status = 404, description = "Not Found")))]
pub async fn upload_profile_image(
    State(state): State<ServerState>,
    Path(customer_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    let mut data: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CustomerError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| CustomerError::Validation(format!("invalid multipart body: {e}")))?;
            data = Some(bytes);
        }
    }
    let data = data.ok_or(CustomerError::Validation("missing `file` part".into()))?;

    state.customers.upload_profile_image(customer_id, data).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(get, path = "/api/v1/customers/{customer_id}/profile-image", tag = "customers",
    responses((status = 200, description = "Image bytes"), (status = 404, description = "Not Found")))]
pub async fn get_profile_image(
    State(state): State<ServerState>,
    Path(customer_id): Path<i32>,
) -> Result<(HeaderMap, Bytes), ApiError> {
    let bytes = state.customers.get_profile_image(customer_id).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/octet-stream"),
    );
    Ok((headers, bytes))
}
