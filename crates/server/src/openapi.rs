use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequestDoc {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: i32,
    pub gender: String,
}

#[derive(ToSchema)]
pub struct UpdateRequestDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequestDoc {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct CustomerDoc {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub profile_image_id: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::customers::list,
        crate::routes::customers::get_by_id,
        crate::routes::customers::get_by_email,
        crate::routes::customers::register,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::customers::upload_profile_image,
        crate::routes::customers::get_profile_image,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequestDoc,
            UpdateRequestDoc,
            LoginRequestDoc,
            CustomerDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "customers")
    )
)]
pub struct ApiDoc;
