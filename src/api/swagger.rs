use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "In-memory user management API.\n\n**Features:**\n- User CRUD with field validation and email uniqueness\n- Sparse (partial) updates\n- Health monitoring",
        contact(
            name = "User Service Team",
            email = "support@user-service.com"
        )
    ),
    paths(
        // Users
        crate::api::users::get_users,
        crate::api::users::get_user,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::User,
            crate::models::UserPayload,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints. Create, list, fetch, update and delete in-memory user records."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    )
)]
pub struct ApiDoc;
