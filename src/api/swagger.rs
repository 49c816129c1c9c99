use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Post Service API",
        version = "1.0.0",
        description = "Complete API documentation for Post Service. \n\n**Authentication:** Post endpoints require JWT Bearer token authentication.\n\n**Features:**\n- User signup and login (email/password)\n- Personal post management (create, list, delete)\n- Cached post listings (5 minute TTL)\n- Health monitoring and metrics",
        contact(
            name = "Post Service Team",
            email = "support@post-service.com"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::signup,
        crate::api::auth::login,

        // Posts
        crate::api::posts::create_post,
        crate::api::posts::list_posts,
        crate::api::posts::delete_post,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::SignupRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::TokenResponse,

            // Posts
            crate::services::post_service::PostRequest,
            crate::services::post_service::PostResponse,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication endpoints. Sign up with email/password and log in to receive a JWT bearer token."),
        (name = "Posts", description = "Post management endpoints. Create, list, and delete posts owned by the authenticated user."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build()
                ),
            );
        }
    }
}
