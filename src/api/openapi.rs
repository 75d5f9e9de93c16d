//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, service_handler, user_handler, version_handler};
use crate::domain::{ServiceSummary, ServiceVersionRow, UserProfile};

/// OpenAPI documentation for the service catalog
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Service Catalog API",
        version = "0.1.0",
        description = "Per-user catalog of services and their versions",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        auth_handler::signup,
        auth_handler::login,
        user_handler::get_current_user,
        user_handler::update_current_user,
        service_handler::create_service,
        service_handler::list_services,
        service_handler::get_service,
        service_handler::update_service,
        service_handler::delete_service,
        version_handler::create_version,
        version_handler::delete_version,
    ),
    components(
        schemas(
            UserProfile,
            ServiceSummary,
            ServiceVersionRow,
            auth_handler::SignupRequest,
            auth_handler::LoginRequest,
            auth_handler::SignupResponse,
            auth_handler::TokenResponse,
            user_handler::UpdateUserRequest,
            service_handler::ServiceRequest,
            version_handler::VersionRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup and login"),
        (name = "Users", description = "The authenticated user"),
        (name = "Services", description = "Services owned by the caller"),
        (name = "Versions", description = "Versions of a service")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /signup or /login"))
                        .build(),
                ),
            );
        }
    }
}
