use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Site Insights API",
        version = "1.0.0",
        description = "Account management and website performance analysis.\n\n**Authentication:** `POST /create-account` and `POST /login` return a JWT `accessToken`; send it as a Bearer token to protected endpoints.\n\n**Analysis:** `POST /get-url` relays the performance, accessibility and SEO categories reported by Google PageSpeed Insights."
    ),
    paths(
        crate::api::auth::create_account,
        crate::api::auth::login,
        crate::api::auth::get_user,
        crate::api::analysis::get_url,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::CreateAccountRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::api::auth::CurrentUserResponse,
            crate::api::analysis::AnalyzeRequest,
            crate::api::health::HealthResponse,
            crate::models::PublicUser,
            crate::utils::ErrorResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Account creation, login and the authenticated profile endpoint."),
        (name = "Analysis", description = "Proxy to the PageSpeed Insights Lighthouse API."),
        (name = "Health", description = "Liveness check."),
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
                        .description(Some("accessToken returned by /create-account or /login"))
                        .build()
                ),
            );
        }
    }
}
