//! OpenAPI specification builder using utoipa.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::rest::dto::{
    CreateProfileRequest, GrantRequest, HealthResponse, LoginRequest, LoginResponse,
    ProfileResponse, SaveStepResponse, SearchPageResponse, ShareLinksResponse, SpendRequest,
    StatusResponse, StatusUpdateRequest,
};
use crate::rest::error::ErrorResponse;
use crate::types::{BiodataSummary, TokenBalance, WizardStepInfo};

/// OpenAPI documentation for the Bondhon REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bondhon API",
        version = "0.3.2",
        description = "REST API for the Bondhon matrimony biodata platform.",
        license(name = "MIT"),
        contact(
            name = "bondhon.app",
            url = "https://github.com/bondhon-app/bondhon"
        )
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Auth
        crate::rest::routes::auth::login,
        // Wizard and profiles
        crate::rest::routes::profiles::wizard_steps,
        crate::rest::routes::profiles::create,
        crate::rest::routes::profiles::get_one,
        crate::rest::routes::profiles::save_step,
        crate::rest::routes::profiles::list_all,
        crate::rest::routes::profiles::set_status,
        crate::rest::routes::profiles::delete,
        // Search
        crate::rest::routes::search::search,
        // Share
        crate::rest::routes::share::share_links,
        // Tokens
        crate::rest::routes::tokens::balance,
        crate::rest::routes::tokens::spend,
        crate::rest::routes::tokens::grant,
    ),
    components(
        schemas(
            // Response types
            HealthResponse,
            StatusResponse,
            LoginResponse,
            ProfileResponse,
            SaveStepResponse,
            SearchPageResponse,
            ShareLinksResponse,
            BiodataSummary,
            WizardStepInfo,
            TokenBalance,
            ErrorResponse,
            // Request types
            LoginRequest,
            CreateProfileRequest,
            StatusUpdateRequest,
            GrantRequest,
            SpendRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Auth", description = "Admin login"),
        (name = "Wizard", description = "Multi-step biodata form"),
        (name = "Profiles", description = "Biodata records and share links"),
        (name = "Search", description = "Filtered, paginated biodata search"),
        (name = "Tokens", description = "Connection-token balances"),
        (name = "Admin", description = "Moderation and token grants"),
    )
)]
pub struct ApiDoc;

/// Registers the bearer-token security scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }

    /// Generate the OpenAPI specification as a YAML string
    #[allow(dead_code)]
    pub fn yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::openapi())
    }
}
