//! REST API for the Bondhon biodata platform.
//!
//! Provides the HTTP surface the web frontend consumes: wizard step saves,
//! biodata search, admin moderation, token balances and share links.
//! Designed to run alongside the TUI or as a standalone server.

use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    middleware as axum_mw,
    routing::{delete, get, post, put},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use openapi::ApiDoc;
pub use server::{RestApiServer, RestApiStatus};
pub use state::ApiState;

use crate::auth::jwt_auth;

/// Default port for the REST API server
pub const DEFAULT_PORT: u16 = 7340;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes behind the JWT middleware: admin surfaces and token accounts
    let protected = Router::new()
        .route("/api/v1/admin/profiles", get(routes::profiles::list_all))
        .route(
            "/api/v1/admin/profiles/:id/status",
            post(routes::profiles::set_status),
        )
        .route(
            "/api/v1/admin/profiles/:id",
            delete(routes::profiles::delete),
        )
        .route(
            "/api/v1/admin/tokens/:user/grant",
            post(routes::tokens::grant),
        )
        .route("/api/v1/tokens/:user", get(routes::tokens::balance))
        .route("/api/v1/tokens/:user/spend", post(routes::tokens::spend))
        .layer(axum_mw::from_fn(jwt_auth))
        .layer(Extension(state.jwt.clone()));

    // Public routes (no auth)
    let public = Router::new()
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        .route("/api/v1/auth/login", post(routes::auth::login))
        .route("/api/v1/wizard/steps", get(routes::profiles::wizard_steps))
        .route("/api/v1/profiles", post(routes::profiles::create))
        .route("/api/v1/profiles/search", get(routes::search::search))
        .route("/api/v1/profiles/:id", get(routes::profiles::get_one))
        .route(
            "/api/v1/profiles/:id/steps/:step",
            put(routes::profiles::save_step),
        )
        .route(
            "/api/v1/profiles/:id/share",
            get(routes::share::share_links),
        );

    public
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api/v1/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the REST API server
pub async fn serve(state: ApiState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("REST API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[test]
    fn test_build_router() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.data = dir.path().join("data").to_string_lossy().to_string();
        config.paths.state = dir.path().join("state").to_string_lossy().to_string();
        let state = ApiState::new(config);
        let _router = build_router(state);
        // Router builds without panicking
    }
}
