//! Admin login endpoint.

use axum::{extract::State, Json};

use crate::auth::ROLE_ADMIN;
use crate::rest::dto::{LoginRequest, LoginResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// Exchange admin credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    state
        .admins
        .authenticate(&request.email, &request.password)?;

    let token = state.jwt.issue(&request.email, &[ROLE_ADMIN])?;
    tracing::info!("Issued admin token for {}", request.email.to_lowercase());

    Ok(Json(LoginResponse {
        token,
        expires_in_minutes: state.config.auth.token_ttl_minutes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn make_state(dir: &TempDir) -> ApiState {
        let mut config = Config::default();
        config.paths.data = dir.path().join("data").to_string_lossy().to_string();
        config.paths.state = dir.path().join("state").to_string_lossy().to_string();
        ApiState::new(config)
    }

    #[tokio::test]
    async fn test_login_with_bootstrap_admin() {
        let dir = TempDir::new().unwrap();
        let state = make_state(&dir);

        let result = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "admin@bondhon.app".to_string(),
                password: "admin".to_string(),
            }),
        )
        .await;

        let resp = result.expect("bootstrap admin must log in");
        let claims = state.jwt.verify(&resp.token).unwrap();
        assert_eq!(claims.sub, "admin@bondhon.app");
        assert!(claims.roles.contains(&"admin".to_string()));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let dir = TempDir::new().unwrap();
        let state = make_state(&dir);

        let result = login(
            State(state),
            Json(LoginRequest {
                email: "admin@bondhon.app".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
