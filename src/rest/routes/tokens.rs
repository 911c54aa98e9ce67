//! Connection-token balance endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::auth::AuthSession;
use crate::rest::dto::{GrantRequest, SpendRequest};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::types::TokenBalance;

/// Owners may see and spend their own balance; admins anyone's.
fn authorize_account(session: &AuthSession, user: &str) -> Result<(), ApiError> {
    if session.subject.eq_ignore_ascii_case(user) || session.require_admin().is_ok() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "token accounts are only visible to their owner".to_string(),
        ))
    }
}

/// Get a token balance
#[utoipa::path(
    get,
    path = "/api/v1/tokens/{user}",
    tag = "Tokens",
    params(
        ("user" = String, Path, description = "Account email")
    ),
    responses(
        (status = 200, description = "Current balance", body = TokenBalance),
        (status = 404, description = "No such account", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn balance(
    State(state): State<ApiState>,
    Extension(session): Extension<AuthSession>,
    Path(user): Path<String>,
) -> Result<Json<TokenBalance>, ApiError> {
    authorize_account(&session, &user)?;

    let ledger = state.ledger.read().await;
    let balance = ledger.balance(&user)?;
    Ok(Json(TokenBalance {
        user: user.to_lowercase(),
        balance,
    }))
}

/// Spend tokens (e.g. to view contact details)
#[utoipa::path(
    post,
    path = "/api/v1/tokens/{user}/spend",
    tag = "Tokens",
    params(
        ("user" = String, Path, description = "Account email")
    ),
    request_body = SpendRequest,
    responses(
        (status = 200, description = "New balance after the spend", body = TokenBalance),
        (status = 402, description = "Balance too low", body = ErrorResponse),
        (status = 404, description = "No such account", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn spend(
    State(state): State<ApiState>,
    Extension(session): Extension<AuthSession>,
    Path(user): Path<String>,
    Json(request): Json<SpendRequest>,
) -> Result<Json<TokenBalance>, ApiError> {
    authorize_account(&session, &user)?;

    let amount = request
        .amount
        .unwrap_or(state.config.payments.contact_view_cost);
    let note = if request.note.is_empty() {
        "contact view".to_string()
    } else {
        request.note
    };

    let mut ledger = state.ledger.write().await;
    let balance = ledger.spend(&user, amount, &note)?;
    ledger.save()?;
    tracing::info!("{} spent {} token(s): {}", user.to_lowercase(), amount, note);

    Ok(Json(TokenBalance {
        user: user.to_lowercase(),
        balance,
    }))
}

/// Grant tokens after an out-of-band purchase (admin)
#[utoipa::path(
    post,
    path = "/api/v1/admin/tokens/{user}/grant",
    tag = "Admin",
    params(
        ("user" = String, Path, description = "Account email")
    ),
    request_body = GrantRequest,
    responses(
        (status = 200, description = "New balance after the grant", body = TokenBalance),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "No such account", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn grant(
    State(state): State<ApiState>,
    Extension(session): Extension<AuthSession>,
    Path(user): Path<String>,
    Json(request): Json<GrantRequest>,
) -> Result<Json<TokenBalance>, ApiError> {
    session.require_admin()?;

    let mut ledger = state.ledger.write().await;
    let balance = ledger.grant(&user, request.amount, &request.note)?;
    ledger.save()?;
    tracing::info!(
        "Granted {} token(s) to {} ({})",
        request.amount,
        user.to_lowercase(),
        request.note
    );

    Ok(Json(TokenBalance {
        user: user.to_lowercase(),
        balance,
    }))
}
