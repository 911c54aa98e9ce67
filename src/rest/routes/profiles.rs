//! Biodata profile endpoints: drafts, wizard step saves, moderation.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::profile::ProfileStatus;
use crate::rest::dto::{
    CreateProfileRequest, ProfileResponse, SaveStepResponse, StatusUpdateRequest,
};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::types::{BiodataSummary, WizardStepInfo};
use crate::wizard::FormData;

/// Wizard page metadata for form rendering
#[utoipa::path(
    get,
    path = "/api/v1/wizard/steps",
    tag = "Wizard",
    responses(
        (status = 200, description = "Wizard steps in page order", body = Vec<WizardStepInfo>)
    )
)]
pub async fn wizard_steps() -> Json<Vec<WizardStepInfo>> {
    Json(WizardStepInfo::all())
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Open a new draft biodata
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "Profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 200, description = "Draft created", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let owner = request.owner_email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&owner) {
        return Err(ApiError::BadRequest(
            "owner_email must be a valid email address".to_string(),
        ));
    }

    let (id, response) = {
        let mut profiles = state.profiles.write().await;
        let profile = profiles.create(owner.clone());
        (profile.id, ProfileResponse::from(profile))
    };

    // Opening a biodata opens a token account with the signup grant.
    {
        let mut ledger = state.ledger.write().await;
        ledger.ensure_account(&owner, state.config.payments.signup_grant);
        ledger.save()?;
    }

    let profiles = state.profiles.read().await;
    profiles.save(&state.profiles_path(), &id)?;

    Ok(Json(response))
}

/// Public view of one approved biodata
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    tag = "Profiles",
    params(
        ("id" = Uuid, Path, description = "Profile id")
    ),
    responses(
        (status = 200, description = "Public biodata card", body = BiodataSummary),
        (status = 404, description = "No approved biodata with this id", body = ErrorResponse)
    )
)]
pub async fn get_one(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BiodataSummary>, ApiError> {
    let profiles = state.profiles.read().await;
    let profile = profiles
        .get(&id)
        .filter(|p| p.status == ProfileStatus::Approved)
        .ok_or_else(|| ApiError::NotFound(format!("No approved biodata '{id}'")))?;

    Ok(Json(BiodataSummary::from(profile)))
}

/// Save one wizard step of a draft
///
/// The submitted fields run through the step's validation rule table; an
/// invalid step returns the field-keyed error map and changes nothing.
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}/steps/{step}",
    tag = "Wizard",
    params(
        ("id" = Uuid, Path, description = "Profile id"),
        ("step" = u8, Path, description = "Step number, 1-indexed")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Step saved", body = SaveStepResponse),
        (status = 400, description = "Step failed validation", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn save_step(
    State(state): State<ApiState>,
    Path((id, step)): Path<(Uuid, u8)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SaveStepResponse>, ApiError> {
    let submitted: FormData = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("step body must be a field map: {e}")))?;

    let response = {
        let mut profiles = state.profiles.write().await;
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Profile '{id}' not found")))?;

        profile
            .apply_step(step, submitted)
            .map_err(ApiError::ValidationError)?;

        SaveStepResponse {
            saved_step: step,
            current_step: profile.current_step,
            completed_steps: profile.completed_steps.iter().copied().collect(),
            is_complete: profile.is_complete(),
        }
    };

    let profiles = state.profiles.read().await;
    profiles.save(&state.profiles_path(), &id)?;
    tracing::info!("Saved wizard step {} for profile {}", step, id);

    Ok(Json(response))
}

/// List all profiles regardless of status (admin)
#[utoipa::path(
    get,
    path = "/api/v1/admin/profiles",
    tag = "Admin",
    responses(
        (status = 200, description = "All profiles", body = Vec<ProfileResponse>),
        (status = 401, description = "Missing token", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn list_all(
    State(state): State<ApiState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    session.require_admin()?;

    let profiles = state.profiles.read().await;
    let mut all: Vec<ProfileResponse> = profiles.all().map(ProfileResponse::from).collect();
    all.sort_by_key(|p| p.biodata_no);
    Ok(Json(all))
}

/// Approve or reject a profile (admin)
#[utoipa::path(
    post,
    path = "/api/v1/admin/profiles/{id}/status",
    tag = "Admin",
    params(
        ("id" = Uuid, Path, description = "Profile id")
    ),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = ProfileResponse),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn set_status(
    State(state): State<ApiState>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    session.require_admin()?;

    let status = request
        .parse()
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown status '{}'", request.status)))?;

    let response = {
        let mut profiles = state.profiles.write().await;
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Profile '{id}' not found")))?;
        profile.status = status;
        profile.updated_at = chrono::Utc::now();
        ProfileResponse::from(&*profile)
    };

    let profiles = state.profiles.read().await;
    profiles.save(&state.profiles_path(), &id)?;
    tracing::info!("Profile {} moderated to {}", id, status.as_str());

    Ok(Json(response))
}

/// Delete a profile (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/admin/profiles/{id}",
    tag = "Admin",
    params(
        ("id" = Uuid, Path, description = "Profile id")
    ),
    responses(
        (status = 200, description = "Profile deleted"),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn delete(
    State(state): State<ApiState>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    session.require_admin()?;

    {
        let mut profiles = state.profiles.write().await;
        profiles
            .remove(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Profile '{id}' not found")))?;
    }
    crate::profile::ProfileRegistry::delete_file(&state.profiles_path(), &id)?;
    tracing::info!("Profile {} deleted", id);

    Ok(Json(serde_json::json!({ "deleted": id })))
}
