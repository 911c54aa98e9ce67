//! Social share links for an approved biodata.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::profile::ProfileStatus;
use crate::rest::dto::ShareLinksResponse;
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::share::{profile_url, share_text, share_url, SharePlatform};

/// Share links for one approved biodata
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}/share",
    tag = "Profiles",
    params(
        ("id" = Uuid, Path, description = "Profile id")
    ),
    responses(
        (status = 200, description = "Per-platform share links", body = ShareLinksResponse),
        (status = 404, description = "No approved biodata with this id", body = ErrorResponse)
    )
)]
pub async fn share_links(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareLinksResponse>, ApiError> {
    let profiles = state.profiles.read().await;
    let profile = profiles
        .get(&id)
        .filter(|p| p.status == ProfileStatus::Approved)
        .ok_or_else(|| ApiError::NotFound(format!("No approved biodata '{id}'")))?;

    let text = share_text(profile);
    let url = profile_url(&state.config.server.public_base_url, profile);
    let links: BTreeMap<String, String> = SharePlatform::all()
        .iter()
        .map(|&platform| {
            (
                platform.key().to_string(),
                share_url(platform, &url, &text),
            )
        })
        .collect();

    Ok(Json(ShareLinksResponse { text, url, links }))
}
