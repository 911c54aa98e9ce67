//! Data Transfer Objects for the REST API.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::profile::{BiodataProfile, ProfileStatus};
use crate::search::{SearchPage, SearchQuery};
use crate::types::BiodataSummary;

// Note: ToSchema is derived on all DTOs for OpenAPI documentation generation

// =============================================================================
// Health DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub profile_count: usize,
    pub approved_count: usize,
    pub token_account_count: usize,
}

// =============================================================================
// Auth DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_minutes: i64,
}

// =============================================================================
// Profile DTOs
// =============================================================================

/// Request to open a new draft biodata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProfileRequest {
    pub owner_email: String,
}

/// Full profile view (admin and owner surfaces)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub biodata_no: u32,
    pub status: String,
    pub current_step: u8,
    pub completed_steps: Vec<u8>,
    pub is_complete: bool,
    /// The accumulated wizard form record
    #[schema(value_type = Object)]
    pub fields: serde_json::Value,
}

impl From<&BiodataProfile> for ProfileResponse {
    fn from(profile: &BiodataProfile) -> Self {
        Self {
            id: profile.id,
            biodata_no: profile.biodata_no,
            status: profile.status.as_str().to_string(),
            current_step: profile.current_step,
            completed_steps: profile.completed_steps.iter().copied().collect(),
            is_complete: profile.is_complete(),
            fields: serde_json::to_value(&profile.fields).unwrap_or_default(),
        }
    }
}

/// Result of saving one wizard step
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveStepResponse {
    pub saved_step: u8,
    pub current_step: u8,
    pub completed_steps: Vec<u8>,
    pub is_complete: bool,
}

/// Request to change a profile's moderation status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    /// "pending", "approved" or "rejected"
    pub status: String,
}

impl StatusUpdateRequest {
    pub fn parse(&self) -> Option<ProfileStatus> {
        ProfileStatus::parse(&self.status)
    }
}

// =============================================================================
// Search DTOs
// =============================================================================

/// Query parameters for biodata search
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchParams {
    /// "bride" or "groom"
    pub kind: Option<String>,
    pub marital_status: Option<String>,
    pub religion: Option<String>,
    pub district: Option<String>,
    pub profession: Option<String>,
    pub age_min: Option<u8>,
    pub age_max: Option<u8>,
    /// 1-indexed page number
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl From<SearchParams> for SearchQuery {
    fn from(params: SearchParams) -> Self {
        SearchQuery {
            kind: params.kind,
            marital_status: params.marital_status,
            religion: params.religion,
            district: params.district,
            profession: params.profession,
            age_min: params.age_min,
            age_max: params.age_max,
            page: params.page,
            per_page: params.per_page,
        }
    }
}

/// One page of search results
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchPageResponse {
    pub items: Vec<BiodataSummary>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl From<SearchPage<&BiodataProfile>> for SearchPageResponse {
    fn from(page: SearchPage<&BiodataProfile>) -> Self {
        Self {
            items: page.items.iter().map(|p| BiodataSummary::from(*p)).collect(),
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}

// =============================================================================
// Token DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GrantRequest {
    pub amount: u32,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpendRequest {
    /// Omitted = the configured contact-view cost
    pub amount: Option<u32>,
    #[serde(default)]
    pub note: String,
}

// =============================================================================
// Share DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShareLinksResponse {
    pub text: String,
    pub url: String,
    /// Platform key to share URL
    pub links: std::collections::BTreeMap<String, String>,
}
