//! Wire types shared with the web frontend.
//!
//! These use ts-rs and schemars to generate TypeScript definitions and JSON
//! schemas from a single Rust source of truth (see the `generate_types`
//! binary). Keep them flat and serde-friendly: the Next.js client treats
//! them as plain JSON.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::profile::BiodataProfile;
use crate::wizard::rules;

/// Public card for one biodata in search results and share pages.
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct BiodataSummary {
    pub id: Uuid,
    pub biodata_no: u32,
    /// "Bride" or "Groom" when the profile has declared it
    pub kind: Option<String>,
    pub age: Option<u8>,
    pub profession: Option<String>,
    pub district: Option<String>,
    pub marital_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&BiodataProfile> for BiodataSummary {
    fn from(profile: &BiodataProfile) -> Self {
        Self {
            id: profile.id,
            biodata_no: profile.biodata_no,
            kind: profile.kind().map(|k| k.label().to_string()),
            age: profile.age(),
            profession: profile.text_field("profession").map(ToString::to_string),
            district: profile.district(),
            marital_status: profile
                .text_field("maritalStatus")
                .map(ToString::to_string),
            created_at: profile.created_at,
        }
    }
}

/// Wizard page metadata the frontend needs to render the step indicator
/// and build step forms.
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct WizardStepInfo {
    pub number: u8,
    pub title: String,
    pub required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
}

impl WizardStepInfo {
    /// The full wizard, in page order.
    pub fn all() -> Vec<WizardStepInfo> {
        rules::steps()
            .iter()
            .map(|schema| WizardStepInfo {
                number: schema.number,
                title: schema.title.to_string(),
                required_fields: schema
                    .fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name.to_string())
                    .collect(),
                optional_fields: schema
                    .fields
                    .iter()
                    .filter(|f| !f.required)
                    .map(|f| f.name.to_string())
                    .collect(),
            })
            .collect()
    }
}

/// A member's connection-token balance.
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct TokenBalance {
    pub user: String,
    pub balance: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileRegistry;

    #[test]
    fn summary_projects_public_fields() {
        let mut registry = ProfileRegistry::new();
        let id = registry.create("o@example.com".into()).id;
        let profile = registry.get_mut(&id).unwrap();
        profile.fields = serde_json::from_str(
            r#"{"biodataType": "Bride", "age": 24, "profession": "Doctor",
                "permanentDistrict": "Bogura", "maritalStatus": "Never married"}"#,
        )
        .unwrap();

        let summary = BiodataSummary::from(&*profile);
        assert_eq!(summary.kind.as_deref(), Some("Bride"));
        assert_eq!(summary.age, Some(24));
        assert_eq!(summary.district.as_deref(), Some("Bogura"));
        // The owner's email never appears in the public projection.
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("example.com"));
    }

    #[test]
    fn wizard_step_info_mirrors_the_rule_table() {
        let steps = WizardStepInfo::all();
        assert_eq!(steps.len(), rules::TOTAL_STEPS as usize);
        assert!(steps[0]
            .required_fields
            .iter()
            .any(|f| f == "permanentLocation"));
        assert!(steps[0].optional_fields.iter().any(|f| f == "presentArea"));
    }
}
