//! Biodata profile records and their file-backed registry.
//!
//! A profile is one person's biodata: the open field map accumulated by the
//! wizard plus moderation metadata. The registry keeps all profiles in
//! memory and persists each as a JSON file under `<data>/profiles/`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::wizard::{
    CompletedStepsInput, FieldValue, FormData, StepEntry, WizardController, WizardRecord,
};

/// Which side of the match a biodata describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiodataKind {
    Bride,
    Groom,
}

impl BiodataKind {
    pub fn from_field(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bride" => Some(BiodataKind::Bride),
            "groom" => Some(BiodataKind::Groom),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BiodataKind::Bride => "Bride",
            BiodataKind::Groom => "Groom",
        }
    }
}

/// Moderation state of a profile. Only approved profiles are searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ProfileStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(ProfileStatus::Pending),
            "approved" => Some(ProfileStatus::Approved),
            "rejected" => Some(ProfileStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileStatus::Pending => "pending",
            ProfileStatus::Approved => "approved",
            ProfileStatus::Rejected => "rejected",
        }
    }
}

/// One person's biodata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiodataProfile {
    pub id: Uuid,
    /// Public, human-quotable number ("Biodata #1042").
    pub biodata_no: u32,
    pub owner_email: String,
    #[serde(default)]
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Wizard position, persisted so a returning user resumes where they left.
    #[serde(default = "default_step")]
    pub current_step: u8,
    #[serde(default)]
    pub completed_steps: BTreeSet<u8>,
    #[serde(default)]
    pub fields: FormData,
}

fn default_step() -> u8 {
    1
}

impl BiodataProfile {
    pub fn new(biodata_no: u32, owner_email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            biodata_no,
            owner_email,
            status: ProfileStatus::Pending,
            created_at: now,
            updated_at: now,
            current_step: 1,
            completed_steps: BTreeSet::new(),
            fields: FormData::new(),
        }
    }

    pub fn kind(&self) -> Option<BiodataKind> {
        self.fields
            .get("biodataType")
            .and_then(FieldValue::as_text)
            .and_then(BiodataKind::from_field)
    }

    pub fn age(&self) -> Option<u8> {
        self.fields
            .get("age")
            .and_then(FieldValue::as_number)
            .filter(|n| (1.0..=255.0).contains(n))
            .map(|n| n as u8)
    }

    /// District from the dedicated sub-field, falling back to the third
    /// segment of the combined location path.
    pub fn district(&self) -> Option<String> {
        if let Some(d) = self.fields.get("permanentDistrict").and_then(FieldValue::as_text) {
            if !d.trim().is_empty() {
                return Some(d.trim().to_string());
            }
        }
        self.fields
            .get("permanentLocation")
            .and_then(FieldValue::as_text)
            .and_then(|path| path.split('>').nth(2))
            .map(|seg| seg.trim().to_string())
            .filter(|seg| !seg.is_empty())
    }

    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Whether every wizard step has been completed.
    pub fn is_complete(&self) -> bool {
        (1..=crate::wizard::TOTAL_STEPS).all(|s| self.completed_steps.contains(&s))
    }

    /// Hydrate a wizard session from this profile's saved progress.
    pub fn wizard_session(&self) -> WizardController {
        let mut wizard = WizardController::standard();
        wizard.load_form_data(
            WizardRecord {
                current_step: Some(u32::from(self.current_step)),
                completed_steps: Some(CompletedStepsInput::Many(
                    self.completed_steps
                        .iter()
                        .map(|&s| StepEntry::Num(f64::from(s)))
                        .collect(),
                )),
                fields: self.fields.clone(),
            },
            false,
        );
        wizard
    }

    /// Merge one validated step save into the profile.
    ///
    /// Runs the step through the wizard controller: merge the submitted
    /// fields, validate the step's rule table, and on success record the
    /// step as complete and advance the resume position. On failure the
    /// profile is untouched and the validation error map is returned.
    pub fn apply_step(
        &mut self,
        step: u8,
        submitted: FormData,
    ) -> std::result::Result<(), BTreeMap<String, String>> {
        let mut wizard = self.wizard_session();
        wizard.go_to_step(step);
        if wizard.current_step() != step {
            let mut errors = BTreeMap::new();
            errors.insert(
                "step".to_string(),
                format!("step {step} is out of range (1..={})", wizard.total_steps()),
            );
            return Err(errors);
        }

        wizard.update_form_data(submitted);
        if !wizard.validate_current_step() {
            return Err(wizard.errors().clone());
        }

        wizard.mark_step_complete(step);
        if !wizard.is_last_step() {
            wizard.next_step();
        }

        self.fields = wizard.form_data().clone();
        self.completed_steps = wizard.completed_steps().clone();
        self.current_step = wizard.current_step();
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Central in-memory store for all biodata profiles.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<Uuid, BiodataProfile>,
    next_biodata_no: u32,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
            next_biodata_no: 1,
        }
    }

    /// Create a fresh draft profile for an owner.
    pub fn create(&mut self, owner_email: String) -> &BiodataProfile {
        let profile = BiodataProfile::new(self.next_biodata_no, owner_email);
        self.next_biodata_no += 1;
        let id = profile.id;
        self.profiles.insert(id, profile);
        &self.profiles[&id]
    }

    pub fn get(&self, id: &Uuid) -> Option<&BiodataProfile> {
        self.profiles.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut BiodataProfile> {
        self.profiles.get_mut(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<BiodataProfile> {
        self.profiles.remove(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &BiodataProfile> {
        self.profiles.values()
    }

    /// Profiles visible to the public search.
    pub fn approved(&self) -> impl Iterator<Item = &BiodataProfile> {
        self.profiles
            .values()
            .filter(|p| p.status == ProfileStatus::Approved)
    }

    pub fn count(&self) -> usize {
        self.profiles.len()
    }

    /// Load every `*.json` profile file under `dir`. Unreadable files are
    /// skipped with a warning so one corrupt record cannot block startup.
    pub fn load_all(&mut self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        let mut loaded = 0usize;
        for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = match fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Skipping unreadable profile {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<BiodataProfile>(&contents) {
                Ok(profile) => {
                    self.next_biodata_no = self.next_biodata_no.max(profile.biodata_no + 1);
                    self.profiles.insert(profile.id, profile);
                    loaded += 1;
                }
                Err(e) => {
                    warn!("Skipping malformed profile {}: {}", path.display(), e);
                }
            }
        }

        if loaded > 0 {
            info!("Loaded {} biodata profiles", loaded);
        }
        Ok(())
    }

    /// Persist one profile as `<dir>/<id>.json`.
    pub fn save(&self, dir: &Path, id: &Uuid) -> Result<()> {
        let profile = self
            .profiles
            .get(id)
            .with_context(|| format!("profile {id} not found"))?;
        fs::create_dir_all(dir)
            .with_context(|| format!("creating profile directory {}", dir.display()))?;
        let path = dir.join(format!("{id}.json"));
        let contents = serde_json::to_string_pretty(profile)?;
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Remove a profile's file after deleting it from the registry.
    pub fn delete_file(dir: &Path, id: &Uuid) -> Result<()> {
        let path = dir.join(format!("{id}.json"));
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn step_one_fields() -> FormData {
        serde_json::from_str(
            r#"{
                "religion": "Islam",
                "biodataType": "Bride",
                "maritalStatus": "Never married",
                "dateOfBirth": "2000-01-15",
                "age": 25,
                "height": 158,
                "weight": 52,
                "complexion": "Fair",
                "profession": "Teacher",
                "bloodGroup": "B+",
                "permanentLocation": "Bangladesh > Dhaka > Tangail > Sadar",
                "permanentArea": "Sadar",
                "healthIssues": "None",
                "sameAsPermanent": true
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn create_assigns_sequential_numbers() {
        let mut registry = ProfileRegistry::new();
        let first = registry.create("a@example.com".into()).biodata_no;
        let second = registry.create("b@example.com".into()).biodata_no;
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn apply_step_validates_before_merging() {
        let mut registry = ProfileRegistry::new();
        let id = registry.create("a@example.com".into()).id;
        let profile = registry.get_mut(&id).unwrap();

        let errors = profile
            .apply_step(1, FormData::new())
            .expect_err("empty step 1 must fail");
        assert!(errors.contains_key("religion"));
        assert!(profile.completed_steps.is_empty());

        profile.apply_step(1, step_one_fields()).expect("valid step 1");
        assert!(profile.completed_steps.contains(&1));
        assert_eq!(profile.current_step, 2);
        assert_eq!(profile.kind(), Some(BiodataKind::Bride));
    }

    #[test]
    fn apply_step_rejects_out_of_range_step() {
        let mut registry = ProfileRegistry::new();
        let id = registry.create("a@example.com".into()).id;
        let profile = registry.get_mut(&id).unwrap();

        let errors = profile.apply_step(9, FormData::new()).expect_err("range");
        assert!(errors.contains_key("step"));
    }

    #[test]
    fn district_falls_back_to_location_path() {
        let mut registry = ProfileRegistry::new();
        let id = registry.create("a@example.com".into()).id;
        let profile = registry.get_mut(&id).unwrap();
        profile.fields = step_one_fields();

        assert_eq!(profile.district().as_deref(), Some("Tangail"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut registry = ProfileRegistry::new();
        let id = registry.create("a@example.com".into()).id;
        registry
            .get_mut(&id)
            .unwrap()
            .apply_step(1, step_one_fields())
            .unwrap();
        registry.save(dir.path(), &id).unwrap();

        let mut reloaded = ProfileRegistry::new();
        reloaded.load_all(dir.path()).unwrap();
        assert_eq!(reloaded.count(), 1);
        let profile = reloaded.get(&id).unwrap();
        assert_eq!(profile.current_step, 2);
        assert!(profile.completed_steps.contains(&1));
        // Numbering continues after the highest loaded profile.
        assert_eq!(reloaded.create("b@example.com".into()).biodata_no, 2);
    }

    #[test]
    fn malformed_profile_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("junk.json"), "not json").unwrap();

        let mut registry = ProfileRegistry::new();
        registry.load_all(dir.path()).unwrap();
        assert_eq!(registry.count(), 0);
    }
}
