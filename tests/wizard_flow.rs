//! End-to-end wizard flows through the public library API: a full
//! form-filling session, persistence through the profile registry, and a
//! reload that resumes exactly where the saved record says.

use tempfile::TempDir;

use bondhon::profile::{ProfileRegistry, ProfileStatus};
use bondhon::search::{run_search, SearchQuery};
use bondhon::wizard::{FieldValue, FormData, WizardController, WizardRecord, TOTAL_STEPS};

fn fields(pairs: &[(&str, FieldValue)]) -> FormData {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn step_fields(step: u8) -> FormData {
    match step {
        1 => fields(&[
            ("religion", "Islam".into()),
            ("biodataType", "Groom".into()),
            ("maritalStatus", "Never married".into()),
            ("dateOfBirth", "1997-06-30".into()),
            ("age", 28i64.into()),
            ("height", 170i64.into()),
            ("weight", 66i64.into()),
            ("complexion", "Olive".into()),
            ("profession", "Pharmacist".into()),
            ("bloodGroup", "B-".into()),
            (
                "permanentLocation",
                "Bangladesh > Rajshahi > Natore > Sadar".into(),
            ),
            ("permanentArea", "Sadar".into()),
            ("healthIssues", "None".into()),
            ("sameAsPermanent", true.into()),
        ]),
        2 => fields(&[
            ("fatherAlive", true.into()),
            ("motherAlive", true.into()),
            ("brothersCount", 1i64.into()),
            ("sistersCount", 2i64.into()),
            ("familyStatus", "Middle".into()),
        ]),
        3 => fields(&[
            ("educationMedium", "Bangla".into()),
            ("highestEducation", "B.Pharm".into()),
            ("occupationDetails", "Hospital pharmacist in Natore".into()),
        ]),
        4 => fields(&[
            ("partnerAgeMin", 20i64.into()),
            ("partnerAgeMax", 27i64.into()),
            ("partnerMaritalStatus", "Never married".into()),
        ]),
        5 => fields(&[
            ("email", "groom@example.com".into()),
            ("guardianPhone", "+8801712345678".into()),
        ]),
        _ => FormData::new(),
    }
}

#[test]
fn full_session_walks_every_step() {
    let mut wizard = WizardController::standard();

    for step in 1..=TOTAL_STEPS {
        assert_eq!(wizard.current_step(), step);
        wizard.update_form_data(step_fields(step));
        assert!(
            wizard.validate_current_step(),
            "step {step} should validate: {:?}",
            wizard.errors()
        );
        wizard.mark_step_complete(step);
        if step < TOTAL_STEPS {
            wizard.next_step();
        }
    }

    assert!(wizard.is_last_step());
    assert_eq!(wizard.completed_steps().len(), TOTAL_STEPS as usize);
    // Fields from every step accumulated.
    assert_eq!(
        wizard.field("religion"),
        Some(&FieldValue::Text("Islam".to_string()))
    );
    assert_eq!(
        wizard.field("guardianPhone"),
        Some(&FieldValue::Text("+8801712345678".to_string()))
    );
}

#[test]
fn half_done_profile_persists_and_resumes() {
    let dir = TempDir::new().unwrap();

    let id = {
        let mut registry = ProfileRegistry::new();
        let id = registry.create("groom@example.com".into()).id;
        let profile = registry.get_mut(&id).unwrap();
        profile.apply_step(1, step_fields(1)).unwrap();
        profile.apply_step(2, step_fields(2)).unwrap();
        registry.save(dir.path(), &id).unwrap();
        id
    };

    // A new process loads the store and resumes at step 3.
    let mut registry = ProfileRegistry::new();
    registry.load_all(dir.path()).unwrap();
    let profile = registry.get(&id).unwrap();
    assert_eq!(profile.current_step, 3);
    assert!(!profile.is_complete());

    let wizard = profile.wizard_session();
    assert_eq!(wizard.current_step(), 3);
    assert_eq!(wizard.highest_step_reached(), 3);
    assert_eq!(
        wizard.completed_steps().iter().copied().collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(
        wizard.field("profession"),
        Some(&FieldValue::Text("Pharmacist".to_string()))
    );
}

#[test]
fn record_from_web_client_resumes_with_inferred_progress() {
    // What the web client sends after restoring from its own store: a CSV
    // completedSteps and location sub-fields not yet collapsed.
    let raw = serde_json::json!({
        "currentStep": 4,
        "completedSteps": "1,2,3",
        "permanentCountry": "Bangladesh",
        "permanentDivision": "Barishal",
        "permanentDistrict": "Bhola",
        "permanentArea": "Char Fasson",
        "religion": "Islam"
    });
    let record: WizardRecord = serde_json::from_value(raw).unwrap();

    let mut wizard = WizardController::standard();
    wizard.load_form_data(record, false);

    assert_eq!(wizard.current_step(), 4);
    assert_eq!(wizard.highest_step_reached(), 4);
    assert_eq!(
        wizard.field("permanentLocation"),
        Some(&FieldValue::Text(
            "Bangladesh > Barishal > Bhola > Char Fasson".to_string()
        ))
    );
    // Backward jump, then forward jump to where we were.
    wizard.go_to_step(1);
    assert_eq!(wizard.highest_step_reached(), 4);
    wizard.go_to_step(4);
    assert_eq!(wizard.current_step(), 4);
}

#[test]
fn completed_profiles_become_searchable_after_approval() {
    let mut registry = ProfileRegistry::new();
    let id = registry.create("groom@example.com".into()).id;
    {
        let profile = registry.get_mut(&id).unwrap();
        for step in 1..=TOTAL_STEPS {
            profile.apply_step(step, step_fields(step)).unwrap();
        }
        assert!(profile.is_complete());
    }

    // Pending: invisible.
    let query = SearchQuery {
        district: Some("Natore".to_string()),
        ..SearchQuery::default()
    };
    assert_eq!(run_search(registry.approved(), &query).total, 0);

    registry.get_mut(&id).unwrap().status = ProfileStatus::Approved;
    let page = run_search(registry.approved(), &query);
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].district().as_deref(), Some("Natore"));
}
