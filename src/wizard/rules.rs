//! The per-step field schema and validation rule table.
//!
//! Validation is deliberately dumb: a fixed table of required fields per
//! step, checked against the accumulated form data. Rules are pure functions
//! of the field map, with no I/O and nothing async, so the controller can rerun
//! them wholesale on every validate call.

use std::collections::BTreeMap;

use crate::wizard::types::{FieldValue, FormData};

/// Number of pages in the biodata wizard.
pub const TOTAL_STEPS: u8 = 5;

/// How a field is captured in an interactive client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    LongText,
    Select(&'static [&'static str]),
    Toggle,
    Date,
    Integer { min: i64, max: i64 },
    District,
}

/// One field of one wizard step.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub required: bool,
}

/// One page of the wizard.
#[derive(Debug, Clone, Copy)]
pub struct StepSchema {
    pub number: u8,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

pub const RELIGIONS: &[&str] = &["Islam", "Hinduism", "Christianity", "Buddhism", "Other"];
pub const BIODATA_TYPES: &[&str] = &["Bride", "Groom"];
pub const MARITAL_STATUSES: &[&str] = &["Never married", "Divorced", "Widowed"];
pub const COMPLEXIONS: &[&str] = &["Fair", "Light", "Olive", "Brown", "Dark"];
pub const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
pub const FAMILY_STATUSES: &[&str] = &["Lower", "Lower middle", "Middle", "Upper middle", "Upper"];
pub const EDUCATION_MEDIUMS: &[&str] = &["Bangla", "English", "Madrasa"];

const PERSONAL: &[FieldSpec] = &[
    FieldSpec {
        name: "religion",
        label: "Religion",
        input: InputKind::Select(RELIGIONS),
        required: true,
    },
    FieldSpec {
        name: "biodataType",
        label: "Biodata type",
        input: InputKind::Select(BIODATA_TYPES),
        required: true,
    },
    FieldSpec {
        name: "maritalStatus",
        label: "Marital status",
        input: InputKind::Select(MARITAL_STATUSES),
        required: true,
    },
    FieldSpec {
        name: "dateOfBirth",
        label: "Date of birth",
        input: InputKind::Date,
        required: true,
    },
    FieldSpec {
        name: "age",
        label: "Age",
        input: InputKind::Integer { min: 18, max: 90 },
        required: true,
    },
    FieldSpec {
        name: "height",
        label: "Height (cm)",
        input: InputKind::Integer { min: 100, max: 230 },
        required: true,
    },
    FieldSpec {
        name: "weight",
        label: "Weight (kg)",
        input: InputKind::Integer { min: 30, max: 200 },
        required: true,
    },
    FieldSpec {
        name: "complexion",
        label: "Complexion",
        input: InputKind::Select(COMPLEXIONS),
        required: true,
    },
    FieldSpec {
        name: "profession",
        label: "Profession",
        input: InputKind::Text,
        required: true,
    },
    FieldSpec {
        name: "bloodGroup",
        label: "Blood group",
        input: InputKind::Select(BLOOD_GROUPS),
        required: true,
    },
    FieldSpec {
        name: "permanentLocation",
        label: "Permanent address",
        input: InputKind::District,
        required: true,
    },
    FieldSpec {
        name: "permanentArea",
        label: "Permanent area / village",
        input: InputKind::Text,
        required: true,
    },
    FieldSpec {
        name: "healthIssues",
        label: "Health issues",
        input: InputKind::LongText,
        required: true,
    },
    FieldSpec {
        name: "sameAsPermanent",
        label: "Present address same as permanent",
        input: InputKind::Toggle,
        required: true,
    },
    FieldSpec {
        name: "presentArea",
        label: "Present area (if different)",
        input: InputKind::Text,
        required: false,
    },
];

const FAMILY: &[FieldSpec] = &[
    FieldSpec {
        name: "fatherAlive",
        label: "Father alive",
        input: InputKind::Toggle,
        required: true,
    },
    FieldSpec {
        name: "motherAlive",
        label: "Mother alive",
        input: InputKind::Toggle,
        required: true,
    },
    FieldSpec {
        name: "brothersCount",
        label: "Number of brothers",
        input: InputKind::Integer { min: 0, max: 20 },
        required: true,
    },
    FieldSpec {
        name: "sistersCount",
        label: "Number of sisters",
        input: InputKind::Integer { min: 0, max: 20 },
        required: true,
    },
    FieldSpec {
        name: "familyStatus",
        label: "Family financial status",
        input: InputKind::Select(FAMILY_STATUSES),
        required: true,
    },
    FieldSpec {
        name: "fatherProfession",
        label: "Father's profession",
        input: InputKind::Text,
        required: false,
    },
];

const EDUCATION: &[FieldSpec] = &[
    FieldSpec {
        name: "educationMedium",
        label: "Education medium",
        input: InputKind::Select(EDUCATION_MEDIUMS),
        required: true,
    },
    FieldSpec {
        name: "highestEducation",
        label: "Highest education",
        input: InputKind::Text,
        required: true,
    },
    FieldSpec {
        name: "institution",
        label: "Institution",
        input: InputKind::Text,
        required: false,
    },
    FieldSpec {
        name: "passingYear",
        label: "Passing year",
        input: InputKind::Integer { min: 1950, max: 2030 },
        required: false,
    },
    FieldSpec {
        name: "occupationDetails",
        label: "Occupation details",
        input: InputKind::LongText,
        required: true,
    },
];

const PREFERENCE: &[FieldSpec] = &[
    FieldSpec {
        name: "partnerAgeMin",
        label: "Partner age from",
        input: InputKind::Integer { min: 18, max: 90 },
        required: true,
    },
    FieldSpec {
        name: "partnerAgeMax",
        label: "Partner age to",
        input: InputKind::Integer { min: 18, max: 90 },
        required: true,
    },
    FieldSpec {
        name: "partnerMaritalStatus",
        label: "Partner marital status",
        input: InputKind::Select(MARITAL_STATUSES),
        required: true,
    },
    FieldSpec {
        name: "partnerDistricts",
        label: "Preferred districts",
        input: InputKind::Text,
        required: false,
    },
    FieldSpec {
        name: "partnerExpectations",
        label: "Expectations",
        input: InputKind::LongText,
        required: false,
    },
];

const CONTACT: &[FieldSpec] = &[
    FieldSpec {
        name: "email",
        label: "Email",
        input: InputKind::Text,
        required: true,
    },
    FieldSpec {
        name: "guardianPhone",
        label: "Guardian's phone",
        input: InputKind::Text,
        required: true,
    },
    FieldSpec {
        name: "relationWithGuardian",
        label: "Relation with guardian",
        input: InputKind::Text,
        required: false,
    },
];

const STEPS: &[StepSchema] = &[
    StepSchema {
        number: 1,
        title: "Personal information",
        fields: PERSONAL,
    },
    StepSchema {
        number: 2,
        title: "Family information",
        fields: FAMILY,
    },
    StepSchema {
        number: 3,
        title: "Education & career",
        fields: EDUCATION,
    },
    StepSchema {
        number: 4,
        title: "Partner preference",
        fields: PREFERENCE,
    },
    StepSchema {
        number: 5,
        title: "Contact",
        fields: CONTACT,
    },
];

/// All wizard steps in page order.
pub fn steps() -> &'static [StepSchema] {
    STEPS
}

/// Schema for one step, if the step number is in range.
pub fn step_schema(step: u8) -> Option<&'static StepSchema> {
    STEPS.iter().find(|s| s.number == step)
}

/// Run the required-field checks for `step` against the form data.
///
/// Returns the full error map for the step: empty means the step validates.
/// An unknown step number has no rules and therefore no errors.
pub fn validate_step(step: u8, form_data: &FormData) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    let Some(schema) = step_schema(step) else {
        return errors;
    };

    for field in schema.fields.iter().filter(|f| f.required) {
        let filled = form_data.get(field.name).is_some_and(FieldValue::is_filled);
        if !filled {
            errors.insert(
                field.name.to_string(),
                format!("{} is required", field.label),
            );
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_steps_in_page_order() {
        assert_eq!(steps().len(), TOTAL_STEPS as usize);
        for (idx, schema) in steps().iter().enumerate() {
            assert_eq!(schema.number as usize, idx + 1);
        }
    }

    #[test]
    fn unknown_step_has_no_rules() {
        assert!(validate_step(0, &FormData::new()).is_empty());
        assert!(validate_step(99, &FormData::new()).is_empty());
    }

    #[test]
    fn step_one_requires_the_personal_fields() {
        let mut form = FormData::new();
        form.insert("religion".into(), "Islam".into());

        let errors = validate_step(1, &form);
        assert!(!errors.contains_key("religion"));
        assert!(errors.contains_key("biodataType"));
        assert!(errors.contains_key("dateOfBirth"));
        assert_eq!(errors["maritalStatus"], "Marital status is required");
    }

    #[test]
    fn optional_fields_never_error() {
        let errors = validate_step(3, &FormData::new());
        assert!(!errors.contains_key("institution"));
        assert!(!errors.contains_key("passingYear"));
        assert!(errors.contains_key("educationMedium"));
    }

    #[test]
    fn toggle_false_counts_as_answered() {
        let mut form = FormData::new();
        for spec in step_schema(2).unwrap().fields {
            if spec.required {
                form.insert(spec.name.to_string(), FieldValue::Bool(false));
            }
        }
        // Bool(false) everywhere still satisfies the required checks; the
        // numeric fields accept any filled value at this layer.
        assert!(validate_step(2, &form).is_empty());
    }
}
