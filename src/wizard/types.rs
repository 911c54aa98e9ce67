//! Value types shared by the wizard controller and its callers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single form field value as it arrives from the web client.
///
/// The biodata form is open-ended: step views submit whatever fields they
/// own, and the controller accumulates them without interpreting most of
/// them. Untagged so plain JSON scalars round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// A field counts as filled unless it is text that is empty after
    /// trimming. Booleans are always filled: `false` is a deliberate answer
    /// (e.g. the same-as-permanent flag).
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Bool(b) => write!(f, "{}", if *b { "Yes" } else { "No" }),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// The open field map accumulated across wizard steps.
pub type FormData = BTreeMap<String, FieldValue>;

/// The shapes `completedSteps` has been observed to arrive in from saved
/// records: a list of numbers, a list of numeric strings, a single
/// comma-separated string, or a bare number. One normalization function
/// turns any of them into a canonical step set; everything unparseable is
/// dropped rather than surfaced as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletedStepsInput {
    Many(Vec<StepEntry>),
    One(f64),
    Csv(String),
}

/// A single entry inside a `completedSteps` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepEntry {
    Num(f64),
    Text(String),
}

fn step_from_f64(n: f64) -> Option<u8> {
    if n.fract() == 0.0 && (1.0..=255.0).contains(&n) {
        Some(n as u8)
    } else {
        None
    }
}

impl CompletedStepsInput {
    /// Normalize into a canonical set of step numbers.
    pub fn normalize(&self) -> BTreeSet<u8> {
        match self {
            CompletedStepsInput::Many(entries) => entries
                .iter()
                .filter_map(|entry| match entry {
                    StepEntry::Num(n) => step_from_f64(*n),
                    StepEntry::Text(s) => s.trim().parse().ok(),
                })
                .collect(),
            CompletedStepsInput::One(n) => step_from_f64(*n).into_iter().collect(),
            CompletedStepsInput::Csv(raw) => raw
                .split(',')
                .filter_map(|token| token.trim().parse().ok())
                .collect(),
        }
    }
}

/// Normalize an optional `completedSteps` value; absent means nothing done.
pub fn normalize_completed_steps(input: Option<&CompletedStepsInput>) -> BTreeSet<u8> {
    input.map(CompletedStepsInput::normalize).unwrap_or_default()
}

/// A saved wizard record as loaded from (or persisted to) a profile store.
///
/// `currentStep` and `completedSteps` are positional metadata; every other
/// key is an ordinary form field and flattens into the map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WizardRecord {
    #[serde(rename = "currentStep", default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u32>,
    #[serde(
        rename = "completedSteps",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_steps: Option<CompletedStepsInput>,
    #[serde(flatten)]
    pub fields: FormData,
}

/// Collapse the four location sub-fields under `prefix` (e.g.
/// `permanentCountry` .. `permanentArea`) into a combined
/// `"Country > Division > District > Area"` display field.
///
/// The sub-fields stay in the map untouched; the combined field is only
/// written when at least one sub-field is present and the combined field is
/// not already filled, so an explicit value from the client wins.
pub fn collapse_location(fields: &mut FormData, prefix: &str) {
    let combined_key = format!("{prefix}Location");
    if fields.get(&combined_key).is_some_and(FieldValue::is_filled) {
        return;
    }

    let parts: Vec<String> = ["Country", "Division", "District", "Area"]
        .iter()
        .filter_map(|suffix| fields.get(&format!("{prefix}{suffix}")))
        .filter(|value| value.is_filled())
        .map(ToString::to_string)
        .collect();

    if !parts.is_empty() {
        fields.insert(combined_key, FieldValue::Text(parts.join(" > ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_untagged_roundtrip() {
        let json = r#"{"age": 27, "religion": "Islam", "sameAsPermanent": true}"#;
        let map: FormData = serde_json::from_str(json).unwrap();
        assert_eq!(map["age"], FieldValue::Number(27.0));
        assert_eq!(map["religion"], FieldValue::Text("Islam".to_string()));
        assert_eq!(map["sameAsPermanent"], FieldValue::Bool(true));
    }

    #[test]
    fn blank_text_is_not_filled() {
        assert!(!FieldValue::Text("   ".to_string()).is_filled());
        assert!(FieldValue::Bool(false).is_filled());
        assert!(FieldValue::Number(0.0).is_filled());
    }

    #[test]
    fn completed_steps_forms_normalize_identically() {
        let expected: BTreeSet<u8> = [1, 2].into_iter().collect();

        let as_numbers: CompletedStepsInput = serde_json::from_str("[1, 2]").unwrap();
        let as_strings: CompletedStepsInput = serde_json::from_str(r#"["1", "2"]"#).unwrap();
        let as_csv: CompletedStepsInput = serde_json::from_str(r#""1,2""#).unwrap();

        assert_eq!(as_numbers.normalize(), expected);
        assert_eq!(as_strings.normalize(), expected);
        assert_eq!(as_csv.normalize(), expected);
    }

    #[test]
    fn unparseable_entries_are_dropped() {
        let mixed: CompletedStepsInput = serde_json::from_str(r#"[1, "two", "3"]"#).unwrap();
        assert_eq!(mixed.normalize(), [1, 3].into_iter().collect());

        let garbage = CompletedStepsInput::Csv("a,b,".to_string());
        assert!(garbage.normalize().is_empty());
    }

    #[test]
    fn single_number_normalizes_to_singleton() {
        let one = CompletedStepsInput::One(3.0);
        assert_eq!(one.normalize(), [3].into_iter().collect());
        // Fractional or out-of-range values are not steps.
        assert!(CompletedStepsInput::One(2.5).normalize().is_empty());
        assert!(CompletedStepsInput::One(-1.0).normalize().is_empty());
    }

    #[test]
    fn wizard_record_flattens_fields() {
        let json = r#"{"currentStep": 3, "completedSteps": [1, 2], "religion": "Islam"}"#;
        let record: WizardRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.current_step, Some(3));
        assert_eq!(
            record.fields.get("religion"),
            Some(&FieldValue::Text("Islam".to_string()))
        );
        assert!(!record.fields.contains_key("currentStep"));
    }

    #[test]
    fn collapse_location_joins_present_parts() {
        let mut fields = FormData::new();
        fields.insert("permanentCountry".into(), "Bangladesh".into());
        fields.insert("permanentDivision".into(), "Dhaka".into());
        fields.insert("permanentDistrict".into(), "Gazipur".into());
        fields.insert("permanentArea".into(), "Sreepur".into());

        collapse_location(&mut fields, "permanent");

        assert_eq!(
            fields["permanentLocation"],
            FieldValue::Text("Bangladesh > Dhaka > Gazipur > Sreepur".to_string())
        );
        // Sub-fields survive the collapse.
        assert_eq!(fields["permanentDistrict"], "Gazipur".into());
    }

    #[test]
    fn collapse_location_keeps_explicit_combined_value() {
        let mut fields = FormData::new();
        fields.insert("permanentLocation".into(), "already set".into());
        fields.insert("permanentCountry".into(), "Bangladesh".into());

        collapse_location(&mut fields, "permanent");

        assert_eq!(fields["permanentLocation"], "already set".into());
    }
}
