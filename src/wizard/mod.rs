//! Multi-step biodata form controller.
//!
//! Owns wizard navigation state (current step, furthest step reached,
//! per-step validation errors) and the form record accumulated across
//! steps. Step views call into it for navigation and data mutation; it
//! knows nothing about rendering, persistence, or HTTP; those belong to
//! the surrounding client (TUI screen or REST route).
//!
//! Every operation is a total function: out-of-range step numbers are
//! ignored rather than raised, and malformed saved records are normalized
//! best-effort. A form-filling session cannot be wedged by bad input.

pub mod rules;
pub mod types;

pub use rules::{step_schema, steps, validate_step, FieldSpec, InputKind, StepSchema, TOTAL_STEPS};
pub use types::{
    collapse_location, normalize_completed_steps, CompletedStepsInput, FieldValue, FormData,
    StepEntry, WizardRecord,
};

use std::collections::{BTreeMap, BTreeSet};


/// Navigation and validation state for one form-filling session.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardController {
    total_steps: u8,
    current_step: u8,
    highest_step_reached: u8,
    form_data: FormData,
    errors: BTreeMap<String, String>,
    completed_steps: BTreeSet<u8>,
}

impl WizardController {
    /// Fresh wizard at step 1 with an empty form.
    pub fn new(total_steps: u8) -> Self {
        Self {
            total_steps: total_steps.max(1),
            current_step: 1,
            highest_step_reached: 1,
            form_data: FormData::new(),
            errors: BTreeMap::new(),
            completed_steps: BTreeSet::new(),
        }
    }

    /// Seed initial form values (e.g. numeric range defaults) at creation.
    pub fn with_defaults<I>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        self.form_data.extend(defaults);
        self
    }

    /// The standard biodata wizard: the rule-table step count and the
    /// partner-age range defaults the preference step expects.
    pub fn standard() -> Self {
        Self::new(rules::TOTAL_STEPS).with_defaults([
            ("partnerAgeMin".to_string(), FieldValue::Number(18.0)),
            ("partnerAgeMax".to_string(), FieldValue::Number(40.0)),
        ])
    }

    pub fn total_steps(&self) -> u8 {
        self.total_steps
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn highest_step_reached(&self) -> u8 {
        self.highest_step_reached
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.total_steps
    }

    pub fn form_data(&self) -> &FormData {
        &self.form_data
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.form_data.get(name)
    }

    /// Errors from the most recent validation run. Empty exactly when that
    /// run passed.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn completed_steps(&self) -> &BTreeSet<u8> {
        &self.completed_steps
    }

    /// Shallow-merge field values into the form. New keys are added,
    /// existing keys overwritten; errors and step position are untouched.
    pub fn update_form_data<I>(&mut self, partial: I)
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        self.form_data.extend(partial);
    }

    /// Advance one step. No-op on the last step. Does not validate: the
    /// caller decides whether advancing requires a passing step.
    pub fn next_step(&mut self) {
        if self.current_step < self.total_steps {
            self.current_step += 1;
            self.highest_step_reached = self.highest_step_reached.max(self.current_step);
        }
    }

    /// Go back one step. No-op on step 1. Never lowers the furthest
    /// progress marker.
    pub fn prev_step(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
    }

    /// Jump directly to step `n`. Out-of-range numbers are ignored. The
    /// reachability policy (only completed or current steps are clickable)
    /// is the step indicator's concern, not enforced here.
    pub fn go_to_step(&mut self, n: u8) {
        if (1..=self.total_steps).contains(&n) {
            self.current_step = n;
            self.highest_step_reached = self.highest_step_reached.max(n);
        }
    }

    /// Run the rule table for the current step, replacing the error map
    /// wholesale. Returns whether the step validates.
    pub fn validate_current_step(&mut self) -> bool {
        self.errors = rules::validate_step(self.current_step, &self.form_data);
        self.errors.is_empty()
    }

    /// Record a step as done. Callers mark steps after a validated save;
    /// out-of-range numbers are ignored.
    pub fn mark_step_complete(&mut self, n: u8) {
        if (1..=self.total_steps).contains(&n) {
            self.completed_steps.insert(n);
        }
    }

    /// Merge a previously saved record into the session.
    ///
    /// Field values always merge (with the location sub-fields collapsed
    /// into their combined display field first). When `preserve_current_step`
    /// is false the record is authoritative about position: `currentStep`
    /// is adopted (clamped into range, 1 if absent) and the furthest
    /// progress is recomputed from the normalized completed-step set.
    /// Completing a step implies every earlier step is complete.
    pub fn load_form_data(&mut self, record: WizardRecord, preserve_current_step: bool) {
        let WizardRecord {
            current_step,
            completed_steps,
            mut fields,
        } = record;

        types::collapse_location(&mut fields, "permanent");
        types::collapse_location(&mut fields, "present");
        let merged = fields.len();
        self.form_data.extend(fields);

        if !preserve_current_step {
            self.current_step = current_step
                .unwrap_or(1)
                .clamp(1, u32::from(self.total_steps)) as u8;

            let normalized = types::normalize_completed_steps(completed_steps.as_ref());
            // Forward-inferring policy: a completed step implies all prior
            // steps, so the effective set is 1..=max(normalized).
            self.completed_steps = match normalized.iter().max() {
                Some(&max) => (1..=max.min(self.total_steps)).collect(),
                None => BTreeSet::new(),
            };
            self.highest_step_reached = self
                .completed_steps
                .iter()
                .max()
                .copied()
                .unwrap_or(self.current_step)
                .max(self.current_step);
        }

        tracing::debug!(
            merged_fields = merged,
            current_step = self.current_step,
            highest = self.highest_step_reached,
            preserved = preserve_current_step,
            "loaded saved wizard record"
        );
    }

    /// Snapshot the session as a persistable record.
    pub fn snapshot(&self) -> WizardRecord {
        WizardRecord {
            current_step: Some(u32::from(self.current_step)),
            completed_steps: Some(CompletedStepsInput::Many(
                self.completed_steps
                    .iter()
                    .map(|&s| StepEntry::Num(f64::from(s)))
                    .collect(),
            )),
            fields: self.form_data.clone(),
        }
    }
}

impl Default for WizardController {
    fn default() -> Self {
        Self::standard()
    }
}
