//! Generic form-state container with per-field validation chains.
//!
//! `FormState` owns the values, errors and touched flags of one form,
//! decoupled from any particular set of fields. Validation runs on blur
//! and on submit, never on every keystroke: `handle_change` only clears a
//! stale error so the user is not shouted at mid-typing, and the chain is
//! re-evaluated when the field loses focus or the form is submitted.
//!
//! Validators are pure functions with first-failure-wins semantics. The
//! composable primitives ([`required`], [`email`], [`min_length`], ...)
//! treat empty values as passing, so presence is enforced only by
//! composing [`required`] into a chain.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::PathBuf;

mod rules;

pub use rules::{
    email, email_msg, max_length, max_length_msg, min_length, min_length_msg, pattern,
    pattern_msg, required, required_msg, url, url_msg, FieldRule,
};

/// Handle to a file selected through a picker widget.
///
/// Only the metadata needed to later build a multipart upload is kept;
/// the engine never reads the file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub path: Option<PathBuf>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), path: None }
    }

    pub fn with_path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: Some(path.into()) }
    }
}

/// Current value of a single form field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value captured yet
    Empty,
    Text(String),
    Flag(bool),
    Number(f64),
    File(FileHandle),
}

impl FieldValue {
    /// True when there is nothing to validate: no value at all, or an
    /// empty string. Optional primitives pass on blank values.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Raw change event from an input widget, before interpretation
#[derive(Debug, Clone)]
pub enum FieldInput {
    Text(String),
    Checkbox(bool),
    /// All files currently selected by a picker; only the first is kept
    Files(Vec<FileHandle>),
}

impl FieldInput {
    fn into_value(self) -> FieldValue {
        match self {
            Self::Text(s) => FieldValue::Text(s),
            Self::Checkbox(b) => FieldValue::Flag(b),
            Self::Files(mut files) => {
                if files.is_empty() {
                    FieldValue::Empty
                } else {
                    FieldValue::File(files.remove(0))
                }
            }
        }
    }
}

/// Ordered validation chains keyed by field name
#[derive(Default)]
pub struct RuleSet {
    chains: HashMap<String, Vec<Box<dyn FieldRule>>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an ordered chain to a field. Replaces any previous chain.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, chain: Vec<Box<dyn FieldRule>>) -> Self {
        self.chains.insert(name.into(), chain);
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    /// Evaluate a field's chain against `value` and the full snapshot.
    /// Stops at the first failing rule. Fields without rules pass.
    pub fn run(
        &self,
        name: &str,
        value: &FieldValue,
        values: &HashMap<String, FieldValue>,
    ) -> Result<(), String> {
        if let Some(chain) = self.chains.get(name) {
            for rule in chain {
                rule.check(value, values)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet").field("fields", &self.chains.keys().collect::<Vec<_>>()).finish()
    }
}

/// Field-state container: values, errors, touched flags and the
/// submission-in-progress flag for one form.
///
/// Error and touched entries only ever exist for fields that have rules;
/// the values map may carry untracked keys freely.
pub struct FormState {
    initial: HashMap<String, FieldValue>,
    values: HashMap<String, FieldValue>,
    errors: HashMap<String, String>,
    touched: HashSet<String>,
    rules: RuleSet,
    submitting: bool,
}

impl FormState {
    /// Build a form from initial values and validation rules, with empty
    /// error/touched state.
    pub fn new(initial_values: HashMap<String, FieldValue>, rules: RuleSet) -> Self {
        Self {
            values: initial_values.clone(),
            initial: initial_values,
            errors: HashMap::new(),
            touched: HashSet::new(),
            rules,
            submitting: false,
        }
    }

    /// Record a change event for `name`, interpreting the raw input
    /// (checkbox → flag, file picker → first selected handle).
    ///
    /// An existing error on the field is cleared immediately without
    /// running validators; the chain runs again on blur or submit.
    pub fn handle_change(&mut self, name: &str, input: FieldInput) {
        self.values.insert(name.to_string(), input.into_value());
        self.errors.remove(name);
    }

    /// Mark `name` touched and re-validate it against the current
    /// snapshot, storing the first failure (or clearing the error when
    /// the whole chain passes).
    pub fn handle_blur(&mut self, name: &str) {
        if !self.rules.has(name) {
            return;
        }
        self.touched.insert(name.to_string());

        let value = self.values.get(name).cloned().unwrap_or(FieldValue::Empty);
        match self.rules.run(name, &value, &self.values) {
            Ok(()) => {
                self.errors.remove(name);
            }
            Err(message) => {
                self.errors.insert(name.to_string(), message);
            }
        }
    }

    /// Run every ruled field's chain (touched or not), rebuilding the
    /// complete error map. Returns true iff no field failed. This is the
    /// submit gate.
    pub fn validate_all(&mut self) -> bool {
        let mut errors = HashMap::new();
        for name in self.rules.field_names() {
            let value = self.values.get(name).cloned().unwrap_or(FieldValue::Empty);
            if let Err(message) = self.rules.run(name, &value, &self.values) {
                errors.insert(name.to_string(), message);
            }
        }
        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }

    /// Gate a submission on full validation.
    ///
    /// Touches every ruled field, then validates. When invalid, returns
    /// `Ok(None)` without invoking the callback, leaving the errors
    /// populated for display. When valid, sets the submitting flag,
    /// awaits `on_valid` with a snapshot of the values, and resets the
    /// flag on every exit path; a callback error propagates to the
    /// caller after the flag is reset.
    pub async fn handle_submit<F, Fut, T, E>(&mut self, on_valid: F) -> Result<Option<T>, E>
    where
        F: FnOnce(HashMap<String, FieldValue>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let names: Vec<String> = self.rules.field_names().map(str::to_string).collect();
        self.touched.extend(names);

        if !self.validate_all() {
            return Ok(None);
        }

        self.submitting = true;
        let outcome = on_valid(self.values.clone()).await;
        self.submitting = false;
        outcome.map(Some)
    }

    /// Programmatic value override, e.g. pre-populating an edit form.
    /// Does not touch the field or clear its error.
    pub fn set_value(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    /// Surface an externally produced error (e.g. a server-side
    /// validation message) on a ruled field. Unruled fields are ignored
    /// to keep the error map a subset of the rule map.
    pub fn set_field_error(&mut self, name: &str, message: impl Into<String>) {
        if !self.rules.has(name) {
            return;
        }
        let message = message.into();
        if message.is_empty() {
            self.errors.remove(name);
        } else {
            self.errors.insert(name.to_string(), message);
        }
    }

    /// Restore initial values and clear errors, touched flags and the
    /// submitting flag.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
        self.submitting = false;
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn values(&self) -> &HashMap<String, FieldValue> {
        &self.values
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("touched", &self.touched)
            .field("submitting", &self.submitting)
            .finish()
    }
}
