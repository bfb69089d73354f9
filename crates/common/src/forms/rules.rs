//! Composable validation rule primitives.
//!
//! Every primitive except [`required`] passes on a blank value, so a
//! field can be optional-but-well-formed-if-present; chains compose
//! presence and shape independently, e.g. `vec![required(), email()]`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::FieldValue;

/// A pure check over a field value and the full values snapshot.
///
/// Returns `Err(message)` on failure; chains stop at the first failure.
pub trait FieldRule: Send + Sync {
    fn check(
        &self,
        value: &FieldValue,
        values: &HashMap<String, FieldValue>,
    ) -> Result<(), String>;
}

impl<F> FieldRule for F
where
    F: Fn(&FieldValue, &HashMap<String, FieldValue>) -> Result<(), String> + Send + Sync,
{
    fn check(
        &self,
        value: &FieldValue,
        values: &HashMap<String, FieldValue>,
    ) -> Result<(), String> {
        self(value, values)
    }
}

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid and well-formed")
});

struct Required {
    message: String,
}

impl FieldRule for Required {
    fn check(&self, value: &FieldValue, _: &HashMap<String, FieldValue>) -> Result<(), String> {
        let absent = match value {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        };
        if absent {
            return Err(self.message.clone());
        }
        Ok(())
    }
}

/// Fails when the value is absent or a whitespace-only string.
pub fn required() -> Box<dyn FieldRule> {
    required_msg("This field is required")
}

/// [`required`] with a custom message.
pub fn required_msg(message: impl Into<String>) -> Box<dyn FieldRule> {
    Box::new(Required { message: message.into() })
}

struct Email {
    message: String,
}

impl FieldRule for Email {
    fn check(&self, value: &FieldValue, _: &HashMap<String, FieldValue>) -> Result<(), String> {
        if value.is_blank() {
            return Ok(());
        }
        match value.as_text() {
            Some(text) if EMAIL_REGEX.is_match(text) => Ok(()),
            _ => Err(self.message.clone()),
        }
    }
}

/// Fails when a non-empty value is not `local@domain.tld`-shaped.
pub fn email() -> Box<dyn FieldRule> {
    email_msg("Please enter a valid email")
}

/// [`email`] with a custom message.
pub fn email_msg(message: impl Into<String>) -> Box<dyn FieldRule> {
    Box::new(Email { message: message.into() })
}

struct Length {
    min: Option<usize>,
    max: Option<usize>,
    message: String,
}

impl FieldRule for Length {
    fn check(&self, value: &FieldValue, _: &HashMap<String, FieldValue>) -> Result<(), String> {
        if value.is_blank() {
            return Ok(());
        }
        let Some(text) = value.as_text() else {
            return Ok(());
        };
        let len = text.chars().count();
        if self.min.is_some_and(|min| len < min) || self.max.is_some_and(|max| len > max) {
            return Err(self.message.clone());
        }
        Ok(())
    }
}

/// Fails when a non-empty string is shorter than `min` characters.
pub fn min_length(min: usize) -> Box<dyn FieldRule> {
    min_length_msg(min, format!("Must be at least {min} characters"))
}

/// [`min_length`] with a custom message.
pub fn min_length_msg(min: usize, message: impl Into<String>) -> Box<dyn FieldRule> {
    Box::new(Length { min: Some(min), max: None, message: message.into() })
}

/// Fails when a non-empty string is longer than `max` characters.
pub fn max_length(max: usize) -> Box<dyn FieldRule> {
    max_length_msg(max, format!("Must be at most {max} characters"))
}

/// [`max_length`] with a custom message.
pub fn max_length_msg(max: usize, message: impl Into<String>) -> Box<dyn FieldRule> {
    Box::new(Length { min: None, max: Some(max), message: message.into() })
}

struct Pattern {
    regex: Regex,
    message: String,
}

impl FieldRule for Pattern {
    fn check(&self, value: &FieldValue, _: &HashMap<String, FieldValue>) -> Result<(), String> {
        if value.is_blank() {
            return Ok(());
        }
        match value.as_text() {
            Some(text) if self.regex.is_match(text) => Ok(()),
            _ => Err(self.message.clone()),
        }
    }
}

/// Fails when a non-empty value does not match `regex`.
pub fn pattern(regex: Regex) -> Box<dyn FieldRule> {
    pattern_msg(regex, "Invalid format")
}

/// [`pattern`] with a custom message.
pub fn pattern_msg(regex: Regex, message: impl Into<String>) -> Box<dyn FieldRule> {
    Box::new(Pattern { regex, message: message.into() })
}

struct Url {
    message: String,
}

impl FieldRule for Url {
    fn check(&self, value: &FieldValue, _: &HashMap<String, FieldValue>) -> Result<(), String> {
        if value.is_blank() {
            return Ok(());
        }
        match value.as_text() {
            Some(text) if ::url::Url::parse(text).is_ok() => Ok(()),
            _ => Err(self.message.clone()),
        }
    }
}

/// Fails when a non-empty value is not a well-formed absolute URL.
pub fn url() -> Box<dyn FieldRule> {
    url_msg("Please enter a valid URL")
}

/// [`url`] with a custom message.
pub fn url_msg(message: impl Into<String>) -> Box<dyn FieldRule> {
    Box::new(Url { message: message.into() })
}
