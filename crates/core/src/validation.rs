//! Field-level validation results.
//!
//! Every input form validates eagerly and reports *all* failing fields at
//! once as a [`FieldErrors`] map, which serializes to
//! `{"field": ["message", ...]}` for the HTTP error envelope.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

/// Accumulated validation failures keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map holding a single error.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Whether no errors have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Iterate over `(field, messages)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Convert into `Ok(value)` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Validate a required text field, returning the trimmed value.
///
/// Records `"This field is required."` when missing or blank, and a length
/// message when longer than `max` characters.
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    check_length(errors, field, trimmed, max)
}

/// Validate an optional text field, returning the trimmed value.
///
/// Blank input is treated as absent.
pub fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let trimmed = value.map(str::trim).filter(|s| !s.is_empty())?;
    check_length(errors, field, trimmed, max)
}

/// Validate an optional absolute `http`/`https` URL.
pub fn optional_url(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let text = optional_text(errors, field, value, max)?;
    match Url::parse(&text) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Some(text)
        }
        _ => {
            errors.add(field, "Invalid URL.");
            None
        }
    }
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) -> Option<String> {
    if value.chars().count() > max {
        errors.add(field, format!("Field cannot be longer than {max} characters."));
        return None;
    }
    Some(value.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            required_text(&mut errors, "name", Some("  Mug Life "), 10),
            Some("Mug Life".to_string())
        );
        assert!(errors.is_empty());

        assert_eq!(required_text(&mut errors, "name", Some("   "), 10), None);
        assert_eq!(required_text(&mut errors, "other", None, 10), None);
        assert_eq!(
            errors.get("name").unwrap(),
            ["This field is required.".to_string()]
        );
        assert!(errors.get("other").is_some());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        assert!(required_text(&mut errors, "name", Some("ééé"), 3).is_some());
        assert!(required_text(&mut errors, "name", Some("éééé"), 3).is_none());
        assert_eq!(
            errors.get("name").unwrap(),
            ["Field cannot be longer than 3 characters.".to_string()]
        );
    }

    #[test]
    fn test_optional_text_blank_is_absent() {
        let mut errors = FieldErrors::new();
        assert_eq!(optional_text(&mut errors, "d", Some("  "), 5), None);
        assert_eq!(optional_text(&mut errors, "d", None, 5), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_optional_url() {
        let mut errors = FieldErrors::new();
        assert!(optional_url(&mut errors, "u", Some("https://placehold.co/200x200"), 255).is_some());
        assert!(errors.is_empty());

        assert!(optional_url(&mut errors, "u", Some("not a url"), 255).is_none());
        assert!(optional_url(&mut errors, "v", Some("ftp://example.com/x"), 255).is_none());
        assert_eq!(errors.get("u").unwrap(), ["Invalid URL.".to_string()]);
        assert!(errors.get("v").is_some());
    }

    #[test]
    fn test_serialize_and_display() {
        let mut errors = FieldErrors::single("b", "second");
        errors.add("a", "first");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"a": ["first"], "b": ["second"]}));
        assert_eq!(errors.to_string(), "a: first; b: second");
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(5), Ok(5));
        assert!(FieldErrors::single("x", "bad").into_result(5).is_err());
    }
}
