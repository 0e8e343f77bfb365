//! Tag names and comma-separated tag lists.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TagName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TagNameError {
    /// The name is empty after trimming.
    #[error("tag name cannot be empty")]
    Empty,
    /// The name is longer than the column allows.
    #[error("tag '{name}' must be at most {max} characters")]
    TooLong {
        /// The offending name.
        name: String,
        /// Maximum allowed length.
        max: usize,
    },
}

/// A trimmed, non-empty tag name.
///
/// Tag names are global: two stores tagging products `summer` share one row.
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    /// Maximum length of a tag name.
    pub const MAX_LENGTH: usize = 50;

    /// Parse a single tag name.
    ///
    /// # Errors
    ///
    /// Returns [`TagNameError`] if the trimmed name is empty or too long.
    pub fn parse(s: &str) -> Result<Self, TagNameError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TagNameError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(TagNameError::TooLong {
                name: s.to_owned(),
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the tag name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a comma-separated tag list into distinct tag names.
///
/// Tokens are trimmed and empty tokens are dropped. A name repeated in the
/// input appears once, at its first position.
///
/// # Errors
///
/// Returns [`TagNameError::TooLong`] for the first token that exceeds
/// [`TagName::MAX_LENGTH`].
///
/// # Examples
///
/// ```
/// use storekeep_core::parse_tag_list;
///
/// let tags = parse_tag_list(" summer, shirt ,,summer").unwrap();
/// let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
/// assert_eq!(names, ["summer", "shirt"]);
/// ```
pub fn parse_tag_list(csv: &str) -> Result<Vec<TagName>, TagNameError> {
    let mut names: Vec<TagName> = Vec::new();
    for token in csv.split(',') {
        let name = match TagName::parse(token) {
            Ok(name) => name,
            Err(TagNameError::Empty) => continue,
            Err(e) => return Err(e),
        };
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}
