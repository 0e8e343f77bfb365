//! Store create/update form.

use serde::Deserialize;

use crate::validation::{FieldErrors, optional_text, optional_url, required_text};

/// Body of a store create or update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreForm {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub theme_color: Option<String>,
    pub description: Option<String>,
}

/// A validated store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidStore {
    pub name: String,
    pub logo_url: Option<String>,
    pub theme_color: Option<String>,
    pub description: Option<String>,
}

impl StoreForm {
    pub const NAME_MAX: usize = 255;
    pub const LOGO_URL_MAX: usize = 255;
    pub const THEME_COLOR_MAX: usize = 50;
    pub const DESCRIPTION_MAX: usize = 500;

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns every failing field in a [`FieldErrors`] map.
    pub fn validate(self) -> Result<ValidStore, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required_text(&mut errors, "name", self.name.as_deref(), Self::NAME_MAX);
        let logo_url = optional_url(
            &mut errors,
            "logo_url",
            self.logo_url.as_deref(),
            Self::LOGO_URL_MAX,
        );
        let theme_color = optional_text(
            &mut errors,
            "theme_color",
            self.theme_color.as_deref(),
            Self::THEME_COLOR_MAX,
        );
        let description = optional_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            Self::DESCRIPTION_MAX,
        );

        match name {
            Some(name) if errors.is_empty() => Ok(ValidStore {
                name,
                logo_url,
                theme_color,
                description,
            }),
            _ => Err(errors),
        }
    }
}
