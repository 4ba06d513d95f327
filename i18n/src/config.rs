//! Catalog configuration.

use serde::Deserialize;

/// Locale settings for a [`Catalog`](crate::Catalog).
///
/// Can be deserialized from any serde format, e.g.
/// `{"default_locale": "en", "available_locales": ["en", "br"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale active when the catalog is created.
    pub default_locale: String,
    /// Locales that `set_locale` accepts. Empty means any locale.
    pub available_locales: Vec<String>,
    /// Whether lookups that miss in the active locale retry in the default locale.
    pub fallbacks: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            available_locales: Vec::new(),
            fallbacks: true,
        }
    }
}

impl I18nConfig {
    /// Check whether `locale` may be activated.
    pub fn is_available(&self, locale: &str) -> bool {
        self.available_locales.is_empty()
            || locale == self.default_locale
            || self.available_locales.iter().any(|l| l == locale)
    }
}
