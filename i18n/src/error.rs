//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while loading translations or switching locales.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Locale is not available: {locale}")]
    UnavailableLocale { locale: String },

    #[error("Invalid translations for locale {locale}: {message}")]
    InvalidTranslations { locale: String, message: String },

    #[error("Invalid translation document: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn unavailable_locale(locale: impl Into<String>) -> Self {
        Self::UnavailableLocale {
            locale: locale.into(),
        }
    }

    pub fn invalid_translations(locale: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTranslations {
            locale: locale.into(),
            message: message.into(),
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
