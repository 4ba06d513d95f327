//! The Catalog - locale-aware translation lookup.

use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use regex_lite::{Captures, Regex};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::{I18nConfig, PluralRule};

static INTERPOLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\{(\w+)\}").expect("interpolation pattern is valid"));

/// Options for a single translation lookup.
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    count: Option<usize>,
    params: Vec<(String, String)>,
    default: Option<String>,
    locale: Option<String>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a plural form and expose `%{count}`.
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Add an interpolation parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Template used when no locale has an entry for the key.
    pub fn default_template(mut self, template: impl Into<String>) -> Self {
        self.default = Some(template.into());
        self
    }

    /// Look up in this locale instead of the active one.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    fn param_value(&self, name: &str) -> Option<String> {
        self.params
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .or_else(|| match (name, self.count) {
                ("count", Some(count)) => Some(count.to_string()),
                _ => None,
            })
    }
}

/// Translation catalog with a switchable active locale.
///
/// Translations are nested JSON trees per locale, addressed by dotted keys
/// (`dependent_restrict.basic_message.one`). An entry that is an object
/// holding `zero`/`one`/`other` keys is pluralized with the count of the
/// lookup, using the locale's [`PluralRule`].
///
/// The catalog is `Sync`; share it behind an `Arc`.
#[derive(Debug)]
pub struct Catalog {
    config: I18nConfig,
    locale: RwLock<String>,
    translations: RwLock<HashMap<String, JsonValue>>,
    plural_rules: RwLock<HashMap<String, PluralRule>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog with the default configuration (`en`).
    pub fn new() -> Self {
        Self::from_config(I18nConfig::default())
    }

    /// Create an empty catalog from a configuration.
    pub fn from_config(config: I18nConfig) -> Self {
        Self {
            locale: RwLock::new(config.default_locale.clone()),
            config,
            translations: RwLock::new(HashMap::new()),
            plural_rules: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    // ==================== Locale ====================

    /// The active locale.
    pub fn locale(&self) -> String {
        self.locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switch the active locale.
    pub fn set_locale(&self, locale: &str) -> CatalogResult<()> {
        if !self.config.is_available(locale) {
            return Err(CatalogError::unavailable_locale(locale));
        }
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale.to_string();
        Ok(())
    }

    /// Switch back to the configured default locale.
    pub fn reset_locale(&self) {
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) =
            self.config.default_locale.clone();
    }

    /// Plural rule for a locale (explicitly set, or derived from its code).
    pub fn plural_rule(&self, locale: &str) -> PluralRule {
        self.plural_rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locale)
            .copied()
            .unwrap_or_else(|| PluralRule::for_locale(locale))
    }

    /// Override the plural rule of a locale.
    pub fn set_plural_rule(&self, locale: impl Into<String>, rule: PluralRule) {
        self.plural_rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(locale.into(), rule);
    }

    // ==================== Loading ====================

    /// Deep-merge a translation tree into a locale.
    pub fn store_translations(&self, locale: &str, tree: JsonValue) -> CatalogResult<()> {
        if !tree.is_object() {
            return Err(CatalogError::invalid_translations(
                locale,
                "translation root must be an object",
            ));
        }

        let mut translations = self
            .translations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = translations
            .entry(locale.to_string())
            .or_insert_with(|| JsonValue::Object(Default::default()));
        deep_merge(entry, tree);
        Ok(())
    }

    /// Load a JSON document whose root keys are locales.
    pub fn load_json(&self, source: &str) -> CatalogResult<()> {
        let document: JsonValue = serde_json::from_str(source)?;
        let JsonValue::Object(locales) = document else {
            return Err(CatalogError::invalid_translations(
                "*",
                "document root must map locales to translation trees",
            ));
        };

        for (locale, tree) in locales {
            self.store_translations(&locale, tree)?;
        }
        Ok(())
    }

    // ==================== Lookup ====================

    /// Resolve and interpolate `key`, or `None` when no locale in the
    /// fallback chain has an entry (the lookup default is ignored).
    pub fn lookup(&self, key: &str, options: &Lookup) -> Option<String> {
        let requested = options.locale.clone().unwrap_or_else(|| self.locale());

        for locale in self.fallback_chain(&requested) {
            if let Some(template) = self.resolve(&locale, key, options.count) {
                if locale != requested {
                    debug!(key, from = %requested, to = %locale, "translation fell back");
                }
                return Some(interpolate(&template, options));
            }
        }
        None
    }

    /// Resolve `key`, falling back to the lookup default and finally to a
    /// `translation missing` marker.
    pub fn translate(&self, key: &str, options: &Lookup) -> String {
        if let Some(found) = self.lookup(key, options) {
            return found;
        }
        match &options.default {
            Some(template) => interpolate(template, options),
            None => {
                let locale = options.locale.clone().unwrap_or_else(|| self.locale());
                format!("translation missing: {}.{}", locale, key)
            }
        }
    }

    fn fallback_chain(&self, locale: &str) -> Vec<String> {
        let mut chain = vec![locale.to_string()];
        if let Some((language, _)) = locale.split_once(['-', '_']) {
            chain.push(language.to_string());
        }
        if self.config.fallbacks && !chain.contains(&self.config.default_locale) {
            chain.push(self.config.default_locale.clone());
        }
        chain
    }

    fn resolve(&self, locale: &str, key: &str, count: Option<usize>) -> Option<String> {
        let translations = self
            .translations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut node = translations.get(locale)?;
        for part in key.split('.') {
            node = node.get(part)?;
        }

        match node {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Object(forms) => {
                let count = count?;
                if count == 0 {
                    if let Some(zero) = forms.get("zero").and_then(JsonValue::as_str) {
                        return Some(zero.to_string());
                    }
                }
                let category = self.plural_rule(locale).category(count);
                forms
                    .get(category.key())
                    .and_then(JsonValue::as_str)
                    .map(str::to_string)
            }
            _ => None,
        }
    }
}

fn interpolate(template: &str, options: &Lookup) -> String {
    INTERPOLATION
        .replace_all(template, |caps: &Captures<'_>| {
            options
                .param_value(&caps[1])
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn deep_merge(target: &mut JsonValue, source: JsonValue) {
    match (target, source) {
        (JsonValue::Object(into), JsonValue::Object(from)) => {
            for (key, value) in from {
                let nested = value.is_object() && into.get(&key).is_some_and(JsonValue::is_object);
                match into.get_mut(&key) {
                    Some(existing) if nested => deep_merge(existing, value),
                    _ => {
                        into.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}
