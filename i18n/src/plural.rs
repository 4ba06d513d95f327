//! Count-based plural categories.

/// Plural category selected for a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    Zero,
    One,
    Other,
}

impl PluralCategory {
    /// Key used for this category inside a translation entry.
    pub fn key(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Other => "other",
        }
    }
}

/// Rule mapping a count to a plural category for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluralRule {
    /// `one` for exactly 1, `other` otherwise (English).
    #[default]
    OneOther,
    /// `one` for 0 and 1, `other` otherwise (French, Brazilian Portuguese).
    ZeroOneAsOne,
    /// Always `other` (languages without grammatical number).
    OtherOnly,
}

impl PluralRule {
    /// Default rule for a locale code.
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or(locale)
            .to_ascii_lowercase();
        match language.as_str() {
            "fr" | "br" | "pt" => PluralRule::ZeroOneAsOne,
            "ja" | "zh" | "ko" | "vi" | "th" => PluralRule::OtherOnly,
            _ => PluralRule::OneOther,
        }
    }

    /// Select the category for `count`.
    pub fn category(&self, count: usize) -> PluralCategory {
        match self {
            PluralRule::OneOther if count == 1 => PluralCategory::One,
            PluralRule::ZeroOneAsOne if count <= 1 => PluralCategory::One,
            _ => PluralCategory::Other,
        }
    }
}
