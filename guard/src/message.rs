//! Composition of deletion restriction messages.
//!
//! Catalog keys:
//!
//! | key                                         | params            |
//! |---------------------------------------------|-------------------|
//! | `activerecord.models.<singular association>`| count             |
//! | `dependent_restrict.basic_message.one`      | `name`            |
//! | `dependent_restrict.basic_message.others`   | `name`, `count`   |
//! | `dependent_restrict.detailed_message.includes` |                |
//! | `dependent_restrict.detailed_message.and_more` | `count`        |
//!
//! Missing entries fall back to the English templates below.

use restrict_i18n::{inflector, Catalog, Lookup, PluralCategory};

/// Most dependents listed in a detailed message.
pub const SAMPLE_LIMIT: usize = 5;

const BASIC_ONE: &str = "Cannot delete record because dependent %{name} exists";
const BASIC_OTHERS: &str = "Cannot delete record because %{count} dependent %{name} exist";
const INCLUDES: &str = "These include";
const AND_MORE: &str = "and %{count} more";

/// Composes messages in one locale of a catalog.
#[derive(Debug, Clone, Copy)]
pub struct MessageComposer<'a> {
    catalog: &'a Catalog,
    locale: &'a str,
}

impl<'a> MessageComposer<'a> {
    pub fn new(catalog: &'a Catalog, locale: &'a str) -> Self {
        Self { catalog, locale }
    }

    fn is_one(&self, count: usize) -> bool {
        self.catalog.plural_rule(self.locale).category(count) == PluralCategory::One
    }

    fn lookup(&self) -> Lookup {
        Lookup::new().locale(self.locale)
    }

    /// Lowercased model name of the dependents of `association`.
    ///
    /// The locale's plural rule only selects among its own entries; the
    /// fallback name is singular exactly when `count == 1`.
    pub fn model_name(&self, association: &str, count: usize) -> String {
        let key = format!("activerecord.models.{}", inflector::singularize(association));
        let name = self
            .catalog
            .lookup(&key, &self.lookup().count(count))
            .unwrap_or_else(|| {
                let default = if count == 1 {
                    association.to_string()
                } else {
                    inflector::pluralize(association)
                };
                default.replace('_', " ")
            });
        name.to_lowercase()
    }

    /// `Cannot delete record because ...` for `count` dependents.
    pub fn basic_message(&self, association: &str, count: usize) -> String {
        let key = if self.is_one(count) {
            "dependent_restrict.basic_message.one"
        } else {
            "dependent_restrict.basic_message.others"
        };
        let lookup = self
            .lookup()
            .param("name", self.model_name(association, count))
            .param("count", count);
        if let Some(localized) = self.catalog.lookup(key, &lookup) {
            return localized;
        }
        // The English templates follow English number, whatever the locale.
        let default = if count == 1 { BASIC_ONE } else { BASIC_OTHERS };
        self.catalog.translate(key, &lookup.default_template(default))
    }

    /// Basic message followed by a numbered listing of `samples`.
    ///
    /// `samples` are the display strings of the first dependents in
    /// primary key order. At most [`SAMPLE_LIMIT`] lines are listed; when
    /// `count` exceeds it the fifth line becomes `...and <n> more`.
    pub fn detailed_message(&self, association: &str, count: usize, samples: &[String]) -> String {
        let includes = self.catalog.translate(
            "dependent_restrict.detailed_message.includes",
            &self.lookup().default_template(INCLUDES),
        );

        let shown = if count > SAMPLE_LIMIT {
            SAMPLE_LIMIT - 1
        } else {
            SAMPLE_LIMIT
        };
        let mut lines: Vec<String> = samples
            .iter()
            .take(shown)
            .enumerate()
            .map(|(index, display)| format!("{}: {}", index + 1, display))
            .collect();

        if count > SAMPLE_LIMIT {
            let and_more = self.catalog.translate(
                "dependent_restrict.detailed_message.and_more",
                &self
                    .lookup()
                    .param("count", count - shown)
                    .default_template(AND_MORE),
            );
            lines.push(format!("...{}", and_more));
        }

        format!(
            "{}\n\n\n{}:\n{}",
            self.basic_message(association, count),
            includes,
            lines.join("\n")
        )
    }
}
