//! The error raised by `restrict` guards.

use std::sync::{Arc, OnceLock};

use restrict_core::Record;
use restrict_i18n::Catalog;
use thiserror::Error;

use crate::MessageComposer;

/// A destroy was refused because an association still has dependents.
///
/// Everything the messages need is captured when the error is raised, so
/// the detailed message does not change when dependents are added or
/// removed afterwards. It is composed on first access and cached.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DeleteRestrictionError {
    association: String,
    record: Record,
    count: usize,
    samples: Vec<String>,
    locale: String,
    catalog: Arc<Catalog>,
    message: String,
    detailed: OnceLock<String>,
}

impl DeleteRestrictionError {
    /// `samples` are the display strings of the first dependents, in
    /// primary key order.
    pub fn new(
        association: impl Into<String>,
        record: Record,
        count: usize,
        samples: Vec<String>,
        catalog: Arc<Catalog>,
    ) -> Self {
        let association = association.into();
        let locale = catalog.locale();
        let message = MessageComposer::new(&catalog, &locale).basic_message(&association, count);
        Self {
            association,
            record,
            count,
            samples,
            locale,
            catalog,
            message,
            detailed: OnceLock::new(),
        }
    }

    /// Name of the association that still has dependents.
    pub fn association(&self) -> &str {
        &self.association
    }

    /// The record whose destroy was refused.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Number of dependents when the error was raised.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Locale the messages are composed in.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message followed by a listing of the dependents.
    pub fn detailed_message(&self) -> &str {
        self.detailed.get_or_init(|| {
            MessageComposer::new(&self.catalog, &self.locale).detailed_message(
                &self.association,
                self.count,
                &self.samples,
            )
        })
    }
}
