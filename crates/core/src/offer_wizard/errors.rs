//! Field-level error maps and wizard error types

use std::collections::BTreeMap;
use std::fmt;

use cvm_domain::OfferId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::controller::WizardStep;

/// Ordered field-name → message map shown beneath the inputs.
///
/// Client-side and server-side validation both land here so the UI has one
/// error display path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. A later message for the same field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// Drop the messages of every field in `fields`.
    pub fn clear_fields(&mut self, fields: &[&str]) {
        for field in fields {
            self.0.remove(*field);
        }
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

impl<K, V> FromIterator<(K, V)> for FieldErrors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Outcome of a failed submission: per-field messages plus one page-level
/// summary. The summary is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub fields: FieldErrors,
    pub summary: String,
}

impl ErrorReport {
    pub fn new(fields: FieldErrors, summary: impl Into<String>) -> Self {
        Self { fields, summary: summary.into() }
    }

    /// Report without field detail.
    pub fn summary_only(summary: impl Into<String>) -> Self {
        Self::new(FieldErrors::new(), summary)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            write!(f, "{}", self.summary)
        } else {
            write!(f, "{} ({} field errors)", self.summary, self.fields.len())
        }
    }
}

impl std::error::Error for ErrorReport {}

/// Misuse of a wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("submit is only available from the review step (current step: {0})")]
    NotOnReviewStep(WizardStep),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("session is not ready: {0}")]
    NotReady(String),

    #[error("failed to load offer {offer_id}: {reason}")]
    LoadFailed { offer_id: OfferId, reason: String },

    #[error("session has been torn down")]
    TornDown,
}
