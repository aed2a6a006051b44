//! Backend error envelopes
//!
//! The offer backend reports failures in three shapes: a flat `message` (or
//! `error`) string, a `details` array of `{field, message}` objects, or a
//! `details` object keyed by field name. The envelope is classified once
//! into [`ErrorPayload`]; [`ErrorPayload::into_report`] is the single total
//! mapping onto what the wizard displays.

use std::collections::BTreeMap;

use cvm_domain::constants::MSG_FIX_VALIDATION_ERRORS;
use cvm_domain::CvmError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ErrorReport, FieldErrors};

/// One entry of a `details` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDetail {
    pub field: String,
    pub message: String,
}

/// Classified backend error payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPayload {
    /// Flat `message` / `error` string
    Message(String),
    /// `details: [{field, message}, ...]`
    FieldList(Vec<FieldDetail>),
    /// `details: {field: message, ...}`
    FieldMap(BTreeMap<String, String>),
    /// Anything else, including transport failures without a body
    Unrecognized,
}

impl ErrorPayload {
    /// Classify a port error. Only backend rejections carry an envelope;
    /// every other error is a transport failure.
    pub fn from_error(error: &CvmError) -> Self {
        error.envelope().map_or(Self::Unrecognized, Self::from_envelope)
    }

    /// Classify a response body. Field detail wins over a flat message when
    /// both are present.
    pub fn from_envelope(envelope: &Value) -> Self {
        if let Some(payload) = envelope.get("details").and_then(Self::from_details) {
            return payload;
        }

        ["message", "error"]
            .iter()
            .find_map(|key| envelope.get(*key).and_then(message_text))
            .or_else(|| non_empty(envelope.as_str()))
            .map_or(Self::Unrecognized, Self::Message)
    }

    fn from_details(details: &Value) -> Option<Self> {
        match details {
            Value::Array(entries) => {
                let list: Vec<FieldDetail> = entries.iter().filter_map(field_detail).collect();
                (!list.is_empty()).then_some(Self::FieldList(list))
            }
            Value::Object(entries) => {
                let map: BTreeMap<String, String> = entries
                    .iter()
                    .filter_map(|(field, message)| {
                        message_text(message).map(|message| (field.clone(), message))
                    })
                    .collect();
                (!map.is_empty()).then_some(Self::FieldMap(map))
            }
            _ => None,
        }
    }

    /// Map onto a field-indexed report with a non-empty summary.
    ///
    /// `fallback` is the generic page message used for unrecognized payloads.
    pub fn into_report(self, fallback: &str) -> ErrorReport {
        match self {
            Self::FieldList(list) => ErrorReport::new(
                list.into_iter().map(|detail| (detail.field, detail.message)).collect(),
                MSG_FIX_VALIDATION_ERRORS,
            ),
            Self::FieldMap(map) => {
                let fields: FieldErrors = map.into_iter().collect();
                ErrorReport::new(fields, MSG_FIX_VALIDATION_ERRORS)
            }
            Self::Message(message) => ErrorReport::summary_only(message),
            Self::Unrecognized => ErrorReport::summary_only(fallback),
        }
    }
}

fn field_detail(entry: &Value) -> Option<FieldDetail> {
    let field = non_empty(entry.get("field").and_then(Value::as_str))?;
    let message = entry.get("message").and_then(message_text)?;
    Some(FieldDetail { field, message })
}

/// Text of a message value: a string, the first string of an array, or the
/// `message` of a nested object.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => non_empty(Some(text)),
        Value::Array(items) => items.iter().find_map(message_text),
        Value::Object(inner) => inner.get("message").and_then(message_text),
        _ => None,
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|text| !text.is_empty()).map(str::to_string)
}
