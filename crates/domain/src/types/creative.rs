//! Creatives: channel- and locale-specific renderings of an offer

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::LocalId;
use crate::constants::DEFAULT_CREATIVE_LOCALE;
use crate::impl_domain_enum_conversions;

/// Delivery channel of a creative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[default]
    Sms,
    Email,
    Push,
    Web,
    Whatsapp,
}

impl_domain_enum_conversions!(Channel {
    Sms => "sms",
    Email => "email",
    Push => "push",
    Web => "web",
    Whatsapp => "whatsapp",
});

/// Primitive value substituted into a creative template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for TemplateValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// One rendering of the offer for a (channel, locale) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creative {
    pub id: LocalId,
    pub channel: Channel,
    pub locale: String,
    pub title: String,
    pub text_body: String,
    pub html_body: String,
    pub variables: BTreeMap<String, TemplateValue>,
}

impl Creative {
    /// Empty SMS creative in the default locale.
    pub fn new(id: LocalId) -> Self {
        Self {
            id,
            channel: Channel::default(),
            locale: DEFAULT_CREATIVE_LOCALE.to_string(),
            title: String::new(),
            text_body: String::new(),
            html_body: String::new(),
            variables: BTreeMap::new(),
        }
    }

    /// Merge the fields present in `patch`.
    pub fn apply(&mut self, patch: CreativePatch) {
        if let Some(channel) = patch.channel {
            self.channel = channel;
        }
        if let Some(locale) = patch.locale {
            self.locale = locale;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(text_body) = patch.text_body {
            self.text_body = text_body;
        }
        if let Some(html_body) = patch.html_body {
            self.html_body = html_body;
        }
        if let Some(variables) = patch.variables {
            self.variables = variables;
        }
    }
}

/// Partial update for a [`Creative`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreativePatch {
    pub channel: Option<Channel>,
    pub locale: Option<String>,
    pub title: Option<String>,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
    pub variables: Option<BTreeMap<String, TemplateValue>>,
}
