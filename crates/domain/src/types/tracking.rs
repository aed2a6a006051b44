//! Tracking sources and their matching rules

use serde::{Deserialize, Serialize};

use super::ids::LocalId;
use crate::impl_domain_enum_conversions;

/// Upstream feed a tracking source reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingSourceType {
    #[default]
    Recharge,
    UsageMetric,
    Custom,
}

impl_domain_enum_conversions!(TrackingSourceType {
    Recharge => "recharge",
    UsageMetric => "usage_metric",
    Custom => "custom",
});

/// Comparison applied by tracking and reward rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCondition {
    #[default]
    Equals,
    GreaterThan,
    LessThan,
    Contains,
    IsAnyOf,
}

impl_domain_enum_conversions!(RuleCondition {
    Equals => "equals",
    GreaterThan => "greater_than",
    LessThan => "less_than",
    Contains => "contains",
    IsAnyOf => "is_any_of",
});

/// Conditional match against one parameter of a tracking feed.
///
/// Lower `priority` sorts first by convention; nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRule {
    pub id: LocalId,
    pub name: String,
    pub priority: i32,
    pub parameter: String,
    pub condition: RuleCondition,
    pub value: String,
    pub enabled: bool,
}

impl TrackingRule {
    pub fn new(id: LocalId, priority: i32) -> Self {
        Self {
            id,
            name: String::new(),
            priority,
            parameter: String::new(),
            condition: RuleCondition::default(),
            value: String::new(),
            enabled: true,
        }
    }
}

/// A data feed used to attribute engagement to the offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingSource {
    pub id: LocalId,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: TrackingSourceType,
    pub enabled: bool,
    pub rules: Vec<TrackingRule>,
}

impl TrackingSource {
    pub fn new(id: LocalId) -> Self {
        Self {
            id,
            name: String::new(),
            source_type: TrackingSourceType::default(),
            enabled: true,
            rules: Vec::new(),
        }
    }

    pub fn apply(&mut self, patch: TrackingSourcePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(source_type) = patch.source_type {
            self.source_type = source_type;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
    }
}

/// Partial update for a [`TrackingSource`]. Rules are edited through the
/// rule operations, not through patches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingSourcePatch {
    pub name: Option<String>,
    pub source_type: Option<TrackingSourceType>,
    pub enabled: Option<bool>,
}
