//! Rewards and their fulfillment rules

use serde::{Deserialize, Serialize};

use super::ids::LocalId;
use super::tracking::RuleCondition;
use crate::impl_domain_enum_conversions;

/// Kind of reward bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    #[default]
    Default,
    SmsNight,
    Custom,
}

impl_domain_enum_conversions!(RewardKind {
    Default => "default",
    SmsNight => "sms_night",
    Custom => "custom",
});

/// Known bundle subscription tracks a reward rule can fulfil through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTrack {
    #[default]
    BundleSubscription,
    DataSubscription,
    VoiceSubscription,
    SmsSubscription,
}

impl_domain_enum_conversions!(SubscriptionTrack {
    BundleSubscription => "bundle_subscription",
    DataSubscription => "data_subscription",
    VoiceSubscription => "voice_subscription",
    SmsSubscription => "sms_subscription",
});

/// What the customer receives when a reward rule fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    #[default]
    Bundle,
    Points,
    Discount,
    Cashback,
}

impl_domain_enum_conversions!(RewardType {
    Bundle => "bundle",
    Points => "points",
    Discount => "discount",
    Cashback => "cashback",
});

/// Fulfillment rule with its success and failure messaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRule {
    pub id: LocalId,
    pub name: String,
    pub bundle_subscription_track: SubscriptionTrack,
    pub priority: i32,
    pub condition: RuleCondition,
    pub value: String,
    pub reward_type: RewardType,
    pub reward_value: String,
    pub fulfillment_response: String,
    pub success_text: String,
    pub default_failure: String,
    pub error_group: String,
    pub failure_text: String,
    pub enabled: bool,
}

impl RewardRule {
    pub fn new(id: LocalId, priority: i32) -> Self {
        Self {
            id,
            name: String::new(),
            bundle_subscription_track: SubscriptionTrack::default(),
            priority,
            condition: RuleCondition::default(),
            value: String::new(),
            reward_type: RewardType::default(),
            reward_value: String::new(),
            fulfillment_response: String::new(),
            success_text: String::new(),
            default_failure: String::new(),
            error_group: String::new(),
            failure_text: String::new(),
            enabled: true,
        }
    }
}

/// A reward bundle attached to the offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: LocalId,
    pub name: String,
    #[serde(rename = "type")]
    pub reward_kind: RewardKind,
    pub rules: Vec<RewardRule>,
}

impl Reward {
    pub fn new(id: LocalId) -> Self {
        Self { id, name: String::new(), reward_kind: RewardKind::default(), rules: Vec::new() }
    }

    pub fn apply(&mut self, patch: RewardPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(reward_kind) = patch.reward_kind {
            self.reward_kind = reward_kind;
        }
    }
}

/// Partial update for a [`Reward`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardPatch {
    pub name: Option<String>,
    pub reward_kind: Option<RewardKind>,
}
