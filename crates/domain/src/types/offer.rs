//! Offer draft and backend offer records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::ids::{CatalogId, OfferId, ProductId};
use crate::impl_domain_enum_conversions;

/// Lifecycle state of an offer. Always `Draft` while composing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    #[default]
    Draft,
    PendingApproval,
    Approved,
    Active,
    Paused,
    Expired,
    Archived,
}

impl_domain_enum_conversions!(LifecycleStatus {
    Draft => "draft",
    PendingApproval => "pending_approval",
    Approved => "approved",
    Active => "active",
    Paused => "paused",
    Expired => "expired",
    Archived => "archived",
});

/// Approval state of an offer. Always `Pending` while composing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl_domain_enum_conversions!(ApprovalStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

/// The offer under construction.
///
/// Strings use `""` for "not entered yet"; ids use `None`. Required-field
/// checks live in the wizard's step validators, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferDraft {
    pub name: String,
    pub description: String,
    pub offer_type: String,
    pub category_id: Option<CatalogId>,
    pub product_id: Option<ProductId>,
    pub eligibility_rules: serde_json::Map<String, serde_json::Value>,
    pub lifecycle_status: LifecycleStatus,
    pub approval_status: ApprovalStatus,
    pub reusable: bool,
    pub multi_language: bool,
}

/// Replacement of exactly one editable scalar field of an [`OfferDraft`].
///
/// Lifecycle and approval status are intentionally absent: they are fixed
/// while composing.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferFieldUpdate {
    Name(String),
    Description(String),
    OfferType(String),
    CategoryId(Option<CatalogId>),
    ProductId(Option<ProductId>),
    EligibilityRules(serde_json::Map<String, serde_json::Value>),
    Reusable(bool),
    MultiLanguage(bool),
}

impl OfferFieldUpdate {
    /// Error-map key of the field this update replaces.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Description(_) => "description",
            Self::OfferType(_) => "offer_type",
            Self::CategoryId(_) => "category_id",
            Self::ProductId(_) => "product_id",
            Self::EligibilityRules(_) => "eligibility_rules",
            Self::Reusable(_) => "reusable",
            Self::MultiLanguage(_) => "multi_language",
        }
    }
}

impl OfferDraft {
    /// Replace one scalar field.
    pub fn apply(&mut self, update: OfferFieldUpdate) {
        match update {
            OfferFieldUpdate::Name(value) => self.name = value,
            OfferFieldUpdate::Description(value) => self.description = value,
            OfferFieldUpdate::OfferType(value) => self.offer_type = value,
            OfferFieldUpdate::CategoryId(value) => self.category_id = value,
            OfferFieldUpdate::ProductId(value) => self.product_id = value,
            OfferFieldUpdate::EligibilityRules(value) => self.eligibility_rules = value,
            OfferFieldUpdate::Reusable(value) => self.reusable = value,
            OfferFieldUpdate::MultiLanguage(value) => self.multi_language = value,
        }
    }
}

/// A persisted offer as returned by the backend.
///
/// Everything except the id may be `null` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferRecord {
    pub id: OfferId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub offer_type: Option<String>,
    #[serde(default)]
    pub category_id: Option<CatalogId>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub eligibility_rules: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, deserialize_with = "known_or_none")]
    pub lifecycle_status: Option<LifecycleStatus>,
    #[serde(default, deserialize_with = "known_or_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(default)]
    pub reusable: Option<bool>,
    #[serde(default)]
    pub multi_language: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Status strings this crate does not know read as absent, so the record
/// still loads and the draft falls back to its default status.
fn known_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// Request body for offer create/update.
///
/// Carries only the draft's scalar fields. Creatives, tracking sources and
/// rewards are not part of the backend contract and are never serialized
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferPayload {
    pub name: String,
    pub description: Option<String>,
    pub offer_type: String,
    pub category_id: Option<CatalogId>,
    pub product_id: Option<ProductId>,
    pub eligibility_rules: serde_json::Map<String, serde_json::Value>,
    pub lifecycle_status: LifecycleStatus,
    pub approval_status: ApprovalStatus,
    pub reusable: bool,
    pub multi_language: bool,
}

impl From<&OfferDraft> for OfferPayload {
    fn from(draft: &OfferDraft) -> Self {
        let description = draft.description.trim();
        Self {
            name: draft.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            offer_type: draft.offer_type.trim().to_string(),
            category_id: draft.category_id,
            product_id: draft.product_id,
            eligibility_rules: draft.eligibility_rules.clone(),
            lifecycle_status: draft.lifecycle_status,
            approval_status: draft.approval_status,
            reusable: draft.reusable,
            multi_language: draft.multi_language,
        }
    }
}

/// A product picked in the product selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSelection {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
}
