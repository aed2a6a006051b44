//! Domain types and models
//!
//! The offer draft is the root aggregate assembled by the wizard. Creatives,
//! tracking sources and rewards are session-local sub-entities identified by
//! [`LocalId`]; they never travel to the backend.

pub mod catalog;
pub mod creative;
pub mod ids;
pub mod offer;
pub mod reward;
pub mod tracking;

pub use catalog::{Catalog, CatalogPage, CatalogQuery, PageMeta, SortDirection};
pub use creative::{Channel, Creative, CreativePatch, TemplateValue};
pub use ids::{CatalogId, LocalId, OfferId, ProductId};
pub use offer::{
    ApprovalStatus, LifecycleStatus, OfferDraft, OfferFieldUpdate, OfferPayload, OfferRecord,
    ProductSelection,
};
pub use reward::{Reward, RewardKind, RewardPatch, RewardRule, RewardType, SubscriptionTrack};
pub use tracking::{
    RuleCondition, TrackingRule, TrackingSource, TrackingSourcePatch, TrackingSourceType,
};
