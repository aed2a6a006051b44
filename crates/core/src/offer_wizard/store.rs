//! Aggregate store: the single source of truth of one wizard session
//!
//! Holds the offer draft and the three sub-entity collections. Every
//! mutation replaces either one scalar field of the draft or a whole
//! collection; nothing merges into a collection in place.

use std::collections::BTreeMap;

use cvm_domain::{
    Channel, Creative, LocalId, OfferDraft, OfferFieldUpdate, ProductSelection, Reward,
    TrackingSource,
};
use tracing::trace;

use super::collections::CollectionManager;

/// In-memory holder of the offer-plus-sub-entities draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStore {
    draft: OfferDraft,
    creatives: Vec<Creative>,
    tracking_sources: Vec<TrackingSource>,
    rewards: Vec<Reward>,
    selected_reward: Option<LocalId>,
}

impl AggregateStore {
    /// Empty store for a new offer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a reconciled draft and empty collections.
    pub fn with_draft(draft: OfferDraft) -> Self {
        Self { draft, ..Self::default() }
    }

    pub const fn draft(&self) -> &OfferDraft {
        &self.draft
    }

    pub fn creatives(&self) -> &[Creative] {
        &self.creatives
    }

    pub fn tracking_sources(&self) -> &[TrackingSource] {
        &self.tracking_sources
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    /// Reward currently open in the reward editor.
    pub const fn selected_reward(&self) -> Option<LocalId> {
        self.selected_reward
    }

    /// Replace one scalar field of the draft. No validation happens here.
    pub fn set_offer_field(&mut self, update: OfferFieldUpdate) {
        trace!(field = update.field(), "offer field replaced");
        self.draft.apply(update);
    }

    /// Keep only the first selected product; an empty selection clears it.
    pub fn select_products(&mut self, products: &[ProductSelection]) {
        let product_id = products.first().map(|product| product.id);
        self.set_offer_field(OfferFieldUpdate::ProductId(product_id));
    }

    pub fn replace_creatives(&mut self, creatives: Vec<Creative>) {
        self.creatives = creatives;
    }

    pub fn replace_tracking_sources(&mut self, tracking_sources: Vec<TrackingSource>) {
        self.tracking_sources = tracking_sources;
    }

    /// Replace the rewards. A selection that no longer exists falls back to
    /// the first remaining reward, or to none.
    pub fn replace_rewards(&mut self, rewards: Vec<Reward>) {
        self.rewards = rewards;
        let still_present = self
            .selected_reward
            .is_some_and(|selected| self.rewards.iter().any(|reward| reward.id == selected));
        if !still_present {
            self.selected_reward = self.rewards.first().map(|reward| reward.id);
        }
    }

    /// Select a reward for editing. Unknown ids are ignored.
    pub fn select_reward(&mut self, id: LocalId) {
        if self.rewards.iter().any(|reward| reward.id == id) {
            self.selected_reward = Some(id);
        }
    }

    /// (channel, locale) pairs used by more than one creative.
    ///
    /// Duplicates are allowed; this only reports them.
    pub fn duplicate_creative_pairs(&self) -> Vec<(Channel, String)> {
        let mut counts: BTreeMap<(Channel, String), usize> = BTreeMap::new();
        for creative in &self.creatives {
            *counts.entry((creative.channel, creative.locale.clone())).or_default() += 1;
        }
        counts.into_iter().filter(|(_, count)| *count > 1).map(|(pair, _)| pair).collect()
    }

    pub fn creative_manager(&mut self) -> CollectionManager<'_, Creative> {
        CollectionManager::new(self)
    }

    pub fn tracking_manager(&mut self) -> CollectionManager<'_, TrackingSource> {
        CollectionManager::new(self)
    }

    pub fn reward_manager(&mut self) -> CollectionManager<'_, Reward> {
        CollectionManager::new(self)
    }
}
