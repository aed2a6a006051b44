//! Sub-entity collection managers
//!
//! Creatives, tracking sources and rewards are edited through a short-lived
//! [`CollectionManager`] borrowed from the [`AggregateStore`]. Managers never
//! edit the stored list in place: every operation builds the next list and
//! hands it to the store's `replace_*` method, so the store only ever sees
//! whole-collection replacements.
//!
//! None of the operations fail. Unknown ids are ignored.

use std::marker::PhantomData;

use cvm_domain::{
    Creative, CreativePatch, LocalId, Reward, RewardPatch, RewardRule, TrackingRule,
    TrackingSource, TrackingSourcePatch,
};
use tracing::debug;

use super::store::AggregateStore;

/// A locally-identified record owned by the wizard session.
pub trait SubEntity: Clone {
    /// Partial update merged by [`CollectionManager::update`].
    type Patch;

    /// Collection name used in logs.
    const KIND: &'static str;

    fn local_id(&self) -> LocalId;

    /// Record with field defaults, as appended by `add()`.
    fn create(id: LocalId) -> Self;

    fn merge(&mut self, patch: Self::Patch);
}

/// A sub-entity carrying an ordered list of nested rules.
pub trait RuleOwner: SubEntity {
    type Rule: Clone;

    fn rules(&self) -> &[Self::Rule];

    fn set_rules(&mut self, rules: Vec<Self::Rule>);

    fn rule_id(rule: &Self::Rule) -> LocalId;

    /// Rule with field defaults at the given priority.
    fn create_rule(id: LocalId, priority: i32) -> Self::Rule;
}

/// Binds a sub-entity type to its collection in the store.
pub trait StoreSlot: SubEntity {
    fn items(store: &AggregateStore) -> &[Self];

    fn replace(store: &mut AggregateStore, items: Vec<Self>);

    /// Hook run after `add()` stored the new record.
    fn on_added(_store: &mut AggregateStore, _id: LocalId) {}
}

/// Mutable view over one sub-entity collection of the store.
pub struct CollectionManager<'s, T> {
    store: &'s mut AggregateStore,
    _kind: PhantomData<T>,
}

impl<'s, T: StoreSlot> CollectionManager<'s, T> {
    pub(crate) fn new(store: &'s mut AggregateStore) -> Self {
        Self { store, _kind: PhantomData }
    }

    /// Current records in order.
    pub fn items(&self) -> &[T] {
        T::items(&*self.store)
    }

    pub fn get(&self, id: LocalId) -> Option<&T> {
        self.items().iter().find(|item| item.local_id() == id)
    }

    /// Append a record with a fresh id and default fields.
    pub fn add(&mut self) -> LocalId {
        let id = LocalId::generate();
        let mut next = self.items().to_vec();
        next.push(T::create(id));
        T::replace(self.store, next);
        T::on_added(self.store, id);
        debug!(kind = T::KIND, %id, "sub-entity added");
        id
    }

    /// Merge `patch` into the record with `id`.
    pub fn update(&mut self, id: LocalId, patch: T::Patch) {
        let Some(position) = self.position(id) else {
            debug!(kind = T::KIND, %id, "update ignored for unknown id");
            return;
        };
        let mut next = self.items().to_vec();
        if let Some(item) = next.get_mut(position) {
            item.merge(patch);
        }
        T::replace(self.store, next);
    }

    /// Remove the record with `id`, keeping the order of the others.
    pub fn remove(&mut self, id: LocalId) {
        if self.position(id).is_none() {
            debug!(kind = T::KIND, %id, "remove ignored for unknown id");
            return;
        }
        let next = self.items().iter().filter(|item| item.local_id() != id).cloned().collect();
        T::replace(self.store, next);
        debug!(kind = T::KIND, %id, "sub-entity removed");
    }

    fn position(&self, id: LocalId) -> Option<usize> {
        self.items().iter().position(|item| item.local_id() == id)
    }

    /// Rebuild the collection with the record `parent` transformed by `edit`.
    fn edit_parent(&mut self, parent: LocalId, edit: impl FnOnce(&mut T)) -> bool {
        let Some(position) = self.position(parent) else {
            debug!(kind = T::KIND, %parent, "rule edit ignored for unknown parent");
            return false;
        };
        let mut next = self.items().to_vec();
        if let Some(item) = next.get_mut(position) {
            edit(item);
        }
        T::replace(self.store, next);
        true
    }
}

impl<T: StoreSlot + RuleOwner> CollectionManager<'_, T> {
    /// Append a default rule to `parent`, prioritised after the existing
    /// rules. Returns `None` when the parent does not exist.
    pub fn add_rule(&mut self, parent: LocalId) -> Option<LocalId> {
        let id = LocalId::generate();
        let added = self.edit_parent(parent, |item| {
            let mut rules = item.rules().to_vec();
            let priority = i32::try_from(rules.len() + 1).unwrap_or(i32::MAX);
            rules.push(T::create_rule(id, priority));
            item.set_rules(rules);
        });
        added.then_some(id)
    }

    /// Store `rule` under `parent`: replaces the rule with the same id, or
    /// appends it when the id is new.
    pub fn save_rule(&mut self, parent: LocalId, rule: T::Rule) {
        self.edit_parent(parent, |item| {
            let rule_id = T::rule_id(&rule);
            let mut rules = item.rules().to_vec();
            let existing = rules.iter().position(|existing| T::rule_id(existing) == rule_id);
            match existing.and_then(|index| rules.get_mut(index)) {
                Some(slot) => *slot = rule,
                None => rules.push(rule),
            }
            item.set_rules(rules);
        });
    }

    /// Remove the rule `rule_id` from `parent`.
    pub fn remove_rule(&mut self, parent: LocalId, rule_id: LocalId) {
        self.edit_parent(parent, |item| {
            let rules =
                item.rules().iter().filter(|rule| T::rule_id(rule) != rule_id).cloned().collect();
            item.set_rules(rules);
        });
    }
}

impl SubEntity for Creative {
    type Patch = CreativePatch;

    const KIND: &'static str = "creative";

    fn local_id(&self) -> LocalId {
        self.id
    }

    fn create(id: LocalId) -> Self {
        Self::new(id)
    }

    fn merge(&mut self, patch: Self::Patch) {
        self.apply(patch);
    }
}

impl StoreSlot for Creative {
    fn items(store: &AggregateStore) -> &[Self] {
        store.creatives()
    }

    fn replace(store: &mut AggregateStore, items: Vec<Self>) {
        store.replace_creatives(items);
    }
}

impl SubEntity for TrackingSource {
    type Patch = TrackingSourcePatch;

    const KIND: &'static str = "tracking_source";

    fn local_id(&self) -> LocalId {
        self.id
    }

    fn create(id: LocalId) -> Self {
        Self::new(id)
    }

    fn merge(&mut self, patch: Self::Patch) {
        self.apply(patch);
    }
}

impl RuleOwner for TrackingSource {
    type Rule = TrackingRule;

    fn rules(&self) -> &[TrackingRule] {
        &self.rules
    }

    fn set_rules(&mut self, rules: Vec<TrackingRule>) {
        self.rules = rules;
    }

    fn rule_id(rule: &TrackingRule) -> LocalId {
        rule.id
    }

    fn create_rule(id: LocalId, priority: i32) -> TrackingRule {
        TrackingRule::new(id, priority)
    }
}

impl StoreSlot for TrackingSource {
    fn items(store: &AggregateStore) -> &[Self] {
        store.tracking_sources()
    }

    fn replace(store: &mut AggregateStore, items: Vec<Self>) {
        store.replace_tracking_sources(items);
    }
}

impl SubEntity for Reward {
    type Patch = RewardPatch;

    const KIND: &'static str = "reward";

    fn local_id(&self) -> LocalId {
        self.id
    }

    fn create(id: LocalId) -> Self {
        Self::new(id)
    }

    fn merge(&mut self, patch: Self::Patch) {
        self.apply(patch);
    }
}

impl RuleOwner for Reward {
    type Rule = RewardRule;

    fn rules(&self) -> &[RewardRule] {
        &self.rules
    }

    fn set_rules(&mut self, rules: Vec<RewardRule>) {
        self.rules = rules;
    }

    fn rule_id(rule: &RewardRule) -> LocalId {
        rule.id
    }

    fn create_rule(id: LocalId, priority: i32) -> RewardRule {
        RewardRule::new(id, priority)
    }
}

impl StoreSlot for Reward {
    fn items(store: &AggregateStore) -> &[Self] {
        store.rewards()
    }

    fn replace(store: &mut AggregateStore, items: Vec<Self>) {
        store.replace_rewards(items);
    }

    // A new reward opens in the editor, so it becomes the selection.
    fn on_added(store: &mut AggregateStore, id: LocalId) {
        store.select_reward(id);
    }
}
