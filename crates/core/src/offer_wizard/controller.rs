//! Wizard step state machine
//!
//! Six steps, entered at Basic Info. Forward moves validate the fields owned
//! by the step being left; backward moves never validate. Jumping through
//! the step indicator may go at most two steps ahead of the current step
//! and arbitrarily far back. Submission is an action on the Review step, not
//! a seventh state.

use std::fmt;

use cvm_domain::constants::{
    FIELD_CATEGORY_ID, FIELD_NAME, FIELD_OFFER_TYPE, FIELD_PRODUCT_ID, MAX_JUMP_AHEAD, TOTAL_STEPS,
};
use cvm_domain::OfferDraft;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::FieldErrors;
use super::validation::validate_step;

/// Wizard steps in order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    BasicInfo = 1,
    Products = 2,
    Creative = 3,
    Tracking = 4,
    Rewards = 5,
    Review = 6,
}

impl WizardStep {
    /// All steps in order.
    pub const ALL: [Self; TOTAL_STEPS as usize] = [
        Self::BasicInfo,
        Self::Products,
        Self::Creative,
        Self::Tracking,
        Self::Rewards,
        Self::Review,
    ];

    /// Step number (1-based).
    pub const fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|step| step.number() == number)
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::Products => "Products",
            Self::Creative => "Creative",
            Self::Tracking => "Tracking",
            Self::Rewards => "Rewards",
            Self::Review => "Review",
        }
    }

    /// Draft fields whose input lives on this step.
    pub const fn owned_fields(self) -> &'static [&'static str] {
        match self {
            Self::BasicInfo => &[FIELD_NAME, FIELD_OFFER_TYPE, FIELD_CATEGORY_ID],
            Self::Products => &[FIELD_PRODUCT_ID],
            Self::Creative | Self::Tracking | Self::Rewards | Self::Review => &[],
        }
    }

    fn following(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn preceding(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.title(), self.number(), TOTAL_STEPS)
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The step changed.
    Moved { from: WizardStep, to: WizardStep },
    /// Validation of the step being left failed; the step did not change.
    Blocked(FieldErrors),
    /// Nothing to do (boundary reached or jump out of range).
    Unchanged,
}

/// Step-index state machine shared by create and edit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardController {
    step: WizardStep,
    errors: FieldErrors,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn current_step(&self) -> WizardStep {
        self.step
    }

    /// Field errors currently shown beneath the inputs.
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_on_review(&self) -> bool {
        self.step == WizardStep::Review
    }

    /// Advance one step if the fields owned by the current step are valid.
    pub fn next(&mut self, draft: &OfferDraft) -> Transition {
        let from = self.step;
        let Some(to) = from.following() else {
            return Transition::Unchanged;
        };

        let errors = validate_step(from, draft);
        if !errors.is_empty() {
            debug!(step = %from, fields = errors.len(), "forward transition blocked");
            self.errors.merge(errors.clone());
            return Transition::Blocked(errors);
        }

        self.errors.clear_fields(from.owned_fields());
        self.move_to(to)
    }

    /// Go back one step. Never validates.
    pub fn prev(&mut self) -> Transition {
        match self.step.preceding() {
            Some(to) => self.move_to(to),
            None => Transition::Unchanged,
        }
    }

    /// Jump to step `target` (1-based) from the step indicator.
    ///
    /// Accepted iff `target` is a valid step no more than two steps ahead of
    /// the current one. Jumping onto the current step is accepted and leaves
    /// it unchanged.
    pub fn jump_to(&mut self, target: u8) -> Transition {
        let Some(to) = WizardStep::from_number(target) else {
            return Transition::Unchanged;
        };
        if to.number() > self.step.number() + MAX_JUMP_AHEAD {
            debug!(from = %self.step, target, "step jump rejected");
            return Transition::Unchanged;
        }
        self.move_to(to)
    }

    /// Return to the first step and drop all errors (edit-mode load).
    pub fn reset(&mut self) {
        self.step = WizardStep::BasicInfo;
        self.errors = FieldErrors::new();
    }

    /// Replace the displayed errors (submission results).
    pub fn show_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    fn move_to(&mut self, to: WizardStep) -> Transition {
        let from = self.step;
        self.step = to;
        debug!(%from, %to, "wizard step changed");
        Transition::Moved { from, to }
    }
}

#[cfg(test)]
mod tests {
    use cvm_domain::{CatalogId, OfferFieldUpdate, ProductId};

    use super::*;

    fn basic_info_draft() -> OfferDraft {
        OfferDraft {
            name: "Summer Bundle".into(),
            offer_type: "STV".into(),
            category_id: Some(CatalogId(3)),
            ..Default::default()
        }
    }

    fn complete_draft() -> OfferDraft {
        OfferDraft { product_id: Some(ProductId(12)), ..basic_info_draft() }
    }

    fn controller_at(step: WizardStep) -> WizardController {
        WizardController { step, errors: FieldErrors::new() }
    }

    #[test]
    fn starts_at_basic_info() {
        let controller = WizardController::new();
        assert_eq!(controller.current_step(), WizardStep::BasicInfo);
        assert!(controller.errors().is_empty());
    }

    #[test]
    fn next_is_blocked_by_missing_basic_info() {
        let mut controller = WizardController::new();
        let transition = controller.next(&OfferDraft::default());

        let Transition::Blocked(errors) = transition else {
            panic!("expected blocked transition, got {transition:?}");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["category_id", "name", "offer_type"]);
        assert_eq!(controller.current_step(), WizardStep::BasicInfo);
        assert_eq!(controller.errors(), &errors);
    }

    #[test]
    fn products_step_requires_a_product() {
        let mut controller = controller_at(WizardStep::Products);
        assert!(matches!(controller.next(&basic_info_draft()), Transition::Blocked(_)));
        assert!(controller.errors().contains("product_id"));

        let transition = controller.next(&complete_draft());
        assert_eq!(
            transition,
            Transition::Moved { from: WizardStep::Products, to: WizardStep::Creative }
        );
        assert!(controller.errors().is_empty());
    }

    #[test]
    fn fixing_fields_clears_their_errors_on_next() {
        let mut controller = WizardController::new();
        let mut draft = OfferDraft::default();
        controller.next(&draft);

        draft.apply(OfferFieldUpdate::Name("Summer Bundle".into()));
        draft.apply(OfferFieldUpdate::OfferType("STV".into()));
        draft.apply(OfferFieldUpdate::CategoryId(Some(CatalogId(3))));

        assert!(matches!(controller.next(&draft), Transition::Moved { .. }));
        assert!(controller.errors().is_empty());
    }

    #[test]
    fn sub_entity_steps_never_block() {
        let draft = complete_draft();
        let mut controller = controller_at(WizardStep::Creative);
        controller.next(&draft);
        controller.next(&draft);
        controller.next(&draft);
        assert_eq!(controller.current_step(), WizardStep::Review);
    }

    #[test]
    fn next_from_review_and_prev_from_basic_info_are_no_ops() {
        let mut review = controller_at(WizardStep::Review);
        assert_eq!(review.next(&complete_draft()), Transition::Unchanged);
        assert_eq!(review.current_step(), WizardStep::Review);

        let mut first = WizardController::new();
        assert_eq!(first.prev(), Transition::Unchanged);
        assert_eq!(first.current_step(), WizardStep::BasicInfo);
    }

    #[test]
    fn prev_never_validates() {
        let mut controller = controller_at(WizardStep::Products);
        assert!(matches!(controller.prev(), Transition::Moved { .. }));
        assert!(controller.errors().is_empty());
    }

    #[test]
    fn jump_bound_holds_for_every_pair() {
        for current in WizardStep::ALL {
            for target in 0u8..=8 {
                let mut controller = controller_at(current);
                let transition = controller.jump_to(target);
                let in_range = (1..=TOTAL_STEPS).contains(&target);
                let allowed = in_range && target <= current.number() + 2;

                if allowed {
                    assert!(
                        matches!(transition, Transition::Moved { .. }),
                        "{current} -> {target}"
                    );
                    assert_eq!(controller.current_step().number(), target);
                } else {
                    assert_eq!(transition, Transition::Unchanged, "{current} -> {target}");
                    assert_eq!(controller.current_step(), current);
                }
            }
        }
    }

    #[test]
    fn step_index_stays_in_bounds_under_any_walk() {
        let draft = complete_draft();
        let mut controller = WizardController::new();
        let moves: [u8; 24] = [
            1, 1, 0, 2, 6, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 3, 9, 1, 2, 5, 0,
        ];

        for code in moves {
            match code {
                0 => {
                    controller.prev();
                }
                1 => {
                    controller.next(&draft);
                }
                target => {
                    controller.jump_to(target);
                }
            }
            let number = controller.current_step().number();
            assert!((1..=TOTAL_STEPS).contains(&number));
        }
    }

    #[test]
    fn display_includes_position() {
        assert_eq!(WizardStep::Tracking.to_string(), "Tracking (4/6)");
    }
}
