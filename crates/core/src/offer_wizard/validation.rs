//! Step validators
//!
//! Pure functions from a draft to a field → message map. Only the four
//! required scalar fields are checked; creatives, tracking sources and
//! rewards may all be empty when the review step is reached.

use cvm_domain::constants::{
    FIELD_CATEGORY_ID, FIELD_NAME, FIELD_OFFER_TYPE, FIELD_PRODUCT_ID, MSG_CATEGORY_REQUIRED,
    MSG_NAME_REQUIRED, MSG_OFFER_TYPE_REQUIRED, MSG_PRODUCT_REQUIRED,
};
use cvm_domain::OfferDraft;

use super::controller::WizardStep;
use super::errors::FieldErrors;

struct RequiredField {
    field: &'static str,
    message: &'static str,
    is_missing: fn(&OfferDraft) -> bool,
}

const REQUIRED_FIELDS: &[RequiredField] = &[
    RequiredField {
        field: FIELD_NAME,
        message: MSG_NAME_REQUIRED,
        is_missing: name_missing,
    },
    RequiredField {
        field: FIELD_OFFER_TYPE,
        message: MSG_OFFER_TYPE_REQUIRED,
        is_missing: offer_type_missing,
    },
    RequiredField {
        field: FIELD_CATEGORY_ID,
        message: MSG_CATEGORY_REQUIRED,
        is_missing: category_missing,
    },
    RequiredField {
        field: FIELD_PRODUCT_ID,
        message: MSG_PRODUCT_REQUIRED,
        is_missing: product_missing,
    },
];

fn name_missing(draft: &OfferDraft) -> bool {
    draft.name.trim().is_empty()
}

fn offer_type_missing(draft: &OfferDraft) -> bool {
    draft.offer_type.trim().is_empty()
}

const fn category_missing(draft: &OfferDraft) -> bool {
    draft.category_id.is_none()
}

const fn product_missing(draft: &OfferDraft) -> bool {
    draft.product_id.is_none()
}

/// Validate every required field of the draft.
pub fn validate(draft: &OfferDraft) -> FieldErrors {
    check(draft, |_| true)
}

/// Validate only the fields owned by `step`.
pub fn validate_step(step: WizardStep, draft: &OfferDraft) -> FieldErrors {
    let owned = step.owned_fields();
    check(draft, |field| owned.contains(&field))
}

fn check(draft: &OfferDraft, include: impl Fn(&str) -> bool) -> FieldErrors {
    REQUIRED_FIELDS
        .iter()
        .filter(|rule| include(rule.field) && (rule.is_missing)(draft))
        .map(|rule| (rule.field, rule.message))
        .collect()
}
