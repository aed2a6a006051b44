//! Offer composition wizard
//!
//! Six steps (basic info, products, creative, tracking, rewards, review)
//! over one aggregate draft. Create and edit mode share every component;
//! only initialization and the submission call differ.

mod collections;
mod controller;
mod error_payload;
mod errors;
mod loader;
mod session;
mod store;
mod submission;
mod validation;

pub use collections::{CollectionManager, RuleOwner, StoreSlot, SubEntity};
pub use controller::{Transition, WizardController, WizardStep};
pub use error_payload::{ErrorPayload, FieldDetail};
pub use errors::{ErrorReport, FieldErrors, WizardError};
pub use loader::{reconcile, LoadedOffer, OfferLoader};
pub use session::{OfferWizard, SessionStatus, SubmitOutcome, WizardMode, WizardServices};
pub use store::AggregateStore;
pub use submission::SubmissionCoordinator;
pub use validation::{validate, validate_step};
