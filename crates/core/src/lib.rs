//! # CVM Core
//!
//! Pure business logic for the offer composition wizard - no
//! infrastructure dependencies.
//!
//! This crate contains:
//! - The aggregate store and sub-entity collection managers
//! - Step validators and the wizard step state machine
//! - Load/reconcile and submission use cases
//! - Port interfaces (traits) for the offer and catalog backends
//!
//! ## Architecture Principles
//! - Only depends on `cvm-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod offer_wizard;
pub mod ports;

// Re-export specific items to avoid ambiguity
pub use offer_wizard::{
    AggregateStore, CollectionManager, ErrorPayload, ErrorReport, FieldErrors, LoadedOffer,
    OfferLoader, OfferWizard, SessionStatus, SubmissionCoordinator, SubmitOutcome, Transition,
    WizardController, WizardError, WizardMode, WizardServices, WizardStep,
};
pub use ports::{CatalogService, OfferService};
