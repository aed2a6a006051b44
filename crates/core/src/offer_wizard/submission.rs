//! Submission coordinator
//!
//! Validates the whole draft, then issues exactly one create or update call.
//! Failures come back as an [`ErrorReport`] ready for display.

use std::sync::Arc;

use cvm_domain::constants::{MSG_CREATE_FAILED, MSG_FIX_VALIDATION_ERRORS, MSG_UPDATE_FAILED};
use cvm_domain::{OfferDraft, OfferPayload, OfferRecord};
use tracing::{info, instrument, warn};

use super::error_payload::ErrorPayload;
use super::errors::ErrorReport;
use super::session::WizardMode;
use super::validation::validate;
use crate::ports::OfferService;

pub struct SubmissionCoordinator {
    offers: Arc<dyn OfferService>,
}

impl SubmissionCoordinator {
    pub fn new(offers: Arc<dyn OfferService>) -> Self {
        Self { offers }
    }

    /// Persist the draft's scalar fields.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorReport`] when local validation fails (no network
    /// call is made) or when the backend call fails.
    #[instrument(skip(self, draft), fields(mode = %mode))]
    pub async fn submit(
        &self,
        mode: WizardMode,
        draft: &OfferDraft,
    ) -> Result<OfferRecord, ErrorReport> {
        let fields = validate(draft);
        if !fields.is_empty() {
            warn!(fields = fields.len(), "submission blocked by validation");
            return Err(ErrorReport::new(fields, MSG_FIX_VALIDATION_ERRORS));
        }

        let payload = OfferPayload::from(draft);
        let (result, fallback) = match mode {
            WizardMode::Create => (self.offers.create_offer(&payload).await, MSG_CREATE_FAILED),
            WizardMode::Edit { offer_id } => {
                (self.offers.update_offer(offer_id, &payload).await, MSG_UPDATE_FAILED)
            }
        };

        match result {
            Ok(record) => {
                info!(offer_id = %record.id, "offer submitted");
                Ok(record)
            }
            Err(err) => {
                warn!(kind = err.label(), error = %err, "offer submission failed");
                Err(ErrorPayload::from_error(&err).into_report(fallback))
            }
        }
    }
}
