//! Wizard session
//!
//! One [`OfferWizard`] per open wizard. It owns the aggregate store and the
//! step controller and drives the two async boundaries: initialization
//! (catalogs, plus the offer in edit mode) and submission.
//!
//! A session is single-writer. The only external signal it observes is the
//! teardown token: once cancelled, results that arrive from the network are
//! dropped instead of being written into the session.

use std::fmt;
use std::sync::Arc;

use cvm_domain::constants::MSG_LOAD_FAILED;
use cvm_domain::{
    ApiConfig, Catalog, CatalogQuery, Creative, LocalId, OfferDraft, OfferFieldUpdate, OfferId,
    OfferRecord, ProductSelection, Reward, TrackingSource,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::collections::CollectionManager;
use super::controller::{Transition, WizardController, WizardStep};
use super::errors::{ErrorReport, FieldErrors, WizardError};
use super::loader::OfferLoader;
use super::store::AggregateStore;
use super::submission::SubmissionCoordinator;
use crate::ports::{CatalogService, OfferService};

/// Whether the wizard creates a new offer or edits a persisted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit { offer_id: OfferId },
}

impl fmt::Display for WizardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Edit { offer_id } => write!(f, "edit({offer_id})"),
        }
    }
}

/// Backend services a session talks to.
#[derive(Clone)]
pub struct WizardServices {
    pub offers: Arc<dyn OfferService>,
    pub catalogs: Arc<dyn CatalogService>,
    pub catalog_query: CatalogQuery,
}

impl WizardServices {
    pub fn new(offers: Arc<dyn OfferService>, catalogs: Arc<dyn CatalogService>) -> Self {
        Self { offers, catalogs, catalog_query: CatalogQuery::default() }
    }

    /// Services that list catalogs with the page size from `config`.
    pub fn configured(
        offers: Arc<dyn OfferService>,
        catalogs: Arc<dyn CatalogService>,
        config: &ApiConfig,
    ) -> Self {
        Self::new(offers, catalogs).with_catalog_query(CatalogQuery::from(config))
    }

    #[must_use]
    pub fn with_catalog_query(mut self, query: CatalogQuery) -> Self {
        self.catalog_query = query;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Waiting for `initialize`
    Loading,
    Ready,
    /// A submission is awaiting the backend
    Submitting,
    Submitted(OfferId),
    /// Initialization failed; the caller should leave the wizard
    Failed(String),
}

/// Result of a submission that reached the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(OfferRecord),
    /// Validation or backend failure. The session is `Ready` again and
    /// shows the report's field errors and summary.
    Rejected(ErrorReport),
}

pub struct OfferWizard {
    mode: WizardMode,
    store: AggregateStore,
    controller: WizardController,
    loader: OfferLoader,
    coordinator: SubmissionCoordinator,
    catalogs: Vec<Catalog>,
    status: SessionStatus,
    page_error: Option<String>,
    teardown: CancellationToken,
}

impl OfferWizard {
    /// Session for a new offer.
    pub fn create(services: WizardServices) -> Self {
        Self::build(services, WizardMode::Create, AggregateStore::new())
    }

    /// Session for a new offer pre-filled with `draft`.
    pub fn create_with_draft(services: WizardServices, draft: OfferDraft) -> Self {
        Self::build(services, WizardMode::Create, AggregateStore::with_draft(draft))
    }

    /// Session editing the persisted offer `offer_id`. The draft is empty
    /// until [`initialize`](Self::initialize) succeeds.
    pub fn edit(services: WizardServices, offer_id: OfferId) -> Self {
        Self::build(services, WizardMode::Edit { offer_id }, AggregateStore::new())
    }

    fn build(services: WizardServices, mode: WizardMode, store: AggregateStore) -> Self {
        let WizardServices { offers, catalogs, catalog_query } = services;
        Self {
            mode,
            store,
            controller: WizardController::new(),
            loader: OfferLoader::new(Arc::clone(&offers), catalogs)
                .with_catalog_query(catalog_query),
            coordinator: SubmissionCoordinator::new(offers),
            catalogs: Vec::new(),
            status: SessionStatus::Loading,
            page_error: None,
            teardown: CancellationToken::new(),
        }
    }

    /// Fetch catalogs, and in edit mode the offer, then become `Ready`.
    ///
    /// Calling it again after the first completion is a no-op.
    ///
    /// # Errors
    ///
    /// - [`WizardError::LoadFailed`] when the offer cannot be fetched; the
    ///   session is `Failed` afterwards.
    /// - [`WizardError::TornDown`] when the session was torn down before the
    ///   fetch completed; nothing is written.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub async fn initialize(&mut self) -> Result<(), WizardError> {
        self.ensure_live()?;
        if self.status != SessionStatus::Loading {
            return Ok(());
        }

        match self.mode {
            WizardMode::Create => {
                let catalogs = self.loader.load_catalogs().await;
                self.ensure_live()?;
                self.catalogs = catalogs;
            }
            WizardMode::Edit { offer_id } => {
                let loaded = self.loader.load(offer_id).await;
                self.ensure_live()?;
                match loaded {
                    Ok(loaded) => {
                        self.store = AggregateStore::with_draft(loaded.draft);
                        self.controller.reset();
                        self.catalogs = loaded.catalogs;
                    }
                    Err(err) => {
                        self.status = SessionStatus::Failed(MSG_LOAD_FAILED.to_string());
                        self.page_error = Some(MSG_LOAD_FAILED.to_string());
                        return Err(WizardError::LoadFailed { offer_id, reason: err.to_string() });
                    }
                }
            }
        }

        self.status = SessionStatus::Ready;
        info!(catalogs = self.catalogs.len(), "wizard ready");
        Ok(())
    }

    /// Submit the draft from the review step.
    ///
    /// # Errors
    ///
    /// Returns a [`WizardError`] when the session is not in a state that
    /// allows submission, or when it was torn down while the call was in
    /// flight. Backend and validation failures are not errors here; they
    /// come back as [`SubmitOutcome::Rejected`].
    ///
    /// If the returned future is dropped before it completes, the session is
    /// `Ready` again and the submission can be retried.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub async fn submit(&mut self) -> Result<SubmitOutcome, WizardError> {
        self.ensure_ready()?;
        if !self.controller.is_on_review() {
            return Err(WizardError::NotOnReviewStep(self.controller.current_step()));
        }

        self.page_error = None;
        let result = {
            let _in_flight = InFlight::enter(&mut self.status);
            self.coordinator.submit(self.mode, self.store.draft()).await
        };
        self.ensure_live()?;

        match result {
            Ok(record) => {
                self.status = SessionStatus::Submitted(record.id);
                self.controller.show_errors(FieldErrors::new());
                Ok(SubmitOutcome::Saved(record))
            }
            Err(report) => {
                self.controller.show_errors(report.fields.clone());
                self.page_error = Some(report.summary.clone());
                Ok(SubmitOutcome::Rejected(report))
            }
        }
    }

    /// Token observed by the session; cancel it when the wizard goes away.
    pub fn teardown_handle(&self) -> CancellationToken {
        self.teardown.clone()
    }

    pub fn teardown(&self) {
        self.teardown.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_cancelled()
    }

    fn ensure_live(&self) -> Result<(), WizardError> {
        if self.teardown.is_cancelled() {
            debug!("session torn down, discarding result");
            return Err(WizardError::TornDown);
        }
        Ok(())
    }

    /// Edits, navigation and submission need a live session in `Ready`.
    fn ensure_ready(&self) -> Result<(), WizardError> {
        self.ensure_live()?;
        match &self.status {
            SessionStatus::Ready => Ok(()),
            SessionStatus::Submitting => Err(WizardError::SubmissionInFlight),
            SessionStatus::Loading => Err(WizardError::NotReady("still loading".into())),
            SessionStatus::Submitted(id) => {
                Err(WizardError::NotReady(format!("offer {id} already submitted")))
            }
            SessionStatus::Failed(reason) => Err(WizardError::NotReady(reason.clone())),
        }
    }

    // Navigation. Every operation below fails with the `ensure_ready` error
    // and leaves the session untouched when it is not `Ready`.

    pub fn next(&mut self) -> Result<Transition, WizardError> {
        self.ensure_ready()?;
        Ok(self.controller.next(self.store.draft()))
    }

    pub fn prev(&mut self) -> Result<Transition, WizardError> {
        self.ensure_ready()?;
        Ok(self.controller.prev())
    }

    pub fn jump_to(&mut self, target: u8) -> Result<Transition, WizardError> {
        self.ensure_ready()?;
        Ok(self.controller.jump_to(target))
    }

    // Draft edits

    pub fn set_offer_field(&mut self, update: OfferFieldUpdate) -> Result<(), WizardError> {
        self.ensure_ready()?;
        self.store.set_offer_field(update);
        Ok(())
    }

    pub fn select_products(&mut self, products: &[ProductSelection]) -> Result<(), WizardError> {
        self.ensure_ready()?;
        self.store.select_products(products);
        Ok(())
    }

    pub fn select_reward(&mut self, id: LocalId) -> Result<(), WizardError> {
        self.ensure_ready()?;
        self.store.select_reward(id);
        Ok(())
    }

    pub fn creatives(&mut self) -> Result<CollectionManager<'_, Creative>, WizardError> {
        self.ensure_ready()?;
        Ok(self.store.creative_manager())
    }

    pub fn tracking_sources(
        &mut self,
    ) -> Result<CollectionManager<'_, TrackingSource>, WizardError> {
        self.ensure_ready()?;
        Ok(self.store.tracking_manager())
    }

    pub fn rewards(&mut self) -> Result<CollectionManager<'_, Reward>, WizardError> {
        self.ensure_ready()?;
        Ok(self.store.reward_manager())
    }

    // Read access

    pub const fn mode(&self) -> WizardMode {
        self.mode
    }

    pub const fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub const fn store(&self) -> &AggregateStore {
        &self.store
    }

    pub const fn draft(&self) -> &OfferDraft {
        self.store.draft()
    }

    pub fn catalogs(&self) -> &[Catalog] {
        &self.catalogs
    }

    pub const fn current_step(&self) -> WizardStep {
        self.controller.current_step()
    }

    pub const fn field_errors(&self) -> &FieldErrors {
        self.controller.errors()
    }

    /// Page-level message from the last failed load or submission.
    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }
}

/// Holds a session status at `Submitting` while a submission is awaited.
/// Dropping it, on completion or because the submit future was dropped,
/// puts the status back to `Ready`.
struct InFlight<'a> {
    status: &'a mut SessionStatus,
}

impl<'a> InFlight<'a> {
    fn enter(status: &'a mut SessionStatus) -> Self {
        *status = SessionStatus::Submitting;
        Self { status }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.status = SessionStatus::Ready;
    }
}
