//! Edit-mode load and reconciliation
//!
//! Fetches the persisted offer and the catalog list concurrently, then
//! normalizes every nullable backend field into the draft's defaults.

use std::sync::Arc;

use cvm_domain::{Catalog, CatalogQuery, OfferDraft, OfferId, OfferRecord, Result};
use tracing::{debug, info, instrument, warn};

use crate::ports::{CatalogService, OfferService};

/// Reconciled draft plus the catalogs offered in the category picker.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedOffer {
    pub offer_id: OfferId,
    pub draft: OfferDraft,
    pub catalogs: Vec<Catalog>,
}

/// Load/reconcile use case shared by create and edit mode.
pub struct OfferLoader {
    offers: Arc<dyn OfferService>,
    catalogs: Arc<dyn CatalogService>,
    query: CatalogQuery,
}

impl OfferLoader {
    pub fn new(offers: Arc<dyn OfferService>, catalogs: Arc<dyn CatalogService>) -> Self {
        Self { offers, catalogs, query: CatalogQuery::default() }
    }

    /// Override the catalog listing query (page size, sort).
    #[must_use]
    pub fn with_catalog_query(mut self, query: CatalogQuery) -> Self {
        self.query = query;
        self
    }

    /// Fetch an offer and the catalogs concurrently and reconcile the offer
    /// into a draft.
    ///
    /// # Errors
    ///
    /// Returns the offer service's error when the offer cannot be fetched.
    /// A catalog failure is not an error; the list is empty instead.
    #[instrument(skip(self), fields(offer_id = %offer_id))]
    pub async fn load(&self, offer_id: OfferId) -> Result<LoadedOffer> {
        let (record, catalogs) =
            tokio::join!(self.offers.get_offer_by_id(offer_id), self.load_catalogs());

        let record = record.map_err(|err| {
            warn!(kind = err.label(), error = %err, "failed to load offer");
            err
        })?;

        info!(catalogs = catalogs.len(), "offer loaded");
        Ok(LoadedOffer { offer_id, draft: reconcile(record), catalogs })
    }

    /// Fetch the catalog list, degrading to an empty list on failure.
    pub async fn load_catalogs(&self) -> Vec<Catalog> {
        match self.catalogs.get_offer_categories(&self.query).await {
            Ok(page) => {
                debug!(count = page.data.len(), "catalogs loaded");
                page.data
            }
            Err(err) => {
                warn!(error = %err, "failed to load catalogs, continuing without them");
                Vec::new()
            }
        }
    }
}

/// Map a backend record onto a draft. Absent fields take the draft defaults.
///
/// Sub-entities are not part of the record and are not reconstructed.
pub fn reconcile(record: OfferRecord) -> OfferDraft {
    OfferDraft {
        name: record.name.unwrap_or_default(),
        description: record.description.unwrap_or_default(),
        offer_type: record.offer_type.unwrap_or_default(),
        category_id: record.category_id,
        product_id: record.product_id,
        eligibility_rules: record.eligibility_rules.unwrap_or_default(),
        lifecycle_status: record.lifecycle_status.unwrap_or_default(),
        approval_status: record.approval_status.unwrap_or_default(),
        reusable: record.reusable.unwrap_or_default(),
        multi_language: record.multi_language.unwrap_or_default(),
    }
}
