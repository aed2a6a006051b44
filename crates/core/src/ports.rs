//! Port interfaces for the offer backend
//!
//! These traits define the boundary between the wizard core and the REST
//! adapter in `cvm-infra`.
//!
//! The backend contract covers the offer's scalar fields only. Creatives,
//! tracking sources and rewards are composed locally and are not part of
//! any call here; they are neither sent on create/update nor returned by
//! `get_offer_by_id`.

use async_trait::async_trait;
use cvm_domain::{CatalogPage, CatalogQuery, OfferId, OfferPayload, OfferRecord, Result};

/// Offer read/write service
#[async_trait]
pub trait OfferService: Send + Sync {
    /// Fetch one persisted offer
    async fn get_offer_by_id(&self, id: OfferId) -> Result<OfferRecord>;

    /// Persist a new offer
    async fn create_offer(&self, payload: &OfferPayload) -> Result<OfferRecord>;

    /// Replace the scalar fields of an existing offer
    async fn update_offer(&self, id: OfferId, payload: &OfferPayload) -> Result<OfferRecord>;
}

/// Offer catalog (category) listing service
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List catalogs with paging and sorting
    async fn get_offer_categories(&self, query: &CatalogQuery) -> Result<CatalogPage>;
}
