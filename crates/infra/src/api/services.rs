//! Offer and catalog port implementations over the REST API
//!
//! Endpoints:
//! - `GET  /offers/{id}`
//! - `POST /offers`
//! - `PUT  /offers/{id}`
//! - `GET  /offer-categories?pageSize=&sortBy=&sortDirection=`

use async_trait::async_trait;
use cvm_core::ports::{CatalogService, OfferService};
use cvm_domain::{
    Catalog, CatalogPage, CatalogQuery, CvmError, OfferId, OfferPayload, OfferRecord, PageMeta,
    Result,
};
use serde::Deserialize;
use tracing::instrument;

use super::client::ApiClient;

const OFFERS_PATH: &str = "/offers";
const CATEGORIES_PATH: &str = "/offer-categories";

#[async_trait]
impl OfferService for ApiClient {
    #[instrument(skip(self), fields(offer_id = %id))]
    async fn get_offer_by_id(&self, id: OfferId) -> Result<OfferRecord> {
        self.get(&format!("{OFFERS_PATH}/{id}"), &[]).await.map_err(CvmError::from)
    }

    #[instrument(skip(self, payload))]
    async fn create_offer(&self, payload: &OfferPayload) -> Result<OfferRecord> {
        self.post(OFFERS_PATH, payload).await.map_err(CvmError::from)
    }

    #[instrument(skip(self, payload), fields(offer_id = %id))]
    async fn update_offer(&self, id: OfferId, payload: &OfferPayload) -> Result<OfferRecord> {
        self.put(&format!("{OFFERS_PATH}/{id}"), payload).await.map_err(CvmError::from)
    }
}

/// Catalog listings come back either paged or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogListing {
    Page(CatalogPage),
    List(Vec<Catalog>),
}

impl From<CatalogListing> for CatalogPage {
    fn from(listing: CatalogListing) -> Self {
        match listing {
            CatalogListing::Page(page) => page,
            CatalogListing::List(data) => Self { data, meta: PageMeta::default() },
        }
    }
}

#[async_trait]
impl CatalogService for ApiClient {
    #[instrument(skip(self))]
    async fn get_offer_categories(&self, query: &CatalogQuery) -> Result<CatalogPage> {
        let params = [
            ("pageSize", query.page_size.to_string()),
            ("sortBy", query.sort_by.clone()),
            ("sortDirection", query.sort_direction.to_string()),
        ];
        let listing: CatalogListing = self.get(CATEGORIES_PATH, &params).await?;
        Ok(listing.into())
    }
}
