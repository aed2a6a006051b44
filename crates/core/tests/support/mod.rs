//! Shared test helpers for `cvm-core` integration tests.
//!
//! In-memory service mocks plus draft fixtures so wizard tests can focus on
//! behaviour instead of wiring.

#![allow(dead_code)]

pub mod services;

use std::sync::Arc;

use cvm_core::WizardServices;
use cvm_domain::{Catalog, CatalogId, OfferDraft, ProductId};

pub use services::{MockCatalogService, MockOfferService, OfferCall};

/// Draft that passes every step validator.
pub fn complete_draft() -> OfferDraft {
    OfferDraft {
        name: "Summer Bundle".into(),
        offer_type: "STV".into(),
        category_id: Some(CatalogId(3)),
        product_id: Some(ProductId(12)),
        ..Default::default()
    }
}

pub fn catalog(id: i64, name: &str) -> Catalog {
    Catalog { id: CatalogId(id), name: name.into(), description: None, offer_count: 0 }
}

pub fn services(
    offers: &Arc<MockOfferService>,
    catalogs: &Arc<MockCatalogService>,
) -> WizardServices {
    WizardServices::new(offers.clone(), catalogs.clone())
}
