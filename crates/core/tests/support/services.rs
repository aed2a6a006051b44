//! Mock offer and catalog services
//!
//! Both mocks record every call so tests can assert on exactly what reached
//! the backend boundary.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cvm_core::ports::{CatalogService, OfferService};
use cvm_domain::{
    Catalog, CatalogPage, CatalogQuery, CvmError, OfferId, OfferPayload, OfferRecord, PageMeta,
    Result as DomainResult,
};
use tokio::sync::Notify;

/// Id assigned to offers created through the mock.
pub const CREATED_OFFER_ID: OfferId = OfferId(101);

#[derive(Debug, Clone, PartialEq)]
pub enum OfferCall {
    Get(OfferId),
    Create(OfferPayload),
    Update(OfferId, OfferPayload),
}

/// In-memory `OfferService`.
///
/// Serves one stored record for `get_offer_by_id`, echoes payloads back as
/// records for create/update, or fails every call with a fixed error.
#[derive(Default)]
pub struct MockOfferService {
    record: Option<OfferRecord>,
    failure: Mutex<Option<CvmError>>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<OfferCall>>,
}

impl MockOfferService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offer(mut self, record: OfferRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn failing_with(self, error: CvmError) -> Self {
        self.fail_with(error);
        self
    }

    /// Fail every later call with `error`.
    pub fn fail_with(&self, error: CvmError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Every call waits for a permit on `gate` before answering.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Stop failing; later calls succeed.
    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<OfferCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Yield to the runtime until at least `count` calls have reached the
    /// mock, so a test can act while those calls are still waiting on the gate.
    pub async fn wait_for_calls(&self, count: usize) {
        while self.calls().len() < count {
            tokio::task::yield_now().await;
        }
    }

    async fn answer(&self, call: OfferCall) -> DomainResult<OfferRecord> {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        match call {
            OfferCall::Get(id) => self
                .record
                .clone()
                .filter(|record| record.id == id)
                .ok_or_else(|| CvmError::NotFound(format!("offer {id}"))),
            OfferCall::Create(payload) => Ok(echo(CREATED_OFFER_ID, &payload)),
            OfferCall::Update(id, payload) => Ok(echo(id, &payload)),
        }
    }
}

fn echo(id: OfferId, payload: &OfferPayload) -> OfferRecord {
    OfferRecord {
        id,
        name: Some(payload.name.clone()),
        description: payload.description.clone(),
        offer_type: Some(payload.offer_type.clone()),
        category_id: payload.category_id,
        product_id: payload.product_id,
        eligibility_rules: Some(payload.eligibility_rules.clone()),
        lifecycle_status: Some(payload.lifecycle_status),
        approval_status: Some(payload.approval_status),
        reusable: Some(payload.reusable),
        multi_language: Some(payload.multi_language),
        ..Default::default()
    }
}

#[async_trait]
impl OfferService for MockOfferService {
    async fn get_offer_by_id(&self, id: OfferId) -> DomainResult<OfferRecord> {
        self.answer(OfferCall::Get(id)).await
    }

    async fn create_offer(&self, payload: &OfferPayload) -> DomainResult<OfferRecord> {
        self.answer(OfferCall::Create(payload.clone())).await
    }

    async fn update_offer(&self, id: OfferId, payload: &OfferPayload) -> DomainResult<OfferRecord> {
        self.answer(OfferCall::Update(id, payload.clone())).await
    }
}

/// In-memory `CatalogService`.
#[derive(Default)]
pub struct MockCatalogService {
    catalogs: Vec<Catalog>,
    fail: bool,
    queries: Mutex<Vec<CatalogQuery>>,
}

impl MockCatalogService {
    pub fn new(catalogs: Vec<Catalog>) -> Self {
        Self { catalogs, ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn queries(&self) -> Vec<CatalogQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogService for MockCatalogService {
    async fn get_offer_categories(&self, query: &CatalogQuery) -> DomainResult<CatalogPage> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(CvmError::Network("catalog service unavailable".into()));
        }
        Ok(CatalogPage { data: self.catalogs.clone(), meta: PageMeta::default() })
    }
}
