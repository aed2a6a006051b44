//! End-to-end wizard sessions against in-memory services.

mod support;

use std::sync::Arc;
use std::time::Duration;

use cvm_core::{OfferWizard, SessionStatus, SubmitOutcome, Transition, WizardError, WizardStep};
use cvm_domain::{
    CatalogId, CatalogQuery, Channel, CreativePatch, CvmError, OfferDraft, OfferFieldUpdate,
    OfferId, OfferRecord, ProductId, ProductSelection,
};
use serde_json::json;
use support::services::CREATED_OFFER_ID;
use support::{catalog, complete_draft, services, MockCatalogService, MockOfferService, OfferCall};
use tokio::sync::Notify;

fn walk_to_review(wizard: &mut OfferWizard) {
    while wizard.current_step() != WizardStep::Review {
        assert!(
            matches!(wizard.next().unwrap(), Transition::Moved { .. }),
            "blocked on {}",
            wizard.current_step()
        );
    }
}

fn unwrap_rejected(outcome: SubmitOutcome) -> cvm_core::ErrorReport {
    match outcome {
        SubmitOutcome::Rejected(report) => report,
        SubmitOutcome::Saved(record) => panic!("expected rejection, got {record:?}"),
    }
}

#[tokio::test]
async fn create_happy_path_issues_exactly_one_create_call() {
    let offers = Arc::new(MockOfferService::new());
    let catalogs = Arc::new(MockCatalogService::new(vec![catalog(3, "Bundles")]));
    let mut wizard = OfferWizard::create(services(&offers, &catalogs));

    wizard.initialize().await.unwrap();
    assert_eq!(wizard.status(), &SessionStatus::Ready);
    assert_eq!(wizard.catalogs().len(), 1);

    wizard.set_offer_field(OfferFieldUpdate::Name("Summer Bundle".into())).unwrap();
    wizard.set_offer_field(OfferFieldUpdate::OfferType("STV".into())).unwrap();
    wizard.set_offer_field(OfferFieldUpdate::CategoryId(Some(CatalogId(3)))).unwrap();
    wizard.select_products(&[
        ProductSelection { id: ProductId(12), name: "Unlimited".into() },
        ProductSelection { id: ProductId(13), name: "Ignored".into() },
    ])
    .unwrap();

    let creative = wizard.creatives().unwrap().add();
    wizard.creatives().unwrap().update(
        creative,
        CreativePatch { channel: Some(Channel::Email), ..Default::default() },
    );

    walk_to_review(&mut wizard);
    let outcome = wizard.submit().await.unwrap();

    let SubmitOutcome::Saved(record) = outcome else {
        panic!("expected a saved offer");
    };
    assert_eq!(record.id, CREATED_OFFER_ID);
    assert_eq!(wizard.status(), &SessionStatus::Submitted(CREATED_OFFER_ID));
    assert!(wizard.field_errors().is_empty());
    assert_eq!(wizard.page_error(), None);

    let calls = offers.calls();
    assert_eq!(calls.len(), 1);
    let OfferCall::Create(payload) = &calls[0] else {
        panic!("expected a create call, got {:?}", calls[0]);
    };
    assert_eq!(payload.name, "Summer Bundle");
    assert_eq!(payload.offer_type, "STV");
    assert_eq!(payload.category_id, Some(CatalogId(3)));
    assert_eq!(payload.product_id, Some(ProductId(12)));
}

#[tokio::test]
async fn catalogs_are_fetched_once_with_configured_query() {
    let offers = Arc::new(MockOfferService::new());
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let query = CatalogQuery { page_size: 25, ..CatalogQuery::default() };
    let mut wizard =
        OfferWizard::create(services(&offers, &catalogs).with_catalog_query(query.clone()));

    wizard.initialize().await.unwrap();
    wizard.initialize().await.unwrap();

    assert_eq!(catalogs.queries(), vec![query]);
}

#[tokio::test]
async fn catalog_failure_degrades_to_empty_list() -> anyhow::Result<()> {
    let offers = Arc::new(MockOfferService::new());
    let catalogs = Arc::new(MockCatalogService::failing());
    let mut wizard = OfferWizard::create(services(&offers, &catalogs));

    wizard.initialize().await?;

    assert_eq!(wizard.status(), &SessionStatus::Ready);
    assert!(wizard.catalogs().is_empty());
    Ok(())
}

#[tokio::test]
async fn edit_load_fills_defaults_and_updates_on_submit() {
    let record: OfferRecord = serde_json::from_value(json!({
        "id": 42,
        "name": "X",
        "description": null,
        "offer_type": "DATA",
        "category_id": 5,
        "product_id": null,
        "reusable": null
    }))
    .unwrap();
    let offers = Arc::new(MockOfferService::new().with_offer(record));
    let catalogs = Arc::new(MockCatalogService::new(vec![catalog(5, "Data")]));
    let mut wizard = OfferWizard::edit(services(&offers, &catalogs), OfferId(42));

    wizard.initialize().await.unwrap();

    let draft = wizard.draft();
    assert_eq!(draft.name, "X");
    assert_eq!(draft.description, "");
    assert_eq!(draft.product_id, None);
    assert!(!draft.reusable);
    assert_eq!(wizard.current_step(), WizardStep::BasicInfo);
    assert!(wizard.store().creatives().is_empty());
    assert_eq!(wizard.catalogs().len(), 1);

    // Product step blocks until a product is picked.
    assert!(matches!(wizard.next().unwrap(), Transition::Moved { .. }));
    let Transition::Blocked(errors) = wizard.next().unwrap() else {
        panic!("products step should block");
    };
    assert_eq!(errors.get("product_id"), Some("Product is required"));

    wizard.select_products(&[ProductSelection { id: ProductId(7), name: String::new() }]).unwrap();
    walk_to_review(&mut wizard);
    assert!(matches!(wizard.submit().await.unwrap(), SubmitOutcome::Saved(_)));

    let calls = offers.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], OfferCall::Get(OfferId(42)));
    let OfferCall::Update(id, payload) = &calls[1] else {
        panic!("expected an update call, got {:?}", calls[1]);
    };
    assert_eq!(*id, OfferId(42));
    assert_eq!(payload.product_id, Some(ProductId(7)));
    assert_eq!(payload.description, None);
}

#[tokio::test]
async fn failed_offer_load_marks_session_failed() {
    let offers = Arc::new(MockOfferService::new());
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let mut wizard = OfferWizard::edit(services(&offers, &catalogs), OfferId(9));

    let err = wizard.initialize().await.unwrap_err();

    assert!(matches!(err, WizardError::LoadFailed { offer_id: OfferId(9), .. }));
    assert_eq!(wizard.status(), &SessionStatus::Failed("Failed to load offer".into()));
    assert_eq!(wizard.page_error(), Some("Failed to load offer"));
    assert!(matches!(wizard.submit().await, Err(WizardError::NotReady(_))));
    assert!(matches!(
        wizard.set_offer_field(OfferFieldUpdate::Name("Too late".into())),
        Err(WizardError::NotReady(_))
    ));
    assert!(matches!(wizard.next(), Err(WizardError::NotReady(_))));
    assert_eq!(wizard.draft(), &OfferDraft::default());
}

#[tokio::test]
async fn details_array_rejection_becomes_field_errors() {
    let envelope = json!({"details": [{"field": "name", "message": "required"}]});
    let offers =
        Arc::new(MockOfferService::new().failing_with(CvmError::rejected(422, envelope)));
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let mut wizard = OfferWizard::create_with_draft(services(&offers, &catalogs), complete_draft());
    wizard.initialize().await.unwrap();
    walk_to_review(&mut wizard);

    let report = unwrap_rejected(wizard.submit().await.unwrap());

    assert_eq!(report.fields.get("name"), Some("required"));
    assert_eq!(report.fields.len(), 1);
    assert_eq!(report.summary, "Please fix the validation errors below");
    assert_eq!(wizard.field_errors().get("name"), Some("required"));
    assert_eq!(wizard.page_error(), Some("Please fix the validation errors below"));
    assert_eq!(wizard.status(), &SessionStatus::Ready);
}

#[tokio::test]
async fn transport_failure_shows_generic_summary_and_allows_retry() {
    let offers = Arc::new(
        MockOfferService::new().failing_with(CvmError::Network("connection reset".into())),
    );
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let mut wizard = OfferWizard::create_with_draft(services(&offers, &catalogs), complete_draft());
    wizard.initialize().await.unwrap();
    walk_to_review(&mut wizard);

    let report = unwrap_rejected(wizard.submit().await.unwrap());
    assert!(report.fields.is_empty());
    assert_eq!(report.summary, "Failed to create offer");
    assert_eq!(wizard.status(), &SessionStatus::Ready);

    offers.recover();
    assert!(matches!(wizard.submit().await.unwrap(), SubmitOutcome::Saved(_)));
    assert_eq!(wizard.page_error(), None);
    assert_eq!(offers.calls().len(), 2);
}

#[tokio::test]
async fn update_failure_uses_update_summary() {
    let offers = Arc::new(MockOfferService::new().with_offer(OfferRecord {
        id: OfferId(5),
        ..Default::default()
    }));
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let mut wizard = OfferWizard::edit(services(&offers, &catalogs), OfferId(5));
    wizard.initialize().await.unwrap();

    for update in [
        OfferFieldUpdate::Name("Weekend".into()),
        OfferFieldUpdate::OfferType("VOICE".into()),
        OfferFieldUpdate::CategoryId(Some(CatalogId(1))),
        OfferFieldUpdate::ProductId(Some(ProductId(2))),
    ] {
        wizard.set_offer_field(update).unwrap();
    }
    walk_to_review(&mut wizard);
    offers.fail_with(CvmError::Internal("unexpected response".into()));

    let report = unwrap_rejected(wizard.submit().await.unwrap());

    assert_eq!(report.summary, "Failed to update offer");
    assert!(matches!(offers.calls().last(), Some(OfferCall::Update(OfferId(5), _))));
}

#[tokio::test]
async fn jumping_past_validation_still_blocks_submit_locally() {
    let offers = Arc::new(MockOfferService::new());
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let mut wizard = OfferWizard::create(services(&offers, &catalogs));
    wizard.initialize().await.unwrap();

    for target in [3, 5, 6] {
        assert!(matches!(wizard.jump_to(target).unwrap(), Transition::Moved { .. }));
    }
    assert_eq!(wizard.current_step(), WizardStep::Review);

    let report = unwrap_rejected(wizard.submit().await.unwrap());

    assert_eq!(
        report.fields.fields().collect::<Vec<_>>(),
        vec!["category_id", "name", "offer_type", "product_id"]
    );
    assert_eq!(report.summary, "Please fix the validation errors below");
    assert!(offers.calls().is_empty());
}

#[tokio::test]
async fn submit_requires_review_step() {
    let offers = Arc::new(MockOfferService::new());
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let mut wizard = OfferWizard::create_with_draft(services(&offers, &catalogs), complete_draft());

    assert!(matches!(wizard.submit().await, Err(WizardError::NotReady(_))));

    wizard.initialize().await.unwrap();
    assert_eq!(
        wizard.submit().await,
        Err(WizardError::NotOnReviewStep(WizardStep::BasicInfo))
    );
    assert!(offers.calls().is_empty());
}

#[tokio::test]
async fn load_result_after_teardown_is_discarded() {
    let gate = Arc::new(Notify::new());
    let record = OfferRecord { id: OfferId(42), name: Some("Late".into()), ..Default::default() };
    let offers = Arc::new(MockOfferService::new().with_offer(record).gated(gate.clone()));
    let catalogs = Arc::new(MockCatalogService::new(vec![catalog(1, "Any")]));
    let mut wizard = OfferWizard::edit(services(&offers, &catalogs), OfferId(42));
    let teardown = wizard.teardown_handle();

    let init = tokio::spawn(async move {
        let result = wizard.initialize().await;
        (wizard, result)
    });
    offers.wait_for_calls(1).await;
    teardown.cancel();
    gate.notify_one();
    let (wizard, result) = init.await.unwrap();

    assert_eq!(offers.calls(), vec![OfferCall::Get(OfferId(42))]);
    assert_eq!(catalogs.queries().len(), 1);
    assert_eq!(result, Err(WizardError::TornDown));
    assert_eq!(wizard.draft(), &OfferDraft::default());
    assert!(wizard.catalogs().is_empty());
    assert_eq!(wizard.status(), &SessionStatus::Loading);
}

#[tokio::test]
async fn submit_result_after_teardown_is_discarded() {
    let gate = Arc::new(Notify::new());
    let offers = Arc::new(
        MockOfferService::new()
            .failing_with(CvmError::rejected(400, json!({"message": "Duplicate name"})))
            .gated(gate.clone()),
    );
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let mut wizard = OfferWizard::create_with_draft(services(&offers, &catalogs), complete_draft());
    wizard.initialize().await.unwrap();
    walk_to_review(&mut wizard);
    let teardown = wizard.teardown_handle();

    let submit = tokio::spawn(async move {
        let result = wizard.submit().await;
        (wizard, result)
    });
    offers.wait_for_calls(1).await;
    teardown.cancel();
    gate.notify_one();
    let (wizard, result) = submit.await.unwrap();

    assert_eq!(offers.calls().len(), 1);
    assert_eq!(result, Err(WizardError::TornDown));
    assert_eq!(wizard.page_error(), None);
    assert!(wizard.field_errors().is_empty());
    assert!(wizard.is_torn_down());
}

#[tokio::test]
async fn dropped_submit_leaves_session_ready_for_retry() {
    let gate = Arc::new(Notify::new());
    let offers = Arc::new(MockOfferService::new().gated(gate.clone()));
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let mut wizard = OfferWizard::create_with_draft(services(&offers, &catalogs), complete_draft());
    wizard.initialize().await.unwrap();
    walk_to_review(&mut wizard);

    let abandoned = tokio::time::timeout(Duration::from_millis(50), wizard.submit()).await;
    assert!(abandoned.is_err(), "submit should still be waiting on the backend");
    assert_eq!(wizard.status(), &SessionStatus::Ready);

    gate.notify_one();
    let outcome = wizard.submit().await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    assert_eq!(wizard.status(), &SessionStatus::Submitted(CREATED_OFFER_ID));
    assert_eq!(offers.calls().len(), 2);
}

#[tokio::test]
async fn edits_are_refused_until_the_offer_is_loaded() {
    let record = OfferRecord { id: OfferId(8), name: Some("Stored".into()), ..Default::default() };
    let offers = Arc::new(MockOfferService::new().with_offer(record));
    let catalogs = Arc::new(MockCatalogService::new(vec![]));
    let mut wizard = OfferWizard::edit(services(&offers, &catalogs), OfferId(8));

    assert_eq!(
        wizard.set_offer_field(OfferFieldUpdate::Name("Early".into())),
        Err(WizardError::NotReady("still loading".into()))
    );
    assert!(wizard.creatives().is_err());
    assert!(matches!(wizard.jump_to(2), Err(WizardError::NotReady(_))));

    wizard.initialize().await.unwrap();
    assert_eq!(wizard.draft().name, "Stored");
    wizard.set_offer_field(OfferFieldUpdate::Name("Renamed".into())).unwrap();
    assert_eq!(wizard.draft().name, "Renamed");

    wizard.teardown();
    assert!(matches!(wizard.next(), Err(WizardError::TornDown)));
    assert_eq!(wizard.draft().name, "Renamed");
}
