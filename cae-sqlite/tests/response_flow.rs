mod common;

use cae_core::models::{AwardCriterion, QuoteOffer, ResponseRejection};
use cae_core::ports::{Application, ResponseRepository, SupplierRoster};
use common::TestApp;

#[tokio::test]
async fn accepted_responses_carry_the_extended_total() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let supplier = common::supplier();

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[2.0, 1.0], &[supplier]).await?;

    let record = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            supplier,
            common::offer(&[(items[0], 10.0), (items[1], 5.0)]),
            app.now(),
        )
        .await?
        .expect("response should be accepted");

    assert_eq!(record.offered_total, Some(25.0));
    assert!(!record.rejected);

    let stored = db.get_responses(quotation_id).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].offered_total, Some(25.0));
    assert_eq!(stored[0].offer.price_for(&items[0]), Some(10.0));

    Ok(())
}

#[tokio::test]
async fn a_partial_response_is_stored_with_its_gaps() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let supplier = common::supplier();

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0, 1.0], &[supplier]).await?;

    let record = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            supplier,
            common::offer(&[(items[0], 10.0)]),
            app.now(),
        )
        .await?
        .expect("partial responses are accepted");

    assert_eq!(record.offer.price_for(&items[0]), Some(10.0));
    assert_eq!(record.offer.price_for(&items[1]), None);
    assert_eq!(record.offered_total, Some(10.0));

    Ok(())
}

#[tokio::test]
async fn resubmission_is_refused_not_overwritten() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let supplier = common::supplier();

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0], &[supplier]).await?;

    common::submit_responses(&app, quotation_id, &items, &[(supplier, &[10.0])]).await?;

    let second = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            supplier,
            common::offer(&[(items[0], 5.0)]),
            app.now(),
        )
        .await?;
    assert_eq!(second.unwrap_err(), ResponseRejection::DuplicateResponse);

    // The original survives untouched.
    let stored = db.get_responses(quotation_id).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].offer.price_for(&items[0]), Some(10.0));

    Ok(())
}

#[tokio::test]
async fn contextual_rejections_are_typed() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let supplier = common::supplier();

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0], &[supplier]).await?;

    // Unknown quotation.
    let outcome = db
        .submit_response(
            app.generate_response_id(),
            app.generate_quotation_id(&()),
            supplier,
            common::offer(&[(items[0], 10.0)]),
            app.now(),
        )
        .await?;
    assert_eq!(outcome.unwrap_err(), ResponseRejection::UnknownQuotation);

    // Not invited.
    let outcome = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            common::supplier(),
            common::offer(&[(items[0], 10.0)]),
            app.now(),
        )
        .await?;
    assert_eq!(outcome.unwrap_err(), ResponseRejection::SupplierNotInvited);

    // Excluded after the invitation.
    assert!(db.exclude_supplier(quotation_id, supplier, app.now()).await?);
    let outcome = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            supplier,
            common::offer(&[(items[0], 10.0)]),
            app.now(),
        )
        .await?;
    assert_eq!(outcome.unwrap_err(), ResponseRejection::SupplierExcluded);

    // An offer naming a foreign item.
    let invited = common::supplier();
    assert!(db.invite_supplier(quotation_id, invited, app.now()).await?);
    let outcome = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            invited,
            common::offer(&[(app.generate_item_id(), 10.0)]),
            app.now(),
        )
        .await?;
    assert_eq!(outcome.unwrap_err(), ResponseRejection::UnknownItem);

    // A discount payload under a priced criterion.
    let outcome = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            invited,
            QuoteOffer::Discount(10.0),
            app.now(),
        )
        .await?;
    assert_eq!(outcome.unwrap_err(), ResponseRejection::OfferMismatch);

    Ok(())
}

#[tokio::test]
async fn expired_or_closed_quotations_refuse_responses() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let supplier = common::supplier();

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0], &[supplier]).await?;

    // At/after the deadline.
    let outcome = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            supplier,
            common::offer(&[(items[0], 10.0)]),
            common::at(7200),
        )
        .await?;
    assert_eq!(outcome.unwrap_err(), ResponseRejection::DeadlineExpired);

    assert!(common::close_quotation(db, quotation_id).await?);
    let outcome = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            supplier,
            common::offer(&[(items[0], 10.0)]),
            app.now(),
        )
        .await?;
    assert_eq!(outcome.unwrap_err(), ResponseRejection::QuotationNotOpen);

    Ok(())
}

#[tokio::test]
async fn a_discount_quotation_expects_discount_offers() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let supplier = common::supplier();

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::Discount, &[1.0], &[supplier]).await?;

    let outcome = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            supplier,
            common::offer(&[(items[0], 10.0)]),
            app.now(),
        )
        .await?;
    assert_eq!(outcome.unwrap_err(), ResponseRejection::OfferMismatch);

    let record = db
        .submit_response(
            app.generate_response_id(),
            quotation_id,
            supplier,
            QuoteOffer::Discount(12.5),
            app.now(),
        )
        .await?
        .expect("discount offers are accepted");
    assert_eq!(record.offer.discount(), Some(12.5));
    assert_eq!(record.offered_total, None);

    Ok(())
}

#[tokio::test]
async fn rejecting_a_response_flags_it_without_deleting() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let supplier = common::supplier();

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0], &[supplier]).await?;
    common::submit_responses(&app, quotation_id, &items, &[(supplier, &[10.0])]).await?;

    let response_id = db.get_responses(quotation_id).await?[0].id;
    assert!(db.reject_response(response_id, app.now()).await?);
    // Re-flagging is a no-op.
    assert!(!db.reject_response(response_id, app.now()).await?);

    let stored = db.get_responses(quotation_id).await?;
    assert_eq!(stored.len(), 1);
    assert!(stored[0].rejected);

    Ok(())
}
