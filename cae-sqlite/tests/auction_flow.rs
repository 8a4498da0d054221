mod common;

use cae_core::models::{
    AwardBasis, AwardCriterion, BidOutcome, BidRejection, DateTimeRangeQuery, SelectionError,
    SelectionStatus,
};
use cae_core::ports::{
    Application, AwardRepository, EvaluationRepository, ResponseRepository, SelectionRepository,
    SupplierRoster,
};
use cae_eval::Consolidator;
use cae_sqlite::types::{SelectionId, SupplierId};
use common::TestApp;

/// Seed, respond, close, and evaluate a three-item quotation; returns the
/// session opened over its baseline, live since an hour ago.
async fn live_session(
    app: &TestApp,
    suppliers: &[SupplierId],
) -> anyhow::Result<SelectionId> {
    let db = app.database();
    let (quotation_id, items) = common::seed_quotation(
        app,
        AwardCriterion::PerItem,
        &[1.0, 1.0, 1.0],
        suppliers,
    )
    .await?;

    common::submit_responses(
        app,
        quotation_id,
        &items,
        &[
            (suppliers[0], &[10.0, 20.0, 30.0]),
            (suppliers[1], &[12.0, 18.0, 29.0]),
        ],
    )
    .await?;

    assert!(common::close_quotation(db, quotation_id).await?);
    db.evaluate_quotation(quotation_id, &Consolidator, app.now())
        .await?
        .expect("evaluation should run");

    let selection_id = app.generate_selection_id();
    db.open_selection(selection_id, quotation_id, common::at(-3600), app.now())
        .await?
        .expect("selection should open");
    Ok(selection_id)
}

#[tokio::test]
async fn consolidation_matches_the_lowest_offers() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let (a, b) = (common::supplier(), common::supplier());

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0, 1.0, 1.0], &[a, b]).await?;
    common::submit_responses(
        &app,
        quotation_id,
        &items,
        &[(a, &[10.0, 20.0, 30.0]), (b, &[12.0, 18.0, 29.0])],
    )
    .await?;

    let record = db
        .evaluate_quotation(quotation_id, &Consolidator, app.now())
        .await?
        .expect("evaluation should run");

    let baseline = &record.baseline;
    assert_eq!(baseline.items[&items[0]].supplier_id, a);
    assert_eq!(baseline.items[&items[0]].value, 10.0);
    assert_eq!(baseline.items[&items[1]].supplier_id, b);
    assert_eq!(baseline.items[&items[1]].value, 18.0);
    assert_eq!(baseline.items[&items[2]].supplier_id, b);
    assert_eq!(baseline.items[&items[2]].value, 29.0);
    assert_eq!(baseline.opening_value(), Some(57.0));

    // Re-evaluating an unchanged quotation stores the identical snapshot.
    let again = db
        .evaluate_quotation(quotation_id, &Consolidator, app.now())
        .await?
        .expect("evaluation should run");
    assert_eq!(
        serde_json::to_string(baseline)?,
        serde_json::to_string(&again.baseline)?
    );
    let stored = EvaluationRepository::<Consolidator>::get_baseline(db, quotation_id)
        .await?
        .expect("stored baseline");
    assert_eq!(
        serde_json::to_string(baseline)?,
        serde_json::to_string(&stored.baseline)?
    );

    Ok(())
}

#[tokio::test]
async fn rejected_responses_are_excluded_from_evaluation() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let (a, b) = (common::supplier(), common::supplier());

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0], &[a, b]).await?;
    common::submit_responses(&app, quotation_id, &items, &[(a, &[5.0]), (b, &[10.0])])
        .await?;

    let cheapest = db
        .get_responses(quotation_id)
        .await?
        .into_iter()
        .find(|response| response.supplier_id == a)
        .expect("a's response is on file");
    assert!(db.reject_response(cheapest.id, app.now()).await?);

    let record = db
        .evaluate_quotation(quotation_id, &Consolidator, app.now())
        .await?
        .expect("evaluation should run");
    assert_eq!(record.baseline.items[&items[0]].supplier_id, b);

    Ok(())
}

#[tokio::test]
async fn opening_a_selection_requires_a_closed_evaluated_quotation() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let supplier = common::supplier();

    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0], &[supplier]).await?;

    // Still open.
    let outcome = db
        .open_selection(app.generate_selection_id(), quotation_id, common::at(0), app.now())
        .await?;
    assert_eq!(outcome.unwrap_err(), SelectionError::QuotationNotClosed);

    // Closed but never evaluated.
    common::submit_responses(&app, quotation_id, &items, &[(supplier, &[10.0])]).await?;
    assert!(common::close_quotation(db, quotation_id).await?);
    let outcome = db
        .open_selection(app.generate_selection_id(), quotation_id, common::at(0), app.now())
        .await?;
    assert_eq!(outcome.unwrap_err(), SelectionError::MissingBaseline);

    // Evaluated; opens, and only once.
    db.evaluate_quotation(quotation_id, &Consolidator, app.now())
        .await?
        .expect("evaluation should run");
    let selection_id = app.generate_selection_id();
    let record = db
        .open_selection(selection_id, quotation_id, common::at(0), app.now())
        .await?
        .expect("selection should open");
    assert_eq!(record.status, SelectionStatus::Planned);
    assert_eq!(record.opening_value, 10.0);

    let outcome = db
        .open_selection(app.generate_selection_id(), quotation_id, common::at(0), app.now())
        .await?;
    assert_eq!(outcome.unwrap_err(), SelectionError::DuplicateSelection);

    // Unknown quotation.
    let outcome = db
        .open_selection(
            app.generate_selection_id(),
            app.generate_quotation_id(&()),
            common::at(0),
            app.now(),
        )
        .await?;
    assert_eq!(outcome.unwrap_err(), SelectionError::UnknownQuotation);

    Ok(())
}

#[tokio::test]
async fn an_empty_baseline_cannot_seed_a_session() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();

    // No responses at all: evaluation succeeds with an empty baseline.
    let (quotation_id, _) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0], &[]).await?;
    assert!(common::close_quotation(db, quotation_id).await?);
    let record = db
        .evaluate_quotation(quotation_id, &Consolidator, app.now())
        .await?
        .expect("an empty evaluation is not an error");
    assert!(record.baseline.is_empty());

    let outcome = db
        .open_selection(app.generate_selection_id(), quotation_id, common::at(0), app.now())
        .await?;
    assert_eq!(outcome.unwrap_err(), SelectionError::EmptyBaseline);

    Ok(())
}

#[tokio::test]
async fn the_ledger_only_accepts_strictly_lower_bids() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let suppliers = [common::supplier(), common::supplier()];
    let selection_id = live_session(&app, &suppliers).await?;

    // Opening ceiling is 57; the first bid must undercut it.
    let outcome = db
        .submit_bid(app.generate_bid_id(), selection_id, suppliers[0], 57.0, app.now())
        .await?;
    assert!(matches!(
        outcome,
        BidOutcome::Rejected {
            reason: BidRejection::NotLowerAnymore { current, .. },
            ..
        } if current == 57.0
    ));

    let outcome = db
        .submit_bid(app.generate_bid_id(), selection_id, suppliers[0], 50.0, app.now())
        .await?;
    assert_eq!(outcome.new_lowest(), Some(50.0));
    assert!(outcome.is_accepted());

    // 55 undercuts the opening ceiling but not the ledger minimum.
    let outcome = db
        .submit_bid(app.generate_bid_id(), selection_id, suppliers[1], 55.0, app.now())
        .await?;
    let BidOutcome::Rejected {
        reason,
        current_lowest,
    } = outcome
    else {
        panic!("a non-undercutting bid must be rejected");
    };
    assert_eq!(
        reason,
        BidRejection::NotLowerAnymore {
            offered: 55.0,
            current: 50.0
        }
    );
    assert_eq!(current_lowest, Some(50.0));

    let outcome = db
        .submit_bid(app.generate_bid_id(), selection_id, suppliers[1], 45.0, app.now())
        .await?;
    assert!(outcome.is_accepted());

    // The ledger reads back newest-first and strictly decreasing.
    let page = db
        .get_bids(selection_id, DateTimeRangeQuery::default(), 10)
        .await?;
    let values: Vec<f64> = page.results.iter().map(|bid| bid.value).collect();
    assert_eq!(values, vec![45.0, 50.0]);

    Ok(())
}

#[tokio::test]
async fn bids_are_gated_by_schedule_eligibility_and_value() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let suppliers = [common::supplier(), common::supplier()];

    // Same pipeline as live_session, but scheduled an hour from now.
    let (quotation_id, items) =
        common::seed_quotation(&app, AwardCriterion::PerItem, &[1.0], &suppliers).await?;
    common::submit_responses(&app, quotation_id, &items, &[(suppliers[0], &[100.0])])
        .await?;
    assert!(common::close_quotation(db, quotation_id).await?);
    db.evaluate_quotation(quotation_id, &Consolidator, app.now())
        .await?
        .expect("evaluation should run");
    let selection_id = app.generate_selection_id();
    db.open_selection(selection_id, quotation_id, common::at(3600), app.now())
        .await?
        .expect("selection should open");

    // Before the scheduled time the session is planned, not disputing.
    let selection = db.get_selection(selection_id).await?.expect("selection");
    assert_eq!(selection.status_at(&app.now()), SelectionStatus::Planned);
    let outcome = db
        .submit_bid(app.generate_bid_id(), selection_id, suppliers[0], 90.0, app.now())
        .await?;
    assert!(matches!(
        outcome,
        BidOutcome::Rejected {
            reason: BidRejection::SessionNotActive,
            ..
        }
    ));

    // Once the clock passes the schedule, the same stored row is live.
    assert_eq!(
        selection.status_at(&common::at(3601)),
        SelectionStatus::Disputing
    );
    let outcome = db
        .submit_bid(
            app.generate_bid_id(),
            selection_id,
            suppliers[0],
            90.0,
            common::at(3601),
        )
        .await?;
    assert!(outcome.is_accepted());

    // Eligibility and value validation.
    let outcome = db
        .submit_bid(
            app.generate_bid_id(),
            selection_id,
            common::supplier(),
            80.0,
            common::at(3601),
        )
        .await?;
    assert!(matches!(
        outcome,
        BidOutcome::Rejected {
            reason: BidRejection::SupplierNotInvited,
            ..
        }
    ));

    assert!(db.exclude_supplier(quotation_id, suppliers[1], app.now()).await?);
    let outcome = db
        .submit_bid(
            app.generate_bid_id(),
            selection_id,
            suppliers[1],
            80.0,
            common::at(3601),
        )
        .await?;
    assert!(matches!(
        outcome,
        BidOutcome::Rejected {
            reason: BidRejection::SupplierExcluded,
            ..
        }
    ));

    for value in [0.0, -10.0, f64::NAN] {
        let outcome = db
            .submit_bid(
                app.generate_bid_id(),
                selection_id,
                suppliers[0],
                value,
                common::at(3601),
            )
            .await?;
        assert!(matches!(
            outcome,
            BidOutcome::Rejected {
                reason: BidRejection::InvalidValue,
                ..
            }
        ));
    }

    let outcome = db
        .submit_bid(
            app.generate_bid_id(),
            app.generate_selection_id(),
            suppliers[0],
            80.0,
            common::at(3601),
        )
        .await?;
    assert!(matches!(
        outcome,
        BidOutcome::Rejected {
            reason: BidRejection::UnknownSelection,
            ..
        }
    ));

    Ok(())
}

#[tokio::test]
async fn closing_ends_the_session_and_the_lowest_bid_wins() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let suppliers = [common::supplier(), common::supplier()];
    let selection_id = live_session(&app, &suppliers).await?;

    // Resolution before closing is refused.
    let outcome = db.resolve(selection_id, app.now()).await?;
    assert!(matches!(
        outcome.unwrap_err(),
        cae_core::models::AwardError::NotClosed { .. }
    ));

    for (supplier, value) in [(suppliers[0], 50.0), (suppliers[1], 45.0)] {
        let outcome = db
            .submit_bid(app.generate_bid_id(), selection_id, supplier, value, app.now())
            .await?;
        assert!(outcome.is_accepted());
    }

    db.close_selection(selection_id, app.now())
        .await?
        .expect("closing a live session");

    // The window is shut regardless of the clock.
    let outcome = db
        .submit_bid(app.generate_bid_id(), selection_id, suppliers[0], 1.0, app.now())
        .await?;
    assert!(matches!(
        outcome,
        BidOutcome::Rejected {
            reason: BidRejection::SessionNotActive,
            ..
        }
    ));

    let decision = db
        .resolve(selection_id, app.now())
        .await?
        .expect("resolution after close");
    assert_eq!(decision.basis, AwardBasis::Auction);
    let winner = decision.winner.expect("auction produces a single winner");
    assert_eq!(winner.supplier_id, suppliers[1]);
    assert_eq!(winner.value, 45.0);

    // Resolution is terminal: a second call returns the stored decision.
    let again = db
        .resolve(selection_id, common::at(600))
        .await?
        .expect("stored decision");
    assert_eq!(serde_json::to_string(&decision)?, serde_json::to_string(&again)?);
    let stored = db.get_award(selection_id).await?.expect("stored award");
    assert_eq!(serde_json::to_string(&decision)?, serde_json::to_string(&stored)?);

    Ok(())
}

#[tokio::test]
async fn a_session_with_no_bids_falls_back_to_the_baseline() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let suppliers = [common::supplier(), common::supplier()];
    let selection_id = live_session(&app, &suppliers).await?;

    db.close_selection(selection_id, app.now())
        .await?
        .expect("closing a live session");

    let decision = db
        .resolve(selection_id, app.now())
        .await?
        .expect("resolution after close");
    assert_eq!(decision.basis, AwardBasis::Baseline);
    // Distributive criterion: the award is the per-item breakdown.
    assert!(decision.winner.is_none());
    assert_eq!(decision.items.len(), 3);
    let values: Vec<f64> = decision.items.values().map(|entry| entry.value).collect();
    assert_eq!(values, vec![10.0, 18.0, 29.0]);

    Ok(())
}

#[tokio::test]
async fn cancellation_is_terminal_and_keeps_the_ledger() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let suppliers = [common::supplier(), common::supplier()];
    let selection_id = live_session(&app, &suppliers).await?;

    let outcome = db
        .submit_bid(app.generate_bid_id(), selection_id, suppliers[0], 50.0, app.now())
        .await?;
    assert!(outcome.is_accepted());

    let cancelled = db
        .cancel_selection(selection_id, "supplier misconduct".into(), app.now())
        .await?
        .expect("cancelling a live session");
    assert_eq!(cancelled.status, SelectionStatus::Cancelled);
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("supplier misconduct"));

    // No further bids, no award, no second transition.
    let outcome = db
        .submit_bid(app.generate_bid_id(), selection_id, suppliers[0], 40.0, app.now())
        .await?;
    assert!(matches!(
        outcome,
        BidOutcome::Rejected {
            reason: BidRejection::SessionNotActive,
            ..
        }
    ));
    let outcome = db.close_selection(selection_id, app.now()).await?;
    assert_eq!(
        outcome.unwrap_err(),
        SelectionError::WrongState {
            required: SelectionStatus::Planned,
            actual: SelectionStatus::Cancelled,
        }
    );
    let outcome = db.resolve(selection_id, app.now()).await?;
    assert!(matches!(
        outcome.unwrap_err(),
        cae_core::models::AwardError::NotClosed {
            actual: SelectionStatus::Cancelled
        }
    ));

    // The accepted bid survives for audit.
    let page = db
        .get_bids(selection_id, DateTimeRangeQuery::default(), 10)
        .await?;
    assert_eq!(page.results.len(), 1);

    Ok(())
}

#[tokio::test]
async fn the_bid_ledger_paginates_newest_first() -> anyhow::Result<()> {
    let app = TestApp::open().await?;
    let db = app.database();
    let suppliers = [common::supplier(), common::supplier()];
    let selection_id = live_session(&app, &suppliers).await?;

    for (i, value) in [50.0, 45.0, 40.0, 35.0, 30.0].into_iter().enumerate() {
        let outcome = db
            .submit_bid(
                app.generate_bid_id(),
                selection_id,
                suppliers[i % 2],
                value,
                common::at(i as i64 - 3000),
            )
            .await?;
        assert!(outcome.is_accepted());
    }

    let first = db
        .get_bids(selection_id, DateTimeRangeQuery::default(), 2)
        .await?;
    let values: Vec<f64> = first.results.iter().map(|bid| bid.value).collect();
    assert_eq!(values, vec![30.0, 35.0]);

    let second = db
        .get_bids(selection_id, first.more.expect("more pages"), 2)
        .await?;
    let values: Vec<f64> = second.results.iter().map(|bid| bid.value).collect();
    assert_eq!(values, vec![40.0, 45.0]);

    Ok(())
}
