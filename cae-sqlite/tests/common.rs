#![allow(dead_code)]

use cae_core::models::{AwardCriterion, ItemRecord, Map, QuoteOffer};
use cae_core::ports::{
    Application, QuotationRepository, ResponseRepository, SupplierRoster,
};
use cae_eval::Consolidator;
use cae_sqlite::{
    Db,
    config::SqliteConfig,
    types::{BidId, DateTime, ItemId, LotId, QuotationId, ResponseId, SelectionId, SupplierId},
};

pub struct TestApp(pub Db);

impl TestApp {
    pub async fn open() -> anyhow::Result<Self> {
        Ok(Self(Db::open(&SqliteConfig::default()).await?))
    }
}

impl Application for TestApp {
    type QuotationData = ();
    type Evaluator = Consolidator;
    type Repository = Db;

    fn database(&self) -> &Db {
        &self.0
    }

    fn now(&self) -> DateTime {
        time::OffsetDateTime::now_utc().into()
    }

    fn evaluator(&self) -> Consolidator {
        Consolidator
    }

    fn generate_quotation_id(&self, _data: &()) -> QuotationId {
        uuid::Uuid::new_v4().into()
    }

    fn generate_item_id(&self) -> ItemId {
        uuid::Uuid::new_v4().into()
    }

    fn generate_lot_id(&self) -> LotId {
        uuid::Uuid::new_v4().into()
    }

    fn generate_response_id(&self) -> ResponseId {
        uuid::Uuid::new_v4().into()
    }

    fn generate_selection_id(&self) -> SelectionId {
        uuid::Uuid::new_v4().into()
    }

    fn generate_bid_id(&self) -> BidId {
        uuid::Uuid::new_v4().into()
    }
}

/// Now plus an offset, as the engine's timestamp type.
pub fn at(offset_secs: i64) -> DateTime {
    (time::OffsetDateTime::now_utc() + time::Duration::seconds(offset_secs)).into()
}

/// A validated priced offer over the given items.
pub fn offer(prices: &[(ItemId, f64)]) -> QuoteOffer<ItemId> {
    QuoteOffer::Prices(prices.iter().copied().collect())
}

/// Create an open quotation with the given item quantities and invited
/// suppliers. The response deadline is one hour out.
pub async fn seed_quotation(
    app: &TestApp,
    criterion: AwardCriterion,
    quantities: &[f64],
    suppliers: &[SupplierId],
) -> anyhow::Result<(QuotationId, Vec<ItemId>)> {
    let db = app.database();
    let quotation_id = app.generate_quotation_id(&());
    db.create_quotation(quotation_id, criterion, at(3600), (), app.now())
        .await?;

    let mut items = Vec::new();
    for quantity in quantities {
        let item_id = app.generate_item_id();
        let record = append_item(db, item_id, quotation_id, *quantity, None).await?;
        assert!(record.is_ok(), "seeding item failed: {record:?}");
        items.push(item_id);
    }

    for supplier_id in suppliers {
        assert!(db.invite_supplier(quotation_id, *supplier_id, app.now()).await?);
    }

    Ok((quotation_id, items))
}

/// Type-annotated wrappers around the data-generic quotation operations.
pub async fn append_item(
    db: &Db,
    item_id: ItemId,
    quotation_id: QuotationId,
    quantity: f64,
    lot_id: Option<LotId>,
) -> anyhow::Result<Result<ItemRecord<ItemId, QuotationId, LotId>, cae_core::models::ItemRejection>>
{
    Ok(<Db as QuotationRepository<()>>::append_item(
        db,
        item_id,
        quotation_id,
        quantity,
        "unit".into(),
        lot_id,
        None,
    )
    .await?)
}

pub async fn create_lot(
    db: &Db,
    lot_id: LotId,
    quotation_id: QuotationId,
) -> anyhow::Result<Option<cae_core::models::LotRecord<LotId, QuotationId>>> {
    Ok(<Db as QuotationRepository<()>>::create_lot(db, lot_id, quotation_id).await?)
}

pub async fn close_quotation(db: &Db, quotation_id: QuotationId) -> anyhow::Result<bool> {
    Ok(
        <Db as QuotationRepository<()>>::close_quotation(db, quotation_id, at(0))
            .await?,
    )
}

pub async fn get_items(
    db: &Db,
    quotation_id: QuotationId,
) -> anyhow::Result<Vec<ItemRecord<ItemId, QuotationId, LotId>>> {
    Ok(<Db as QuotationRepository<()>>::get_items(db, quotation_id).await?)
}

pub async fn remove_item(db: &Db, item_id: ItemId) -> anyhow::Result<bool> {
    Ok(<Db as QuotationRepository<()>>::remove_item(db, item_id).await?)
}

/// Submit one response per supplier, in order, with the given unit prices
/// (one price per item, in item order).
pub async fn submit_responses(
    app: &TestApp,
    quotation_id: QuotationId,
    items: &[ItemId],
    responses: &[(SupplierId, &[f64])],
) -> anyhow::Result<()> {
    let db = app.database();
    for (supplier_id, prices) in responses {
        let priced: Vec<(ItemId, f64)> = items
            .iter()
            .copied()
            .zip(prices.iter().copied())
            .collect();
        let outcome = db
            .submit_response(
                app.generate_response_id(),
                quotation_id,
                *supplier_id,
                offer(&priced),
                app.now(),
            )
            .await?;
        assert!(outcome.is_ok(), "seeding response failed: {outcome:?}");
    }
    Ok(())
}

/// Quantities keyed by item, for computing expected totals in tests.
pub fn quantities(items: &[ItemId], values: &[f64]) -> Map<ItemId, f64> {
    items.iter().copied().zip(values.iter().copied()).collect()
}

pub fn supplier() -> SupplierId {
    uuid::Uuid::new_v4().into()
}
