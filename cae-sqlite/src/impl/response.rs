use sqlx::Row;
use tracing::{Level, event};

use cae_core::models::{
    Map, QuotationStatus, QuoteOffer, RawQuoteOffer, ResponseRecord, ResponseRejection,
};
use cae_core::ports::ResponseRepository;

use super::decode_err;
use crate::Db;
use crate::types::{DateTime, ItemId, QuotationId, ResponseId, SupplierId};

type Response = ResponseRecord<ResponseId, QuotationId, SupplierId, ItemId, DateTime>;

impl ResponseRepository for Db {
    async fn submit_response(
        &self,
        response_id: ResponseId,
        quotation_id: QuotationId,
        supplier_id: SupplierId,
        offer: QuoteOffer<ItemId>,
        as_of: DateTime,
    ) -> Result<Result<Response, ResponseRejection>, sqlx::Error> {
        let mut tx = self.writer.begin().await?;

        let Some(row) =
            sqlx::query("select criterion, deadline, status from quotation where id = $1")
                .bind(quotation_id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Ok(Err(ResponseRejection::UnknownQuotation));
        };

        let status: QuotationStatus = row
            .try_get::<String, _>("status")?
            .parse()
            .map_err(decode_err)?;
        if status != QuotationStatus::Open {
            return Ok(Err(ResponseRejection::QuotationNotOpen));
        }

        let deadline: DateTime = row.try_get("deadline")?;
        if as_of >= deadline {
            return Ok(Err(ResponseRejection::DeadlineExpired));
        }

        let criterion: cae_core::models::AwardCriterion = row
            .try_get::<String, _>("criterion")?
            .parse()
            .map_err(decode_err)?;
        if offer.is_discount() != criterion.expects_discount() {
            return Ok(Err(ResponseRejection::OfferMismatch));
        }

        let excluded: Option<bool> = sqlx::query_scalar(
            "select excluded from invited_supplier where quotation_id = $1 and supplier_id = $2",
        )
        .bind(quotation_id)
        .bind(supplier_id)
        .fetch_optional(&mut *tx)
        .await?;
        match excluded {
            None => return Ok(Err(ResponseRejection::SupplierNotInvited)),
            Some(true) => return Ok(Err(ResponseRejection::SupplierExcluded)),
            Some(false) => {}
        }

        let duplicate: Option<i64> = sqlx::query_scalar(
            "select 1 from supplier_response where quotation_id = $1 and supplier_id = $2",
        )
        .bind(quotation_id)
        .bind(supplier_id)
        .fetch_optional(&mut *tx)
        .await?;
        if duplicate.is_some() {
            return Ok(Err(ResponseRejection::DuplicateResponse));
        }

        let quantities = item_quantities(&mut tx, quotation_id).await?;
        if offer.priced_items().any(|item| !quantities.contains_key(&item)) {
            return Ok(Err(ResponseRejection::UnknownItem));
        }

        let offered_total = offer.offered_total(&quantities);

        sqlx::query(
            r#"
            insert into
                supplier_response (id, quotation_id, supplier_id, submitted_at, discount_percent, offered_total)
            values
                ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(response_id)
        .bind(quotation_id)
        .bind(supplier_id)
        .bind(as_of)
        .bind(offer.discount())
        .bind(offered_total)
        .execute(&mut *tx)
        .await?;

        if let QuoteOffer::Prices(prices) = &offer {
            for (item_id, unit_price) in prices {
                sqlx::query(
                    "insert into item_response (response_id, item_id, unit_price) values ($1, $2, $3)",
                )
                .bind(response_id)
                .bind(*item_id)
                .bind(*unit_price)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        event!(
            Level::INFO,
            quotation = %quotation_id,
            supplier = %supplier_id,
            response = %response_id,
            "response accepted"
        );

        Ok(Ok(ResponseRecord {
            id: response_id,
            quotation_id,
            supplier_id,
            submitted_at: as_of,
            offer,
            offered_total,
            rejected: false,
        }))
    }

    async fn get_responses(&self, quotation_id: QuotationId) -> Result<Vec<Response>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            select
                id, supplier_id, submitted_at, discount_percent, offered_total, rejected
            from
                supplier_response
            where
                quotation_id = $1
            order by
                submitted_at asc, id asc
            "#,
        )
        .bind(quotation_id)
        .fetch_all(&self.reader)
        .await?;

        let price_rows = sqlx::query(
            r#"
            select
                ir.response_id, ir.item_id, ir.unit_price
            from
                item_response as ir
            join
                supplier_response as sr
            on
                sr.id = ir.response_id
            where
                sr.quotation_id = $1
            order by
                ir.rowid asc
            "#,
        )
        .bind(quotation_id)
        .fetch_all(&self.reader)
        .await?;

        let mut prices: Map<ResponseId, Map<ItemId, f64>> = Map::default();
        for row in price_rows {
            let response_id: ResponseId = row.try_get("response_id")?;
            prices
                .entry(response_id)
                .or_default()
                .insert(row.try_get("item_id")?, row.try_get("unit_price")?);
        }

        rows.into_iter()
            .map(|row| {
                let id: ResponseId = row.try_get("id")?;
                let discount_percent: Option<f64> = row.try_get("discount_percent")?;
                let offer = match discount_percent {
                    Some(percent) => QuoteOffer::Discount(percent),
                    None => {
                        let map = prices.swap_remove(&id).unwrap_or_default();
                        QuoteOffer::try_from(RawQuoteOffer::Prices(map)).map_err(decode_err)?
                    }
                };
                Ok(ResponseRecord {
                    id,
                    quotation_id,
                    supplier_id: row.try_get("supplier_id")?,
                    submitted_at: row.try_get("submitted_at")?,
                    offer,
                    offered_total: row.try_get("offered_total")?,
                    rejected: row.try_get("rejected")?,
                })
            })
            .collect()
    }

    async fn reject_response(
        &self,
        response_id: ResponseId,
        as_of: DateTime,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "update supplier_response set rejected = 1, rejected_at = $2 where id = $1 and rejected = 0",
        )
        .bind(response_id)
        .bind(as_of)
        .execute(&self.writer)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// The quotation's items and their quantities, for total computation and
/// unknown-item checks.
async fn item_quantities(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    quotation_id: QuotationId,
) -> Result<Map<ItemId, f64>, sqlx::Error> {
    let rows = sqlx::query("select id, quantity from item where quotation_id = $1 order by seq asc")
        .bind(quotation_id)
        .fetch_all(&mut **tx)
        .await?;

    rows.into_iter()
        .map(|row| Ok((row.try_get("id")?, row.try_get("quantity")?)))
        .collect()
}
