use sqlx::Row;

use cae_core::models::{
    AwardCriterion, ItemRecord, ItemRejection, LotRecord, QuotationRecord, QuotationStatus,
};
use cae_core::ports::QuotationRepository;

use super::decode_err;
use crate::Db;
use crate::types::{DateTime, ItemId, LotId, QuotationId};

impl<QuotationData> QuotationRepository<QuotationData> for Db
where
    QuotationData: Send + Sync + Unpin + serde::Serialize + serde::de::DeserializeOwned,
{
    async fn create_quotation(
        &self,
        quotation_id: QuotationId,
        criterion: AwardCriterion,
        deadline: DateTime,
        data: QuotationData,
        as_of: DateTime,
    ) -> Result<QuotationRecord<QuotationId, DateTime, QuotationData>, sqlx::Error> {
        let app_data = sqlx::types::Json(&data);
        sqlx::query(
            r#"
            insert into
                quotation (id, criterion, deadline, status, app_data, as_of)
            values
                ($1, $2, $3, 'open', $4, $5)
            "#,
        )
        .bind(quotation_id)
        .bind(criterion.as_str())
        .bind(deadline)
        .bind(app_data)
        .bind(as_of)
        .execute(&self.writer)
        .await?;

        Ok(QuotationRecord {
            id: quotation_id,
            criterion,
            deadline,
            status: QuotationStatus::Open,
            data,
            as_of,
        })
    }

    async fn get_quotation(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Option<QuotationRecord<QuotationId, DateTime, QuotationData>>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            select
                criterion, deadline, status, app_data, as_of
            from
                quotation
            where
                id = $1
            "#,
        )
        .bind(quotation_id)
        .fetch_optional(&self.reader)
        .await?;

        row.map(|row| {
            Ok(QuotationRecord {
                id: quotation_id,
                criterion: row
                    .try_get::<String, _>("criterion")?
                    .parse()
                    .map_err(decode_err)?,
                deadline: row.try_get("deadline")?,
                status: row
                    .try_get::<String, _>("status")?
                    .parse()
                    .map_err(decode_err)?,
                data: row
                    .try_get::<sqlx::types::Json<QuotationData>, _>("app_data")?
                    .0,
                as_of: row.try_get("as_of")?,
            })
        })
        .transpose()
    }

    async fn close_quotation(
        &self,
        quotation_id: QuotationId,
        _as_of: DateTime,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("update quotation set status = 'closed' where id = $1 and status = 'open'")
            .bind(quotation_id)
            .execute(&self.writer)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn cancel_quotation(
        &self,
        quotation_id: QuotationId,
        _as_of: DateTime,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("update quotation set status = 'cancelled' where id = $1 and status = 'open'")
                .bind(quotation_id)
                .execute(&self.writer)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_item(
        &self,
        item_id: ItemId,
        quotation_id: QuotationId,
        quantity: f64,
        unit: String,
        lot_id: Option<LotId>,
        estimated_unit_price: Option<f64>,
    ) -> Result<Result<ItemRecord<ItemId, QuotationId, LotId>, ItemRejection>, sqlx::Error> {
        if !(quantity.is_finite() && quantity > 0.0) {
            return Ok(Err(ItemRejection::InvalidQuantity));
        }

        let mut tx = self.writer.begin().await?;

        match editable_state(&mut tx, quotation_id).await? {
            Ok(()) => {}
            Err(rejection) => return Ok(Err(rejection)),
        }

        if let Some(lot_id) = lot_id {
            let known: Option<i64> =
                sqlx::query_scalar("select 1 from lot where id = $1 and quotation_id = $2")
                    .bind(lot_id)
                    .bind(quotation_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if known.is_none() {
                return Ok(Err(ItemRejection::UnknownLot));
            }
        }

        let seq: i64 =
            sqlx::query_scalar("select coalesce(max(seq), 0) + 1 from item where quotation_id = $1")
                .bind(quotation_id)
                .fetch_one(&mut *tx)
                .await?;

        sqlx::query(
            r#"
            insert into
                item (id, quotation_id, seq, quantity, unit, lot_id, estimated_unit_price)
            values
                ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item_id)
        .bind(quotation_id)
        .bind(seq)
        .bind(quantity)
        .bind(unit.as_str())
        .bind(lot_id)
        .bind(estimated_unit_price)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Ok(ItemRecord {
            id: item_id,
            quotation_id,
            seq: seq as u32,
            quantity,
            unit,
            lot_id,
            estimated_unit_price,
        }))
    }

    async fn remove_item(&self, item_id: ItemId) -> Result<bool, sqlx::Error> {
        let mut tx = self.writer.begin().await?;

        let Some(row) = sqlx::query("select quotation_id, seq from item where id = $1")
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(false);
        };
        let quotation_id: QuotationId = row.try_get("quotation_id")?;
        let seq: i64 = row.try_get("seq")?;

        if editable_state(&mut tx, quotation_id).await?.is_err() {
            return Ok(false);
        }

        sqlx::query("delete from item where id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        // Renumber the remainder so the visible sequence stays dense.
        sqlx::query("update item set seq = seq - 1 where quotation_id = $1 and seq > $2")
            .bind(quotation_id)
            .bind(seq)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn get_items(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Vec<ItemRecord<ItemId, QuotationId, LotId>>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            select
                id, seq, quantity, unit, lot_id, estimated_unit_price
            from
                item
            where
                quotation_id = $1
            order by
                seq asc
            "#,
        )
        .bind(quotation_id)
        .fetch_all(&self.reader)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ItemRecord {
                    id: row.try_get("id")?,
                    quotation_id,
                    seq: row.try_get::<i64, _>("seq")? as u32,
                    quantity: row.try_get("quantity")?,
                    unit: row.try_get("unit")?,
                    lot_id: row.try_get("lot_id")?,
                    estimated_unit_price: row.try_get("estimated_unit_price")?,
                })
            })
            .collect()
    }

    async fn create_lot(
        &self,
        lot_id: LotId,
        quotation_id: QuotationId,
    ) -> Result<Option<LotRecord<LotId, QuotationId>>, sqlx::Error> {
        let mut tx = self.writer.begin().await?;

        if editable_state(&mut tx, quotation_id).await?.is_err() {
            return Ok(None);
        }

        let seq: i64 =
            sqlx::query_scalar("select coalesce(max(seq), 0) + 1 from lot where quotation_id = $1")
                .bind(quotation_id)
                .fetch_one(&mut *tx)
                .await?;

        sqlx::query("insert into lot (id, quotation_id, seq) values ($1, $2, $3)")
            .bind(lot_id)
            .bind(quotation_id)
            .bind(seq)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(LotRecord {
            id: lot_id,
            quotation_id,
            seq: seq as u32,
        }))
    }

    async fn get_lots(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Vec<LotRecord<LotId, QuotationId>>, sqlx::Error> {
        let rows = sqlx::query("select id, seq from lot where quotation_id = $1 order by seq asc")
            .bind(quotation_id)
            .fetch_all(&self.reader)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(LotRecord {
                    id: row.try_get("id")?,
                    quotation_id,
                    seq: row.try_get::<i64, _>("seq")? as u32,
                })
            })
            .collect()
    }
}

/// Items and lots are editable while the quotation is open and no response
/// has been collected yet; the first accepted response freezes them.
async fn editable_state(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    quotation_id: QuotationId,
) -> Result<Result<(), ItemRejection>, sqlx::Error> {
    let status: Option<String> = sqlx::query_scalar("select status from quotation where id = $1")
        .bind(quotation_id)
        .fetch_optional(&mut **tx)
        .await?;

    let Some(status) = status else {
        return Ok(Err(ItemRejection::UnknownQuotation));
    };
    let status: QuotationStatus = status.parse().map_err(decode_err)?;
    if status != QuotationStatus::Open {
        return Ok(Err(ItemRejection::QuotationNotOpen));
    }

    let responded: Option<i64> =
        sqlx::query_scalar("select 1 from supplier_response where quotation_id = $1 limit 1")
            .bind(quotation_id)
            .fetch_optional(&mut **tx)
            .await?;
    if responded.is_some() {
        return Ok(Err(ItemRejection::ResponsesCollected));
    }

    Ok(Ok(()))
}
