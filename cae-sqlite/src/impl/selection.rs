use sqlx::Row;
use tracing::{Level, event};

use cae_core::models::{
    BidOutcome, BidRecord, BidRejection, ConsolidatedBaseline, DateTimeRangeQuery,
    DateTimeRangeResponse, QuotationStatus, SelectionError, SelectionRecord, SelectionStatus,
};
use cae_core::ports::SelectionRepository;

use super::decode_err;
use crate::Db;
use crate::types::{BidId, DateTime, ItemId, LotId, QuotationId, SelectionId, SupplierId};

type Selection = SelectionRecord<SelectionId, QuotationId, SupplierId, ItemId, LotId, DateTime>;
type Bid = BidRecord<BidId, SelectionId, SupplierId, DateTime>;

impl SelectionRepository for Db {
    async fn open_selection(
        &self,
        selection_id: SelectionId,
        quotation_id: QuotationId,
        scheduled_at: DateTime,
        as_of: DateTime,
    ) -> Result<Result<Selection, SelectionError>, sqlx::Error> {
        let mut tx = self.writer.begin().await?;

        let status: Option<String> =
            sqlx::query_scalar("select status from quotation where id = $1")
                .bind(quotation_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(status) = status else {
            return Ok(Err(SelectionError::UnknownQuotation));
        };
        let status: QuotationStatus = status.parse().map_err(decode_err)?;
        if status != QuotationStatus::Closed {
            return Ok(Err(SelectionError::QuotationNotClosed));
        }

        let existing: Option<i64> =
            sqlx::query_scalar("select 1 from selection where quotation_id = $1")
                .bind(quotation_id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            return Ok(Err(SelectionError::DuplicateSelection));
        }

        let baseline = sqlx::query_scalar::<_, sqlx::types::Json<ConsolidatedBaseline<SupplierId, ItemId, LotId>>>(
            "select baseline from evaluation where quotation_id = $1",
        )
        .bind(quotation_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(sqlx::types::Json(baseline)) = baseline else {
            return Ok(Err(SelectionError::MissingBaseline));
        };
        let Some(opening_value) = baseline.opening_value() else {
            return Ok(Err(SelectionError::EmptyBaseline));
        };

        sqlx::query(
            r#"
            insert into
                selection (id, quotation_id, criterion, scheduled_at, status, opening_value, baseline, as_of)
            values
                ($1, $2, $3, $4, 'planned', $5, $6, $7)
            "#,
        )
        .bind(selection_id)
        .bind(quotation_id)
        .bind(baseline.criterion.as_str())
        .bind(scheduled_at)
        .bind(opening_value)
        .bind(sqlx::types::Json(&baseline))
        .bind(as_of)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        event!(
            Level::INFO,
            selection = %selection_id,
            quotation = %quotation_id,
            opening = opening_value,
            "selection opened"
        );

        Ok(Ok(SelectionRecord {
            id: selection_id,
            quotation_id,
            criterion: baseline.criterion,
            scheduled_at,
            status: SelectionStatus::Planned,
            opening_value,
            baseline,
            cancel_reason: None,
            as_of,
        }))
    }

    async fn get_selection(
        &self,
        selection_id: SelectionId,
    ) -> Result<Option<Selection>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            select
                quotation_id, criterion, scheduled_at, status, opening_value, baseline, cancel_reason, as_of
            from
                selection
            where
                id = $1
            "#,
        )
        .bind(selection_id)
        .fetch_optional(&self.reader)
        .await?;

        row.map(|row| decode_selection(selection_id, &row)).transpose()
    }

    async fn cancel_selection(
        &self,
        selection_id: SelectionId,
        reason: String,
        as_of: DateTime,
    ) -> Result<Result<Selection, SelectionError>, sqlx::Error> {
        self.transition(
            selection_id,
            SelectionStatus::Cancelled,
            Some(reason),
            as_of,
        )
        .await
    }

    async fn close_selection(
        &self,
        selection_id: SelectionId,
        as_of: DateTime,
    ) -> Result<Result<Selection, SelectionError>, sqlx::Error> {
        self.transition(selection_id, SelectionStatus::Closed, None, as_of)
            .await
    }

    async fn submit_bid(
        &self,
        bid_id: BidId,
        selection_id: SelectionId,
        supplier_id: SupplierId,
        value: f64,
        as_of: DateTime,
    ) -> Result<BidOutcome<BidId, SelectionId, SupplierId, DateTime>, sqlx::Error> {
        if !(value.is_finite() && value > 0.0) {
            return Ok(rejected(BidRejection::InvalidValue, None));
        }

        // The whole decision happens inside one transaction on the
        // single-connection writer pool: concurrent submitters are decided
        // strictly one after the other against the committed ledger
        // minimum, never against a stale read.
        let mut tx = self.writer.begin().await?;

        let Some(row) = sqlx::query(
            "select quotation_id, scheduled_at, status, opening_value from selection where id = $1",
        )
        .bind(selection_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(rejected(BidRejection::UnknownSelection, None));
        };

        let status: SelectionStatus = row
            .try_get::<String, _>("status")?
            .parse()
            .map_err(decode_err)?;
        let scheduled_at: DateTime = row.try_get("scheduled_at")?;
        // The lazily-derived disputing window: stored `planned`, live once
        // the scheduled time has passed. Re-checked on every attempt.
        let live = status == SelectionStatus::Planned && as_of >= scheduled_at;
        if !live {
            return Ok(rejected(BidRejection::SessionNotActive, None));
        }

        let quotation_id: QuotationId = row.try_get("quotation_id")?;
        let excluded: Option<bool> = sqlx::query_scalar(
            "select excluded from invited_supplier where quotation_id = $1 and supplier_id = $2",
        )
        .bind(quotation_id)
        .bind(supplier_id)
        .fetch_optional(&mut *tx)
        .await?;
        match excluded {
            None => return Ok(rejected(BidRejection::SupplierNotInvited, None)),
            Some(true) => return Ok(rejected(BidRejection::SupplierExcluded, None)),
            Some(false) => {}
        }

        let opening_value: f64 = row.try_get("opening_value")?;
        let current: Option<f64> =
            sqlx::query_scalar("select min(value) from bid where selection_id = $1")
                .bind(selection_id)
                .fetch_one(&mut *tx)
                .await?;
        let floor = current.unwrap_or(opening_value);

        // Conditional insert: the strictly-decreasing guard is part of the
        // statement itself, so nothing can slip in between check and write.
        let inserted = sqlx::query(
            r#"
            insert into
                bid (id, selection_id, supplier_id, value, submitted_at)
            select
                $1, $2, $3, $4, $5
            where
                $4 < $6
            "#,
        )
        .bind(bid_id)
        .bind(selection_id)
        .bind(supplier_id)
        .bind(value)
        .bind(as_of)
        .bind(floor)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Ok(rejected(
                BidRejection::NotLowerAnymore {
                    offered: value,
                    current: floor,
                },
                Some(floor),
            ));
        }

        tx.commit().await?;

        event!(
            Level::INFO,
            selection = %selection_id,
            supplier = %supplier_id,
            value,
            "bid accepted"
        );

        Ok(BidOutcome::Accepted {
            bid: BidRecord {
                id: bid_id,
                selection_id,
                supplier_id,
                value,
                submitted_at: as_of,
            },
        })
    }

    async fn get_bids(
        &self,
        selection_id: SelectionId,
        query: DateTimeRangeQuery<DateTime>,
        limit: usize,
    ) -> Result<DateTimeRangeResponse<Bid, DateTime>, sqlx::Error> {
        let limit_p1 = (limit + 1) as i64;
        let mut rows = sqlx::query(
            r#"
            select
                id, supplier_id, value, submitted_at
            from
                bid
            where
                selection_id = $1
            and
                ($2 is null or submitted_at < $2)
            and
                ($3 is null or submitted_at >= $3)
            order by
                submitted_at desc, id desc
            limit
                $4
            "#,
        )
        .bind(selection_id)
        .bind(query.before)
        .bind(query.after)
        .bind(limit_p1)
        .fetch_all(&self.reader)
        .await?;

        let more = if rows.len() == limit + 1 {
            rows.pop();
            rows.last()
                .map(|row| -> Result<_, sqlx::Error> {
                    Ok(DateTimeRangeQuery {
                        before: Some(row.try_get("submitted_at")?),
                        after: query.after,
                    })
                })
                .transpose()?
        } else {
            None
        };

        let results = rows
            .into_iter()
            .map(|row| {
                Ok(BidRecord {
                    id: row.try_get("id")?,
                    selection_id,
                    supplier_id: row.try_get("supplier_id")?,
                    value: row.try_get("value")?,
                    submitted_at: row.try_get("submitted_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(DateTimeRangeResponse { results, more })
    }
}

impl Db {
    /// Shared implementation of the two terminal transitions. Only a
    /// stored-`planned` session (which covers the derived disputing window)
    /// can move; terminal states refuse with the state an observer sees.
    async fn transition(
        &self,
        selection_id: SelectionId,
        to: SelectionStatus,
        cancel_reason: Option<String>,
        as_of: DateTime,
    ) -> Result<Result<Selection, SelectionError>, sqlx::Error> {
        let mut tx = self.writer.begin().await?;

        let Some(row) = sqlx::query(
            r#"
            select
                quotation_id, criterion, scheduled_at, status, opening_value, baseline, cancel_reason, as_of
            from
                selection
            where
                id = $1
            "#,
        )
        .bind(selection_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(Err(SelectionError::UnknownSelection));
        };

        let mut selection = decode_selection(selection_id, &row)?;
        if selection.status != SelectionStatus::Planned {
            return Ok(Err(SelectionError::WrongState {
                required: SelectionStatus::Planned,
                actual: selection.status_at(&as_of),
            }));
        }

        sqlx::query("update selection set status = $2, cancel_reason = $3 where id = $1")
            .bind(selection_id)
            .bind(to.as_str())
            .bind(cancel_reason.as_deref())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        event!(
            Level::INFO,
            selection = %selection_id,
            status = %to,
            "selection transitioned"
        );

        selection.status = to;
        selection.cancel_reason = cancel_reason;
        Ok(Ok(selection))
    }
}

fn rejected(
    reason: BidRejection,
    current_lowest: Option<f64>,
) -> BidOutcome<BidId, SelectionId, SupplierId, DateTime> {
    BidOutcome::Rejected {
        reason,
        current_lowest,
    }
}

pub(super) fn decode_selection(
    selection_id: SelectionId,
    row: &sqlx::sqlite::SqliteRow,
) -> Result<Selection, sqlx::Error> {
    Ok(SelectionRecord {
        id: selection_id,
        quotation_id: row.try_get("quotation_id")?,
        criterion: row
            .try_get::<String, _>("criterion")?
            .parse()
            .map_err(decode_err)?,
        scheduled_at: row.try_get("scheduled_at")?,
        status: row
            .try_get::<String, _>("status")?
            .parse()
            .map_err(decode_err)?,
        opening_value: row.try_get("opening_value")?,
        baseline: row
            .try_get::<sqlx::types::Json<ConsolidatedBaseline<SupplierId, ItemId, LotId>>, _>(
                "baseline",
            )?
            .0,
        cancel_reason: row.try_get("cancel_reason")?,
        as_of: row.try_get("as_of")?,
    })
}
