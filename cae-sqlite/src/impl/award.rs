use sqlx::Row;
use tracing::{Level, event};

use cae_core::models::{AwardDecision, AwardError, SelectionStatus};
use cae_core::ports::AwardRepository;

use super::selection::decode_selection;
use crate::Db;
use crate::types::{DateTime, ItemId, LotId, SelectionId, SupplierId};

type Award = AwardDecision<SelectionId, SupplierId, ItemId, LotId, DateTime>;

impl AwardRepository for Db {
    async fn resolve(
        &self,
        selection_id: SelectionId,
        as_of: DateTime,
    ) -> Result<Result<Award, AwardError>, sqlx::Error> {
        // Resolution is a write guarded by reads, so it runs on the writer
        // connection like bids do; two concurrent resolve calls settle on
        // the same stored decision.
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
            return Ok(Err(AwardError::UnknownSelection));
        };
        let selection = decode_selection(selection_id, &row)?;

        if selection.status != SelectionStatus::Closed {
            return Ok(Err(AwardError::NotClosed {
                actual: selection.status_at(&as_of),
            }));
        }

        // The first resolution is terminal; later calls return it as-is.
        let existing = sqlx::query_scalar::<_, sqlx::types::Json<Award>>(
            "select decision from award where selection_id = $1",
        )
        .bind(selection_id)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(sqlx::types::Json(decision)) = existing {
            return Ok(Ok(decision));
        }

        let lowest = sqlx::query(
            r#"
            select
                supplier_id, value
            from
                bid
            where
                selection_id = $1
            order by
                value asc, submitted_at asc, id asc
            limit 1
            "#,
        )
        .bind(selection_id)
        .fetch_optional(&mut *tx)
        .await?
        .map(|row| -> Result<(SupplierId, f64), sqlx::Error> {
            Ok((row.try_get("supplier_id")?, row.try_get("value")?))
        })
        .transpose()?;

        let decision = AwardDecision::decide(selection_id, &selection.baseline, lowest, as_of);

        sqlx::query(
            r#"
            insert into
                award (selection_id, supplier_id, value, basis, decision, decided_at)
            values
                ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(selection_id)
        .bind(decision.winner.map(|w| w.supplier_id))
        .bind(decision.winner.map(|w| w.value))
        .bind(decision.basis.as_str())
        .bind(sqlx::types::Json(&decision))
        .bind(as_of)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        event!(
            Level::INFO,
            selection = %selection_id,
            basis = %decision.basis,
            value = decision.winner.map(|w| w.value),
            "award decided"
        );

        Ok(Ok(decision))
    }

    async fn get_award(&self, selection_id: SelectionId) -> Result<Option<Award>, sqlx::Error> {
        let decision = sqlx::query_scalar::<_, sqlx::types::Json<Award>>(
            "select decision from award where selection_id = $1",
        )
        .bind(selection_id)
        .fetch_optional(&self.reader)
        .await?;

        Ok(decision.map(|json| json.0))
    }
}
