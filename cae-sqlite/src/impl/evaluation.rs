use sqlx::Row;
use tracing::{Level, event};

use cae_core::models::{
    AwardCriterion, BaselineRecord, ConsolidatedBaseline, EvaluationError, EvaluationItem,
    EvaluationResponse, RawEvaluationInput,
};
use cae_core::ports::{EvaluationRepository, Evaluator, ResponseRepository};

use super::decode_err;
use crate::Db;
use crate::types::{DateTime, ItemId, LotId, QuotationId, SupplierId};

type Baseline = BaselineRecord<QuotationId, SupplierId, ItemId, LotId, DateTime>;

impl<T> EvaluationRepository<T> for Db
where
    T: Evaluator<SupplierId, ItemId, LotId> + Send + Sync,
{
    async fn evaluate_quotation(
        &self,
        quotation_id: QuotationId,
        evaluator: &T,
        as_of: DateTime,
    ) -> Result<Result<Baseline, EvaluationError<T::Error>>, sqlx::Error> {
        let criterion: Option<String> =
            sqlx::query_scalar("select criterion from quotation where id = $1")
                .bind(quotation_id)
                .fetch_optional(&self.reader)
                .await?;
        let Some(criterion) = criterion else {
            return Ok(Err(EvaluationError::UnknownQuotation));
        };
        let criterion: AwardCriterion = criterion.parse().map_err(decode_err)?;

        let items = sqlx::query(
            "select id, quantity, lot_id from item where quotation_id = $1 order by seq asc",
        )
        .bind(quotation_id)
        .fetch_all(&self.reader)
        .await?
        .into_iter()
        .map(|row| {
            Ok(EvaluationItem {
                id: row.try_get("id")?,
                quantity: row.try_get("quantity")?,
                lot_id: row.try_get("lot_id")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        // Rejected responses stay on file but never reach the evaluator.
        let responses = self
            .get_responses(quotation_id)
            .await?
            .into_iter()
            .filter(|response| !response.rejected)
            .map(|response| EvaluationResponse {
                supplier_id: response.supplier_id,
                declared_total: response.offered_total,
                offer: response.offer,
            })
            .collect();

        let input = RawEvaluationInput {
            criterion,
            items,
            responses,
        };

        let baseline: ConsolidatedBaseline<SupplierId, ItemId, LotId> =
            match evaluator.evaluate(&input) {
                Ok(baseline) => baseline,
                Err(error) => return Ok(Err(EvaluationError::Evaluator(error))),
            };

        sqlx::query(
            r#"
            insert into
                evaluation (quotation_id, as_of, baseline)
            values
                ($1, $2, $3)
            on conflict (quotation_id) do update
            set
                as_of = excluded.as_of,
                baseline = excluded.baseline
            "#,
        )
        .bind(quotation_id)
        .bind(as_of)
        .bind(sqlx::types::Json(&baseline))
        .execute(&self.writer)
        .await?;

        event!(
            Level::INFO,
            quotation = %quotation_id,
            criterion = %criterion,
            items = baseline.items.len(),
            lots = baseline.lots.len(),
            opening = baseline.opening_value(),
            "evaluation completed"
        );

        Ok(Ok(BaselineRecord {
            quotation_id,
            as_of,
            baseline,
        }))
    }

    async fn get_baseline(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Option<Baseline>, sqlx::Error> {
        let row = sqlx::query("select as_of, baseline from evaluation where quotation_id = $1")
            .bind(quotation_id)
            .fetch_optional(&self.reader)
            .await?;

        row.map(|row| {
            Ok(BaselineRecord {
                quotation_id,
                as_of: row.try_get("as_of")?,
                baseline: row
                    .try_get::<sqlx::types::Json<ConsolidatedBaseline<SupplierId, ItemId, LotId>>, _>(
                        "baseline",
                    )?
                    .0,
            })
        })
        .transpose()
    }
}
