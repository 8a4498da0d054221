use super::Evaluator;
use crate::models::{BaselineRecord, EvaluationError};

/// The record type returned by [`EvaluationRepository`] operations.
pub type Baseline<T> = BaselineRecord<
    <T as super::Repository>::QuotationId,
    <T as super::Repository>::SupplierId,
    <T as super::Repository>::ItemId,
    <T as super::Repository>::LotId,
    <T as super::Repository>::DateTime,
>;

/// Repository interface for running evaluations and retrieving their
/// stored baselines.
///
/// The repository gathers the quotation's items and non-rejected responses
/// (in submission order), hands them to the pure evaluator, and persists
/// the resulting baseline snapshot. Re-evaluating an unchanged quotation
/// overwrites the snapshot with an identical one.
pub trait EvaluationRepository<T>: super::ResponseRepository
where
    T: Evaluator<Self::SupplierId, Self::ItemId, Self::LotId> + Send + Sync,
{
    /// Evaluate a quotation and store the resulting baseline.
    ///
    /// # Returns
    ///
    /// - `Ok(Ok(record))` on success
    /// - `Ok(Err(_))` if the quotation is unknown or the evaluator failed
    /// - `Err(_)` if there is some other storage error
    fn evaluate_quotation(
        &self,
        quotation_id: Self::QuotationId,
        evaluator: &T,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<Baseline<Self>, EvaluationError<T::Error>>, Self::Error>>
    + Send;

    /// The most recently stored baseline for a quotation, if any.
    fn get_baseline(
        &self,
        quotation_id: Self::QuotationId,
    ) -> impl Future<Output = Result<Option<Baseline<Self>>, Self::Error>> + Send;
}
