use crate::models::{AwardDecision, AwardError};

/// The decision type returned by [`AwardRepository`] operations.
pub type Award<T> = AwardDecision<
    <T as super::Repository>::SelectionId,
    <T as super::Repository>::SupplierId,
    <T as super::Repository>::ItemId,
    <T as super::Repository>::LotId,
    <T as super::Repository>::DateTime,
>;

/// Repository interface for resolving and retrieving award decisions.
pub trait AwardRepository: super::SelectionRepository {
    /// Resolve the award for a closed selection.
    ///
    /// If at least one bid was accepted, the lowest accepted bid wins; with
    /// none, the decision falls back to the baseline snapshot taken when
    /// the session opened. The first resolution is terminal: resolving an
    /// already-resolved selection returns the stored decision unchanged.
    fn resolve(
        &self,
        selection_id: Self::SelectionId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<Award<Self>, AwardError>, Self::Error>> + Send;

    /// The stored decision for a selection, if it has been resolved.
    fn get_award(
        &self,
        selection_id: Self::SelectionId,
    ) -> impl Future<Output = Result<Option<Award<Self>>, Self::Error>> + Send;
}
