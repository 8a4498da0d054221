use std::hash::Hash;

use crate::models::{ConsolidatedBaseline, RawEvaluationInput};

/// Interface for the pure consolidation algorithm.
///
/// An evaluator takes a quotation's criterion, items, and responses and
/// produces the consolidated baseline: per-item minima, per-lot minima,
/// and the criterion-dependent global winner. It performs no I/O and holds
/// no state, which is what makes the baseline recomputable at any time
/// from the persisted inputs alone.
///
/// # Determinism contract
///
/// `responses` arrive ordered by submission time ascending (ties broken by
/// response id); implementations MUST resolve exact numeric ties to the
/// first qualifying response in that order. Given identical input, the
/// output must be identical down to map iteration order — award outcomes
/// have legal weight and are re-derived for verification.
pub trait Evaluator<SupplierId, ItemId, LotId>
where
    SupplierId: Copy + Eq + Hash,
    ItemId: Copy + Eq + Hash,
    LotId: Copy + Eq + Hash,
{
    /// Error type for evaluator failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Consolidate the responses into a baseline.
    ///
    /// Zero usable responses is not an error: the result is a structurally
    /// empty baseline that downstream consumers handle as "no winner".
    fn evaluate(
        &self,
        input: &RawEvaluationInput<SupplierId, ItemId, LotId>,
    ) -> Result<ConsolidatedBaseline<SupplierId, ItemId, LotId>, Self::Error>;
}
