use std::hash::Hash;

use thiserror::Error;

use super::{AwardCriterion, QuoteOffer};

/// One item of the quotation under evaluation, reduced to the fields the
/// consolidation algorithm needs.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationItem<ItemId, LotId> {
    /// The item's identifier.
    pub id: ItemId,
    /// Quantity being procured; weights the extended sums.
    pub quantity: f64,
    /// The lot this item belongs to, if any.
    pub lot_id: Option<LotId>,
}

/// One non-rejected response under evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResponse<SupplierId, ItemId: Copy + Eq + Hash> {
    /// The responding supplier.
    pub supplier_id: SupplierId,
    /// The validated offer.
    pub offer: QuoteOffer<ItemId>,
    /// The total declared at submission time, when one exists. Recomputed
    /// from the item prices when absent.
    pub declared_total: Option<f64>,
}

/// Everything an [`crate::ports::Evaluator`] needs to consolidate one
/// quotation.
///
/// `responses` MUST be ordered by submission time ascending (ties broken by
/// response id): exact numeric ties in the consolidation resolve to the
/// earliest response, and that rule is only deterministic if the input
/// order is.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvaluationInput<SupplierId, ItemId: Copy + Eq + Hash, LotId> {
    /// The criterion to consolidate under.
    pub criterion: AwardCriterion,
    /// The quotation's items in sequence order.
    pub items: Vec<EvaluationItem<ItemId, LotId>>,
    /// The non-rejected responses in submission order.
    pub responses: Vec<EvaluationResponse<SupplierId, ItemId>>,
}

/// Why an evaluation could not run.
///
/// The evaluator's own failures are wrapped so repositories can report the
/// gathering preconditions and the algorithm's errors through one channel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError<E> {
    /// The quotation does not exist.
    #[error("no such quotation")]
    UnknownQuotation,
    /// The evaluator itself failed.
    #[error(transparent)]
    Evaluator(E),
}
