use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::QuoteOffer;

/// A supplier's priced reply to a quotation.
///
/// There is exactly one response per (quotation, supplier); a second
/// submission is refused rather than overwritten so the audit trail stays
/// intact. Responses are never mutated after acceptance — a rejection flag
/// excludes one from evaluation without deleting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord<ResponseId, QuotationId, SupplierId, ItemId: Copy + Eq + Hash, DateTime>
{
    /// Unique identifier for the response.
    pub id: ResponseId,
    /// The quotation being answered.
    pub quotation_id: QuotationId,
    /// The supplier who answered.
    pub supplier_id: SupplierId,
    /// When the response was accepted. Drives tie-breaking, so it is
    /// recorded by the engine's clock, not claimed by the caller.
    pub submitted_at: DateTime,
    /// The validated offer payload.
    pub offer: QuoteOffer<ItemId>,
    /// `Σ quantity × unit price` over the items the offer priced, computed
    /// at submission time. Absent for discount offers.
    pub offered_total: Option<f64>,
    /// Whether staff excluded this response from evaluation.
    pub rejected: bool,
}

/// Why a response submission was refused.
///
/// These are expected, typed outcomes reported to the caller; none of them
/// is a storage failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseRejection {
    /// The quotation does not exist.
    #[error("no such quotation")]
    UnknownQuotation,
    /// The quotation is closed or cancelled.
    #[error("quotation is not open for responses")]
    QuotationNotOpen,
    /// The submission arrived at or after the response deadline.
    #[error("the response deadline has passed")]
    DeadlineExpired,
    /// The supplier was never invited to this quotation.
    #[error("supplier was not invited to this quotation")]
    SupplierNotInvited,
    /// The supplier was invited but has since been excluded.
    #[error("supplier has been excluded from this quotation")]
    SupplierExcluded,
    /// The supplier already has a response on file for this quotation.
    #[error("supplier has already submitted a response to this quotation")]
    DuplicateResponse,
    /// The offer kind does not match the criterion (a discount where unit
    /// prices are expected, or vice versa).
    #[error("offer kind does not match the quotation criterion")]
    OfferMismatch,
    /// The offer priced an item that does not belong to this quotation.
    #[error("offer references an item outside this quotation")]
    UnknownItem,
}
