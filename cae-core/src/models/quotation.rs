use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AwardCriterion, UnknownToken};

/// The lifecycle state of a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    /// Items may still be edited and supplier responses are accepted
    /// (subject to the deadline).
    Open,
    /// Responses are frozen; the quotation can be evaluated and a selection
    /// session opened from its baseline.
    Closed,
    /// Abandoned; terminal.
    Cancelled,
}

impl QuotationStatus {
    /// The stable storage token for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuotationStatus {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownToken(other.to_owned())),
        }
    }
}

/// A request for priced responses from invited suppliers.
///
/// The record combines the engine-owned columns with caller-supplied
/// application data (title, cost center, free text), which the engine
/// stores opaquely and never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationRecord<QuotationId, DateTime, Data> {
    /// Unique identifier for the quotation.
    pub id: QuotationId,
    /// The rule used to pick winners from this quotation's responses.
    pub criterion: AwardCriterion,
    /// Responses submitted at or after this instant are refused.
    pub deadline: DateTime,
    /// Current lifecycle state.
    pub status: QuotationStatus,
    /// Additional quotation data defined by the embedding application.
    pub data: Data,
    /// When the quotation was created.
    pub as_of: DateTime,
}

impl<QuotationId, DateTime: Ord, Data> QuotationRecord<QuotationId, DateTime, Data> {
    /// Whether a response arriving at `now` is inside the submission window.
    ///
    /// This is the lazily-evaluated deadline guard: it is re-checked on
    /// every submission, there is no background sweep that flips state.
    pub fn accepts_responses_at(&self, now: &DateTime) -> bool {
        self.status == QuotationStatus::Open && *now < self.deadline
    }
}

/// A single line being priced within a quotation.
///
/// Sequence numbers are dense and unique within the quotation: removing an
/// item renumbers the remainder so the visible numbering never has gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord<ItemId, QuotationId, LotId> {
    /// Unique identifier for the item.
    pub id: ItemId,
    /// The quotation this item belongs to.
    pub quotation_id: QuotationId,
    /// Position within the quotation, starting at 1, without gaps.
    pub seq: u32,
    /// Quantity being procured; strictly positive.
    pub quantity: f64,
    /// Unit of measure, free-form ("kg", "unit", "hour").
    pub unit: String,
    /// Optional lot this item is grouped under.
    pub lot_id: Option<LotId>,
    /// Staff estimate of the unit price, if one was recorded.
    pub estimated_unit_price: Option<f64>,
}

/// Why an item could not be appended to a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemRejection {
    /// The quotation does not exist.
    #[error("no such quotation")]
    UnknownQuotation,
    /// Items can only be edited while the quotation is open.
    #[error("quotation is not open for editing")]
    QuotationNotOpen,
    /// Responses are already on file; items are frozen.
    #[error("items are frozen once responses have been collected")]
    ResponsesCollected,
    /// The quantity was zero, negative, or not finite.
    #[error("item quantity must be finite and strictly positive")]
    InvalidQuantity,
    /// The referenced lot does not belong to this quotation.
    #[error("no such lot on this quotation")]
    UnknownLot,
}

/// An optional grouping of items priced and awarded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotRecord<LotId, QuotationId> {
    /// Unique identifier for the lot.
    pub id: LotId,
    /// The quotation this lot belongs to.
    pub quotation_id: QuotationId,
    /// Position within the quotation, starting at 1.
    pub seq: u32,
}
