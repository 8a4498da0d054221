mod award;
mod baseline;
mod bid;
mod criterion;
mod datetime;
mod evaluation;
mod offer;
mod quotation;
mod response;
mod roster;
mod selection;

pub use award::{AwardBasis, AwardDecision, AwardError, AwardWinner};
pub use baseline::{BaselineEntry, BaselineRecord, ConsolidatedBaseline};
pub use bid::{BidOutcome, BidRecord, BidRejection};
pub use criterion::AwardCriterion;
pub use datetime::{DateTimeRangeQuery, DateTimeRangeResponse};
pub use evaluation::{EvaluationError, EvaluationItem, EvaluationResponse, RawEvaluationInput};
pub use offer::{OfferValidationError, QuoteOffer, RawQuoteOffer};
pub use quotation::{ItemRecord, ItemRejection, LotRecord, QuotationRecord, QuotationStatus};
pub use response::{ResponseRecord, ResponseRejection};
pub use roster::Eligibility;
pub use selection::{SelectionError, SelectionRecord, SelectionStatus};

/// A hash map with deterministic iteration order.
///
/// Evaluation output must be reproducible bit-for-bit from the same inputs,
/// so every keyed collection in the engine preserves insertion order.
pub type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;

/// The error returned when parsing a stored token into one of the engine's
/// closed vocabularies (criteria, statuses, award bases).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized token `{0}`")]
pub struct UnknownToken(pub String);
