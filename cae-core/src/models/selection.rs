use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AwardCriterion, ConsolidatedBaseline, UnknownToken};

/// The lifecycle state of a selection session.
///
/// `Disputing` is special: storage keeps a session at `Planned`, and the
/// session *reads* as disputing once its scheduled time has passed. There
/// is no background timer flipping the row — the transition is derived on
/// every access via [`SelectionRecord::status_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    /// Created, waiting for its scheduled time.
    Planned,
    /// The live bidding window; only ever observed, never stored.
    Disputing,
    /// Bidding over; the award can be resolved. Terminal.
    Closed,
    /// Abandoned; accepted bids are retained for audit. Terminal.
    Cancelled,
}

impl SelectionStatus {
    /// The stable storage token for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Disputing => "disputing",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SelectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SelectionStatus {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "disputing" => Ok(Self::Disputing),
            "closed" => Ok(Self::Closed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownToken(other.to_owned())),
        }
    }
}

/// A scheduled reverse-auction session derived from a closed quotation.
///
/// The session is seeded with the quotation's baseline at open time; the
/// baseline's opening value is the ceiling the first bid must undercut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord<
    SelectionId,
    QuotationId,
    SupplierId,
    ItemId: Eq + Hash,
    LotId: Eq + Hash,
    DateTime,
> {
    /// Unique identifier for the selection.
    pub id: SelectionId,
    /// The quotation this session competes.
    pub quotation_id: QuotationId,
    /// Criterion inherited from the quotation's baseline.
    pub criterion: AwardCriterion,
    /// Bidding opens no earlier than this instant.
    pub scheduled_at: DateTime,
    /// The *stored* status. Use [`Self::status_at`] for the status an
    /// observer at a given instant should see.
    pub status: SelectionStatus,
    /// The ceiling the first bid must be strictly below.
    pub opening_value: f64,
    /// The baseline snapshot taken when the session was opened; the award
    /// falls back to it if no bids arrive.
    pub baseline: ConsolidatedBaseline<SupplierId, ItemId, LotId>,
    /// Why the session was cancelled, when it was.
    pub cancel_reason: Option<String>,
    /// When the session was opened.
    pub as_of: DateTime,
}

impl<SelectionId, QuotationId, SupplierId, ItemId: Eq + Hash, LotId: Eq + Hash, DateTime: Ord>
    SelectionRecord<SelectionId, QuotationId, SupplierId, ItemId, LotId, DateTime>
{
    /// The status an observer at `now` should see.
    ///
    /// A stored `Planned` session whose scheduled time has passed reads as
    /// `Disputing`; everything else reads as stored.
    pub fn status_at(&self, now: &DateTime) -> SelectionStatus {
        match self.status {
            SelectionStatus::Planned if *now >= self.scheduled_at => SelectionStatus::Disputing,
            status => status,
        }
    }

    /// Whether a bid arriving at `now` may be considered at all.
    ///
    /// This is the lazily-evaluated gate checked on every bid attempt;
    /// nothing schedules the session open in the background.
    pub fn accepts_bids_at(&self, now: &DateTime) -> bool {
        self.status_at(now) == SelectionStatus::Disputing
    }
}

/// Why a selection lifecycle operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The quotation does not exist.
    #[error("no such quotation")]
    UnknownQuotation,
    /// Sessions are only opened from closed quotations.
    #[error("quotation must be closed before a selection is opened")]
    QuotationNotClosed,
    /// The quotation has never been evaluated.
    #[error("no stored baseline for this quotation")]
    MissingBaseline,
    /// The stored baseline has no opening value to seed the session with.
    #[error("stored baseline is empty; nothing to compete")]
    EmptyBaseline,
    /// A session already exists for this quotation.
    #[error("a selection already exists for this quotation")]
    DuplicateSelection,
    /// The selection does not exist.
    #[error("no such selection")]
    UnknownSelection,
    /// The operation is not legal in the selection's current state.
    #[error("selection is {actual}; operation requires a {required} session")]
    WrongState {
        /// The state the operation requires.
        required: SelectionStatus,
        /// The state the selection is actually in.
        actual: SelectionStatus,
    },
}
