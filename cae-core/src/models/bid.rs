use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An accepted bid in a selection session's ledger.
///
/// Bids are append-only and immutable: there is no retraction operation,
/// and every accepted bid is strictly lower than all bids accepted before
/// it on the same selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRecord<BidId, SelectionId, SupplierId, DateTime> {
    /// Unique identifier for the bid.
    pub id: BidId,
    /// The selection this bid was placed in.
    pub selection_id: SelectionId,
    /// The supplier who placed it.
    pub supplier_id: SupplierId,
    /// The offered value; strictly below the ledger's previous minimum.
    pub value: f64,
    /// When the bid was accepted, by the engine's clock.
    pub submitted_at: DateTime,
}

/// Why a bid attempt was refused.
///
/// `NotLowerAnymore` is the expected outcome of losing a race to a
/// concurrently accepted lower bid — callers should surface the reported
/// current lowest and invite a fresh attempt rather than treat it as a
/// failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BidRejection {
    /// The selection does not exist.
    #[error("no such selection")]
    UnknownSelection,
    /// The session is not in its live bidding window.
    #[error("selection is not currently accepting bids")]
    SessionNotActive,
    /// The supplier was never invited.
    #[error("supplier was not invited to this selection")]
    SupplierNotInvited,
    /// The supplier was invited but has since been excluded.
    #[error("supplier has been excluded from this selection")]
    SupplierExcluded,
    /// The value was zero, negative, or not a finite number.
    #[error("bid value must be finite and strictly positive")]
    InvalidValue,
    /// The value did not undercut the ledger minimum at decision time.
    #[error("bid of {offered} is not lower than the current lowest of {current}")]
    NotLowerAnymore {
        /// The value the supplier offered.
        offered: f64,
        /// The ledger minimum the offer was compared against.
        current: f64,
    },
}

/// The outcome of a bid attempt.
///
/// Rejected attempts are not persisted; the ledger holds accepted bids
/// only.
#[derive(Debug, Clone, PartialEq)]
pub enum BidOutcome<BidId, SelectionId, SupplierId, DateTime> {
    /// The bid was accepted and is now the ledger minimum.
    Accepted {
        /// The accepted bid as stored.
        bid: BidRecord<BidId, SelectionId, SupplierId, DateTime>,
    },
    /// The bid was refused.
    Rejected {
        /// The typed reason.
        reason: BidRejection,
        /// The ledger minimum at decision time, when the session was live.
        /// Callers display this as the value a fresh bid must undercut.
        current_lowest: Option<f64>,
    },
}

impl<BidId, SelectionId, SupplierId, DateTime> BidOutcome<BidId, SelectionId, SupplierId, DateTime> {
    /// Whether the attempt was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The ledger minimum after this attempt was decided, when known.
    pub fn new_lowest(&self) -> Option<f64> {
        match self {
            Self::Accepted { bid } => Some(bid.value),
            Self::Rejected { current_lowest, .. } => *current_lowest,
        }
    }
}
