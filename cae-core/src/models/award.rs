use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    AwardCriterion, BaselineEntry, ConsolidatedBaseline, Map, SelectionStatus, UnknownToken,
};

/// Where the decided value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardBasis {
    /// At least one bid was accepted; the lowest bid decided the award.
    Auction,
    /// No bids were accepted; the award fell back to the baseline taken at
    /// session open.
    Baseline,
}

impl AwardBasis {
    /// The stable storage token for this basis.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auction => "auction",
            Self::Baseline => "baseline",
        }
    }
}

impl std::fmt::Display for AwardBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AwardBasis {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auction" => Ok(Self::Auction),
            "baseline" => Ok(Self::Baseline),
            other => Err(UnknownToken(other.to_owned())),
        }
    }
}

/// The single winning supplier and value, where one exists.
///
/// Under the distributive criteria (`per_item`, `per_lot`) with no auction
/// bids, the award is spread across the breakdown and there is no single
/// winner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AwardWinner<SupplierId> {
    /// The awarded supplier.
    pub supplier_id: SupplierId,
    /// The awarded value.
    pub value: f64,
}

/// The terminal, immutable decision produced when a selection closes.
///
/// The engine hands this object to collaborators for persistence, document
/// generation, and notification; it never formats documents or delivers
/// messages itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardDecision<SelectionId, SupplierId, ItemId: Eq + Hash, LotId: Eq + Hash, DateTime> {
    /// The selection this decision closes out.
    pub selection_id: SelectionId,
    /// The criterion the competition ran under.
    pub criterion: AwardCriterion,
    /// Whether the auction or the baseline decided the value.
    pub basis: AwardBasis,
    /// The single winner, where one exists.
    pub winner: Option<AwardWinner<SupplierId>>,
    /// Per-item attribution carried over from the baseline.
    pub items: Map<ItemId, BaselineEntry<SupplierId>>,
    /// Per-lot attribution carried over from the baseline.
    pub lots: Map<LotId, BaselineEntry<SupplierId>>,
    /// When the decision was made.
    pub decided_at: DateTime,
}

impl<SelectionId, SupplierId: Copy, ItemId: Copy + Eq + Hash, LotId: Copy + Eq + Hash, DateTime>
    AwardDecision<SelectionId, SupplierId, ItemId, LotId, DateTime>
{
    /// Derive the decision for a closed selection.
    ///
    /// If a lowest accepted bid exists it wins outright; otherwise the
    /// decision falls back to the baseline snapshot taken at session open.
    /// Both paths carry the baseline's per-item and per-lot attribution as
    /// the breakdown.
    pub fn decide(
        selection_id: SelectionId,
        baseline: &ConsolidatedBaseline<SupplierId, ItemId, LotId>,
        lowest_bid: Option<(SupplierId, f64)>,
        decided_at: DateTime,
    ) -> Self {
        let (basis, winner) = match lowest_bid {
            Some((supplier_id, value)) => (
                AwardBasis::Auction,
                Some(AwardWinner { supplier_id, value }),
            ),
            None => {
                let winner = match baseline.criterion {
                    AwardCriterion::Global | AwardCriterion::Discount => {
                        baseline.global.map(|entry| AwardWinner {
                            supplier_id: entry.supplier_id,
                            value: entry.value,
                        })
                    }
                    AwardCriterion::PerItem | AwardCriterion::PerLot => None,
                };
                (AwardBasis::Baseline, winner)
            }
        };

        Self {
            selection_id,
            criterion: baseline.criterion,
            basis,
            winner,
            items: baseline.items.clone(),
            lots: baseline.lots.clone(),
            decided_at,
        }
    }
}

/// Why an award resolution was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AwardError {
    /// The selection does not exist.
    #[error("no such selection")]
    UnknownSelection,
    /// Awards are only resolved for closed selections.
    #[error("selection is {actual}; awards are resolved once it is closed")]
    NotClosed {
        /// The state the selection is actually in.
        actual: SelectionStatus,
    },
}
