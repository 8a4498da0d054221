use serde::{Deserialize, Serialize};

use super::UnknownToken;

/// The rule used to pick winners from a quotation's responses.
///
/// The criterion is fixed when the quotation is created and does not change
/// once responses exist; every downstream artifact (baseline, selection,
/// award) records the criterion it was produced under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardCriterion {
    /// The lowest total offer, among responses pricing every item, wins all
    /// items.
    Global,
    /// Each item is won independently by the lowest unit price offered for
    /// it.
    PerItem,
    /// Each lot is won by the lowest sum of its items' extended prices.
    PerLot,
    /// Suppliers offer a percentage discount off a reference value; the
    /// highest percentage wins globally.
    Discount,
}

impl AwardCriterion {
    /// The stable storage token for this criterion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::PerItem => "per_item",
            Self::PerLot => "per_lot",
            Self::Discount => "discount",
        }
    }

    /// Whether responses under this criterion carry a discount percentage
    /// rather than per-item unit prices.
    pub fn expects_discount(&self) -> bool {
        matches!(self, Self::Discount)
    }
}

impl std::fmt::Display for AwardCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AwardCriterion {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "per_item" => Ok(Self::PerItem),
            "per_lot" => Ok(Self::PerLot),
            "discount" => Ok(Self::Discount),
            other => Err(UnknownToken(other.to_owned())),
        }
    }
}
