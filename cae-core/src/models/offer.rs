use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Map;

/// A supplier's priced payload for a quotation response.
///
/// A `QuoteOffer` is either a set of per-item unit prices or a percentage
/// discount off a reference value, depending on the quotation's award
/// criterion. Construction goes through [`RawQuoteOffer`], so a value of
/// this type is always valid: every unit price is finite and strictly
/// positive, a priced offer names at least one item, and a discount lies in
/// `(0, 100]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    untagged,
    try_from = "RawQuoteOffer<ItemId>",
    into = "RawQuoteOffer<ItemId>"
)]
pub enum QuoteOffer<ItemId: Copy + Eq + Hash> {
    /// Unit prices keyed by item. An item absent from the map makes the
    /// response incomplete for that item; how much that matters depends on
    /// the award criterion.
    Prices(Map<ItemId, f64>),
    /// A percentage discount in `(0, 100]`.
    Discount(f64),
}

impl<ItemId: Copy + Eq + Hash> QuoteOffer<ItemId> {
    /// The offered unit price for `item`, if this offer priced it.
    pub fn price_for(&self, item: &ItemId) -> Option<f64> {
        match self {
            Self::Prices(prices) => prices.get(item).copied(),
            Self::Discount(_) => None,
        }
    }

    /// The discount percentage, for discount offers.
    pub fn discount(&self) -> Option<f64> {
        match self {
            Self::Prices(_) => None,
            Self::Discount(percent) => Some(*percent),
        }
    }

    /// Whether this offer is a discount rather than a set of unit prices.
    pub fn is_discount(&self) -> bool {
        matches!(self, Self::Discount(_))
    }

    /// The items this offer priced, in offer order.
    pub fn priced_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        let prices = match self {
            Self::Prices(prices) => Some(prices),
            Self::Discount(_) => None,
        };
        prices.into_iter().flat_map(|p| p.keys().copied())
    }

    /// The offered total over the supplied items, `Σ quantity × unit price`.
    ///
    /// `quantities` maps each of the quotation's items to its quantity.
    /// Items the offer did not price contribute nothing; a discount offer
    /// has no total.
    pub fn offered_total(&self, quantities: &Map<ItemId, f64>) -> Option<f64> {
        match self {
            Self::Prices(prices) => Some(
                prices
                    .iter()
                    .filter_map(|(item, price)| {
                        quantities.get(item).map(|quantity| quantity * price)
                    })
                    .sum(),
            ),
            Self::Discount(_) => None,
        }
    }
}

/// The ways in which a submitted offer payload may be invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OfferValidationError {
    /// A unit price was zero, negative, or not a finite number.
    #[error("unit prices must be finite and strictly positive")]
    NonPositivePrice,
    /// A priced offer contained no items at all.
    #[error("a priced offer must include at least one item")]
    Empty,
    /// The discount percentage fell outside `(0, 100]`.
    #[error("a discount percentage must lie in (0, 100]")]
    DiscountOutOfRange,
}

/// The "DTO" type for an offer payload.
///
/// This is the shape accepted on the wire before validation; converting it
/// into a [`QuoteOffer`] enforces the price and discount constraints.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuoteOffer<ItemId: Copy + Eq + Hash> {
    /// Per-item unit prices.
    Prices(Map<ItemId, f64>),
    /// A discount percentage.
    Discount(f64),
}

impl<ItemId: Copy + Eq + Hash> TryFrom<RawQuoteOffer<ItemId>> for QuoteOffer<ItemId> {
    type Error = OfferValidationError;

    fn try_from(value: RawQuoteOffer<ItemId>) -> Result<Self, Self::Error> {
        match value {
            RawQuoteOffer::Prices(prices) => {
                if prices.is_empty() {
                    return Err(OfferValidationError::Empty);
                }
                if prices.values().any(|p| !(p.is_finite() && *p > 0.0)) {
                    return Err(OfferValidationError::NonPositivePrice);
                }
                Ok(Self::Prices(prices))
            }
            RawQuoteOffer::Discount(percent) => {
                if percent.is_finite() && percent > 0.0 && percent <= 100.0 {
                    Ok(Self::Discount(percent))
                } else {
                    Err(OfferValidationError::DiscountOutOfRange)
                }
            }
        }
    }
}

impl<ItemId: Copy + Eq + Hash> From<QuoteOffer<ItemId>> for RawQuoteOffer<ItemId> {
    fn from(value: QuoteOffer<ItemId>) -> Self {
        match value {
            QuoteOffer::Prices(prices) => Self::Prices(prices),
            QuoteOffer::Discount(percent) => Self::Discount(percent),
        }
    }
}
