use std::hash::Hash;

use thiserror::Error;

use cae_core::models::{
    AwardCriterion, BaselineEntry, ConsolidatedBaseline, EvaluationItem, EvaluationResponse,
    RawEvaluationInput,
};
use cae_core::ports::Evaluator;

use crate::Map;

/// The reference consolidation algorithm.
///
/// Stateless; one instance can evaluate any number of quotations, from any
/// number of threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Consolidator;

/// The ways consolidation itself can fail.
///
/// Input validity (positive prices, positive quantities) is enforced
/// upstream at construction time, so the only failure left is arithmetic:
/// an extended sum escaping the representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsolidationError {
    /// An offered total overflowed out of the finite range.
    #[error("offered totals exceed the representable range")]
    NonFiniteTotal,
}

impl<SupplierId, ItemId, LotId> Evaluator<SupplierId, ItemId, LotId> for Consolidator
where
    SupplierId: Copy + Eq + Hash,
    ItemId: Copy + Eq + Hash,
    LotId: Copy + Eq + Hash,
{
    type Error = ConsolidationError;

    fn evaluate(
        &self,
        input: &RawEvaluationInput<SupplierId, ItemId, LotId>,
    ) -> Result<ConsolidatedBaseline<SupplierId, ItemId, LotId>, Self::Error> {
        let mut baseline = ConsolidatedBaseline::empty(input.criterion);

        consolidate_items(&mut baseline, input);
        consolidate_lots(&mut baseline, input)?;
        baseline.global = match input.criterion {
            AwardCriterion::Global => global_winner(input)?,
            AwardCriterion::Discount => discount_winner(input),
            AwardCriterion::PerItem | AwardCriterion::PerLot => None,
        };
        baseline.opening = opening_value(&baseline, input)?;

        Ok(baseline)
    }
}

/// Lowest offered unit price per item, among the responses that priced the
/// item. Incompleteness only excludes a response for the items it skipped.
fn consolidate_items<SupplierId, ItemId, LotId>(
    baseline: &mut ConsolidatedBaseline<SupplierId, ItemId, LotId>,
    input: &RawEvaluationInput<SupplierId, ItemId, LotId>,
) where
    SupplierId: Copy + Eq + Hash,
    ItemId: Copy + Eq + Hash,
    LotId: Copy + Eq + Hash,
{
    for item in &input.items {
        let mut best: Option<BaselineEntry<SupplierId>> = None;
        for response in &input.responses {
            if let Some(price) = response.offer.price_for(&item.id) {
                // Strict comparison: an exact tie keeps the earlier response.
                if best.is_none_or(|entry| price < entry.value) {
                    best = Some(BaselineEntry {
                        supplier_id: response.supplier_id,
                        value: price,
                    });
                }
            }
        }
        if let Some(entry) = best {
            baseline.items.insert(item.id, entry);
        }
    }
}

/// Lowest extended sum per lot, among the responses pricing every item of
/// the lot. A response missing any item in a lot is out for that lot only.
fn consolidate_lots<SupplierId, ItemId, LotId>(
    baseline: &mut ConsolidatedBaseline<SupplierId, ItemId, LotId>,
    input: &RawEvaluationInput<SupplierId, ItemId, LotId>,
) -> Result<(), ConsolidationError>
where
    SupplierId: Copy + Eq + Hash,
    ItemId: Copy + Eq + Hash,
    LotId: Copy + Eq + Hash,
{
    let mut lots: Map<LotId, Vec<&EvaluationItem<ItemId, LotId>>> = Map::default();
    for item in &input.items {
        if let Some(lot_id) = item.lot_id {
            lots.entry(lot_id).or_default().push(item);
        }
    }

    for (lot_id, members) in &lots {
        let mut best: Option<BaselineEntry<SupplierId>> = None;
        for response in &input.responses {
            if let Some(sum) = lot_sum(response, members)? {
                if best.is_none_or(|entry| sum < entry.value) {
                    best = Some(BaselineEntry {
                        supplier_id: response.supplier_id,
                        value: sum,
                    });
                }
            }
        }
        if let Some(entry) = best {
            baseline.lots.insert(*lot_id, entry);
        }
    }

    Ok(())
}

/// A response's extended sum over a lot's members, or `None` if it skipped
/// any of them.
fn lot_sum<SupplierId, ItemId, LotId>(
    response: &EvaluationResponse<SupplierId, ItemId>,
    members: &[&EvaluationItem<ItemId, LotId>],
) -> Result<Option<f64>, ConsolidationError>
where
    SupplierId: Copy + Eq + Hash,
    ItemId: Copy + Eq + Hash,
    LotId: Copy + Eq + Hash,
{
    let mut sum = 0.0;
    for item in members {
        match response.offer.price_for(&item.id) {
            Some(price) => sum += item.quantity * price,
            None => return Ok(None),
        }
    }
    if sum.is_finite() {
        Ok(Some(sum))
    } else {
        Err(ConsolidationError::NonFiniteTotal)
    }
}

/// The `global` criterion winner: the lowest total among responses that
/// priced every item. A response incomplete for any item is out entirely,
/// no matter how cheap its priced subset is.
fn global_winner<SupplierId, ItemId, LotId>(
    input: &RawEvaluationInput<SupplierId, ItemId, LotId>,
) -> Result<Option<BaselineEntry<SupplierId>>, ConsolidationError>
where
    SupplierId: Copy + Eq + Hash,
    ItemId: Copy + Eq + Hash,
    LotId: Copy + Eq + Hash,
{
    let mut best: Option<BaselineEntry<SupplierId>> = None;
    for response in &input.responses {
        if response.offer.is_discount() {
            continue;
        }
        if !input
            .items
            .iter()
            .all(|item| response.offer.price_for(&item.id).is_some())
        {
            continue;
        }
        let total = match response.declared_total {
            Some(total) => total,
            None => input
                .items
                .iter()
                .filter_map(|item| {
                    response
                        .offer
                        .price_for(&item.id)
                        .map(|price| item.quantity * price)
                })
                .sum(),
        };
        if !total.is_finite() {
            return Err(ConsolidationError::NonFiniteTotal);
        }
        if best.is_none_or(|entry| total < entry.value) {
            best = Some(BaselineEntry {
                supplier_id: response.supplier_id,
                value: total,
            });
        }
    }
    Ok(best)
}

/// The `discount` criterion winner: the highest percentage offered.
///
/// How a percentage folds into per-item estimates was never specified by
/// the business; the engine deliberately compares the percentages
/// themselves and carries the winning percentage as the global value.
fn discount_winner<SupplierId, ItemId, LotId>(
    input: &RawEvaluationInput<SupplierId, ItemId, LotId>,
) -> Option<BaselineEntry<SupplierId>>
where
    SupplierId: Copy + Eq + Hash,
    ItemId: Copy + Eq + Hash,
    LotId: Copy + Eq + Hash,
{
    let mut best: Option<BaselineEntry<SupplierId>> = None;
    for response in &input.responses {
        if let Some(percent) = response.offer.discount() {
            // Strict comparison again: ties keep the earlier response.
            if best.is_none_or(|entry| percent > entry.value) {
                best = Some(BaselineEntry {
                    supplier_id: response.supplier_id,
                    value: percent,
                });
            }
        }
    }
    best
}

/// The ceiling a selection session opened from this baseline starts at.
///
/// Extended (quantity-weighted) for the distributive criteria so it is
/// comparable with the totals suppliers actually bid.
fn opening_value<SupplierId, ItemId, LotId>(
    baseline: &ConsolidatedBaseline<SupplierId, ItemId, LotId>,
    input: &RawEvaluationInput<SupplierId, ItemId, LotId>,
) -> Result<Option<f64>, ConsolidationError>
where
    SupplierId: Copy + Eq + Hash,
    ItemId: Copy + Eq + Hash,
    LotId: Copy + Eq + Hash,
{
    let opening = match baseline.criterion {
        AwardCriterion::Global | AwardCriterion::Discount => {
            baseline.global.map(|entry| entry.value)
        }
        AwardCriterion::PerItem => {
            if baseline.items.is_empty() {
                None
            } else {
                let total: f64 = input
                    .items
                    .iter()
                    .filter_map(|item| {
                        baseline
                            .items
                            .get(&item.id)
                            .map(|entry| item.quantity * entry.value)
                    })
                    .sum();
                Some(total)
            }
        }
        AwardCriterion::PerLot => {
            if baseline.lots.is_empty() {
                None
            } else {
                Some(baseline.lots.values().map(|entry| entry.value).sum())
            }
        }
    };
    match opening {
        Some(value) if !value.is_finite() => Err(ConsolidationError::NonFiniteTotal),
        other => Ok(other),
    }
}
