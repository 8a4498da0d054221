use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::{AwardCriterion, Map};

/// The lowest valid value found for one unit of competition (an item, a
/// lot, or the whole quotation) and the supplier that offered it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry<SupplierId> {
    /// The supplier whose offer produced this value.
    pub supplier_id: SupplierId,
    /// The winning value. A unit price for items, an extended sum for lots
    /// and global totals, a percentage for discount competitions.
    pub value: f64,
}

/// The consolidated price baseline derived from a quotation's valid
/// responses.
///
/// This is a pure, recomputable view: it is a function of the quotation's
/// criterion, its items, and the non-rejected responses, and nothing else.
/// A baseline with no entries is the legitimate result of a quotation that
/// received no usable responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedBaseline<SupplierId, ItemId: Eq + Hash, LotId: Eq + Hash> {
    /// The criterion this baseline was consolidated under.
    pub criterion: AwardCriterion,
    /// Lowest offered unit price per item, among responses that priced the
    /// item. An item nobody priced is absent, never zero.
    pub items: Map<ItemId, BaselineEntry<SupplierId>>,
    /// Lowest extended sum per lot, among responses pricing every item in
    /// the lot.
    pub lots: Map<LotId, BaselineEntry<SupplierId>>,
    /// The criterion-dependent global winner: lowest eligible total under
    /// `global`, highest percentage under `discount`, absent for the
    /// distributive criteria.
    pub global: Option<BaselineEntry<SupplierId>>,
    /// The value a selection session opened from this baseline starts at:
    /// the first bid must undercut it. Absent when the baseline is empty.
    pub opening: Option<f64>,
}

impl<SupplierId, ItemId: Eq + Hash, LotId: Eq + Hash>
    ConsolidatedBaseline<SupplierId, ItemId, LotId>
{
    /// A baseline with no entries at all, for a quotation with no usable
    /// responses.
    pub fn empty(criterion: AwardCriterion) -> Self {
        Self {
            criterion,
            items: Map::default(),
            lots: Map::default(),
            global: None,
            opening: None,
        }
    }

    /// Whether this baseline carries no winner attribution of any kind.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.lots.is_empty() && self.global.is_none()
    }

    /// The opening ceiling for a selection session seeded from this
    /// baseline, if one exists.
    pub fn opening_value(&self) -> Option<f64> {
        self.opening
    }
}

/// A stored baseline snapshot: the output of evaluating a quotation at a
/// point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord<QuotationId, SupplierId, ItemId: Eq + Hash, LotId: Eq + Hash, DateTime> {
    /// The quotation the baseline was computed for.
    pub quotation_id: QuotationId,
    /// When the evaluation ran.
    pub as_of: DateTime,
    /// The consolidated baseline itself.
    pub baseline: ConsolidatedBaseline<SupplierId, ItemId, LotId>,
}
