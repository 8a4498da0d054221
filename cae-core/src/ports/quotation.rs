use crate::models::{AwardCriterion, ItemRecord, ItemRejection, LotRecord, QuotationRecord};

/// Repository interface for quotation setup: the quotation itself, its
/// items, and its lots.
///
/// This trait is parameterized by a generic data type, allowing an
/// application to colocate write-once data (title, requester, cost center)
/// alongside the engine-owned columns.
///
/// Items carry dense sequence numbers unique within their quotation.
/// `append_item` assigns the next number; `remove_item` renumbers the
/// remainder in the same transaction, so observers never see a gap.
pub trait QuotationRepository<QuotationData>: super::Repository {
    /// Create a new quotation in the `open` state.
    fn create_quotation(
        &self,
        quotation_id: Self::QuotationId,
        criterion: AwardCriterion,
        deadline: Self::DateTime,
        data: QuotationData,
        as_of: Self::DateTime,
    ) -> impl Future<
        Output = Result<QuotationRecord<Self::QuotationId, Self::DateTime, QuotationData>, Self::Error>,
    > + Send;

    /// Retrieve a quotation, returning `None` if it does not exist.
    fn get_quotation(
        &self,
        quotation_id: Self::QuotationId,
    ) -> impl Future<
        Output = Result<
            Option<QuotationRecord<Self::QuotationId, Self::DateTime, QuotationData>>,
            Self::Error,
        >,
    > + Send;

    /// Freeze an open quotation so its responses can be evaluated.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the quotation was open and is now closed
    /// - `Ok(false)` if it does not exist or was not open
    fn close_quotation(
        &self,
        quotation_id: Self::QuotationId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Abandon an open quotation. Terminal.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the quotation was open and is now cancelled
    /// - `Ok(false)` if it does not exist or was not open
    fn cancel_quotation(
        &self,
        quotation_id: Self::QuotationId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Append an item to an open quotation, assigning the next dense
    /// sequence number.
    fn append_item(
        &self,
        item_id: Self::ItemId,
        quotation_id: Self::QuotationId,
        quantity: f64,
        unit: String,
        lot_id: Option<Self::LotId>,
        estimated_unit_price: Option<f64>,
    ) -> impl Future<
        Output = Result<
            Result<ItemRecord<Self::ItemId, Self::QuotationId, Self::LotId>, ItemRejection>,
            Self::Error,
        >,
    > + Send;

    /// Remove an item from an open quotation and renumber the remaining
    /// items so their sequence stays dense and ordered.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the item existed and was removed
    /// - `Ok(false)` if it does not exist or its quotation is not open
    fn remove_item(
        &self,
        item_id: Self::ItemId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// All items of a quotation in sequence order.
    fn get_items(
        &self,
        quotation_id: Self::QuotationId,
    ) -> impl Future<
        Output = Result<Vec<ItemRecord<Self::ItemId, Self::QuotationId, Self::LotId>>, Self::Error>,
    > + Send;

    /// Create a lot on an open quotation, assigning the next sequence
    /// number. Returns `None` if the quotation does not exist or is not
    /// open.
    fn create_lot(
        &self,
        lot_id: Self::LotId,
        quotation_id: Self::QuotationId,
    ) -> impl Future<
        Output = Result<Option<LotRecord<Self::LotId, Self::QuotationId>>, Self::Error>,
    > + Send;

    /// All lots of a quotation in sequence order.
    fn get_lots(
        &self,
        quotation_id: Self::QuotationId,
    ) -> impl Future<
        Output = Result<Vec<LotRecord<Self::LotId, Self::QuotationId>>, Self::Error>,
    > + Send;
}
