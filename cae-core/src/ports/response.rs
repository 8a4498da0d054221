use crate::models::{QuoteOffer, ResponseRecord, ResponseRejection};

/// The record type returned by [`ResponseRepository`] operations.
pub type Response<T> = ResponseRecord<
    <T as super::Repository>::ResponseId,
    <T as super::Repository>::QuotationId,
    <T as super::Repository>::SupplierId,
    <T as super::Repository>::ItemId,
    <T as super::Repository>::DateTime,
>;

/// Repository interface for collecting supplier responses.
///
/// Submission is the only write; responses are immutable once accepted.
/// The inner `Result` carries the expected, typed rejections (deadline,
/// eligibility, duplicates); the outer `Result` is the storage layer.
pub trait ResponseRepository: super::SupplierRoster {
    /// Submit a supplier's one response to a quotation.
    ///
    /// The offer must already be validated (see
    /// [`crate::models::QuoteOffer`]); this operation checks everything
    /// contextual: the quotation is open and before its deadline, the
    /// supplier is invited and not excluded, no response is already on
    /// file, the offer kind matches the criterion, and every priced item
    /// belongs to the quotation.
    ///
    /// A response that prices only some of the items is accepted and
    /// stored; how much the gaps matter is the evaluator's concern, not
    /// the collector's.
    ///
    /// The offered total is computed here, at acceptance time, as
    /// `Σ quantity × unit price` over the priced items.
    fn submit_response(
        &self,
        response_id: Self::ResponseId,
        quotation_id: Self::QuotationId,
        supplier_id: Self::SupplierId,
        offer: QuoteOffer<Self::ItemId>,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<Response<Self>, ResponseRejection>, Self::Error>> + Send;

    /// All responses to a quotation in submission order (ties broken by
    /// response id), including rejected ones.
    fn get_responses(
        &self,
        quotation_id: Self::QuotationId,
    ) -> impl Future<Output = Result<Vec<Response<Self>>, Self::Error>> + Send;

    /// Flag a response as rejected, excluding it from evaluation without
    /// deleting it.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the response exists and is now flagged
    /// - `Ok(false)` if it does not exist
    fn reject_response(
        &self,
        response_id: Self::ResponseId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
