use crate::models::{
    BidOutcome, BidRecord, DateTimeRangeQuery, DateTimeRangeResponse, SelectionError,
    SelectionRecord,
};

/// The record type returned by [`SelectionRepository`] operations.
pub type Selection<T> = SelectionRecord<
    <T as super::Repository>::SelectionId,
    <T as super::Repository>::QuotationId,
    <T as super::Repository>::SupplierId,
    <T as super::Repository>::ItemId,
    <T as super::Repository>::LotId,
    <T as super::Repository>::DateTime,
>;

/// The bid type returned by [`SelectionRepository`] operations.
pub type Bid<T> = BidRecord<
    <T as super::Repository>::BidId,
    <T as super::Repository>::SelectionId,
    <T as super::Repository>::SupplierId,
    <T as super::Repository>::DateTime,
>;

/// Repository interface for selection sessions and their bid ledger.
///
/// # Concurrency contract
///
/// `submit_bid` is the one operation in the engine with a genuine
/// shared-mutable-state hazard: the ledger minimum for a selection is read
/// and written by an unbounded number of concurrent suppliers. An
/// implementation MUST make the check-then-insert atomic per selection —
/// two in-flight bids that each undercut the value they observed, but not
/// each other, must never both land. The loser is reported
/// [`crate::models::BidRejection::NotLowerAnymore`] together with the
/// minimum it actually lost to, and is not persisted.
///
/// Everything else on this trait is plain read-or-transition work with no
/// cross-caller coordination beyond uniqueness constraints.
pub trait SelectionRepository: super::Repository {
    /// Open a session for a closed quotation, seeding the opening ceiling
    /// from its stored baseline. The session starts `planned`; it reads as
    /// `disputing` once `scheduled_at` passes, with no scheduler involved.
    fn open_selection(
        &self,
        selection_id: Self::SelectionId,
        quotation_id: Self::QuotationId,
        scheduled_at: Self::DateTime,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<Selection<Self>, SelectionError>, Self::Error>> + Send;

    /// Retrieve a selection, returning `None` if it does not exist.
    fn get_selection(
        &self,
        selection_id: Self::SelectionId,
    ) -> impl Future<Output = Result<Option<Selection<Self>>, Self::Error>> + Send;

    /// Cancel a planned or disputing session. Terminal; accepted bids are
    /// retained for audit.
    fn cancel_selection(
        &self,
        selection_id: Self::SelectionId,
        reason: String,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<Selection<Self>, SelectionError>, Self::Error>> + Send;

    /// Close a session, ending the bidding window. Terminal; enables award
    /// resolution.
    fn close_selection(
        &self,
        selection_id: Self::SelectionId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<Result<Selection<Self>, SelectionError>, Self::Error>> + Send;

    /// Attempt a bid. See the trait-level concurrency contract.
    ///
    /// `as_of` is the engine clock's view of "now"; it gates the
    /// lazily-derived disputing window and is stored on the accepted bid.
    fn submit_bid(
        &self,
        bid_id: Self::BidId,
        selection_id: Self::SelectionId,
        supplier_id: Self::SupplierId,
        value: f64,
        as_of: Self::DateTime,
    ) -> impl Future<
        Output = Result<
            BidOutcome<Self::BidId, Self::SelectionId, Self::SupplierId, Self::DateTime>,
            Self::Error,
        >,
    > + Send;

    /// The accepted bids of a selection, newest first, paginated.
    fn get_bids(
        &self,
        selection_id: Self::SelectionId,
        query: DateTimeRangeQuery<Self::DateTime>,
        limit: usize,
    ) -> impl Future<
        Output = Result<DateTimeRangeResponse<Bid<Self>, Self::DateTime>, Self::Error>,
    > + Send;
}
