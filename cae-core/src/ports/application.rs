use super::{
    AwardRepository, EvaluationRepository, Evaluator, QuotationRepository, Repository,
    ResponseRepository,
};

/// The wiring trait an embedding application implements.
///
/// The engine never generates identifiers or reads the wall clock itself;
/// both come through here, which keeps every operation deterministic and
/// testable. This also centralizes the choice of backend and evaluator so
/// the rest of the application can stay generic over them.
pub trait Application: Send + Sync + 'static {
    /// Application-defined data colocated with each quotation.
    type QuotationData: Send + Sync + 'static;

    /// The consolidation algorithm in use.
    type Evaluator: Evaluator<
            <Self::Repository as Repository>::SupplierId,
            <Self::Repository as Repository>::ItemId,
            <Self::Repository as Repository>::LotId,
        > + Send
        + Sync;

    /// The storage backend in use.
    type Repository: QuotationRepository<Self::QuotationData>
        + ResponseRepository
        + EvaluationRepository<Self::Evaluator>
        + AwardRepository;

    /// The backing repository.
    fn database(&self) -> &Self::Repository;

    /// The engine clock. Every deadline and session-window guard compares
    /// against a value produced here.
    fn now(&self) -> <Self::Repository as Repository>::DateTime;

    /// The evaluator instance to consolidate with.
    fn evaluator(&self) -> Self::Evaluator;

    /// Generate an id for a new quotation.
    fn generate_quotation_id(
        &self,
        data: &Self::QuotationData,
    ) -> <Self::Repository as Repository>::QuotationId;

    /// Generate an id for a new item.
    fn generate_item_id(&self) -> <Self::Repository as Repository>::ItemId;

    /// Generate an id for a new lot.
    fn generate_lot_id(&self) -> <Self::Repository as Repository>::LotId;

    /// Generate an id for a new supplier response.
    fn generate_response_id(&self) -> <Self::Repository as Repository>::ResponseId;

    /// Generate an id for a new selection session.
    fn generate_selection_id(&self) -> <Self::Repository as Repository>::SelectionId;

    /// Generate an id for a new bid.
    fn generate_bid_id(&self) -> <Self::Repository as Repository>::BidId;
}
