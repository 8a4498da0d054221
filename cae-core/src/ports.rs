mod application;
mod award;
mod evaluation;
mod evaluator;
mod quotation;
mod response;
mod roster;
mod selection;

pub use application::Application;
pub use award::{Award, AwardRepository};
pub use evaluation::{Baseline, EvaluationRepository};
pub use evaluator::Evaluator;
pub use quotation::QuotationRepository;
pub use response::{Response, ResponseRepository};
pub use roster::SupplierRoster;
pub use selection::{Bid, Selection, SelectionRepository};

use std::fmt::Debug;
use std::hash::Hash;

/// The base trait shared by every repository port.
///
/// A backend chooses its own identifier, timestamp, and error types once,
/// here; every other port constrains itself in terms of these associated
/// types. Identifiers are plain copyable values — the engine never
/// generates them itself (see [`Application`]).
pub trait Repository: Send + Sync {
    /// Errors the storage layer itself can produce. Domain rejections are
    /// not errors of this type; operations report them in-band.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The timestamp type. `Ord` because every guard in the engine is a
    /// comparison against a stored instant.
    type DateTime: Copy + Ord + Debug + Send + Sync + Unpin + 'static;

    /// Unique identifier for a supplier.
    type SupplierId: Copy + Eq + Hash + Debug + Send + Sync + Unpin + 'static;
    /// Unique identifier for a quotation.
    type QuotationId: Copy + Eq + Hash + Debug + Send + Sync + Unpin + 'static;
    /// Unique identifier for an item.
    type ItemId: Copy + Eq + Hash + Debug + Send + Sync + Unpin + 'static;
    /// Unique identifier for a lot.
    type LotId: Copy + Eq + Hash + Debug + Send + Sync + Unpin + 'static;
    /// Unique identifier for a supplier response.
    type ResponseId: Copy + Eq + Hash + Debug + Send + Sync + Unpin + 'static;
    /// Unique identifier for a selection session.
    type SelectionId: Copy + Eq + Hash + Debug + Send + Sync + Unpin + 'static;
    /// Unique identifier for a bid.
    type BidId: Copy + Eq + Hash + Debug + Send + Sync + Unpin + 'static;
}
