//! Type definitions for the SQLite implementation.
//!
//! This module contains the strongly-typed identifiers and the datetime
//! representation used throughout the crate. Everything that crosses the
//! storage boundary goes through one of these types so that encoding stays
//! consistent across the system.

mod datetime;
pub use datetime::DateTime;

mod ids;
pub use ids::{BidId, ItemId, LotId, QuotationId, ResponseId, SelectionId, SupplierId};
