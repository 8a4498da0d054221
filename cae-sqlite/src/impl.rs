mod award;
mod evaluation;
mod quotation;
mod response;
mod roster;
mod selection;

use crate::Db;
use crate::types::{
    BidId, DateTime, ItemId, LotId, QuotationId, ResponseId, SelectionId, SupplierId,
};
use cae_core::ports::Repository;

impl Repository for Db {
    type Error = sqlx::Error;
    type DateTime = DateTime;
    type SupplierId = SupplierId;
    type QuotationId = QuotationId;
    type ItemId = ItemId;
    type LotId = LotId;
    type ResponseId = ResponseId;
    type SelectionId = SelectionId;
    type BidId = BidId;
}

/// Lift a domain decoding failure into the storage error channel. Stored
/// rows are written by this crate, so hitting this means the database was
/// edited out from under us.
pub(crate) fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}
