use crate::models::Eligibility;

/// The identity/roster collaborator port.
///
/// Given a quotation, this port answers who may participate: the set of
/// invited, non-excluded suppliers. A selection session inherits the
/// roster of the quotation it was derived from, so there is no separate
/// per-selection roster.
///
/// Exclusion is a flag, not a deletion — an excluded supplier's existing
/// response stays on file for audit, it is merely barred from further
/// participation and from evaluation.
pub trait SupplierRoster: super::Repository {
    /// Invite a supplier to a quotation. Idempotent.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the quotation exists (whether or not the supplier
    ///   was already invited)
    /// - `Ok(false)` if the quotation does not exist
    fn invite_supplier(
        &self,
        quotation_id: Self::QuotationId,
        supplier_id: Self::SupplierId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Exclude a previously invited supplier.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the supplier was invited and is now excluded
    /// - `Ok(false)` if the supplier was never invited
    fn exclude_supplier(
        &self,
        quotation_id: Self::QuotationId,
        supplier_id: Self::SupplierId,
        as_of: Self::DateTime,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// The invited, non-excluded suppliers for a quotation.
    fn invited_suppliers(
        &self,
        quotation_id: Self::QuotationId,
    ) -> impl Future<Output = Result<Vec<Self::SupplierId>, Self::Error>> + Send;

    /// One supplier's standing with respect to a quotation.
    fn eligibility(
        &self,
        quotation_id: Self::QuotationId,
        supplier_id: Self::SupplierId,
    ) -> impl Future<Output = Result<Eligibility, Self::Error>> + Send;
}
