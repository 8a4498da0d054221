use serde::{Deserialize, Serialize};

/// A supplier's standing with respect to one quotation (and, by
/// inheritance, any selection session derived from it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// Invited and in good standing; may respond and bid.
    Invited,
    /// Invited at some point, later excluded; existing submissions remain
    /// on file but new ones are refused.
    Excluded,
    /// Never invited.
    NotInvited,
}

impl Eligibility {
    /// Whether new submissions from this supplier are accepted.
    pub fn may_participate(&self) -> bool {
        matches!(self, Self::Invited)
    }
}
