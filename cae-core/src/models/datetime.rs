use serde::{Deserialize, Serialize};

/// A query type for dealing with datetime ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "DateTime: Serialize",
    deserialize = "DateTime: Deserialize<'de>"
))]
pub struct DateTimeRangeQuery<DateTime> {
    /// Select records strictly before this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<DateTime>,
    /// Select records at or after this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<DateTime>,
}

impl<DateTime> Default for DateTimeRangeQuery<DateTime> {
    fn default() -> Self {
        Self {
            before: None,
            after: None,
        }
    }
}

/// The paginated response to a datetime-range query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTimeRangeResponse<T, DateTime> {
    /// The page of results, newest first.
    pub results: Vec<T>,
    /// The query to pass back for the next page, if more records exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more: Option<DateTimeRangeQuery<DateTime>>,
}
