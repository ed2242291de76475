//! Query filters.

use serde::{Deserialize, Serialize};

/// Filters for a billing query.
///
/// All three filters are independent. An unset filter means "no constraint":
/// no lower date bound, latest available data, or no resource-type grouping.
/// Values are passed to the billing service as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilters {
    /// Inclusive start date, conventionally `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    /// Inclusive end date. Unset means the latest available data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    /// Resource-type label, e.g. "server" or "iscsi SAN storage".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl QueryFilters {
    /// Creates filters with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date. Empty values leave the filter unset.
    #[must_use]
    pub fn with_from_date(mut self, date: Option<impl Into<String>>) -> Self {
        self.from_date = non_empty(date);
        self
    }

    /// Sets the end date. Empty values leave the filter unset.
    #[must_use]
    pub fn with_to_date(mut self, date: Option<impl Into<String>>) -> Self {
        self.to_date = non_empty(date);
        self
    }

    /// Sets the resource-type label. Empty values leave the filter unset.
    #[must_use]
    pub fn with_group_by(mut self, label: Option<impl Into<String>>) -> Self {
        self.group_by = non_empty(label);
        self
    }

    /// Returns true if no filter is set (all resources, all time, ungrouped).
    pub fn is_unconstrained(&self) -> bool {
        self.from_date.is_none() && self.to_date.is_none() && self.group_by.is_none()
    }
}

fn non_empty(value: Option<impl Into<String>>) -> Option<String> {
    value.map(Into::into).filter(|v| !v.is_empty())
}
