//! Billed resource types.
//!
//! This module contains the record returned by the billing service:
//! - [`BillingResource`] - One billed resource
//! - [`ResourceField`] - The fields shown in a cost report
//! - [`Amount`] - A cost as reported by the API

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// ============================================================================
// Amount
// ============================================================================

/// A monetary amount as reported by the billing API.
///
/// SoftLayer returns fees as decimal strings ("45.50"), but other sources
/// may send plain JSON numbers. Textual amounts are displayed verbatim,
/// numeric amounts with two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Amount as a numeric value.
    Number(f64),
    /// Amount as a decimal string.
    Text(String),
}

impl Amount {
    /// Returns the numeric value, if the amount can be read as a number.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n:.2}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

// ============================================================================
// Resource Field
// ============================================================================

/// A display field of a [`BillingResource`], in report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceField {
    /// Order identifier.
    Id,
    /// Resource display name.
    HostName,
    /// Category label.
    ResourceType,
    /// Cost.
    Cost,
    /// Creation timestamp.
    CreateDate,
}

impl ResourceField {
    /// All display fields in column order.
    pub const ALL: [ResourceField; 5] = [
        Self::Id,
        Self::HostName,
        Self::ResourceType,
        Self::Cost,
        Self::CreateDate,
    ];

    /// Returns the key used for this field in API records.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::HostName => "hostName",
            Self::ResourceType => "resourceType",
            Self::Cost => "cost",
            Self::CreateDate => "createDate",
        }
    }

    /// Returns the column header for this field.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Id => "Order ID",
            Self::HostName => "Resource Name",
            Self::ResourceType => "Resource Type",
            Self::Cost => "cost",
            Self::CreateDate => "create_date",
        }
    }

    /// Looks up a field by its API key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for ResourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Billing Resource
// ============================================================================

/// A billed resource as returned by the billing service.
///
/// Every field is optional: records with missing keys still deserialize,
/// and [`BillingResource::field`] renders absent fields as blanks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingResource {
    /// Order identifier.
    #[serde(default)]
    pub id: Option<u64>,
    /// Resource display name.
    #[serde(default)]
    pub host_name: Option<String>,
    /// Category label, e.g. "Server" or "iSCSI SAN Storage".
    #[serde(default)]
    pub resource_type: Option<String>,
    /// Cost of the resource.
    #[serde(default)]
    pub cost: Option<Amount>,
    /// Creation timestamp as reported by the API.
    #[serde(default)]
    pub create_date: Option<String>,
}

impl BillingResource {
    /// Creates a resource with the given order id and no other fields.
    pub fn new(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Parses a resource from a loosely-typed JSON record.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object or a present field
    /// has the wrong type.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        if !value.is_object() {
            return Err(CoreError::InvalidData(format!(
                "billing resource must be an object, got {value}"
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Returns a field rendered as text, or an empty string if absent.
    pub fn field(&self, field: ResourceField) -> String {
        match field {
            ResourceField::Id => self.id.map(|id| id.to_string()),
            ResourceField::HostName => self.host_name.clone(),
            ResourceField::ResourceType => self.resource_type.clone(),
            ResourceField::Cost => self.cost.as_ref().map(ToString::to_string),
            ResourceField::CreateDate => self.create_date.clone(),
        }
        .unwrap_or_default()
    }

    /// Returns all display fields in column order.
    pub fn row(&self) -> [String; 5] {
        ResourceField::ALL.map(|f| self.field(f))
    }

    /// Returns true if the resource type matches a label, ignoring case.
    pub fn matches_type(&self, label: &str) -> bool {
        self.resource_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(label.trim()))
    }
}

// ============================================================================
// Tests
// ============================================================================
