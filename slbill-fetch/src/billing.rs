//! SoftLayer billing manager.
//!
//! Lists the account's billing items and maps them onto
//! [`BillingResource`] records. Date filters are sent to the API as a
//! `createDate` object filter; the resource-type filter is applied locally
//! because category names are not filterable case-insensitively upstream.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use slbill_core::{Amount, BillingQuery, BillingResource, CoreError, QueryFilters};
use tracing::{debug, info, instrument};
use url::Url;

use crate::client::HttpClient;
use crate::credentials::Credentials;
use crate::error::FetchError;

// ============================================================================
// Constants
// ============================================================================

/// Default SoftLayer REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.softlayer.com/rest/v3.1";

/// Billing items endpoint, relative to the REST endpoint.
const BILLING_ITEMS_PATH: &str = "SoftLayer_Account/getAllBillingItems.json";

/// Object mask selecting the fields a report needs.
const BILLING_ITEM_MASK: &str =
    "mask[id,hostName,domain,description,categoryCode,recurringFee,createDate,category[name]]";

/// Date format accepted on the command line.
const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format expected by SoftLayer object filters.
const FILTER_DATE_FORMAT: &str = "%m/%d/%Y";

// ============================================================================
// API Response Types
// ============================================================================

/// A billing item as returned by `getAllBillingItems`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingItem {
    /// Billing item id.
    #[serde(default)]
    pub id: Option<u64>,
    /// Host name for server-like items.
    #[serde(default)]
    pub host_name: Option<String>,
    /// Domain for server-like items.
    #[serde(default)]
    pub domain: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category code, e.g. `server` or `iscsi`.
    #[serde(default)]
    pub category_code: Option<String>,
    /// Recurring fee, usually a decimal string.
    #[serde(default)]
    pub recurring_fee: Option<Amount>,
    /// Creation timestamp.
    #[serde(default)]
    pub create_date: Option<String>,
    /// Category details.
    #[serde(default)]
    pub category: Option<BillingCategory>,
}

/// Billing item category.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingCategory {
    /// Display name, e.g. "iSCSI SAN Storage".
    #[serde(default)]
    pub name: Option<String>,
}

impl BillingItem {
    /// Converts the item into a report resource.
    ///
    /// The display name is the host name, falling back to the description.
    /// The resource type is the category name, falling back to the code.
    pub fn into_resource(self) -> BillingResource {
        let resource_type = self
            .category
            .and_then(|c| c.name)
            .or(self.category_code);

        BillingResource {
            id: self.id,
            host_name: self.host_name.or(self.description),
            resource_type,
            cost: self.recurring_fee,
            create_date: self.create_date,
        }
    }
}

// ============================================================================
// Filter Construction
// ============================================================================

/// Parses a `YYYY-MM-DD` filter value.
fn parse_date(value: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT).map_err(|_| {
        FetchError::InvalidDate {
            value: value.to_string(),
        }
    })
}

fn start_of_day(date: NaiveDate) -> String {
    format!("{} 00:00:00", date.format(FILTER_DATE_FORMAT))
}

fn end_of_day(date: NaiveDate) -> String {
    format!("{} 23:59:59", date.format(FILTER_DATE_FORMAT))
}

/// Exclusive upper bound covering all of `date`.
fn day_after(date: NaiveDate) -> String {
    date.succ_opt()
        .map_or_else(|| end_of_day(date), start_of_day)
}

/// Builds the SoftLayer object filter for the date range.
///
/// Returns `None` when neither date is set. Both bounds are inclusive.
///
/// # Errors
///
/// Fails on malformed dates or when `from_date` is after `to_date`.
pub fn build_object_filter(filters: &QueryFilters) -> Result<Option<Value>, FetchError> {
    let from = filters.from_date.as_deref().map(parse_date).transpose()?;
    let to = filters.to_date.as_deref().map(parse_date).transpose()?;

    let create_date = match (from, to) {
        (None, None) => return Ok(None),
        (Some(from), Some(to)) => {
            if from > to {
                return Err(FetchError::InvalidDateRange {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
            json!({
                "operation": "betweenDate",
                "options": [
                    {"name": "startDate", "value": [start_of_day(from)]},
                    {"name": "endDate", "value": [end_of_day(to)]}
                ]
            })
        }
        (Some(from), None) => json!({
            "operation": "greaterThanDate",
            "options": [{"name": "date", "value": [start_of_day(from)]}]
        }),
        (None, Some(to)) => json!({
            "operation": "lessThanDate",
            "options": [{"name": "date", "value": [day_after(to)]}]
        }),
    };

    Ok(Some(json!({ "allBillingItems": { "createDate": create_date } })))
}

/// Parses a `getAllBillingItems` response body.
///
/// # Errors
///
/// Fails if the body is not an array of billing items.
pub fn parse_billing_items(body: Value) -> Result<Vec<BillingItem>, FetchError> {
    if !body.is_array() {
        return Err(CoreError::InvalidData(format!(
            "expected an array of billing items, got {}",
            json_kind(&body)
        ))
        .into());
    }
    Ok(serde_json::from_value(body)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Keeps resources whose type matches the group-by label, preserving order.
pub fn apply_group_by(resources: Vec<BillingResource>, group_by: Option<&str>) -> Vec<BillingResource> {
    match group_by {
        Some(label) => resources
            .into_iter()
            .filter(|r| r.matches_type(label))
            .collect(),
        None => resources,
    }
}

// ============================================================================
// Billing Manager
// ============================================================================

/// Lists billed resources through the SoftLayer REST API.
#[derive(Debug, Clone)]
pub struct BillingManager {
    client: HttpClient,
    credentials: Credentials,
    endpoint: Url,
}

impl BillingManager {
    /// Creates a manager for the default endpoint.
    pub fn new(client: HttpClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            endpoint: default_endpoint(),
        }
    }

    /// Overrides the REST endpoint.
    ///
    /// # Errors
    ///
    /// Fails if the endpoint is not an absolute `http(s)` URL.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, FetchError> {
        self.endpoint = parse_endpoint(endpoint)?;
        Ok(self)
    }

    /// Returns the REST endpoint in use.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the full URL of the billing items call.
    fn billing_items_url(&self) -> Result<Url, FetchError> {
        self.endpoint
            .join(BILLING_ITEMS_PATH)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }
}

fn default_endpoint() -> Url {
    parse_endpoint(DEFAULT_ENDPOINT).unwrap_or_else(|e| panic!("default endpoint is invalid: {e}"))
}

/// Parses an endpoint, normalising it to end with a slash so joins append.
///
/// # Errors
///
/// Fails if the value is not an absolute `http(s)` URL.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, FetchError> {
    let mut normalised = endpoint.trim().to_string();
    if !normalised.ends_with('/') {
        normalised.push('/');
    }

    let url = Url::parse(&normalised).map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(format!(
            "{endpoint}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}

impl BillingQuery for BillingManager {
    type Error = FetchError;

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn list_resources(
        &self,
        filters: &QueryFilters,
    ) -> Result<Vec<BillingResource>, FetchError> {
        let url = self.billing_items_url()?;

        let mut query = vec![("objectMask", BILLING_ITEM_MASK.to_string())];
        if let Some(filter) = build_object_filter(filters)? {
            query.push(("objectFilter", filter.to_string()));
        }

        debug!(url = %url, filtered = query.len() > 1, "Listing billing items");
        let body = self.client.get_json(url.as_str(), &query, &self.credentials).await?;

        let resources: Vec<BillingResource> = parse_billing_items(body)?
            .into_iter()
            .map(BillingItem::into_resource)
            .collect();
        let total = resources.len();
        let resources = apply_group_by(resources, filters.group_by.as_deref());

        info!(
            fetched = total,
            matched = resources.len(),
            group_by = filters.group_by.as_deref().unwrap_or("-"),
            "Billing items listed"
        );
        Ok(resources)
    }
}

// ============================================================================
// Tests
// ============================================================================
