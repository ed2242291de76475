//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use slbill_core::{CostTotal, ReportTable};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a single report row, keyed by column header.
///
/// Blank cells are kept as empty strings so every row has every key.
#[derive(Debug, Serialize)]
pub struct RowOutput<'a> {
    #[serde(rename = "Order ID")]
    pub order_id: &'a str,
    #[serde(rename = "Resource Name")]
    pub resource_name: &'a str,
    #[serde(rename = "Resource Type")]
    pub resource_type: &'a str,
    pub cost: &'a str,
    pub create_date: &'a str,
}

impl<'a> From<&'a [String; 5]> for RowOutput<'a> {
    fn from(row: &'a [String; 5]) -> Self {
        let [order_id, resource_name, resource_type, cost, create_date] = row;
        Self {
            order_id,
            resource_name,
            resource_type,
            cost,
            create_date,
        }
    }
}

/// JSON output for an accumulated cost.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalOutput {
    pub resources: usize,
    pub priced: usize,
    pub total_cost: String,
}

impl From<&CostTotal> for TotalOutput {
    fn from(total: &CostTotal) -> Self {
        Self {
            resources: total.resources,
            priced: total.priced,
            total_cost: format!("{:.2}", total.total),
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a report table as an array of row objects.
    pub fn format_table(&self, table: &ReportTable) -> Result<String> {
        let rows: Vec<RowOutput<'_>> = table.rows().iter().map(RowOutput::from).collect();
        self.format(&rows)
    }

    /// Formats an accumulated cost.
    pub fn format_total(&self, total: &CostTotal) -> Result<String> {
        self.format(&TotalOutput::from(total))
    }
}
