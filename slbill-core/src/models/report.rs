//! Report types.
//!
//! - [`ReportTable`] - One row per billed resource, fixed columns
//! - [`CostTotal`] - Accumulated cost of a set of resources

use serde::{Deserialize, Serialize};

use super::resource::{Amount, BillingResource, ResourceField};

// ============================================================================
// Report Table
// ============================================================================

/// A cost report with a fixed five-column header.
///
/// Rows keep the order in which resources were added; the table never
/// sorts them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    rows: Vec<[String; 5]>,
}

impl ReportTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table with one row per resource.
    pub fn from_resources<'a>(resources: impl IntoIterator<Item = &'a BillingResource>) -> Self {
        let mut table = Self::new();
        for resource in resources {
            table.add_resource(resource);
        }
        table
    }

    /// Returns the column headers.
    pub fn header() -> [&'static str; 5] {
        ResourceField::ALL.map(|f| f.label())
    }

    /// Appends a row for a resource. Missing fields become blank cells.
    pub fn add_resource(&mut self, resource: &BillingResource) {
        self.rows.push(resource.row());
    }

    /// Returns the data rows.
    pub fn rows(&self) -> &[[String; 5]] {
        &self.rows
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the display width of each column, header included.
    pub fn column_widths(&self) -> [usize; 5] {
        let mut widths = Self::header().map(|h| h.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}

// ============================================================================
// Cost Total
// ============================================================================

/// Accumulated cost across a set of resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTotal {
    /// Number of resources considered.
    pub resources: usize,
    /// Number of resources with a numeric cost.
    pub priced: usize,
    /// Sum of all numeric costs.
    pub total: f64,
}

impl CostTotal {
    /// Sums the costs of the given resources.
    ///
    /// Resources without a readable cost are counted but add nothing.
    pub fn from_resources<'a>(resources: impl IntoIterator<Item = &'a BillingResource>) -> Self {
        let mut total = Self::default();
        for resource in resources {
            total.resources += 1;
            if let Some(value) = resource.cost.as_ref().and_then(Amount::value) {
                total.priced += 1;
                total.total += value;
            }
        }
        total
    }

    /// Returns the number of resources that had no usable cost.
    pub fn unpriced(&self) -> usize {
        self.resources - self.priced
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: u64, cost: Option<&str>) -> BillingResource {
        let mut r = BillingResource::new(id);
        r.host_name = Some(format!("host{id}"));
        r.cost = cost.map(Amount::from);
        r
    }

    #[test]
    fn test_header() {
        assert_eq!(
            ReportTable::header(),
            ["Order ID", "Resource Name", "Resource Type", "cost", "create_date"]
        );
    }

    #[test]
    fn test_rows_follow_input_order() {
        let resources = vec![resource(3, None), resource(1, None), resource(2, None)];
        let table = ReportTable::from_resources(&resources);

        let ids: Vec<&str> = table.rows().iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_empty_table() {
        let table = ReportTable::from_resources(&Vec::<BillingResource>::new());
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_column_widths() {
        let mut r = resource(123_456_789, Some("1.00"));
        r.resource_type = Some("Some Very Long Resource Type".to_string());
        let table = ReportTable::from_resources([&r]);

        let widths = table.column_widths();
        assert_eq!(widths[0], "Order ID".len().max(9));
        assert_eq!(widths[2], "Some Very Long Resource Type".len());
        assert_eq!(widths[4], "create_date".len());
    }

    #[test]
    fn test_cost_total() {
        let resources = vec![
            resource(1, Some("10.25")),
            resource(2, None),
            resource(3, Some("4.75")),
            resource(4, Some("free")),
        ];
        let total = CostTotal::from_resources(&resources);

        assert_eq!(total.resources, 4);
        assert_eq!(total.priced, 2);
        assert_eq!(total.unpriced(), 2);
        assert!((total.total - 15.0).abs() < f64::EPSILON);
    }
}
