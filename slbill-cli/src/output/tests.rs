//! CLI output formatting tests.
//!
//! These tests verify that reports render correctly in both text and JSON
//! output modes.

use slbill_core::{Amount, BillingResource, CostTotal, ReportTable};

fn resource(id: u64, name: &str, kind: &str, cost: Option<Amount>, date: &str) -> BillingResource {
    let mut r = BillingResource::new(id);
    r.host_name = Some(name.to_string());
    r.resource_type = Some(kind.to_string());
    r.cost = cost;
    r.create_date = Some(date.to_string());
    r
}

fn sample_table() -> ReportTable {
    ReportTable::from_resources(&[
        resource(123, "iscsi01", "iSCSI SAN Storage", Some(Amount::from(45.5)), "2014-03-15"),
        resource(7, "db01", "Server", None, "2014-02-01"),
    ])
}

mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use super::*;

    #[test]
    fn test_header_line() {
        let output = TextFormatter::new(false).format_table(&ReportTable::new());
        let first = output.lines().next().unwrap();
        assert_eq!(
            first,
            "Order ID  Resource Name  Resource Type  cost  create_date"
        );
    }

    #[test]
    fn test_empty_table_has_no_data_rows() {
        let output = TextFormatter::new(false).format_table(&ReportTable::new());
        assert_eq!(output.lines().count(), 2);
        assert!(output.lines().nth(1).unwrap().starts_with('─'));
    }

    #[test]
    fn test_rows_rendered_in_order() {
        let output = TextFormatter::new(false).format_table(&sample_table());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("123"));
        assert!(lines[2].contains("iscsi01"));
        assert!(lines[2].contains("iSCSI SAN Storage"));
        assert!(lines[2].contains("45.50"));
        assert!(lines[2].ends_with("2014-03-15"));
        assert!(lines[3].starts_with("7 "));
    }

    #[test]
    fn test_columns_aligned() {
        let output = TextFormatter::new(false).format_table(&sample_table());
        let lines: Vec<&str> = output.lines().collect();

        let header_col = lines[0].find("Resource Type").unwrap();
        assert_eq!(lines[2].find("iSCSI SAN Storage"), Some(header_col));
        assert_eq!(lines[3].find("Server"), Some(header_col));
    }

    #[test]
    fn test_header_bold_with_colors() {
        let output = TextFormatter::new(true).format_table(&ReportTable::new());
        assert!(output.starts_with("\x1b[1m"));
    }

    #[test]
    fn test_total_text() {
        let total = CostTotal {
            resources: 3,
            priced: 2,
            total: 15.0,
        };
        let output = TextFormatter::new(false).format_total(&total);

        assert!(output.contains("Resources:  3"));
        assert!(output.contains("Total cost: 15.00"));
        assert!(output.contains("(1 without a cost)"));
    }

    #[test]
    fn test_total_text_all_priced() {
        let total = CostTotal {
            resources: 1,
            priced: 1,
            total: 2.5,
        };
        let output = TextFormatter::new(false).format_total(&total);
        assert!(!output.contains("without a cost"));
    }
}

mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use super::*;

    #[test]
    fn test_rows_keyed_by_header() {
        let output = JsonFormatter::new(false).format_table(&sample_table()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Order ID"], "123");
        assert_eq!(rows[0]["Resource Name"], "iscsi01");
        assert_eq!(rows[0]["Resource Type"], "iSCSI SAN Storage");
        assert_eq!(rows[0]["cost"], "45.50");
        assert_eq!(rows[0]["create_date"], "2014-03-15");
        assert_eq!(rows[1]["cost"], "");
    }

    #[test]
    fn test_key_order_follows_header() {
        let output = JsonFormatter::new(false).format_table(&sample_table()).unwrap();
        let first_row = &output[..output.find('}').unwrap()];

        let positions: Vec<usize> = ReportTable::header()
            .iter()
            .map(|h| first_row.find(&format!("\"{h}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_table_is_empty_array() {
        let output = JsonFormatter::new(false).format_table(&ReportTable::new()).unwrap();
        assert_eq!(output, "[]");
    }

    #[test]
    fn test_pretty_output() {
        let output = JsonFormatter::new(true).format_table(&sample_table()).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_total_json() {
        let total = CostTotal {
            resources: 3,
            priced: 2,
            total: 15.0,
        };
        let output = JsonFormatter::new(false).format_total(&total).unwrap();
        assert_eq!(output, r#"{"resources":3,"priced":2,"totalCost":"15.00"}"#);
    }
}
