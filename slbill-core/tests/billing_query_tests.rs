//! Integration tests for the `BillingQuery` seam.

use std::sync::Mutex;

use slbill_core::{BillingQuery, BillingResource, CoreError, QueryFilters, ReportTable};

/// Query that records the filters it was called with.
struct RecordingQuery {
    resources: Vec<BillingResource>,
    calls: Mutex<Vec<QueryFilters>>,
}

impl BillingQuery for RecordingQuery {
    type Error = CoreError;

    async fn list_resources(
        &self,
        filters: &QueryFilters,
    ) -> Result<Vec<BillingResource>, Self::Error> {
        self.calls.lock().unwrap().push(filters.clone());
        Ok(self.resources.clone())
    }
}

#[tokio::test]
async fn test_query_receives_filters_and_table_keeps_order() {
    let query = RecordingQuery {
        resources: vec![BillingResource::new(2), BillingResource::new(1)],
        calls: Mutex::new(Vec::new()),
    };
    let filters = QueryFilters::new().with_from_date(Some("2014-03-01"));

    let resources = query.list_resources(&filters).await.unwrap();
    let table = ReportTable::from_resources(&resources);

    assert_eq!(query.calls.lock().unwrap().as_slice(), &[filters]);
    assert_eq!(table.rows()[0][0], "2");
    assert_eq!(table.rows()[1][0], "1");
}
