//! Billing command - cost incurred due to created resources.

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use slbill_core::{BillingQuery, CostTotal, QueryFilters, ReportTable};
use slbill_fetch::{BillingManager, Credentials, HttpClient, RetryStrategy, SystemKeychain};
use slbill_store::SettingsStore;
use tracing::{debug, info};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the billing command.
#[derive(Args)]
pub struct BillingArgs {
    #[command(subcommand)]
    pub action: BillingAction,
}

/// Billing subcommands.
#[derive(Subcommand)]
pub enum BillingAction {
    /// List all ordered resources and their cost up to this time.
    List(ListArgs),

    /// Show the accumulated cost of all matching resources.
    Total(ListArgs),
}

/// Filter flags shared by the billing subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Cost incurred from this date (YYYY-MM-DD).
    #[arg(long, short = 'f', value_name = "DATE")]
    pub from_date: Option<String>,

    /// End date up to which cost is considered (YYYY-MM-DD). Defaults to now.
    #[arg(long, short = 't', value_name = "DATE")]
    pub to_date: Option<String>,

    /// Only include one resource type, e.g. "iSCSI SAN Storage".
    #[arg(long, short = 'g', value_name = "RESOURCE_TYPE")]
    pub group_by: Option<String>,
}

impl From<&ListArgs> for QueryFilters {
    fn from(args: &ListArgs) -> Self {
        QueryFilters::new()
            .with_from_date(args.from_date.as_deref())
            .with_to_date(args.to_date.as_deref())
            .with_group_by(args.group_by.as_deref())
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Lists billed resources as a report table.
#[derive(Debug, Clone, Default)]
pub struct BillingListCommand {
    filters: QueryFilters,
}

impl BillingListCommand {
    /// Creates the command from parsed flags.
    pub fn new(args: &ListArgs) -> Self {
        Self {
            filters: args.into(),
        }
    }

    /// The filters passed to the billing query.
    pub fn filters(&self) -> &QueryFilters {
        &self.filters
    }

    /// Queries once and builds one row per returned resource.
    ///
    /// Query failures are returned as-is.
    pub async fn execute<Q: BillingQuery>(&self, billing: &Q) -> Result<ReportTable, Q::Error> {
        let resources = billing.list_resources(&self.filters).await?;
        debug!(count = resources.len(), "Building report table");
        Ok(ReportTable::from_resources(&resources))
    }
}

/// Sums the cost of billed resources.
#[derive(Debug, Clone, Default)]
pub struct BillingTotalCommand {
    filters: QueryFilters,
}

impl BillingTotalCommand {
    /// Creates the command from parsed flags.
    pub fn new(args: &ListArgs) -> Self {
        Self {
            filters: args.into(),
        }
    }

    /// Queries once and adds up the numeric costs.
    pub async fn execute<Q: BillingQuery>(&self, billing: &Q) -> Result<CostTotal, Q::Error> {
        let resources = billing.list_resources(&self.filters).await?;
        Ok(CostTotal::from_resources(&resources))
    }
}

// ============================================================================
// Entry Point
// ============================================================================

/// Runs the billing command.
pub async fn run(args: &BillingArgs, cli: &Cli) -> Result<()> {
    let manager = connect().await?;

    match &args.action {
        BillingAction::List(list) => {
            let command = BillingListCommand::new(list);
            info!(filters = ?command.filters(), "Listing billed resources");
            let table = command.execute(&manager).await?;
            print_table(&table, cli)
        }
        BillingAction::Total(list) => {
            let command = BillingTotalCommand::new(list);
            let total = command.execute(&manager).await?;
            print_total(&total, cli)
        }
    }
}

/// Builds a billing manager from settings, environment and keychain.
async fn connect() -> Result<BillingManager> {
    let store = SettingsStore::load_default().await;
    let settings = store.get().await.with_process_env();
    settings.validate()?;

    let credentials =
        Credentials::from_env_or_keychain(settings.username.as_deref(), &SystemKeychain::new())
            .await?;

    let client = HttpClient::with_timeout(Duration::from_secs(settings.timeout_secs))?
        .with_retry_strategy(RetryStrategy::new(settings.max_attempts));

    let mut manager = BillingManager::new(client, credentials);
    if let Some(endpoint) = settings.endpoint_url.as_deref() {
        manager = manager.with_endpoint(endpoint)?;
    }
    debug!(endpoint = %manager.endpoint(), "Billing manager ready");

    Ok(manager)
}

fn print_table(table: &ReportTable, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_table(table));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_table(table)?);
        }
    }
    Ok(())
}

fn print_total(total: &CostTotal, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_total(total));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_total(total)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use slbill_core::{Amount, BillingResource};
    use slbill_fetch::FetchError;
    use std::sync::Mutex;

    use crate::Commands;

    /// Billing query that records the filters it receives.
    #[derive(Default)]
    struct RecordingBilling {
        resources: Vec<BillingResource>,
        failure: Mutex<Option<FetchError>>,
        calls: Mutex<Vec<QueryFilters>>,
    }

    impl RecordingBilling {
        fn returning(resources: Vec<BillingResource>) -> Self {
            Self {
                resources,
                ..Self::default()
            }
        }

        fn failing(error: FetchError) -> Self {
            Self {
                failure: Mutex::new(Some(error)),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<QueryFilters> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl BillingQuery for RecordingBilling {
        type Error = FetchError;

        async fn list_resources(
            &self,
            filters: &QueryFilters,
        ) -> Result<Vec<BillingResource>, FetchError> {
            self.calls.lock().unwrap().push(filters.clone());
            match self.failure.lock().unwrap().take() {
                Some(error) => Err(error),
                None => Ok(self.resources.clone()),
            }
        }
    }

    fn parse_list(args: &[&str]) -> ListArgs {
        let argv = ["sl", "billing", "list"].iter().chain(args.iter()).copied();
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Billing(BillingArgs {
                action: BillingAction::List(list),
            }) => list,
            _ => panic!("expected billing list"),
        }
    }

    fn resource(id: u64, name: &str, kind: &str, cost: Option<Amount>, date: &str) -> BillingResource {
        let mut r = BillingResource::new(id);
        r.host_name = Some(name.to_string());
        r.resource_type = Some(kind.to_string());
        r.cost = cost;
        r.create_date = Some(date.to_string());
        r
    }

    #[tokio::test]
    async fn test_no_flags_queries_unconstrained() {
        let billing = RecordingBilling::default();
        let command = BillingListCommand::new(&parse_list(&[]));

        command.execute(&billing).await.unwrap();

        assert_eq!(billing.calls(), vec![QueryFilters::default()]);
    }

    #[tokio::test]
    async fn test_flags_pass_through() {
        let billing = RecordingBilling::default();
        let args = parse_list(&[
            "--from-date",
            "2014-03-01",
            "-t",
            "2014-04-01",
            "-g",
            "iSCSI SAN Storage",
        ]);

        BillingListCommand::new(&args).execute(&billing).await.unwrap();

        let calls = billing.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].from_date.as_deref(), Some("2014-03-01"));
        assert_eq!(calls[0].to_date.as_deref(), Some("2014-04-01"));
        assert_eq!(calls[0].group_by.as_deref(), Some("iSCSI SAN Storage"));
    }

    #[tokio::test]
    async fn test_rows_in_query_order() {
        let billing = RecordingBilling::returning(vec![
            resource(3, "web03", "Server", Some(Amount::from(10.0)), "2014-01-03"),
            resource(1, "web01", "Server", Some(Amount::from(20.0)), "2014-01-01"),
            resource(2, "web02", "Server", Some(Amount::from(30.0)), "2014-01-02"),
        ]);

        let table = BillingListCommand::default().execute(&billing).await.unwrap();

        assert_eq!(table.len(), 3);
        let ids: Vec<&str> = table.rows().iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[tokio::test]
    async fn test_missing_cost_is_blank() {
        let billing = RecordingBilling::returning(vec![resource(
            7,
            "db01",
            "Server",
            None,
            "2014-02-01",
        )]);

        let table = BillingListCommand::default().execute(&billing).await.unwrap();

        assert_eq!(table.rows()[0][3], "");
        assert_eq!(table.rows()[0][1], "db01");
    }

    #[tokio::test]
    async fn test_iscsi_march_2014() {
        let billing = RecordingBilling::returning(vec![resource(
            123,
            "iscsi01",
            "iSCSI SAN Storage",
            Some(Amount::from(45.5)),
            "2014-03-15",
        )]);
        let args = parse_list(&[
            "--from-date",
            "2014-03-01",
            "--to-date",
            "2014-04-01",
            "--group-by",
            "iscsi SAN storage",
        ]);

        let table = BillingListCommand::new(&args).execute(&billing).await.unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.rows()[0],
            ["123", "iscsi01", "iSCSI SAN Storage", "45.50", "2014-03-15"].map(String::from)
        );
    }

    #[tokio::test]
    async fn test_empty_result_is_header_only() {
        let billing = RecordingBilling::default();

        let table = BillingListCommand::default().execute(&billing).await.unwrap();

        assert!(table.is_empty());
        assert_eq!(
            ReportTable::header(),
            ["Order ID", "Resource Name", "Resource Type", "cost", "create_date"]
        );
    }

    #[tokio::test]
    async fn test_query_error_propagates_unchanged() {
        let billing = RecordingBilling::failing(FetchError::InvalidDateRange {
            from: "2014-04-01".to_string(),
            to: "2014-03-01".to_string(),
        });

        let err = BillingListCommand::default().execute(&billing).await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::InvalidDateRange { ref from, ref to } if from == "2014-04-01" && to == "2014-03-01"
        ));
        assert_eq!(billing.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_total_sums_numeric_costs() {
        let billing = RecordingBilling::returning(vec![
            resource(1, "a", "Server", Some(Amount::from(10.25)), "2014-01-01"),
            resource(2, "b", "Server", Some(Amount::from("n/a")), "2014-01-02"),
            resource(3, "c", "Server", Some(Amount::from(4.75)), "2014-01-03"),
        ]);

        let total = BillingTotalCommand::default().execute(&billing).await.unwrap();

        assert_eq!(total.resources, 3);
        assert_eq!(total.priced, 2);
        assert!((total.total - 15.0).abs() < f64::EPSILON);
    }
}
