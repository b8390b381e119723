// src/bin/verify_import.rs
//
// Import Verifier: connect to the Supabase project with the service-role
// credential from the environment and run read-only data-quality checks over
// the imported incidents (sinistres) and disputes (litiges).

use anyhow::Result;
use chrono::Utc;
use importaudit::verify::{
    banner,
    checks::{self, analyze_rows, TableReport},
    client::SupabaseClient,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

static TABLES: &[&str] = &["incidents", "disputes"];

/// Base tables populated by the earlier import passes; only their row counts
/// are reported here.
static BASE_TABLES: &[&str] = &["properties", "tenants", "units", "leases", "documents"];

/// Pull the joined property record along with every row.
const SELECT: &str = "*, properties(name, city)";

const DESCRIPTION_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    let json_output = env::args().any(|arg| arg == "--json");

    // ─── 2) build the client ─────────────────────────────────────────
    // No recovery path here: a run that cannot establish its connection
    // fails immediately and visibly.
    dotenvy::dotenv().ok();
    let client = SupabaseClient::from_env()?;
    info!(endpoint = %client.base_url(), "client ready");

    if !json_output {
        println!("{}", banner("VERIFICATION: INCIDENTS & DISPUTES"));
        println!("\nEndpoint: {}", client.base_url());
        println!("Run at {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    }

    // ─── 3) fetch and check each table ───────────────────────────────
    let mut reports: Vec<TableReport> = Vec::with_capacity(TABLES.len());
    let mut affected: BTreeSet<String> = BTreeSet::new();

    for &table in TABLES {
        let rows = client.fetch_rows(table, SELECT).await?;
        info!(table, rows = rows.len(), "fetched");
        let report = analyze_rows(table, &rows);
        affected.extend(checks::property_names(&rows));
        if !json_output {
            print_table_section(&report, &rows);
        }
        reports.push(report);
    }

    // ─── 4) summary ──────────────────────────────────────────────────
    if json_output {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("\n{}", banner("SUMMARY"));
    println!("\nImported rows:");
    for report in &reports {
        println!("   - {}: {}", report.table, report.total);
    }
    println!("\nBase tables:");
    for &table in BASE_TABLES {
        println!("   - {}: {}", table, client.count_rows(table).await?);
    }
    println!("\nAffected properties:");
    for property in &affected {
        println!("   - {property}");
    }
    if reports.iter().all(TableReport::is_clean) {
        println!("\nData integrity verified, no issues found");
    } else {
        println!("\nData integrity checks reported issues, see above");
    }
    Ok(())
}

fn print_table_section(report: &TableReport, rows: &[Value]) {
    println!("\n{}", banner(&report.table.to_uppercase()));
    println!("\nTotal {}: {}", report.table, report.total);

    println!("\n{} by property:", report.table);
    for (property, count) in &report.by_property {
        println!("\n  {property}: {count} row(s)");
        for row in rows
            .iter()
            .filter(|r| checks::property_name(r).unwrap_or(checks::NO_PROPERTY) == property)
        {
            println!(
                "    - [{:12}] {} - {}",
                checks::status_of(row),
                checks::date_of(row),
                checks::short_description(row, DESCRIPTION_WIDTH)
            );
        }
    }

    println!("\nData quality checks:");
    print_check(report.missing_property, report, "without property_id", "have property_id");
    print_check(report.missing_date, report, "without date", "have dates");
    print_check(
        report.missing_description,
        report,
        "without description",
        "have descriptions",
    );

    println!("\nStatus distribution:");
    for (status, count) in &report.status_counts {
        println!("  - {:15}: {}", status, count);
    }
}

fn print_check(missing: usize, report: &TableReport, bad: &str, good: &str) {
    if missing > 0 {
        println!("  WARN {} {} row(s) {}", missing, report.table, bad);
    } else {
        println!("  OK   all {} {}", report.table, good);
    }
}
