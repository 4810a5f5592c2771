use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::aggregate;
use crate::commands::context::MonitorContext;
use crate::error::FetchFailure;
use crate::models::{LicenseAssignment, LicenseCountRow, SkuNameTable};
use crate::output::{failure_lines, LicenseStatusTable, OutputFormat};
use crate::source::{collect_licenses, LicenseSource};
use crate::storage::LicenseStore;

#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    pub assignments: usize,
    pub counts: Vec<LicenseCountRow>,
    pub fetch_failures: Vec<FetchFailure>,
}

/// Fetch, normalize, replace the stored snapshot, then count what the store holds.
pub async fn sync_snapshot(
    source: &dyn LicenseSource,
    product_ids: &[String],
    customer_id: &str,
    skus: &SkuNameTable,
    store: &mut dyn LicenseStore,
) -> Result<SyncOutcome> {
    let fetched = collect_licenses(source, product_ids, customer_id).await;
    if !fetched.is_complete() {
        warn!(failed_products = fetched.failures.len(), "Snapshot is missing data for some products");
    }

    let normalized: Vec<LicenseAssignment> = fetched
        .data
        .iter()
        .map(|record| skus.normalize_record(record))
        .collect();
    store.write_all(&normalized)?;

    let snapshot = store.read_all()?;
    let counts = aggregate(&snapshot);
    store.write_summary(&counts)?;

    info!(assignments = snapshot.len(), license_types = counts.len(), "License snapshot updated");

    Ok(SyncOutcome {
        assignments: snapshot.len(),
        counts,
        fetch_failures: fetched.failures,
    })
}

pub async fn handle_sync_command(context: &mut MonitorContext, json_output: bool) -> Result<()> {
    let source = context.license_source()?;
    let outcome = sync_snapshot(
        &source,
        &context.config.general.product_ids,
        &context.config.general.customer_id,
        &context.skus,
        &mut context.store,
    )
    .await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let remaining = context.alert_system.remaining_counts(&outcome.counts);
    let table = LicenseStatusTable {
        rows: &remaining,
        thresholds: context.alert_system.thresholds(),
    };
    println!("Synced {} license assignments", outcome.assignments);
    println!("{}", table.to_table());
    for line in failure_lines(&outcome.fetch_failures, &[]) {
        eprintln!("{line}");
    }

    Ok(())
}
