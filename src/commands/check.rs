use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::alerts::{Alert, AlertSystem, ReportPayload};
use crate::analysis::aggregate;
use crate::commands::context::MonitorContext;
use crate::commands::sync::sync_snapshot;
use crate::config::GeneralConfig;
use crate::error::{DeliveryFailure, FetchFailure};
use crate::models::{LicenseCountRow, SkuNameTable};
use crate::output::{failure_lines, LicenseStatusTable, OutputFormat};
use crate::source::LicenseSource;
use crate::storage::LicenseStore;

#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    /// Remaining counts after seat capacity is applied
    pub counts: Vec<LicenseCountRow>,
    pub alerts: Vec<Alert>,
    pub payload: Option<ReportPayload>,
    /// At least one destination accepted the payload
    pub notified: bool,
    pub fetch_failures: Vec<FetchFailure>,
    pub delivery_failures: Vec<DeliveryFailure>,
}

/// Refresh the snapshot (unless `source` is `None`), evaluate thresholds and
/// send an alert when anything is at or below its threshold.
pub async fn run_check(
    source: Option<&dyn LicenseSource>,
    general: &GeneralConfig,
    skus: &SkuNameTable,
    store: &mut dyn LicenseStore,
    alert_system: &AlertSystem,
    dry_run: bool,
) -> Result<CheckOutcome> {
    let (assigned, fetch_failures) = match source {
        Some(source) => {
            let outcome =
                sync_snapshot(source, &general.product_ids, &general.customer_id, skus, store).await?;
            (outcome.counts, outcome.fetch_failures)
        }
        None => {
            info!("Offline check, using stored snapshot");
            (aggregate(&store.read_all()?), Vec::new())
        }
    };

    let alerts = alert_system.check_thresholds(&assigned);
    let dispatch = alert_system.dispatch_alerts(&alerts, dry_run).await;

    let notified = dispatch.delivered() > 0;
    let delivery_failures = dispatch.delivery_failures().to_vec();
    let payload = dispatch.payload().cloned();

    Ok(CheckOutcome {
        counts: alert_system.remaining_counts(&assigned),
        alerts,
        payload,
        notified,
        fetch_failures,
        delivery_failures,
    })
}

pub async fn handle_check_command(
    context: &mut MonitorContext,
    dry_run: bool,
    offline: bool,
    json_output: bool,
) -> Result<()> {
    let source = if offline {
        None
    } else {
        Some(context.license_source()?)
    };

    let outcome = run_check(
        source.as_ref().map(|s| s as &dyn LicenseSource),
        &context.config.general,
        &context.skus,
        &mut context.store,
        &context.alert_system,
        dry_run,
    )
    .await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let table = LicenseStatusTable {
        rows: &outcome.counts,
        thresholds: context.alert_system.thresholds(),
    };
    println!("{}", table.to_table());
    println!();
    println!("{}", outcome.alerts.to_table());

    match (&outcome.payload, dry_run) {
        (Some(payload), true) => {
            println!();
            println!("Dry run, not sent:");
            println!("{}", payload.to_plain_text());
        }
        (Some(_), false) => {
            let destinations = context.alert_system.notifier().destination_count();
            let delivered = destinations.saturating_sub(outcome.delivery_failures.len());
            println!("Alert sent to {delivered} of {destinations} destinations");
        }
        (None, _) => {}
    }

    for line in failure_lines(&outcome.fetch_failures, &outcome.delivery_failures) {
        eprintln!("{line}");
    }

    Ok(())
}
