use anyhow::Result;
use serde::Serialize;

use crate::alerts::{format_summary, AlertSystem, ReportPayload};
use crate::commands::context::MonitorContext;
use crate::error::DeliveryFailure;
use crate::models::LicenseCountRow;
use crate::output::failure_lines;
use crate::storage::LicenseStore;

#[derive(Debug, Serialize)]
pub struct ReportOutcome {
    pub counts: Vec<LicenseCountRow>,
    pub synced_at: Option<String>,
    pub payload: ReportPayload,
    /// At least one destination accepted the payload
    pub notified: bool,
    pub delivery_failures: Vec<DeliveryFailure>,
}

/// Summarize the stored counts and send them, breached or not.
pub async fn run_report(
    store: &dyn LicenseStore,
    alert_system: &AlertSystem,
    dry_run: bool,
) -> Result<ReportOutcome> {
    let assigned = store.read_summary()?;
    let counts = alert_system.remaining_counts(&assigned);
    let payload = format_summary(&counts);

    let (notified, delivery_failures) = if dry_run {
        (false, Vec::new())
    } else {
        let delivery = alert_system.notifier().deliver(&payload).await;
        (delivery.data > 0, delivery.failures)
    };

    Ok(ReportOutcome {
        counts,
        synced_at: store.last_synced_at()?,
        payload,
        notified,
        delivery_failures,
    })
}

pub async fn handle_report_command(
    context: &MonitorContext,
    dry_run: bool,
    json_output: bool,
) -> Result<()> {
    let outcome = run_report(&context.store, &context.alert_system, dry_run).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome.synced_at {
        Some(synced_at) => println!("Snapshot from {synced_at}"),
        None => println!("No snapshot stored yet; run `licwatch sync` first."),
    }
    println!("{}", outcome.payload.to_plain_text());

    if !dry_run {
        let destinations = context.alert_system.notifier().destination_count();
        let delivered = destinations.saturating_sub(outcome.delivery_failures.len());
        println!("Summary sent to {delivered} of {destinations} destinations");
    }

    for line in failure_lines(&[], &outcome.delivery_failures) {
        eprintln!("{line}");
    }

    Ok(())
}
