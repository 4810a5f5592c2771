// Command handlers module
pub mod check;
pub mod config;
pub mod context;
pub mod report;
pub mod sync;

pub use check::{handle_check_command, run_check, CheckOutcome};
pub use config::handle_config_action;
pub use context::MonitorContext;
pub use report::{handle_report_command, run_report, ReportOutcome};
pub use sync::{handle_sync_command, sync_snapshot, SyncOutcome};

/// Print a command failure in the requested output format
pub fn handle_error(error: &anyhow::Error, json_output: bool) {
    if json_output {
        println!(
            "{}",
            serde_json::json!({ "status": "error", "message": format!("{error:#}") })
        );
    } else {
        eprintln!("Error: {error:#}");
    }
}
