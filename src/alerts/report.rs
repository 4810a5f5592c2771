//! Rendering of alerts and license counts into notification payloads.
//!
//! Payloads follow a header / divider / body layout. The formatters here are
//! pure; delivery lives in [`crate::alerts::notifications`].

use serde::Serialize;
use serde_json::{json, Value};

use crate::alerts::thresholds::Alert;
use crate::models::LicenseCountRow;

pub const ALERT_HEADER: &str = "License Threshold Alert";
pub const SUMMARY_HEADER: &str = "License Summary Report";

/// A formatted message ready for a notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPayload {
    pub header: String,
    pub body: String,
}

impl ReportPayload {
    pub fn new(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines()
    }

    /// Slack Block Kit message: header block, divider, one markdown section.
    ///
    /// Slack rejects section blocks with empty text, so an empty body is
    /// sent as header and divider only.
    pub fn to_slack_blocks(&self) -> Value {
        let mut blocks = vec![
            json!({
                "type": "header",
                "text": { "type": "plain_text", "text": self.header, "emoji": true }
            }),
            json!({ "type": "divider" }),
        ];
        if !self.body.is_empty() {
            blocks.push(json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": self.body }
            }));
        }

        json!({ "text": self.header, "blocks": blocks })
    }

    /// Plain-text rendering for terminals and dry runs.
    pub fn to_plain_text(&self) -> String {
        let divider = "-".repeat(self.header.chars().count());
        if self.body.is_empty() {
            format!("{}\n{}", self.header, divider)
        } else {
            format!("{}\n{}\n{}", self.header, divider, self.body)
        }
    }
}

/// Build an alert payload, or `None` when there is nothing to report.
pub fn format_alerts(alerts: &[Alert]) -> Option<ReportPayload> {
    if alerts.is_empty() {
        return None;
    }

    let body = alerts
        .iter()
        .map(Alert::message)
        .collect::<Vec<_>>()
        .join("\n");
    Some(ReportPayload::new(ALERT_HEADER, body))
}

/// Build a summary payload listing every license type and its count.
pub fn format_summary(rows: &[LicenseCountRow]) -> ReportPayload {
    let body = rows
        .iter()
        .map(|row| format!("{}: {}", row.license_type, row.remaining_count))
        .collect::<Vec<_>>()
        .join("\n");
    ReportPayload::new(SUMMARY_HEADER, body)
}
