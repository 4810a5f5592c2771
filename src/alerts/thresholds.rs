use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::LicenseCountRow;

/// Minimum acceptable remaining count per license type.
///
/// Thresholds are unsigned, so a negative threshold can never be configured.
/// License types without an entry are not monitored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable(BTreeMap<String, u32>);

impl ThresholdTable {
    pub fn new(thresholds: BTreeMap<String, u32>) -> Self {
        Self(thresholds)
    }

    pub fn get(&self, license_type: &str) -> Option<u32> {
        self.0.get(license_type).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check every row against its threshold.
    ///
    /// Alerts keep the order of `rows`. A configured type that has no row is
    /// treated as "no data" and never alerts.
    pub fn evaluate(&self, rows: &[LicenseCountRow]) -> Vec<Alert> {
        let alerts: Vec<Alert> = rows
            .iter()
            .filter_map(|row| {
                let threshold = self.get(&row.license_type)?;
                (row.remaining_count <= i64::from(threshold)).then(|| Alert {
                    license_type: row.license_type.clone(),
                    remaining_count: row.remaining_count,
                    threshold,
                })
            })
            .collect();

        for license_type in self.0.keys() {
            if !rows.iter().any(|row| &row.license_type == license_type) {
                debug!(license_type = %license_type, "No license data for monitored type, skipping");
            }
        }

        alerts
    }
}

/// A license type whose remaining count is at or below its threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub license_type: String,
    pub remaining_count: i64,
    pub threshold: u32,
}

impl Alert {
    pub fn message(&self) -> String {
        format!(
            "{} has only {} licenses left, which is at or below the threshold of {}.",
            self.license_type, self.remaining_count, self.threshold
        )
    }

    pub fn priority(&self) -> AlertPriority {
        if self.remaining_count <= 0 {
            AlertPriority::Critical
        } else {
            AlertPriority::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertPriority {
    High,
    Critical,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::High => "high",
            AlertPriority::Critical => "critical",
        }
    }
}
