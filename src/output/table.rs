use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::alerts::{Alert, ThresholdTable};
use crate::error::{DeliveryFailure, FetchFailure};
use crate::models::LicenseCountRow;

/// Trait for items that can be displayed as terminal tables
pub trait OutputFormat {
    fn to_table(&self) -> String;
}

/// Row for the per-license-type status table
#[derive(Tabled, Debug, PartialEq)]
pub struct LicenseStatusRow {
    #[tabled(rename = "License Type")]
    pub license_type: String,
    #[tabled(rename = "Count")]
    pub count: i64,
    #[tabled(rename = "Threshold")]
    pub threshold: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl LicenseStatusRow {
    pub fn from_count(row: &LicenseCountRow, thresholds: &ThresholdTable) -> Self {
        let (threshold, status) = match thresholds.get(&row.license_type) {
            Some(limit) if row.remaining_count <= i64::from(limit) => (limit.to_string(), "ALERT"),
            Some(limit) => (limit.to_string(), "ok"),
            None => ("-".to_string(), "unmonitored"),
        };
        Self {
            license_type: row.license_type.clone(),
            count: row.remaining_count,
            threshold,
            status: status.to_string(),
        }
    }
}

/// Counts paired with the thresholds they are judged against
#[derive(Debug)]
pub struct LicenseStatusTable<'a> {
    pub rows: &'a [LicenseCountRow],
    pub thresholds: &'a ThresholdTable,
}

impl OutputFormat for LicenseStatusTable<'_> {
    fn to_table(&self) -> String {
        if self.rows.is_empty() {
            return "No license data found.".to_string();
        }

        let rows: Vec<LicenseStatusRow> = self
            .rows
            .iter()
            .map(|row| LicenseStatusRow::from_count(row, self.thresholds))
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        table.to_string()
    }
}

#[derive(Tabled, Debug)]
pub struct AlertRow {
    #[tabled(rename = "License Type")]
    pub license_type: String,
    #[tabled(rename = "Remaining")]
    pub remaining: i64,
    #[tabled(rename = "Threshold")]
    pub threshold: u32,
    #[tabled(rename = "Priority")]
    pub priority: String,
}

impl OutputFormat for Vec<Alert> {
    fn to_table(&self) -> String {
        if self.is_empty() {
            return "No license types at or below threshold.".to_string();
        }

        let rows: Vec<AlertRow> = self
            .iter()
            .map(|alert| AlertRow {
                license_type: alert.license_type.clone(),
                remaining: alert.remaining_count,
                threshold: alert.threshold,
                priority: alert.priority().as_str().to_string(),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        table.to_string()
    }
}

/// Human-readable lines for partial failures, printed after the main table
pub fn failure_lines(fetch: &[FetchFailure], delivery: &[DeliveryFailure]) -> Vec<String> {
    let mut lines = Vec::new();
    for failure in fetch {
        lines.push(format!(
            "Warning: product {} stopped at page {}: {}",
            failure.product_id, failure.page, failure.message
        ));
    }
    for failure in delivery {
        lines.push(format!(
            "Warning: delivery to {} failed: {}",
            failure.destination, failure.message
        ));
    }
    lines
}
