use anyhow::Result;

use crate::models::{LicenseAssignment, LicenseCountRow};
use crate::storage::LicenseStore;

/// Store kept entirely in memory; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    assignments: Vec<LicenseAssignment>,
    summary: Vec<LicenseCountRow>,
    synced_at: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LicenseStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<LicenseAssignment>> {
        Ok(self.assignments.clone())
    }

    fn write_all(&mut self, rows: &[LicenseAssignment]) -> Result<()> {
        self.assignments = rows.to_vec();
        Ok(())
    }

    fn read_summary(&self) -> Result<Vec<LicenseCountRow>> {
        Ok(self.summary.clone())
    }

    fn write_summary(&mut self, rows: &[LicenseCountRow]) -> Result<()> {
        self.summary = rows.to_vec();
        self.synced_at = Some(chrono::Utc::now().to_rfc3339());
        Ok(())
    }

    fn last_synced_at(&self) -> Result<Option<String>> {
        Ok(self.synced_at.clone())
    }
}
