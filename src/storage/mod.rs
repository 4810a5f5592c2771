// Snapshot storage module
pub mod memory;
pub mod migrations;
pub mod sqlite;

use anyhow::Result;

use crate::models::{LicenseAssignment, LicenseCountRow};

pub use memory::MemoryStore;
pub use sqlite::Database;

/// Tabular snapshot of license assignments plus the per-type summary.
///
/// Writes always replace the whole table. Runs are assumed not to overlap;
/// nothing here locks against a concurrent writer.
pub trait LicenseStore {
    fn read_all(&self) -> Result<Vec<LicenseAssignment>>;
    fn write_all(&mut self, rows: &[LicenseAssignment]) -> Result<()>;
    fn read_summary(&self) -> Result<Vec<LicenseCountRow>>;
    fn write_summary(&mut self, rows: &[LicenseCountRow]) -> Result<()>;

    fn last_synced_at(&self) -> Result<Option<String>> {
        Ok(None)
    }
}
