// Output module
pub mod table;

pub use table::{failure_lines, AlertRow, LicenseStatusRow, LicenseStatusTable, OutputFormat};
