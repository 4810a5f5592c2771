// Models module
pub mod license;
pub mod sku;

pub use license::{LicenseAssignment, LicenseCountRow, LicenseRecord};
pub use sku::SkuNameTable;
