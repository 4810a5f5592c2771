use serde::{Deserialize, Serialize};

/// A single license assignment as reported by the licensing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub user_id: String,
    pub sku_id: String,
    pub product_id: String,
}

/// A normalized (user, license type) row as kept in the snapshot store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseAssignment {
    pub user_email: String,
    pub license_type: String,
}

impl LicenseAssignment {
    pub fn new(user_email: impl Into<String>, license_type: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
            license_type: license_type.into(),
        }
    }
}

/// Count of licenses for one license type.
///
/// Signed on purpose: with a seat capacity applied, an over-assigned type
/// ends up below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseCountRow {
    pub license_type: String,
    pub remaining_count: i64,
}

impl LicenseCountRow {
    pub fn new(license_type: impl Into<String>, remaining_count: i64) -> Self {
        Self {
            license_type: license_type.into(),
            remaining_count,
        }
    }
}
