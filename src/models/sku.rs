use std::collections::{BTreeMap, HashMap};

use crate::models::license::{LicenseAssignment, LicenseRecord};

/// Google Workspace SKU identifiers and their display names.
const BUILTIN_SKUS: &[(&str, &str)] = &[
    ("1010470001", "Gemini"),
    ("1010470003", "Gemini Business"),
    ("1010470004", "Gemini Education"),
    ("1010020020", "Google Workspace Enterprise Plus"),
    ("1010020025", "Google Workspace Business Plus"),
    ("1010020026", "Google Workspace Enterprise Standard"),
    ("1010020027", "Google Workspace Business Starter"),
    ("1010020028", "Google Workspace Business Standard"),
    ("1010020029", "Google Workspace Enterprise Starter"),
    ("1010020030", "Google Workspace Frontline Starter"),
    ("1010060001", "Google Workspace Essentials"),
    ("1010060003", "Google Workspace Enterprise Essentials"),
    ("1010060005", "Google Workspace Essentials Starter"),
    ("Google-Vault", "Google Vault"),
    ("Google-Vault-Former-Employee", "Google Vault - Former Employee"),
    ("1010330003", "Google Voice Starter"),
    ("1010330004", "Google Voice Standard"),
    ("1010330002", "Google Voice Premier"),
    ("1010010001", "Cloud Identity Free"),
    ("1010050001", "Cloud Identity Premium"),
    ("1010380001", "AppSheet Core"),
    ("1010380002", "AppSheet Enterprise Standard"),
    ("1010380003", "AppSheet Enterprise Plus"),
    ("Google-Chrome-Device-Management", "Chrome Enterprise"),
];

/// Immutable lookup from SKU identifier to human-readable license type name.
#[derive(Debug, Clone, Default)]
pub struct SkuNameTable {
    names: HashMap<String, String>,
}

impl SkuNameTable {
    /// Built-in catalog only.
    pub fn builtin() -> Self {
        let names = BUILTIN_SKUS
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        Self { names }
    }

    /// Built-in catalog with configured entries layered on top.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut table = Self::builtin();
        for (id, name) in overrides {
            table.names.insert(id.clone(), name.clone());
        }
        table
    }

    /// Display name for `sku_id`, or the identifier itself when unknown.
    pub fn normalize<'a>(&'a self, sku_id: &'a str) -> &'a str {
        self.names.get(sku_id).map(String::as_str).unwrap_or(sku_id)
    }

    pub fn normalize_record(&self, record: &LicenseRecord) -> LicenseAssignment {
        LicenseAssignment::new(record.user_id.clone(), self.normalize(&record.sku_id))
    }
}
