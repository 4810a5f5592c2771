use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{LicenseAssignment, LicenseCountRow};

/// Purchased seat totals per license type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatCapacity(BTreeMap<String, u32>);

impl SeatCapacity {
    pub fn new(seats: BTreeMap<String, u32>) -> Self {
        Self(seats)
    }

    pub fn get(&self, license_type: &str) -> Option<u32> {
        self.0.get(license_type).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Count assignments per license type.
///
/// Rows come back sorted by license type, so any permutation of the input
/// yields the same output.
pub fn aggregate(assignments: &[LicenseAssignment]) -> Vec<LicenseCountRow> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for assignment in assignments {
        *counts.entry(assignment.license_type.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(license_type, count)| LicenseCountRow::new(license_type, count))
        .collect()
}

/// Turn assigned counts into remaining counts for types with a known capacity.
/// Types without a capacity keep their count unchanged.
pub fn apply_capacity(rows: &[LicenseCountRow], capacity: &SeatCapacity) -> Vec<LicenseCountRow> {
    rows.iter()
        .map(|row| match capacity.get(&row.license_type) {
            Some(seats) => {
                LicenseCountRow::new(row.license_type.clone(), i64::from(seats) - row.remaining_count)
            }
            None => row.clone(),
        })
        .collect()
}
