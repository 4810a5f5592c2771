use tracing::info;

use crate::alerts::notifications::Notifier;
use crate::alerts::report::{format_alerts, ReportPayload};
use crate::alerts::thresholds::{Alert, ThresholdTable};
use crate::analysis::{apply_capacity, SeatCapacity};
use crate::error::{DeliveryFailure, PartialResult};
use crate::models::LicenseCountRow;

/// What happened to a notification attempt.
#[derive(Debug)]
pub enum Dispatch {
    /// Nothing breached, so nothing was sent.
    NothingToSend,
    /// The payload was rendered but not sent.
    DryRun(ReportPayload),
    Sent {
        payload: ReportPayload,
        delivery: PartialResult<usize, DeliveryFailure>,
    },
}

impl Dispatch {
    pub fn payload(&self) -> Option<&ReportPayload> {
        match self {
            Dispatch::NothingToSend => None,
            Dispatch::DryRun(payload) | Dispatch::Sent { payload, .. } => Some(payload),
        }
    }

    /// Number of destinations that accepted the payload.
    pub fn delivered(&self) -> usize {
        match self {
            Dispatch::Sent { delivery, .. } => delivery.data,
            _ => 0,
        }
    }

    pub fn delivery_failures(&self) -> &[DeliveryFailure] {
        match self {
            Dispatch::Sent { delivery, .. } => &delivery.failures,
            _ => &[],
        }
    }
}

/// Threshold checks and notification delivery over one immutable configuration.
pub struct AlertSystem {
    thresholds: ThresholdTable,
    capacity: SeatCapacity,
    notifier: Notifier,
}

impl AlertSystem {
    pub fn new(thresholds: ThresholdTable, capacity: SeatCapacity, notifier: Notifier) -> Self {
        Self {
            thresholds,
            capacity,
            notifier,
        }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Assigned counts adjusted by seat capacity, where one is configured.
    pub fn remaining_counts(&self, assigned: &[LicenseCountRow]) -> Vec<LicenseCountRow> {
        apply_capacity(assigned, &self.capacity)
    }

    pub fn check_thresholds(&self, assigned: &[LicenseCountRow]) -> Vec<Alert> {
        let remaining = self.remaining_counts(assigned);
        let alerts = self.thresholds.evaluate(&remaining);
        info!(
            license_types = remaining.len(),
            monitored = self.thresholds.len(),
            alerts = alerts.len(),
            "Threshold check complete"
        );
        alerts
    }

    /// Send a breach report, unless `alerts` is empty.
    pub async fn dispatch_alerts(&self, alerts: &[Alert], dry_run: bool) -> Dispatch {
        match format_alerts(alerts) {
            Some(payload) => self.dispatch(payload, dry_run).await,
            None => Dispatch::NothingToSend,
        }
    }

    async fn dispatch(&self, payload: ReportPayload, dry_run: bool) -> Dispatch {
        if dry_run {
            return Dispatch::DryRun(payload);
        }
        let delivery = self.notifier.deliver(&payload).await;
        Dispatch::Sent { payload, delivery }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn system(thresholds: &[(&str, u32)], capacity: &[(&str, u32)]) -> AlertSystem {
        let thresholds: BTreeMap<String, u32> = thresholds
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        let capacity: BTreeMap<String, u32> = capacity
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        AlertSystem::new(
            ThresholdTable::new(thresholds),
            SeatCapacity::new(capacity),
            Notifier::disabled(),
        )
    }

    #[test]
    fn test_assigned_counts_above_zero_threshold() {
        let system = system(&[("Gemini", 0)], &[]);
        let alerts = system.check_thresholds(&[LicenseCountRow::new("Gemini", 2)]);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_capacity_turns_overassignment_into_alert() {
        let system = system(&[("Gemini", 0)], &[("Gemini", 10)]);
        let alerts = system.check_thresholds(&[LicenseCountRow::new("Gemini", 12)]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].remaining_count, -2);
    }

    #[tokio::test]
    async fn test_no_alerts_nothing_sent() {
        let system = system(&[("Gemini", 0)], &[]);
        let dispatch = system.dispatch_alerts(&[], false).await;
        assert!(matches!(dispatch, Dispatch::NothingToSend));
        assert!(dispatch.payload().is_none());
    }

    #[tokio::test]
    async fn test_dry_run_returns_payload() {
        let system = system(&[("Gemini", 3)], &[]);
        let alerts = system.check_thresholds(&[LicenseCountRow::new("Gemini", 3)]);
        let dispatch = system.dispatch_alerts(&alerts, true).await;
        match dispatch {
            Dispatch::DryRun(payload) => assert_eq!(
                payload.body,
                "Gemini has only 3 licenses left, which is at or below the threshold of 3."
            ),
            other => panic!("unexpected dispatch: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sent_with_disabled_notifier() {
        let system = system(&[("Gemini", 5)], &[]);
        let alerts = system.check_thresholds(&[LicenseCountRow::new("Gemini", 1)]);
        let dispatch = system.dispatch_alerts(&alerts, false).await;
        assert!(dispatch.payload().is_some());
        assert!(dispatch.delivery_failures().is_empty());
        assert_eq!(dispatch.delivered(), 0);
    }
}
