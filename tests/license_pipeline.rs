use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use licwatch::alerts::{AlertSystem, NotificationSink, Notifier, ReportPayload, ThresholdTable};
use licwatch::analysis::SeatCapacity;
use licwatch::commands::{run_check, run_report, sync_snapshot};
use licwatch::config::Config;
use licwatch::error::{ChannelError, SourceError};
use licwatch::models::{LicenseAssignment, LicenseCountRow, LicenseRecord, SkuNameTable};
use licwatch::source::{LicensePage, LicenseSource};
use licwatch::storage::{LicenseStore, MemoryStore};

/// Single-page source keyed by product, with optional failing products
struct FakeSource {
    products: HashMap<String, Vec<(String, String)>>,
    failing: Vec<String>,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            products: HashMap::new(),
            failing: Vec::new(),
        }
    }

    fn with(mut self, product: &str, assignments: &[(&str, &str)]) -> Self {
        self.products.insert(
            product.to_string(),
            assignments
                .iter()
                .map(|(user, sku)| (user.to_string(), sku.to_string()))
                .collect(),
        );
        self
    }

    fn failing(mut self, product: &str) -> Self {
        self.failing.push(product.to_string());
        self
    }
}

#[async_trait]
impl LicenseSource for FakeSource {
    async fn list_licenses_for_product(
        &self,
        product_id: &str,
        _customer_id: &str,
        _page_token: Option<&str>,
    ) -> Result<LicensePage, SourceError> {
        if self.failing.iter().any(|p| p == product_id) {
            return Err(SourceError::Api {
                status: 503,
                body: "backend error".to_string(),
            });
        }
        let items = self
            .products
            .get(product_id)
            .map(|rows| {
                rows.iter()
                    .map(|(user, sku)| LicenseRecord {
                        user_id: user.clone(),
                        sku_id: sku.clone(),
                        product_id: product_id.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(LicensePage {
            items,
            next_page_token: None,
        })
    }
}

struct CollectingSink {
    name: &'static str,
    fail: bool,
    sent: Arc<Mutex<Vec<ReportPayload>>>,
}

#[async_trait]
impl NotificationSink for CollectingSink {
    fn name(&self) -> &str {
        self.name
    }

    async fn deliver(&self, payload: &ReportPayload) -> Result<(), ChannelError> {
        if self.fail {
            return Err(ChannelError::Other("unreachable host".to_string()));
        }
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

fn sink(name: &'static str, fail: bool, sent: &Arc<Mutex<Vec<ReportPayload>>>) -> Box<dyn NotificationSink> {
    Box::new(CollectingSink {
        name,
        fail,
        sent: Arc::clone(sent),
    })
}

fn alert_system(
    thresholds: &[(&str, u32)],
    capacity: &[(&str, u32)],
    sinks: Vec<Box<dyn NotificationSink>>,
) -> AlertSystem {
    let thresholds: BTreeMap<String, u32> = thresholds
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
    let capacity: BTreeMap<String, u32> = capacity.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    AlertSystem::new(
        ThresholdTable::new(thresholds),
        SeatCapacity::new(capacity),
        Notifier::new(sinks),
    )
}

fn general(products: &[&str]) -> licwatch::config::GeneralConfig {
    let mut config = Config::default();
    config.general.product_ids = products.iter().map(|p| p.to_string()).collect();
    config.general.customer_id = "example.com".to_string();
    config.general
}

#[tokio::test]
async fn test_two_gemini_seats_do_not_breach_zero_threshold() {
    let source = FakeSource::new().with("101047", &[("a@x.com", "1010470001"), ("b@x.com", "1010470001")]);
    let sent = Arc::new(Mutex::new(Vec::new()));
    let system = alert_system(
        &[("Gemini", 0)],
        &[],
        vec![sink("ops", false, &sent)],
    );
    let mut store = MemoryStore::new();

    let outcome = run_check(
        Some(&source as &dyn LicenseSource),
        &general(&["101047"]),
        &SkuNameTable::builtin(),
        &mut store,
        &system,
        false,
    )
    .await
    .unwrap();

    assert_eq!(outcome.counts.len(), 1);
    assert_eq!(outcome.counts[0].license_type, "Gemini");
    assert_eq!(outcome.counts[0].remaining_count, 2);
    assert!(outcome.alerts.is_empty());
    assert!(!outcome.notified);
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_assignments_is_no_data() {
    let source = FakeSource::new().with("101047", &[]);
    let system = alert_system(&[("Gemini", 0)], &[], Vec::new());
    let mut store = MemoryStore::new();

    let outcome = run_check(
        Some(&source as &dyn LicenseSource),
        &general(&["101047"]),
        &SkuNameTable::builtin(),
        &mut store,
        &system,
        false,
    )
    .await
    .unwrap();

    assert!(outcome.counts.is_empty());
    assert!(outcome.alerts.is_empty());
    assert!(outcome.payload.is_none());
}

#[tokio::test]
async fn test_breach_is_sent_to_every_reachable_destination() {
    let source = FakeSource::new()
        .with("101047", &[("a@x.com", "1010470001"), ("b@x.com", "1010470001")])
        .failing("Google-Vault")
        .with("Google-Apps", &[("a@x.com", "1010020020")]);
    let sent = Arc::new(Mutex::new(Vec::new()));
    let system = alert_system(
        &[("Gemini", 0), ("Google Workspace Enterprise Plus", 5)],
        &[("Gemini", 2)],
        vec![
            sink("broken", true, &sent),
            sink("ops", false, &sent),
        ],
    );
    let mut store = MemoryStore::new();

    let outcome = run_check(
        Some(&source as &dyn LicenseSource),
        &general(&["101047", "Google-Vault", "Google-Apps"]),
        &SkuNameTable::builtin(),
        &mut store,
        &system,
        false,
    )
    .await
    .unwrap();

    assert_eq!(outcome.fetch_failures.len(), 1);
    assert_eq!(outcome.fetch_failures[0].product_id, "Google-Vault");

    let breached: Vec<&str> = outcome.alerts.iter().map(|a| a.license_type.as_str()).collect();
    assert_eq!(breached, vec!["Gemini", "Google Workspace Enterprise Plus"]);

    assert!(outcome.notified);
    assert_eq!(outcome.delivery_failures.len(), 1);
    assert_eq!(outcome.delivery_failures[0].destination, "broken");

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].body,
        "Gemini has only 0 licenses left, which is at or below the threshold of 0.\n\
         Google Workspace Enterprise Plus has only 1 licenses left, which is at or below the threshold of 5."
    );
}

#[tokio::test]
async fn test_breach_with_every_destination_failing_is_not_notified() {
    let source = FakeSource::new().with("101047", &[("a@x.com", "1010470001")]);
    let sent = Arc::new(Mutex::new(Vec::new()));
    let system = alert_system(
        &[("Gemini", 1)],
        &[],
        vec![sink("first", true, &sent), sink("second", true, &sent)],
    );
    let mut store = MemoryStore::new();

    let outcome = run_check(
        Some(&source as &dyn LicenseSource),
        &general(&["101047"]),
        &SkuNameTable::builtin(),
        &mut store,
        &system,
        false,
    )
    .await
    .unwrap();

    assert_eq!(outcome.alerts.len(), 1);
    assert!(outcome.payload.is_some());
    assert!(!outcome.notified);
    let failed: Vec<&str> = outcome
        .delivery_failures
        .iter()
        .map(|f| f.destination.as_str())
        .collect();
    assert_eq!(failed, vec!["first", "second"]);
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_breach_with_no_destinations_is_not_notified() {
    let source = FakeSource::new().with("101047", &[("a@x.com", "1010470001")]);
    let system = alert_system(&[("Gemini", 1)], &[], Vec::new());
    let mut store = MemoryStore::new();

    let outcome = run_check(
        Some(&source as &dyn LicenseSource),
        &general(&["101047"]),
        &SkuNameTable::builtin(),
        &mut store,
        &system,
        false,
    )
    .await
    .unwrap();

    assert!(outcome.payload.is_some());
    assert!(!outcome.notified);
    assert!(outcome.delivery_failures.is_empty());
}

#[tokio::test]
async fn test_dry_run_does_not_send() {
    let source = FakeSource::new().with("101047", &[("a@x.com", "1010470001")]);
    let sent = Arc::new(Mutex::new(Vec::new()));
    let system = alert_system(
        &[("Gemini", 1)],
        &[],
        vec![sink("ops", false, &sent)],
    );
    let mut store = MemoryStore::new();

    let outcome = run_check(
        Some(&source as &dyn LicenseSource),
        &general(&["101047"]),
        &SkuNameTable::builtin(),
        &mut store,
        &system,
        true,
    )
    .await
    .unwrap();

    assert_eq!(outcome.alerts.len(), 1);
    assert!(outcome.payload.is_some());
    assert!(!outcome.notified);
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_offline_check_uses_stored_snapshot() {
    let mut store = MemoryStore::new();
    store
        .write_all(&[LicenseAssignment::new("a@x.com", "Gemini")])
        .unwrap();
    let system = alert_system(&[("Gemini", 1)], &[], Vec::new());

    let outcome = run_check(
        None,
        &general(&["101047"]),
        &SkuNameTable::builtin(),
        &mut store,
        &system,
        true,
    )
    .await
    .unwrap();

    assert_eq!(outcome.alerts.len(), 1);
    assert_eq!(outcome.alerts[0].remaining_count, 1);
}

#[tokio::test]
async fn test_summary_report_after_sync() {
    let users: Vec<String> = (0..25).map(|i| format!("u{i}@x.com")).collect();
    let assignments: Vec<(&str, &str)> = users.iter().map(|u| (u.as_str(), "1010020020")).collect();
    let source = FakeSource::new().with("Google-Apps", &assignments);
    let sent = Arc::new(Mutex::new(Vec::new()));
    let system = alert_system(
        &[],
        &[],
        vec![sink("ops", false, &sent)],
    );
    let mut store = MemoryStore::new();

    let synced = sync_snapshot(
        &source,
        &["Google-Apps".to_string()],
        "example.com",
        &SkuNameTable::builtin(),
        &mut store,
    )
    .await
    .unwrap();
    assert_eq!(synced.assignments, 25);

    let report = run_report(&store, &system, false).await.unwrap();
    assert!(report.notified);
    assert!(report.synced_at.is_some());
    assert!(report
        .payload
        .lines()
        .any(|line| line == "Google Workspace Enterprise Plus: 25"));
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_summary_report_on_empty_store() {
    let store = MemoryStore::new();
    let system = alert_system(&[], &[], Vec::new());

    let report = run_report(&store, &system, true).await.unwrap();
    assert_eq!(report.payload.header, "License Summary Report");
    assert!(report.payload.body.is_empty());
    assert!(report.synced_at.is_none());
}

#[tokio::test]
async fn test_summary_report_with_no_destinations_is_not_notified() {
    let mut store = MemoryStore::new();
    store
        .write_summary(&[LicenseCountRow::new("Gemini", 2)])
        .unwrap();
    let system = alert_system(&[], &[], Vec::new());

    let report = run_report(&store, &system, false).await.unwrap();
    assert!(!report.notified);
    assert!(report.delivery_failures.is_empty());
    assert_eq!(report.payload.body, "Gemini: 2");
}

#[tokio::test]
async fn test_summary_report_with_every_destination_failing_is_not_notified() {
    let mut store = MemoryStore::new();
    store
        .write_summary(&[LicenseCountRow::new("Gemini", 2)])
        .unwrap();
    let sent = Arc::new(Mutex::new(Vec::new()));
    let system = alert_system(
        &[],
        &[],
        vec![sink("first", true, &sent), sink("second", true, &sent)],
    );

    let report = run_report(&store, &system, false).await.unwrap();
    assert!(!report.notified);
    assert_eq!(report.delivery_failures.len(), 2);
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_sku_keeps_raw_identifier() {
    let source = FakeSource::new().with("999999", &[("a@x.com", "unknown-sku")]);
    let mut store = MemoryStore::new();

    let outcome = sync_snapshot(
        &source,
        &["999999".to_string()],
        "example.com",
        &SkuNameTable::builtin(),
        &mut store,
    )
    .await
    .unwrap();

    assert_eq!(outcome.counts[0].license_type, "unknown-sku");
    assert_eq!(store.read_all().unwrap()[0].license_type, "unknown-sku");
}
