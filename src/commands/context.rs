use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::alerts::{AlertSystem, NotificationSink, Notifier, SlackWebhookSink};
use crate::config::Config;
use crate::models::SkuNameTable;
use crate::source::GoogleLicenseClient;
use crate::storage::Database;

/// Everything a command needs, built once from the loaded configuration.
pub struct MonitorContext {
    pub config: Config,
    pub skus: SkuNameTable,
    pub store: Database,
    pub alert_system: AlertSystem,
}

impl MonitorContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = config.database_path()?;
        let store = Database::new(&db_path)
            .with_context(|| format!("Failed to open license store at {}", db_path.display()))?;
        debug!(path = %db_path.display(), "Opened license store");

        let skus = config.sku_table();
        let alert_system = AlertSystem::new(
            config.threshold_table(),
            config.seat_capacity(),
            build_notifier(&config),
        );

        Ok(Self {
            config,
            skus,
            store,
            alert_system,
        })
    }

    pub fn license_source(&self) -> Result<GoogleLicenseClient> {
        GoogleLicenseClient::from_env(
            self.config.general.api_base_url.clone(),
            &self.config.general.access_token_env,
        )
        .context("Cannot query the licensing API")
    }
}

pub fn build_notifier(config: &Config) -> Notifier {
    if !config.notifications.enabled {
        info!("Notifications disabled in configuration");
        return Notifier::disabled();
    }

    let sinks: Vec<Box<dyn NotificationSink>> = config
        .notifications
        .webhooks
        .iter()
        .map(|webhook| {
            Box::new(SlackWebhookSink::new(webhook.name.clone(), webhook.url.clone()))
                as Box<dyn NotificationSink>
        })
        .collect();
    Notifier::new(sinks)
}
