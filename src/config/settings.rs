use serde::{Deserialize, Serialize};
use anyhow::{Result, Context};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::fs;

use crate::alerts::ThresholdTable;
use crate::analysis::SeatCapacity;
use crate::models::SkuNameTable;
use crate::source::google::DEFAULT_API_BASE_URL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub storage: StorageConfig,
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub thresholds: BTreeMap<String, u32>,
    #[serde(default)]
    pub capacity: BTreeMap<String, u32>,
    #[serde(default)]
    pub skus: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub customer_id: String,
    pub product_ids: Vec<String>,
    pub access_token_env: String,
    pub api_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub webhooks: Vec<WebhookConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub name: String,
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut thresholds = BTreeMap::new();
        thresholds.insert("Gemini".to_string(), 0);
        thresholds.insert("Google Workspace Enterprise Plus".to_string(), 5);

        Self {
            general: GeneralConfig {
                customer_id: "my_customer".to_string(),
                product_ids: vec![
                    "Google-Apps".to_string(),
                    "101047".to_string(),
                    "Google-Vault".to_string(),
                    "101033".to_string(),
                ],
                access_token_env: "GOOGLE_ACCESS_TOKEN".to_string(),
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
            },
            storage: StorageConfig {
                database_path: "~/.config/licwatch/licenses.db".to_string(),
            },
            notifications: NotificationsConfig {
                enabled: true,
                webhooks: Vec::new(),
            },
            thresholds,
            capacity: BTreeMap::new(),
            skus: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load from `path`, or the default location when `None`.
    /// A missing file is created with default settings.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = self.to_commented_toml()?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Failed to determine home directory")?;
        Ok(home.join(".config").join("licwatch").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.customer_id.trim().is_empty() {
            anyhow::bail!("general.customer_id must not be empty");
        }
        if self.general.product_ids.iter().any(|id| id.trim().is_empty()) {
            anyhow::bail!("general.product_ids must not contain empty entries");
        }
        if self.general.access_token_env.trim().is_empty() {
            anyhow::bail!("general.access_token_env must not be empty");
        }
        for webhook in &self.notifications.webhooks {
            validate_webhook_url(&webhook.url)
                .with_context(|| format!("Invalid webhook '{}'", webhook.name))?;
        }
        Ok(())
    }

    /// Database path with a leading `~` expanded.
    pub fn database_path(&self) -> Result<PathBuf> {
        expand_home(&self.storage.database_path)
    }

    pub fn threshold_table(&self) -> ThresholdTable {
        ThresholdTable::new(self.thresholds.clone())
    }

    pub fn seat_capacity(&self) -> SeatCapacity {
        SeatCapacity::new(self.capacity.clone())
    }

    pub fn sku_table(&self) -> SkuNameTable {
        SkuNameTable::with_overrides(&self.skus)
    }

    /// Generate TOML configuration with comments explaining each option
    pub fn to_commented_toml(&self) -> Result<String> {
        let mut output = String::new();

        output.push_str("# licwatch Configuration File\n");
        output.push_str("# Google Workspace license threshold monitor\n");
        output.push_str("\n");

        output.push_str("[general]\n");
        output.push_str("# Customer ID or primary domain passed to the licensing API\n");
        output.push_str("# \"my_customer\" refers to the account the access token belongs to\n");
        output.push_str(&format!("customer_id = {}\n", quoted(&self.general.customer_id)));
        output.push_str("\n");
        output.push_str("# Product IDs to collect assignments for\n");
        output.push_str("#   Google-Apps  - Google Workspace editions\n");
        output.push_str("#   101047       - Gemini\n");
        output.push_str("#   Google-Vault - Google Vault\n");
        output.push_str("#   101033       - Google Voice\n");
        let products: Vec<String> = self.general.product_ids.iter().map(|id| quoted(id)).collect();
        output.push_str(&format!("product_ids = [{}]\n", products.join(", ")));
        output.push_str("\n");
        output.push_str("# Environment variable holding an OAuth bearer token with the\n");
        output.push_str("# apps.licensing scope\n");
        output.push_str(&format!("access_token_env = {}\n", quoted(&self.general.access_token_env)));
        output.push_str(&format!("api_base_url = {}\n", quoted(&self.general.api_base_url)));
        output.push_str("\n");

        output.push_str("[storage]\n");
        output.push_str("# SQLite file holding the latest assignment snapshot and summary\n");
        output.push_str(&format!("database_path = {}\n", quoted(&self.storage.database_path)));
        output.push_str("\n");

        output.push_str("[notifications]\n");
        output.push_str("# Set to false to evaluate without posting anything\n");
        output.push_str(&format!("enabled = {}\n", self.notifications.enabled));
        output.push_str("\n");
        output.push_str("# Incoming webhooks; every report goes to each of them\n");
        output.push_str("# [[notifications.webhooks]]\n");
        output.push_str("# name = \"it-ops\"\n");
        output.push_str("# url = \"https://hooks.slack.com/services/...\"\n");
        for webhook in &self.notifications.webhooks {
            output.push_str("[[notifications.webhooks]]\n");
            output.push_str(&format!("name = {}\n", quoted(&webhook.name)));
            output.push_str(&format!("url = {}\n", quoted(&webhook.url)));
            output.push_str("\n");
        }
        output.push_str("\n");

        output.push_str("[thresholds]\n");
        output.push_str("# Alert when a license type has this many licenses left or fewer\n");
        output.push_str("# License types not listed here are never alerted on\n");
        for (license_type, threshold) in &self.thresholds {
            output.push_str(&format!("{} = {}\n", quoted(license_type), threshold));
        }
        output.push_str("\n");

        output.push_str("[capacity]\n");
        output.push_str("# Purchased seats per license type. When set, the remaining count is\n");
        output.push_str("# capacity minus assigned; otherwise the assigned count is compared\n");
        for (license_type, seats) in &self.capacity {
            output.push_str(&format!("{} = {}\n", quoted(license_type), seats));
        }
        output.push_str("\n");

        output.push_str("[skus]\n");
        output.push_str("# Extra or replacement SKU ID to display name mappings\n");
        for (sku_id, name) in &self.skus {
            output.push_str(&format!("{} = {}\n", quoted(sku_id), quoted(name)));
        }

        Ok(output)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(license_type) = key.strip_prefix("thresholds.") {
            let threshold: u32 = value.parse()
                .with_context(|| format!("Invalid threshold value: {}", value))?;
            self.thresholds.insert(license_type.to_string(), threshold);
            return Ok(());
        }
        if let Some(license_type) = key.strip_prefix("capacity.") {
            let seats: u32 = value.parse()
                .with_context(|| format!("Invalid capacity value: {}", value))?;
            self.capacity.insert(license_type.to_string(), seats);
            return Ok(());
        }
        if let Some(sku_id) = key.strip_prefix("skus.") {
            self.skus.insert(sku_id.to_string(), value.to_string());
            return Ok(());
        }
        if let Some(name) = key.strip_prefix("notifications.webhooks.") {
            validate_webhook_url(value)?;
            match self.notifications.webhooks.iter_mut().find(|w| w.name == name) {
                Some(webhook) => webhook.url = value.to_string(),
                None => self.notifications.webhooks.push(WebhookConfig {
                    name: name.to_string(),
                    url: value.to_string(),
                }),
            }
            return Ok(());
        }

        match key {
            "general.customer_id" => {
                if value.trim().is_empty() {
                    anyhow::bail!("customer_id must not be empty");
                }
                self.general.customer_id = value.to_string();
            }
            "general.product_ids" => {
                self.general.product_ids = value
                    .split(',')
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .collect();
            }
            "general.access_token_env" => self.general.access_token_env = value.to_string(),
            "general.api_base_url" => self.general.api_base_url = value.to_string(),
            "storage.database_path" => self.storage.database_path = value.to_string(),
            "notifications.enabled" => {
                self.notifications.enabled = value.parse()
                    .with_context(|| format!("Invalid boolean value: {}", value))?;
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }
}

fn validate_webhook_url(url: &str) -> Result<()> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        anyhow::bail!("Webhook URL must start with http:// or https://");
    }
    Ok(())
}

fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().context("Failed to determine home directory")?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

fn quoted(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
