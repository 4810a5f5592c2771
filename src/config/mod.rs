pub mod settings;

pub use settings::{Config, GeneralConfig, NotificationsConfig, StorageConfig, WebhookConfig};
