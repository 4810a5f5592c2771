pub mod notifications;
pub mod report;
pub mod system;
pub mod thresholds;

pub use notifications::{NotificationSink, Notifier, SlackWebhookSink};
pub use report::{format_alerts, format_summary, ReportPayload};
pub use system::{AlertSystem, Dispatch};
pub use thresholds::{Alert, AlertPriority, ThresholdTable};
