//! Notification module
//!
//! Delivers OTP codes by email or SMS. Brevo is the production provider;
//! the console sender logs codes for local development.

pub mod brevo;
pub mod console;
pub mod templates;

use std::sync::Arc;

use hw_core::services::NotificationSender;
use hw_shared::config::{NotificationConfig, NotificationProvider};

pub use brevo::BrevoNotificationSender;
pub use console::ConsoleNotificationSender;

use crate::InfrastructureError;

/// Create the sender selected by `config.provider`
pub fn create_notification_sender(
    config: &NotificationConfig,
) -> Result<Arc<dyn NotificationSender>, InfrastructureError> {
    match config.provider {
        NotificationProvider::Brevo => {
            if config.api_key.as_deref().map_or(true, str::is_empty) {
                tracing::warn!("BREVO_API_KEY is not set; every OTP delivery will fail");
            }
            Ok(Arc::new(BrevoNotificationSender::new(config.clone())?))
        }
        NotificationProvider::Console => {
            tracing::warn!("Using console notification sender, codes are logged and not delivered");
            Ok(Arc::new(ConsoleNotificationSender::new()))
        }
    }
}
