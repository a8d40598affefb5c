//! Development sender that writes codes to the log.

use async_trait::async_trait;
use uuid::Uuid;

use hw_core::domain::entities::OtpKind;
use hw_core::services::NotificationSender;
use hw_shared::utils::mask::mask_identifier;

#[derive(Debug, Default, Clone)]
pub struct ConsoleNotificationSender;

impl ConsoleNotificationSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSender for ConsoleNotificationSender {
    async fn send(
        &self,
        identifier: &str,
        kind: OtpKind,
        code: &str,
        ttl_minutes: i64,
    ) -> Result<String, String> {
        let message_id = format!("console-{}", Uuid::new_v4());
        tracing::info!(
            identifier = %mask_identifier(identifier),
            kind = %kind,
            code = code,
            ttl_minutes,
            message_id = %message_id,
            "[DEV] OTP not sent, logged instead"
        );
        Ok(message_id)
    }

    fn provider_name(&self) -> &'static str {
        "console"
    }
}
