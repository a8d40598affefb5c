//! Outbound delivery of issued codes.

use async_trait::async_trait;

use crate::domain::entities::OtpKind;

/// Delivers a code to an email address or phone number
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send `code` to `identifier` over the channel for `kind`.
    ///
    /// Returns the provider message id, or a reason suitable for logs.
    async fn send(
        &self,
        identifier: &str,
        kind: OtpKind,
        code: &str,
        ttl_minutes: i64,
    ) -> Result<String, String>;

    /// Short provider name for logs
    fn provider_name(&self) -> &'static str;
}
