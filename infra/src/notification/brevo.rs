//! Brevo transactional email and SMS delivery
//!
//! Failed requests are retried with exponential backoff when the provider
//! answers 429 or 5xx, or the connection fails. Other 4xx answers are final.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use hw_core::domain::entities::OtpKind;
use hw_core::services::NotificationSender;
use hw_shared::config::NotificationConfig;
use hw_shared::utils::mask::mask_identifier;

use super::templates;
use crate::InfrastructureError;

const EMAIL_PATH: &str = "/v3/smtp/email";
const SMS_PATH: &str = "/v3/transactionalSMS/sms";

#[derive(Debug, Serialize)]
struct EmailContact<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailRequest<'a> {
    sender: EmailContact<'a>,
    to: Vec<EmailContact<'a>>,
    subject: &'a str,
    html_content: String,
}

#[derive(Debug, Serialize)]
struct SmsRequest<'a> {
    sender: &'a str,
    recipient: &'a str,
    content: String,
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryDecision {
    Retry,
    GiveUp,
}

fn classify_status(status: StatusCode) -> RetryDecision {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        RetryDecision::Retry
    } else {
        RetryDecision::GiveUp
    }
}

/// Brevo's `messageId` is a string for email and a number for SMS
fn extract_message_id(body: &Value) -> Option<String> {
    match body.get("messageId")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub struct BrevoNotificationSender {
    client: Client,
    config: NotificationConfig,
}

impl BrevoNotificationSender {
    pub fn new(config: NotificationConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn email_payload<'a>(&'a self, to: &'a str, code: &str, ttl_minutes: i64) -> EmailRequest<'a> {
        EmailRequest {
            sender: EmailContact {
                name: Some(&self.config.sender_name),
                email: &self.config.sender_email,
            },
            to: vec![EmailContact { name: None, email: to }],
            subject: templates::EMAIL_SUBJECT,
            html_content: templates::email_html(code, ttl_minutes),
        }
    }

    fn sms_payload<'a>(&'a self, to: &'a str, code: &str, ttl_minutes: i64) -> SmsRequest<'a> {
        SmsRequest {
            sender: &self.config.sender_name,
            recipient: to,
            content: templates::sms_text(code, ttl_minutes),
        }
    }

    /// POST `payload` to `path`, retrying transient failures
    async fn post_with_retry<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        recipient: &str,
    ) -> Result<String, InfrastructureError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| InfrastructureError::Config("Brevo API key not configured".to_string()))?;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let max_attempts = self.config.max_retries.max(1);
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(
                "Brevo request attempt {}/{} to {}",
                attempts,
                max_attempts,
                mask_identifier(recipient)
            );

            let response = self
                .client
                .post(&url)
                .header("accept", "application/json")
                .header("api-key", api_key)
                .json(payload)
                .send()
                .await;

            let failure = match response {
                Ok(resp) if resp.status().is_success() => {
                    let body: Value = resp.json().await.unwrap_or(Value::Null);
                    let message_id =
                        extract_message_id(&body).unwrap_or_else(|| "brevo-unknown".to_string());
                    info!(
                        recipient = %mask_identifier(recipient),
                        message_id = %message_id,
                        "Brevo accepted message"
                    );
                    return Ok(message_id);
                }
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    error!(
                        "Brevo request failed (attempt {}/{}): {} {}",
                        attempts, max_attempts, status, body
                    );
                    if classify_status(status) == RetryDecision::GiveUp {
                        return Err(InfrastructureError::External(format!(
                            "Brevo rejected request with status {}",
                            status
                        )));
                    }
                    InfrastructureError::External(format!("Brevo returned status {}", status))
                }
                Err(e) => {
                    error!("Brevo request error (attempt {}/{}): {}", attempts, max_attempts, e);
                    InfrastructureError::Http(e)
                }
            };

            if attempts >= max_attempts {
                return Err(failure);
            }

            warn!("Retrying Brevo request in {:?}", delay);
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

#[async_trait]
impl NotificationSender for BrevoNotificationSender {
    async fn send(
        &self,
        identifier: &str,
        kind: OtpKind,
        code: &str,
        ttl_minutes: i64,
    ) -> Result<String, String> {
        let result = match kind {
            OtpKind::Email => {
                let payload = self.email_payload(identifier, code, ttl_minutes);
                self.post_with_retry(EMAIL_PATH, &payload, identifier).await
            }
            OtpKind::Phone => {
                let payload = self.sms_payload(identifier, code, ttl_minutes);
                self.post_with_retry(SMS_PATH, &payload, identifier).await
            }
        };
        result.map_err(|e| e.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "brevo"
    }
}
