//! Notification (email / SMS) provider configuration

use serde::{Deserialize, Serialize};

use super::{env_or, Environment};

/// Delivery provider for one-time passcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationProvider {
    /// Brevo transactional email and SMS
    Brevo,
    /// Log the message instead of sending it
    Console,
}

impl std::str::FromStr for NotificationProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "brevo" => Ok(NotificationProvider::Brevo),
            "console" | "mock" => Ok(NotificationProvider::Console),
            _ => Err(format!("Invalid notification provider: {}", s)),
        }
    }
}

/// Notification provider settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Which provider delivers codes
    pub provider: NotificationProvider,

    /// Provider API key; a missing key makes every send fail
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Provider base URL
    pub base_url: String,

    /// Display name on emails and SMS sender id
    pub sender_name: String,

    /// From address on emails
    pub sender_email: String,

    /// Attempts per message, including the first
    pub max_retries: u32,

    /// Initial backoff between attempts in milliseconds
    pub retry_delay_ms: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl NotificationConfig {
    /// Defaults for an environment: console outside production
    pub fn for_environment(env: Environment) -> Self {
        Self {
            provider: if env.is_production() {
                NotificationProvider::Brevo
            } else {
                NotificationProvider::Console
            },
            api_key: None,
            base_url: String::from("https://api.brevo.com"),
            sender_name: String::from("HampyWorld"),
            sender_email: String::from("noreply@hampyworld.com"),
            max_retries: 3,
            retry_delay_ms: 500,
            request_timeout_secs: 15,
        }
    }

    /// Create from environment variables
    pub fn from_env(env: Environment) -> Self {
        let defaults = Self::for_environment(env);
        Self {
            provider: env_or("NOTIFICATION_PROVIDER", defaults.provider),
            api_key: std::env::var("BREVO_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("BREVO_BASE_URL").unwrap_or(defaults.base_url),
            sender_name: std::env::var("NOTIFICATION_SENDER_NAME").unwrap_or(defaults.sender_name),
            sender_email: std::env::var("NOTIFICATION_SENDER_EMAIL")
                .unwrap_or(defaults.sender_email),
            max_retries: env_or("NOTIFICATION_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("NOTIFICATION_RETRY_DELAY_MS", defaults.retry_delay_ms),
            request_timeout_secs: env_or(
                "NOTIFICATION_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}
