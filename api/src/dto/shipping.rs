use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached courier auth token handed to internal callers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingTokenResponse {
    pub success: bool,
    pub token: String,
    /// When this process stops trusting the token and logs in again
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}
