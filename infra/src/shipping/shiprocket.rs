//! Shiprocket login client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use hw_shared::config::ShippingConfig;

use super::token_cache::TokenFetcher;
use crate::InfrastructureError;

const LOGIN_PATH: &str = "/v1/external/auth/login";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Fetches tokens with the account email and password
pub struct ShiprocketAuthClient {
    client: Client,
    config: ShippingConfig,
}

impl ShiprocketAuthClient {
    pub fn new(config: ShippingConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn login_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), LOGIN_PATH)
    }
}

#[async_trait]
impl TokenFetcher for ShiprocketAuthClient {
    async fn fetch_token(&self) -> Result<String, InfrastructureError> {
        let (Some(email), Some(password)) = (self.config.email.as_deref(), self.config.password.as_deref())
        else {
            return Err(InfrastructureError::Config(
                "Shiprocket credentials not configured".to_string(),
            ));
        };

        let response = self
            .client
            .post(self.login_url())
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Shiprocket auth error");
            return Err(InfrastructureError::External(
                "Failed to authenticate with Shiprocket".to_string(),
            ));
        }

        let body: LoginResponse = response.json().await?;
        Ok(body.token)
    }
}
