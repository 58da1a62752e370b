//! Configuration management

use anyhow::{Context as _, Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::context::{
    AccessContext, Context, DEFAULT_REFRESH_BUFFER_SECS, StaticAccessToken, WechatAccessToken,
};
use crate::transport::HttpTransport;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KfConfig {
    /// WeChat AppID
    pub app_id: Option<String>,

    /// WeChat AppSecret
    pub app_secret: Option<String>,

    /// Fixed access token managed elsewhere (skips AppID/AppSecret refresh)
    pub access_token: Option<String>,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Seconds before expiry at which the access token is refreshed
    #[serde(default = "default_refresh_buffer")]
    pub token_refresh_buffer_secs: u64,
}

fn default_http_timeout() -> u64 {
    10
}

fn default_refresh_buffer() -> u64 {
    DEFAULT_REFRESH_BUFFER_SECS
}

impl KfConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Self {
            app_id: std::env::var("WECHAT_APP_ID").ok(),
            app_secret: std::env::var("WECHAT_APP_SECRET").ok(),
            access_token: std::env::var("WECHAT_ACCESS_TOKEN").ok(),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_http_timeout),
            token_refresh_buffer_secs: std::env::var("TOKEN_REFRESH_BUFFER_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_refresh_buffer),
        };
        config.validate()?;
        Ok(config)
    }

    /// Either a fixed token or both AppID and AppSecret must be present
    pub fn validate(&self) -> Result<()> {
        if self.access_token.is_some() {
            return Ok(());
        }
        match (&self.app_id, &self.app_secret) {
            (Some(_), Some(_)) => Ok(()),
            _ => Err(anyhow!(
                "WECHAT_ACCESS_TOKEN or both WECHAT_APP_ID and WECHAT_APP_SECRET are required"
            )),
        }
    }

    /// Build the shared context used by every client
    pub fn build_context(&self) -> Result<Context> {
        self.validate()?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(self.http_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let access: Arc<dyn AccessContext> =
            match (&self.access_token, &self.app_id, &self.app_secret) {
                (Some(token), _, _) => Arc::new(StaticAccessToken::new(token.clone())),
                (None, Some(app_id), Some(app_secret)) => Arc::new(
                    WechatAccessToken::new(app_id.clone(), app_secret.clone(), http_client.clone())
                        .with_refresh_buffer(self.token_refresh_buffer_secs),
                ),
                _ => return Err(anyhow!("missing AppID/AppSecret")),
            };

        Ok(Context::new(
            access,
            Arc::new(HttpTransport::with_client(http_client)),
        ))
    }
}
