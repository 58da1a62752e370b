//! Access token management and the shared client context
//!
//! Handles:
//! - The `AccessContext` capability every client asks for a token
//! - Official Account token fetching (auto-refresh before expiry)
//! - Bundling the token source with a `Transport` for the clients

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::error::TokenError;
use crate::transport::Transport;

const TOKEN_URL: &str = "https://api.weixin.qq.com/cgi-bin/token";

/// Default seconds subtracted from `expires_in` before a token is refreshed
pub const DEFAULT_REFRESH_BUFFER_SECS: u64 = 300;

/// Supplies a currently valid access token
///
/// Refresh is the implementation's concern; clients only read.
#[async_trait]
pub trait AccessContext: Send + Sync {
    async fn access_token(&self) -> Result<String, TokenError>;
}

/// A fixed token managed outside this crate
#[derive(Debug, Clone)]
pub struct StaticAccessToken(String);

impl StaticAccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessContext for StaticAccessToken {
    async fn access_token(&self) -> Result<String, TokenError> {
        Ok(self.0.clone())
    }
}

// =============================================================================
// Official Account Access Token
// =============================================================================

/// Cached access token with expiry tracking
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn new(access_token: String, expires_in_secs: u64, buffer_secs: u64) -> Self {
        let effective_expiry = expires_in_secs.saturating_sub(buffer_secs);
        let now = Instant::now();
        // unrepresentable expiry counts as already expired
        let expires_at = now
            .checked_add(Duration::from_secs(effective_expiry))
            .unwrap_or(now);
        Self {
            access_token,
            expires_at,
        }
    }

    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Token response from the WeChat API
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    errcode: Option<i64>,
    #[serde(default)]
    errmsg: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Result<(String, u64), TokenError> {
        if let Some(code) = self.errcode
            && code != 0
        {
            return Err(TokenError::Remote {
                code,
                message: self.errmsg.unwrap_or_default(),
            });
        }
        let token = self.access_token.ok_or(TokenError::Missing)?;
        Ok((token, self.expires_in.unwrap_or(7200)))
    }
}

/// Client-credential access token for an Official Account
#[derive(Clone)]
pub struct WechatAccessToken {
    app_id: String,
    app_secret: String,
    refresh_buffer_secs: u64,
    http_client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl WechatAccessToken {
    pub fn new(app_id: String, app_secret: String, http_client: Client) -> Self {
        Self {
            app_id,
            app_secret,
            refresh_buffer_secs: DEFAULT_REFRESH_BUFFER_SECS,
            http_client,
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Refresh this many seconds before the token expires
    pub fn with_refresh_buffer(mut self, secs: u64) -> Self {
        self.refresh_buffer_secs = secs;
        self
    }

    /// Force refresh the access token
    async fn refresh_token(&self) -> Result<String, TokenError> {
        debug!("Refreshing WeChat access token");

        let url = format!(
            "{}?grant_type=client_credential&appid={}&secret={}",
            TOKEN_URL, self.app_id, self.app_secret
        );

        let token_resp: TokenResponse = self.http_client.get(&url).send().await?.json().await?;

        let (access_token, expires_in) = token_resp.into_token().inspect_err(|e| {
            error!("WeChat token error: {}", e);
        })?;

        {
            let mut guard = self.cached_token.write();
            *guard = Some(CachedToken::new(
                access_token.clone(),
                expires_in,
                self.refresh_buffer_secs,
            ));
        }

        info!(
            "Successfully refreshed WeChat access token (expires in {}s)",
            expires_in
        );
        Ok(access_token)
    }
}

#[async_trait]
impl AccessContext for WechatAccessToken {
    async fn access_token(&self) -> Result<String, TokenError> {
        {
            let guard = self.cached_token.read();
            if let Some(ref token) = *guard
                && token.is_valid()
            {
                debug!("Using cached access token");
                return Ok(token.access_token.clone());
            }
        }

        self.refresh_token().await
    }
}

// =============================================================================
// Shared Context
// =============================================================================

/// Token source plus transport, shared by every client
#[derive(Clone)]
pub struct Context {
    access: Arc<dyn AccessContext>,
    transport: Arc<dyn Transport>,
}

impl Context {
    pub fn new(access: Arc<dyn AccessContext>, transport: Arc<dyn Transport>) -> Self {
        Self { access, transport }
    }

    pub async fn access_token(&self) -> Result<String, TokenError> {
        self.access.access_token().await
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_expiry() {
        let token = CachedToken::new("test_token".to_string(), 7200, 300);
        assert!(token.is_valid());

        // buffer larger than lifetime saturates to an already-expired token
        let expired = CachedToken::new("test_token".to_string(), 200, 300);
        assert!(!expired.is_valid());
    }

    #[test]
    fn test_cached_token_huge_expiry_does_not_panic() {
        let token = CachedToken::new("test_token".to_string(), u64::MAX, 300);
        assert!(!token.is_valid());
    }

    #[test]
    fn test_token_response_success() {
        let json = r#"{"access_token":"ACCESS_TOKEN","expires_in":7200}"#;
        let resp: TokenResponse = serde_json::from_str(json).unwrap();
        let (token, expires_in) = resp.into_token().unwrap();
        assert_eq!(token, "ACCESS_TOKEN");
        assert_eq!(expires_in, 7200);
    }

    #[test]
    fn test_token_response_error() {
        let json = r#"{"errcode":40013,"errmsg":"invalid appid"}"#;
        let resp: TokenResponse = serde_json::from_str(json).unwrap();
        match resp.into_token().unwrap_err() {
            TokenError::Remote { code, message } => {
                assert_eq!(code, 40013);
                assert_eq!(message, "invalid appid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_token_response_missing_token() {
        let resp: TokenResponse = serde_json::from_str(r#"{"expires_in":7200}"#).unwrap();
        assert!(matches!(resp.into_token(), Err(TokenError::Missing)));
    }

    #[tokio::test]
    async fn test_static_token() {
        let ctx = StaticAccessToken::new("fixed");
        assert_eq!(ctx.access_token().await.unwrap(), "fixed");
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let ctx = WechatAccessToken::new("wx123".into(), "secret".into(), Client::new());
        *ctx.cached_token.write() = Some(CachedToken::new("cached".into(), 7200, 300));
        assert_eq!(ctx.access_token().await.unwrap(), "cached");
    }
}
