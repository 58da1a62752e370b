//! Error types and the WeChat common error envelope
//!
//! Every failure surfaced by the clients is a [`KfError`]. Nothing here is
//! retried or swallowed; the operation tag on `Encode`, `Decode` and `Remote` names the
//! call that produced the error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Result alias used throughout the crate
pub type Result<T, E = KfError> = std::result::Result<T, E>;

// =============================================================================
// Error Taxonomy
// =============================================================================

/// Access token acquisition failure
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("token endpoint error {code}: {message}")]
    Remote { code: i64, message: String },
    #[error("token response carried no access_token")]
    Missing,
    #[error("{0}")]
    Other(String),
}

/// Network / transport failure
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
    #[error("{0}")]
    Other(String),
}

/// Error returned by every client operation
#[derive(Debug, Error)]
pub enum KfError {
    #[error("access token unavailable: {0}")]
    Token(#[from] TokenError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("{operation}: failed to encode request: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{operation}: failed to decode response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{operation} Error, errcode={code}, errmsg={message}")]
    Remote {
        code: i64,
        message: String,
        operation: &'static str,
    },
}

impl KfError {
    /// Remote error code, if the service reported one
    pub fn code(&self) -> Option<i64> {
        match self {
            KfError::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Operation tag for encode, decode and remote errors
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            KfError::Encode { operation, .. }
            | KfError::Decode { operation, .. }
            | KfError::Remote { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

// =============================================================================
// Common Error Envelope
// =============================================================================

/// `{"errcode": .., "errmsg": ..}` returned by the WeChat API
///
/// Read endpoints omit both fields on success, so they default to zero/empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommonError {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

impl CommonError {
    /// Convert a non-zero envelope into a tagged [`KfError::Remote`]
    pub fn into_result(self, operation: &'static str) -> Result<()> {
        if self.errcode == 0 {
            return Ok(());
        }
        warn!("{} error: {} - {}", operation, self.errcode, self.errmsg);
        Err(KfError::Remote {
            code: self.errcode,
            message: self.errmsg,
            operation,
        })
    }
}

/// Decode a response body as the common envelope and check `errcode`
pub fn decode_with_common_error(body: &[u8], operation: &'static str) -> Result<()> {
    let envelope: CommonError = decode_json(body, operation)?;
    envelope.into_result(operation)
}

/// Decode a typed response, surfacing an error envelope first when present
pub(crate) fn decode_response<T>(body: &[u8], operation: &'static str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    decode_with_common_error(body, operation)?;
    decode_json(body, operation)
}

fn decode_json<T>(body: &[u8], operation: &'static str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|source| KfError::Decode { operation, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        assert!(decode_with_common_error(br#"{"errcode":0,"errmsg":"ok"}"#, "AddKf").is_ok());
    }

    #[test]
    fn test_envelope_missing_fields_is_success() {
        assert!(decode_with_common_error(b"{}", "AddKf").is_ok());
    }

    #[test]
    fn test_envelope_error() {
        let err = decode_with_common_error(
            br#"{"errcode":65400,"errmsg":"please enable new custom service"}"#,
            "InviteKf",
        )
        .unwrap_err();

        match &err {
            KfError::Remote {
                code,
                message,
                operation,
            } => {
                assert_eq!(*code, 65400);
                assert_eq!(message, "please enable new custom service");
                assert_eq!(*operation, "InviteKf");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.code(), Some(65400));
    }

    #[test]
    fn test_envelope_invalid_json() {
        let err = decode_with_common_error(b"<html>", "DeleteKf").unwrap_err();
        assert!(matches!(
            err,
            KfError::Decode {
                operation: "DeleteKf",
                ..
            }
        ));
        assert_eq!(err.operation(), Some("DeleteKf"));
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_remote_error_display() {
        let err = KfError::Remote {
            code: 40001,
            message: "invalid credential".to_string(),
            operation: "UpdateKf",
        };
        assert_eq!(
            err.to_string(),
            "UpdateKf Error, errcode=40001, errmsg=invalid credential"
        );
    }
}
