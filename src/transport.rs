//! HTTP transport primitives used by the API clients

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

use crate::error::TransportError;

/// Raw HTTP operations against the WeChat API
///
/// Implementations return the response body unchanged; decoding belongs to
/// the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;

    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;

    /// POST a multipart form with one file field whose content arrives base64-encoded
    async fn post_multipart_base64(
        &self,
        field_name: &str,
        file_name: &str,
        base64_payload: &str,
        url: &str,
    ) -> Result<Vec<u8>, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }

    /// Wrap an existing client (shares its connection pool and settings)
    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }

    async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self.http_client.get(url).send().await?;
        Self::read_body(response).await
    }

    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let response = self
            .http_client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json;charset=utf-8")
            .body(body)
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn post_multipart_base64(
        &self,
        field_name: &str,
        file_name: &str,
        base64_payload: &str,
        url: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let data = BASE64.decode(base64_payload.trim())?;
        debug!(
            "Uploading {} as multipart field '{}' ({} bytes)",
            file_name,
            field_name,
            data.len()
        );

        let part = Part::bytes(data).file_name(file_name.to_string());
        let form = Form::new().part(field_name.to_string(), part);

        let response = self.http_client.post(url).multipart(form).send().await?;
        Self::read_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_multipart_rejects_invalid_base64() {
        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();
        let err = transport
            .post_multipart_base64("media", "1700000000", "not base64!!", "http://127.0.0.1:9/")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidPayload(_)));
    }

    #[test]
    fn test_status_error_display() {
        let err = TransportError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "http status 502: bad gateway");
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            socket
                .write_all(
                    b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 11\r\nConnection: close\r\n\r\nbad gateway",
                )
                .await
                .unwrap();
        });

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let err = transport
            .get(&format!("http://{}/cgi-bin/customservice/getkflist", addr))
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
