//! Scripted collaborators for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::context::{AccessContext, Context, StaticAccessToken};
use crate::error::{TokenError, TransportError};
use crate::transport::Transport;

pub const TEST_TOKEN: &str = "TEST_ACCESS_TOKEN";

/// One request observed by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get {
        url: String,
    },
    PostJson {
        url: String,
        body: Vec<u8>,
    },
    Multipart {
        field_name: String,
        file_name: String,
        payload: String,
        url: String,
    },
}

impl Call {
    pub fn url(&self) -> &str {
        match self {
            Call::Get { url } | Call::PostJson { url, .. } | Call::Multipart { url, .. } => url,
        }
    }

    pub fn json_body(&self) -> serde_json::Value {
        match self {
            Call::PostJson { body, .. } => serde_json::from_slice(body).unwrap(),
            other => panic!("not a JSON post: {other:?}"),
        }
    }
}

/// Records every call and answers from a queue of canned responses
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, body: &str) {
        self.responses.lock().push_back(Ok(body.as_bytes().to_vec()));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .push_back(Err(TransportError::Other(message.to_string())));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) -> Result<Vec<u8>, TransportError> {
        self.calls.lock().push(call);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(br#"{"errcode":0,"errmsg":"ok"}"#.to_vec()))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.record(Call::Get {
            url: url.to_string(),
        })
    }

    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.record(Call::PostJson {
            url: url.to_string(),
            body,
        })
    }

    async fn post_multipart_base64(
        &self,
        field_name: &str,
        file_name: &str,
        base64_payload: &str,
        url: &str,
    ) -> Result<Vec<u8>, TransportError> {
        self.record(Call::Multipart {
            field_name: field_name.to_string(),
            file_name: file_name.to_string(),
            payload: base64_payload.to_string(),
            url: url.to_string(),
        })
    }
}

/// Token source that always fails
pub struct FailingToken;

#[async_trait]
impl AccessContext for FailingToken {
    async fn access_token(&self) -> Result<String, TokenError> {
        Err(TokenError::Other("token endpoint unreachable".to_string()))
    }
}

pub fn context(transport: &Arc<RecordingTransport>) -> Context {
    Context::new(
        Arc::new(StaticAccessToken::new(TEST_TOKEN)),
        transport.clone(),
    )
}

pub fn failing_context(transport: &Arc<RecordingTransport>) -> Context {
    Context::new(Arc::new(FailingToken), transport.clone())
}
