// Shared mock transport for protocol-layer tests
#![allow(dead_code)]

use async_trait::async_trait;
use cent_core::{CentError, CentResult, Transport, TransportResponse};
use std::sync::Mutex;

/// Canned transport: records the last request body and returns a fixed reply.
pub struct MockTransport {
    status: u16,
    reply: Vec<u8>,
    refuse: bool,
    last_body: Mutex<Option<Vec<u8>>>,
}

impl MockTransport {
    /// Reply with 200 and the given JSON body
    pub fn replying(reply: &str) -> Self {
        Self {
            status: 200,
            reply: reply.as_bytes().to_vec(),
            refuse: false,
            last_body: Mutex::new(None),
        }
    }

    /// Reply with an arbitrary HTTP status
    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            status,
            reply: body.as_bytes().to_vec(),
            refuse: false,
            last_body: Mutex::new(None),
        }
    }

    /// Fail every request as if the connection was refused
    pub fn refusing() -> Self {
        Self {
            status: 0,
            reply: Vec::new(),
            refuse: true,
            last_body: Mutex::new(None),
        }
    }

    /// The most recent request body, decoded as JSON
    pub fn last_body_json(&self) -> serde_json::Value {
        let body = self
            .last_body
            .lock()
            .unwrap()
            .clone()
            .expect("no request was sent");
        serde_json::from_slice(&body).expect("request body was not valid JSON")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, body: Vec<u8>) -> CentResult<TransportResponse> {
        *self.last_body.lock().unwrap() = Some(body);
        if self.refuse {
            return Err(CentError::transport("connection refused"));
        }
        Ok(TransportResponse {
            status: self.status,
            body: self.reply.clone(),
        })
    }
}
