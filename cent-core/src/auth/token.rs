// HS256 JWT construction for connection and subscription tokens

use crate::error::{CentError, CentResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

// Fixed header: only HMAC-SHA256 is supported.
const JWT_HEADER: &str = r#"{"typ":"JWT","alg":"HS256"}"#;

/// Claims for a connection token.
///
/// Optional claims left at their defaults are omitted from the token rather
/// than emitted as empty values. `sub` may be empty when the server's
/// anonymous-access policy allows tokenized anonymous connections.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionClaims {
    sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Value>,
}

impl ConnectionClaims {
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            exp: None,
            info: None,
            channels: None,
            meta: None,
        }
    }

    /// Expiration as unix seconds; 0 means no expiration and is omitted
    pub fn expires_at(mut self, exp: i64) -> Self {
        self.exp = if exp == 0 { None } else { Some(exp) };
        self
    }

    /// Connection info attached to the client; an empty object is omitted
    pub fn info(mut self, info: Value) -> Self {
        self.info = non_empty_value(info);
        self
    }

    /// Server-side channels to subscribe on connect; an empty list is omitted
    pub fn channels(mut self, channels: Vec<String>) -> Self {
        self.channels = if channels.is_empty() {
            None
        } else {
            Some(channels)
        };
        self
    }

    /// Meta information visible only to the server; an empty object is omitted
    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = non_empty_value(meta);
        self
    }
}

/// Claims for a channel subscription token
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionClaims {
    sub: String,
    channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<Value>,
}

impl SubscriptionClaims {
    pub fn new(sub: impl Into<String>, channel: impl Into<String>) -> CentResult<Self> {
        let channel = channel.into();
        if channel.is_empty() {
            return Err(CentError::validation("channel is required"));
        }
        Ok(Self {
            sub: sub.into(),
            channel,
            exp: None,
            info: None,
        })
    }

    /// Expiration as unix seconds; 0 means no expiration and is omitted
    pub fn expires_at(mut self, exp: i64) -> Self {
        self.exp = if exp == 0 { None } else { Some(exp) };
        self
    }

    /// Channel info attached to the subscription; an empty object is omitted
    pub fn info(mut self, info: Value) -> Self {
        self.info = non_empty_value(info);
        self
    }
}

fn non_empty_value(value: Value) -> Option<Value> {
    match &value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(value),
    }
}

/// Signs connection and subscription tokens with a shared HMAC secret.
///
/// Signing is a pure function of (claims, secret): identical inputs always
/// produce byte-identical tokens. The secret is held for the signer's
/// lifetime and never logged or echoed in errors.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[redacted]")
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Build a signed connection token
    pub fn connection_token(&self, claims: &ConnectionClaims) -> CentResult<String> {
        self.sign(claims)
    }

    /// Build a signed channel subscription token
    pub fn subscription_token(&self, claims: &SubscriptionClaims) -> CentResult<String> {
        self.sign(claims)
    }

    fn sign<T: Serialize>(&self, claims: &T) -> CentResult<String> {
        let header = URL_SAFE_NO_PAD.encode(JWT_HEADER);
        let payload = serde_json::to_vec(claims)
            .map_err(|e| CentError::validation(format!("claims are not serializable: {e}")))?;
        let payload = URL_SAFE_NO_PAD.encode(payload);

        let signing_input = format!("{header}.{payload}");
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| CentError::validation("invalid signing key"))?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }
}
