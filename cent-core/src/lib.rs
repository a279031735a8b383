//! Cent Rust SDK Core Library
//!
//! Client for a Centrifugo-style real-time messaging server's administrative
//! HTTP API: publish and broadcast messages, manage subscriptions, presence
//! and history, disconnect clients, and mint HMAC-SHA256 connection and
//! subscription tokens.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod http;

pub use api::{
    BatchDispatcher, BroadcastRequest, ChannelsRequest, Command, CommandReply, DisconnectRequest,
    ErrorInfo, HistoryRequest, InfoRequest, PresenceRequest, PresenceStatsRequest, PublishRequest,
    StreamPosition, SubscribeRequest, UnsubscribeRequest,
};
pub use auth::{ConnectionClaims, SubscriptionClaims, TokenSigner};
pub use client::{Client, ClientBuilder};
pub use error::{CentError, CentResult};
pub use http::{HttpConfig, HttpTransport, Transport, TransportResponse};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
