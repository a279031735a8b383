// Client façade: one method per server API operation

use crate::api::batch::BatchDispatcher;
use crate::api::command::{Command, HistoryRequest};
use crate::api::reply::{
    BroadcastResult, ChannelsResult, CommandReply, HistoryResult, InfoResult, PresenceResult,
    PresenceStatsResult, PublishResult,
};
use crate::auth::{ConnectionClaims, SubscriptionClaims, TokenSigner};
use crate::error::{CentError, CentResult};
use crate::http::{HttpConfig, HttpTransport, Transport};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Client for the server's administrative HTTP API.
///
/// Stateless apart from its configuration; cloning is cheap and a single
/// instance is safe to share across concurrent tasks. Single-operation
/// methods raise the server's error for their one command; only [`Client::batch`]
/// exposes multi-command semantics and per-command errors.
#[derive(Clone)]
pub struct Client {
    dispatcher: BatchDispatcher,
    signer: Option<TokenSigner>,
}

impl Client {
    /// Create a client with default HTTP settings
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> CentResult<Self> {
        Self::builder().endpoint(endpoint).api_key(api_key).build()
    }

    /// Create a builder for advanced configuration
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Publish data into a channel
    pub async fn publish(
        &self,
        channel: &str,
        data: impl Serialize,
    ) -> CentResult<PublishResult> {
        self.execute_typed(Command::publish(channel, data)?).await
    }

    /// Broadcast the same data into multiple channels
    pub async fn broadcast<I, S>(&self, channels: I, data: impl Serialize) -> CentResult<BroadcastResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute_typed(Command::broadcast(channels, data)?).await
    }

    /// Subscribe a user to a channel
    pub async fn subscribe(&self, channel: &str, user: &str) -> CentResult<()> {
        self.execute(Command::subscribe(channel, user)?).await?;
        Ok(())
    }

    /// Unsubscribe a user from a channel
    pub async fn unsubscribe(&self, channel: &str, user: &str) -> CentResult<()> {
        self.execute(Command::unsubscribe(channel, user)?).await?;
        Ok(())
    }

    /// Disconnect a user from the server
    pub async fn disconnect(&self, user: &str) -> CentResult<()> {
        self.execute(Command::disconnect(user)?).await?;
        Ok(())
    }

    /// Get channel presence information
    pub async fn presence(&self, channel: &str) -> CentResult<PresenceResult> {
        self.execute_typed(Command::presence(channel)?).await
    }

    /// Get short channel presence statistics
    pub async fn presence_stats(&self, channel: &str) -> CentResult<PresenceStatsResult> {
        self.execute_typed(Command::presence_stats(channel)?).await
    }

    /// Get channel history
    pub async fn history(&self, request: HistoryRequest) -> CentResult<HistoryResult> {
        self.execute_typed(request.into()).await
    }

    /// Get active channels matching a pattern; empty pattern means all
    pub async fn channels(&self, pattern: &str) -> CentResult<ChannelsResult> {
        self.execute_typed(Command::channels(pattern)).await
    }

    /// Get information about running server nodes
    pub async fn info(&self) -> CentResult<InfoResult> {
        self.execute_typed(Command::info()).await
    }

    /// Dispatch a single command and return its raw result value.
    ///
    /// Escape hatch for commands built directly from request structs with
    /// options the convenience methods do not expose.
    pub async fn execute(&self, command: Command) -> CentResult<Value> {
        self.execute_reply(command).await?.into_result()
    }

    /// Dispatch several commands as one request.
    ///
    /// Returns the full reply vector in command order; per-command errors are
    /// left in place rather than raised, so one failed command never hides
    /// its siblings' results.
    pub async fn batch(&self, commands: &[Command]) -> CentResult<Vec<CommandReply>> {
        self.dispatcher.dispatch(commands).await
    }

    /// Mint a signed connection token
    pub fn connection_token(&self, claims: &ConnectionClaims) -> CentResult<String> {
        self.signer()?.connection_token(claims)
    }

    /// Mint a signed channel subscription token
    pub fn subscription_token(&self, claims: &SubscriptionClaims) -> CentResult<String> {
        self.signer()?.subscription_token(claims)
    }

    async fn execute_reply(&self, command: Command) -> CentResult<CommandReply> {
        let mut replies = self.dispatcher.dispatch(std::slice::from_ref(&command)).await?;
        // dispatch guarantees one reply per command
        Ok(replies.remove(0))
    }

    async fn execute_typed<T: serde::de::DeserializeOwned>(
        &self,
        command: Command,
    ) -> CentResult<T> {
        self.execute_reply(command).await?.into_typed()
    }

    fn signer(&self) -> CentResult<&TokenSigner> {
        self.signer
            .as_ref()
            .ok_or_else(|| CentError::validation("token HMAC secret is not configured"))
    }
}

/// Builder for [`Client`] with advanced options
#[derive(Default)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    token_hmac_secret: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Set the API endpoint URL
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key sent as `Authorization: apikey <key>`
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the HMAC secret used to sign connection and subscription tokens
    pub fn token_hmac_secret(mut self, secret: impl Into<String>) -> Self {
        self.token_hmac_secret = Some(secret.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Replace the HTTP transport with a custom implementation
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client
    pub fn build(self) -> CentResult<Client> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut config = HttpConfig::builder();
                if let Some(endpoint) = self.endpoint {
                    config = config.endpoint(endpoint);
                }
                if let Some(timeout) = self.timeout {
                    config = config.timeout(timeout);
                }
                if let Some(connect_timeout) = self.connect_timeout {
                    config = config.connect_timeout(connect_timeout);
                }
                let api_key = self.api_key.unwrap_or_default();
                Arc::new(HttpTransport::new(config.build(), api_key)?)
            }
        };

        Ok(Client {
            dispatcher: BatchDispatcher::new(transport),
            signer: self.token_hmac_secret.map(TokenSigner::new),
        })
    }
}
