// Typed command model for the server API
// Each operation is validated at construction, before anything touches the wire.

use crate::error::{CentError, CentResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single API command, ready for dispatch.
///
/// Serializes to the wire form `{"method": "<name>", "params": {...}}` and
/// decodes back from it without loss. The method set is closed: a command
/// that the server would reject as unknown cannot be constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum Command {
    Publish(PublishRequest),
    Broadcast(BroadcastRequest),
    Subscribe(SubscribeRequest),
    Unsubscribe(UnsubscribeRequest),
    Disconnect(DisconnectRequest),
    Presence(PresenceRequest),
    PresenceStats(PresenceStatsRequest),
    History(HistoryRequest),
    Channels(ChannelsRequest),
    Info(InfoRequest),
}

impl Command {
    /// Publish data into a channel
    pub fn publish(channel: impl Into<String>, data: impl Serialize) -> CentResult<Self> {
        Ok(PublishRequest::new(channel, data)?.into())
    }

    /// Broadcast the same data into multiple channels
    pub fn broadcast<I, S>(channels: I, data: impl Serialize) -> CentResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(BroadcastRequest::new(channels, data)?.into())
    }

    /// Subscribe a user to a channel
    pub fn subscribe(channel: impl Into<String>, user: impl Into<String>) -> CentResult<Self> {
        Ok(SubscribeRequest::new(channel, user)?.into())
    }

    /// Unsubscribe a user from a channel
    pub fn unsubscribe(channel: impl Into<String>, user: impl Into<String>) -> CentResult<Self> {
        Ok(UnsubscribeRequest::new(channel, user)?.into())
    }

    /// Disconnect a user
    pub fn disconnect(user: impl Into<String>) -> CentResult<Self> {
        Ok(DisconnectRequest::new(user)?.into())
    }

    /// Get channel presence information
    pub fn presence(channel: impl Into<String>) -> CentResult<Self> {
        Ok(PresenceRequest::new(channel)?.into())
    }

    /// Get short channel presence statistics
    pub fn presence_stats(channel: impl Into<String>) -> CentResult<Self> {
        Ok(PresenceStatsRequest::new(channel)?.into())
    }

    /// Get channel history with default options
    pub fn history(channel: impl Into<String>) -> CentResult<Self> {
        Ok(HistoryRequest::new(channel)?.into())
    }

    /// Get active channels, optionally filtered by pattern (empty means all)
    pub fn channels(pattern: impl Into<String>) -> Self {
        ChannelsRequest::new().pattern(pattern).into()
    }

    /// Get server node information
    pub fn info() -> Self {
        InfoRequest::new().into()
    }

    /// Wire-level method name, used in logs and diagnostics
    pub fn method(&self) -> &'static str {
        match self {
            Command::Publish(_) => "publish",
            Command::Broadcast(_) => "broadcast",
            Command::Subscribe(_) => "subscribe",
            Command::Unsubscribe(_) => "unsubscribe",
            Command::Disconnect(_) => "disconnect",
            Command::Presence(_) => "presence",
            Command::PresenceStats(_) => "presence_stats",
            Command::History(_) => "history",
            Command::Channels(_) => "channels",
            Command::Info(_) => "info",
        }
    }
}

/// Position in a channel stream, used as the `since` marker for history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPosition {
    pub offset: u64,
    pub epoch: String,
}

impl StreamPosition {
    pub fn new(offset: u64, epoch: impl Into<String>) -> Self {
        Self {
            offset,
            epoch: epoch.into(),
        }
    }
}

fn require_non_empty(value: &str, field: &str) -> CentResult<()> {
    if value.is_empty() {
        Err(CentError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn to_json(data: impl Serialize) -> CentResult<Value> {
    serde_json::to_value(data)
        .map_err(|e| CentError::validation(format!("data is not JSON-serializable: {e}")))
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Parameters for the `publish` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    channel: String,
    data: Value,
    #[serde(default, skip_serializing_if = "is_false")]
    skip_history: bool,
}

impl PublishRequest {
    pub fn new(channel: impl Into<String>, data: impl Serialize) -> CentResult<Self> {
        let channel = channel.into();
        require_non_empty(&channel, "channel")?;
        Ok(Self {
            channel,
            data: to_json(data)?,
            skip_history: false,
        })
    }

    /// Do not save this publication to channel history
    pub fn skip_history(mut self, skip: bool) -> Self {
        self.skip_history = skip;
        self
    }
}

impl From<PublishRequest> for Command {
    fn from(req: PublishRequest) -> Self {
        Command::Publish(req)
    }
}

/// Parameters for the `broadcast` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastRequest {
    channels: Vec<String>,
    data: Value,
    #[serde(default, skip_serializing_if = "is_false")]
    skip_history: bool,
}

impl BroadcastRequest {
    pub fn new<I, S>(channels: I, data: impl Serialize) -> CentResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let channels: Vec<String> = channels.into_iter().map(Into::into).collect();
        if channels.is_empty() {
            return Err(CentError::validation("channels must not be empty"));
        }
        let mut seen = std::collections::HashSet::new();
        for channel in &channels {
            if !seen.insert(channel.as_str()) {
                return Err(CentError::validation(format!(
                    "duplicate channel: {channel}"
                )));
            }
        }
        Ok(Self {
            channels,
            data: to_json(data)?,
            skip_history: false,
        })
    }

    pub fn skip_history(mut self, skip: bool) -> Self {
        self.skip_history = skip;
        self
    }
}

impl From<BroadcastRequest> for Command {
    fn from(req: BroadcastRequest) -> Self {
        Command::Broadcast(req)
    }
}

/// Parameters for the `subscribe` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    channel: String,
    user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    client: String,
}

impl SubscribeRequest {
    pub fn new(channel: impl Into<String>, user: impl Into<String>) -> CentResult<Self> {
        let channel = channel.into();
        let user = user.into();
        require_non_empty(&channel, "channel")?;
        require_non_empty(&user, "user")?;
        Ok(Self {
            channel,
            user,
            client: String::new(),
        })
    }

    /// Target a specific client connection instead of all of the user's connections
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }
}

impl From<SubscribeRequest> for Command {
    fn from(req: SubscribeRequest) -> Self {
        Command::Subscribe(req)
    }
}

/// Parameters for the `unsubscribe` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribeRequest {
    channel: String,
    user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    client: String,
}

impl UnsubscribeRequest {
    pub fn new(channel: impl Into<String>, user: impl Into<String>) -> CentResult<Self> {
        let channel = channel.into();
        let user = user.into();
        require_non_empty(&channel, "channel")?;
        require_non_empty(&user, "user")?;
        Ok(Self {
            channel,
            user,
            client: String::new(),
        })
    }

    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }
}

impl From<UnsubscribeRequest> for Command {
    fn from(req: UnsubscribeRequest) -> Self {
        Command::Unsubscribe(req)
    }
}

/// Parameters for the `disconnect` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisconnectRequest {
    user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    client: String,
}

impl DisconnectRequest {
    pub fn new(user: impl Into<String>) -> CentResult<Self> {
        let user = user.into();
        require_non_empty(&user, "user")?;
        Ok(Self {
            user,
            client: String::new(),
        })
    }

    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }
}

impl From<DisconnectRequest> for Command {
    fn from(req: DisconnectRequest) -> Self {
        Command::Disconnect(req)
    }
}

/// Parameters for the `presence` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceRequest {
    channel: String,
}

impl PresenceRequest {
    pub fn new(channel: impl Into<String>) -> CentResult<Self> {
        let channel = channel.into();
        require_non_empty(&channel, "channel")?;
        Ok(Self { channel })
    }
}

impl From<PresenceRequest> for Command {
    fn from(req: PresenceRequest) -> Self {
        Command::Presence(req)
    }
}

/// Parameters for the `presence_stats` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceStatsRequest {
    channel: String,
}

impl PresenceStatsRequest {
    pub fn new(channel: impl Into<String>) -> CentResult<Self> {
        let channel = channel.into();
        require_non_empty(&channel, "channel")?;
        Ok(Self { channel })
    }
}

impl From<PresenceStatsRequest> for Command {
    fn from(req: PresenceStatsRequest) -> Self {
        Command::PresenceStats(req)
    }
}

/// Parameters for the `history` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRequest {
    channel: String,
    // 0 means "server default", always sent on the wire
    #[serde(default)]
    limit: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    since: Option<StreamPosition>,
    #[serde(default, skip_serializing_if = "is_false")]
    reverse: bool,
}

impl HistoryRequest {
    pub fn new(channel: impl Into<String>) -> CentResult<Self> {
        let channel = channel.into();
        require_non_empty(&channel, "channel")?;
        Ok(Self {
            channel,
            limit: 0,
            since: None,
            reverse: false,
        })
    }

    /// Maximum number of publications to return; 0 leaves it to the server
    pub fn limit(mut self, limit: i64) -> CentResult<Self> {
        if limit < 0 {
            return Err(CentError::validation("limit must not be negative"));
        }
        self.limit = limit;
        Ok(self)
    }

    /// Return only publications after this stream position
    pub fn since(mut self, position: StreamPosition) -> Self {
        self.since = Some(position);
        self
    }

    /// Iterate history from the newest publication backwards
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}

impl From<HistoryRequest> for Command {
    fn from(req: HistoryRequest) -> Self {
        Command::History(req)
    }
}

/// Parameters for the `channels` command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pattern: String,
}

impl ChannelsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Glob-like filter; empty means all channels
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }
}

impl From<ChannelsRequest> for Command {
    fn from(req: ChannelsRequest) -> Self {
        Command::Channels(req)
    }
}

/// Parameters for the `info` command (none)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoRequest {}

impl InfoRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<InfoRequest> for Command {
    fn from(req: InfoRequest) -> Self {
        Command::Info(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn publish_wire_shape() {
        let cmd = Command::publish("news", json!({"text": "hello"})).unwrap();
        assert_eq!(cmd.method(), "publish");
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "method": "publish",
                "params": {"channel": "news", "data": {"text": "hello"}}
            })
        );
    }

    #[test]
    fn publish_skip_history_on_wire_only_when_set() {
        let cmd: Command = PublishRequest::new("news", json!(1))
            .unwrap()
            .skip_history(true)
            .into();
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["params"]["skip_history"], json!(true));

        let plain = Command::publish("news", json!(1)).unwrap();
        let value = serde_json::to_value(&plain).unwrap();
        assert!(value["params"].get("skip_history").is_none());
    }

    #[test]
    fn publish_rejects_empty_channel() {
        let err = Command::publish("", json!(null)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn broadcast_preserves_channel_order() {
        let cmd = Command::broadcast(["a", "b", "c"], json!("x")).unwrap();
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["params"]["channels"], json!(["a", "b", "c"]));
    }

    #[test]
    fn broadcast_rejects_empty_channels() {
        let err = Command::broadcast(Vec::<String>::new(), json!("x")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn broadcast_rejects_duplicate_channels() {
        let err = Command::broadcast(["news", "chat", "news"], json!("x")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn subscribe_client_omitted_when_empty() {
        let cmd = Command::subscribe("news", "u1").unwrap();
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["params"], json!({"channel": "news", "user": "u1"}));

        let cmd: Command = SubscribeRequest::new("news", "u1")
            .unwrap()
            .client("c-42")
            .into();
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["params"]["client"], json!("c-42"));
    }

    #[test]
    fn disconnect_requires_user() {
        assert!(Command::disconnect("").unwrap_err().is_validation());
        assert!(Command::disconnect("u1").is_ok());
    }

    #[test]
    fn history_negative_limit_rejected() {
        let err = HistoryRequest::new("news").unwrap().limit(-1).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn history_zero_limit_sent_on_wire() {
        let cmd: Command = HistoryRequest::new("news").unwrap().into();
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["params"]["limit"], json!(0));
    }

    #[test]
    fn history_with_all_options() {
        let cmd: Command = HistoryRequest::new("news")
            .unwrap()
            .limit(10)
            .unwrap()
            .since(StreamPosition::new(7, "epoch-1"))
            .reverse(true)
            .into();
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            value["params"],
            json!({
                "channel": "news",
                "limit": 10,
                "since": {"offset": 7, "epoch": "epoch-1"},
                "reverse": true
            })
        );
    }

    #[test]
    fn presence_stats_method_name() {
        let cmd = Command::presence_stats("news").unwrap();
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["method"], json!("presence_stats"));
    }

    #[test]
    fn channels_pattern_omitted_when_empty() {
        let all = Command::channels("");
        assert_eq!(
            serde_json::to_value(&all).unwrap()["params"],
            json!({})
        );
        let filtered = Command::channels("chat:*");
        assert_eq!(
            serde_json::to_value(&filtered).unwrap()["params"]["pattern"],
            json!("chat:*")
        );
    }

    #[test]
    fn publish_round_trips_through_wire_form() {
        let cmd: Command = PublishRequest::new("news", json!({"text": "hello"}))
            .unwrap()
            .skip_history(true)
            .into();
        let wire = serde_json::to_value(&cmd).unwrap();
        let decoded: Command = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(decoded.method(), "publish");
        assert_eq!(serde_json::to_value(&decoded).unwrap(), wire);
    }

    #[test]
    fn history_round_trips_with_all_options() {
        let cmd: Command = HistoryRequest::new("news")
            .unwrap()
            .limit(10)
            .unwrap()
            .since(StreamPosition::new(7, "epoch-1"))
            .reverse(true)
            .into();
        let wire = serde_json::to_value(&cmd).unwrap();
        let decoded: Command = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(serde_json::to_value(&decoded).unwrap(), wire);
    }

    #[test]
    fn decoded_command_keeps_omitted_optionals_omitted() {
        let wire = json!({"method": "subscribe", "params": {"channel": "news", "user": "u1"}});
        let decoded: Command = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(serde_json::to_value(&decoded).unwrap(), wire);
    }

    #[test]
    fn info_has_empty_params() {
        let cmd = Command::info();
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"method": "info", "params": {}})
        );
    }
}
