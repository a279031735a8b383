// Reply model: per-command replies and typed operation results

use crate::error::{CentError, CentResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Server-reported failure for a single command.
///
/// Failing one command never affects its siblings in the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u32,
    pub message: String,
}

/// Reply to one command, at the same index as the command in its batch.
///
/// A well-formed reply populates exactly one of `result` and `error`; a bare
/// `{}` counts as an empty-result success (operations like `subscribe` return
/// nothing on success).
#[derive(Debug, Clone, Deserialize)]
pub struct CommandReply {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

impl CommandReply {
    /// Whether the server reported an error for this command
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Unwrap into the raw result value, converting a server error into
    /// [`CentError::Api`].
    pub fn into_result(self) -> CentResult<Value> {
        if let Some(err) = self.error {
            return Err(CentError::api(err.code, err.message));
        }
        Ok(self.result.unwrap_or_else(|| Value::Object(Default::default())))
    }

    /// Unwrap and decode into a typed result
    pub fn into_typed<T: serde::de::DeserializeOwned>(self) -> CentResult<T> {
        let value = self.into_result()?;
        serde_json::from_value(value.clone()).map_err(|e| {
            CentError::protocol(format!("failed to decode result: {e}"), value.to_string())
        })
    }
}

/// Result of `publish`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishResult {
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub epoch: Option<String>,
}

/// Result of `broadcast`: one reply per target channel, in request order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastResult {
    #[serde(default)]
    pub responses: Vec<CommandReply>,
}

/// Information about one connected client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub user: String,
    pub client: String,
    #[serde(default)]
    pub conn_info: Option<Value>,
    #[serde(default)]
    pub chan_info: Option<Value>,
}

/// Result of `presence`: connected clients keyed by client id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresenceResult {
    #[serde(default)]
    pub presence: HashMap<String, ClientInfo>,
}

/// Result of `presence_stats`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresenceStatsResult {
    #[serde(default)]
    pub num_clients: u64,
    #[serde(default)]
    pub num_users: u64,
}

/// One saved publication returned by `history`
#[derive(Debug, Clone, Deserialize)]
pub struct Publication {
    pub data: Value,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub info: Option<ClientInfo>,
}

/// Result of `history`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResult {
    #[serde(default)]
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub epoch: Option<String>,
}

/// Per-channel counters returned by `channels`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelInfo {
    #[serde(default)]
    pub num_clients: u64,
}

/// Result of `channels`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelsResult {
    #[serde(default)]
    pub channels: HashMap<String, ChannelInfo>,
}

/// One server node as reported by `info`
#[derive(Debug, Clone, Deserialize)]
pub struct NodeInfo {
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub num_clients: u64,
    #[serde(default)]
    pub num_users: u64,
    #[serde(default)]
    pub num_channels: u64,
    #[serde(default)]
    pub uptime: u64,
}

/// Result of `info`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoResult {
    #[serde(default)]
    pub nodes: Vec<NodeInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_reply_unwraps_result() {
        let reply: CommandReply =
            serde_json::from_value(json!({"result": {"offset": 3, "epoch": "xyz"}})).unwrap();
        assert!(!reply.is_error());
        let result: PublishResult = reply.into_typed().unwrap();
        assert_eq!(result.offset, Some(3));
        assert_eq!(result.epoch.as_deref(), Some("xyz"));
    }

    #[test]
    fn error_reply_becomes_api_error() {
        let reply: CommandReply =
            serde_json::from_value(json!({"error": {"code": 102, "message": "unknown channel"}}))
                .unwrap();
        assert!(reply.is_error());
        let err = reply.into_result().unwrap_err();
        assert_eq!(err.api_code(), Some(102));
    }

    #[test]
    fn empty_reply_is_empty_success() {
        let reply: CommandReply = serde_json::from_value(json!({})).unwrap();
        assert_eq!(reply.into_result().unwrap(), json!({}));
    }

    #[test]
    fn presence_decodes_client_map() {
        let reply: CommandReply = serde_json::from_value(json!({
            "result": {
                "presence": {
                    "c-1": {"user": "u1", "client": "c-1"},
                    "c-2": {"user": "u2", "client": "c-2", "conn_info": {"name": "n"}}
                }
            }
        }))
        .unwrap();
        let result: PresenceResult = reply.into_typed().unwrap();
        assert_eq!(result.presence.len(), 2);
        assert_eq!(result.presence["c-2"].user, "u2");
        assert!(result.presence["c-2"].conn_info.is_some());
    }

    #[test]
    fn history_decodes_publications() {
        let reply: CommandReply = serde_json::from_value(json!({
            "result": {
                "publications": [
                    {"data": {"text": "a"}, "offset": 1},
                    {"data": {"text": "b"}, "offset": 2}
                ],
                "offset": 2,
                "epoch": "e1"
            }
        }))
        .unwrap();
        let result: HistoryResult = reply.into_typed().unwrap();
        assert_eq!(result.publications.len(), 2);
        assert_eq!(result.publications[1].offset, Some(2));
        assert_eq!(result.epoch.as_deref(), Some("e1"));
    }

    #[test]
    fn info_decodes_nodes() {
        let reply: CommandReply = serde_json::from_value(json!({
            "result": {"nodes": [{"uid": "n-1", "version": "5.0.0", "num_clients": 12}]}
        }))
        .unwrap();
        let result: InfoResult = reply.into_typed().unwrap();
        assert_eq!(result.nodes[0].uid, "n-1");
        assert_eq!(result.nodes[0].num_clients, 12);
    }
}
