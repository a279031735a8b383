// Batch dispatch: one request per batch, positional reply correlation

use crate::api::command::Command;
use crate::api::reply::CommandReply;
use crate::error::{CentError, CentResult};
use crate::http::Transport;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Submits commands over a [`Transport`] and correlates replies.
///
/// Commands are never reordered or dropped: the reply vector has the same
/// length as the command slice, index for index. A server error on one
/// command only populates that reply's `error`; siblings keep their results.
#[derive(Clone)]
pub struct BatchDispatcher {
    transport: Arc<dyn Transport>,
}

impl BatchDispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Dispatch one or more commands as a single request.
    ///
    /// A single command is sent in the single-object request form; several
    /// commands are sent as a JSON array in caller order. Either way the
    /// contract is the same: one reply per command, same positions.
    pub async fn dispatch(&self, commands: &[Command]) -> CentResult<Vec<CommandReply>> {
        if commands.is_empty() {
            return Err(CentError::validation("batch must contain at least one command"));
        }

        let body = if commands.len() == 1 {
            serde_json::to_vec(&commands[0])
        } else {
            serde_json::to_vec(commands)
        }
        .map_err(|e| CentError::validation(format!("failed to encode request: {e}")))?;

        debug!(
            count = commands.len(),
            first = commands[0].method(),
            "dispatching command batch"
        );

        let response = self.transport.send(body).await?;
        if !response.is_success() {
            return Err(CentError::api(u32::from(response.status), response.text()));
        }

        let raw = response.text();
        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|e| CentError::protocol(format!("response is not valid JSON: {e}"), raw.clone()))?;

        let replies = match value {
            // The server may answer a single-command request with either a
            // bare object or a one-element array.
            Value::Array(items) => items
                .into_iter()
                .map(|item| decode_reply(item, &raw))
                .collect::<CentResult<Vec<_>>>()?,
            item @ Value::Object(_) => vec![decode_reply(item, &raw)?],
            _ => {
                return Err(CentError::protocol(
                    "response is neither an object nor an array",
                    raw,
                ));
            }
        };

        if replies.len() != commands.len() {
            return Err(CentError::protocol(
                format!(
                    "reply count mismatch: sent {} commands, got {} replies",
                    commands.len(),
                    replies.len()
                ),
                raw,
            ));
        }

        let failed = replies.iter().filter(|r| r.is_error()).count();
        if failed > 0 {
            warn!(failed, total = replies.len(), "batch contained failed commands");
        }

        Ok(replies)
    }
}

fn decode_reply(value: Value, raw: &str) -> CentResult<CommandReply> {
    serde_json::from_value(value)
        .map_err(|e| CentError::protocol(format!("malformed reply element: {e}"), raw.to_string()))
}
