/// Events decoded from the chat response stream.
///
/// Each `data: ...` line maps to at most one event. The literal `[DONE]`
/// sentinel maps to `Done` without JSON parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental content fragment to append to the response buffer.
    Token { text: String },
    /// Non-content status update; does not touch the response buffer.
    Progress { message: String },
    /// Terminal server-side failure for this session.
    Error { message: String },
    /// Successful end of stream.
    Done,
}

pub(crate) const DONE_SENTINEL: &str = "[DONE]";

impl StreamEvent {
    /// Decodes one frame payload (the `data: ` line with prefix stripped and
    /// whitespace trimmed).
    ///
    /// Returns `Ok(None)` for parseable payloads that carry none of the known
    /// fields. When a frame carries several fields, `error` wins over `token`,
    /// which wins over `progress`.
    pub fn from_payload(payload: &str) -> Result<Option<Self>, serde_json::Error> {
        if payload == DONE_SENTINEL {
            return Ok(Some(Self::Done));
        }
        let value: serde_json::Value = serde_json::from_str(payload)?;
        if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
            return Ok(Some(Self::Error {
                message: message.to_string(),
            }));
        }
        if let Some(text) = value.get("token").and_then(|v| v.as_str()) {
            return Ok(Some(Self::Token {
                text: text.to_string(),
            }));
        }
        if let Some(message) = value.get("progress").and_then(|v| v.as_str()) {
            return Ok(Some(Self::Progress {
                message: message.to_string(),
            }));
        }
        Ok(None)
    }

    /// Returns true if this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::Done)
    }
}
