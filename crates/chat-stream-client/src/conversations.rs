//! Conversation store client and markdown transcript export.
//!
//! CRUD over `/api/conversations` plus the pure formatting helper used by
//! the copy/export actions.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::client::{ChatClient, check_status};
use crate::errors::ClientError;

/// One conversation as returned by the list and create endpoints.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Content of the latest message, when the endpoint provides it.
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_response: Option<String>,
}

/// One stored exchange: the user message and the assistant response.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A conversation with its full message history.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
}

#[derive(serde::Serialize)]
struct RenameRequest<'a> {
    title: &'a str,
}

impl ChatClient {
    /// Lists conversations, most recently updated first.
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        let response = self
            .get(self.config.conversations_url())
            .await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("invalid conversation list: {e}")))
    }

    /// Creates a new, empty conversation.
    pub async fn create_conversation(&self) -> Result<Conversation, ClientError> {
        let response = self
            .client
            .post(self.config.conversations_url())
            .bearer_auth(&self.config.bearer_token)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("create conversation failed: {e}")))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("invalid conversation payload: {e}")))
    }

    /// Fetches one conversation with its message history.
    pub async fn conversation(&self, conversation_id: &str) -> Result<ConversationDetail, ClientError> {
        let response = self
            .get(self.config.conversation_url(conversation_id))
            .await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("invalid conversation detail: {e}")))
    }

    /// Renames a conversation.
    pub async fn rename_conversation(
        &self,
        conversation_id: &str,
        title: &str,
    ) -> Result<(), ClientError> {
        if title.trim().is_empty() {
            return Err(ClientError::Validation("title must not be empty".into()));
        }
        debug!(conversation_id, title, "renaming conversation");
        let response = self
            .client
            .put(self.config.conversation_url(conversation_id))
            .bearer_auth(&self.config.bearer_token)
            .timeout(self.config.timeout)
            .json(&RenameRequest { title })
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("rename conversation failed: {e}")))?;
        check_status(response).await?;
        Ok(())
    }

    /// Deletes a conversation and all of its messages.
    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<(), ClientError> {
        debug!(conversation_id, "deleting conversation");
        let response = self
            .client
            .delete(self.config.conversation_url(conversation_id))
            .bearer_auth(&self.config.bearer_token)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("delete conversation failed: {e}")))?;
        check_status(response).await?;
        Ok(())
    }

    async fn get(&self, url: String) -> Result<reqwest::Response, ClientError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.bearer_token)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("request failed: {e}")))?;
        check_status(response).await
    }
}

/// Formats a conversation as a markdown transcript, the format used by the
/// copy and export actions.
pub fn transcript_markdown(detail: &ConversationDetail, exported_at: DateTime<Utc>) -> String {
    let mut out = String::from("# Chat Export\n\n");
    out.push_str(&format!(
        "Date: {}\n",
        exported_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Title: {}\n", detail.conversation.title));
    out.push_str("\n---\n\n");

    for message in &detail.messages {
        if let Some(content) = message.content.as_deref() {
            let timestamp = message
                .timestamp
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "unknown time".to_string());
            out.push_str(&format!("### User ({timestamp}):\n{content}\n\n"));
        }
        if let Some(response) = message.response.as_deref() {
            out.push_str(&format!("### Assistant:\n{response}\n\n"));
        }
        out.push_str("---\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn conversation_list_payload_deserializes() {
        let payload = serde_json::json!([{
            "id": "c1",
            "title": "New Conversation",
            "created_at": "2026-08-20T10:00:00Z",
            "updated_at": "2026-08-20T10:05:00Z",
            "last_message": "hello",
            "last_response": "hi there"
        }]);
        let conversations: Vec<Conversation> =
            serde_json::from_value(payload).expect("deserialize");
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].id, "c1");
        assert_eq!(conversations[0].last_message.as_deref(), Some("hello"));
    }

    #[test]
    fn conversation_detail_tolerates_extra_message_fields() {
        let payload = serde_json::json!({
            "conversation": {"id": "c1", "title": "T"},
            "messages": [{
                "id": 7,
                "content": "question",
                "response": "answer",
                "timestamp": "2026-08-20T10:00:00Z",
                "files": [],
                "token_count": 12,
                "model_used": "m"
            }]
        });
        let detail: ConversationDetail = serde_json::from_value(payload).expect("deserialize");
        assert_eq!(detail.messages.len(), 1);
        assert_eq!(detail.messages[0].content.as_deref(), Some("question"));
        assert_eq!(detail.messages[0].response.as_deref(), Some("answer"));
    }

    #[test]
    fn transcript_contains_header_sections_and_separators() {
        let detail = ConversationDetail {
            conversation: Conversation {
                id: "c1".into(),
                title: "Rust questions".into(),
                created_at: None,
                updated_at: None,
                last_message: None,
                last_response: None,
            },
            messages: vec![StoredMessage {
                content: Some("What is a borrow?".into()),
                response: Some("A reference with rules.".into()),
                timestamp: Some(Utc.with_ymd_and_hms(2026, 8, 20, 10, 0, 0).unwrap()),
            }],
        };
        let exported_at = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();

        let transcript = transcript_markdown(&detail, exported_at);
        assert!(transcript.starts_with("# Chat Export\n\nDate: 2026-08-25 12:00:00 UTC\n"));
        assert!(transcript.contains("Title: Rust questions\n"));
        assert!(transcript.contains("### User (2026-08-20 10:00:00 UTC):\nWhat is a borrow?\n"));
        assert!(transcript.contains("### Assistant:\nA reference with rules.\n"));
        assert!(transcript.ends_with("---\n\n"));
    }

    #[test]
    fn transcript_skips_absent_sides_of_an_exchange() {
        let detail = ConversationDetail {
            conversation: Conversation {
                id: "c1".into(),
                title: "T".into(),
                created_at: None,
                updated_at: None,
                last_message: None,
                last_response: None,
            },
            messages: vec![StoredMessage {
                content: Some("pending question".into()),
                response: None,
                timestamp: None,
            }],
        };
        let transcript = transcript_markdown(&detail, Utc::now());
        assert!(transcript.contains("### User (unknown time):\npending question\n"));
        assert!(!transcript.contains("### Assistant:"));
    }
}
