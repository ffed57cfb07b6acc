use std::pin::Pin;

use futures::TryStreamExt as _;
use tracing::debug;

use crate::config::ChatClientConfig;
use crate::errors::ClientError;
use crate::session::{ChatView, SessionOutcome};
use crate::sink::NullSink;

/// Response body byte stream handed to a `StreamSession`.
pub type ByteStream =
    Pin<Box<dyn futures::Stream<Item = Result<bytes::Bytes, ClientError>> + Send + 'static>>;

/// Request body for `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: String,
}

/// HTTP client for the chat backend.
pub struct ChatClient {
    pub(crate) client: reqwest::Client,
    pub(crate) config: ChatClientConfig,
}

impl ChatClient {
    /// Creates a client from explicit configuration.
    pub fn new(config: ChatClientConfig) -> Result<Self, ClientError> {
        if config.bearer_token.trim().is_empty() {
            return Err(ClientError::Config(
                "chat client config bearer_token must not be empty".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build chat client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Creates a client using `CHAT_API_TOKEN` (and `CHAT_API_BASE_URL`).
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ChatClientConfig::from_env()?)
    }

    /// Submits a chat message and returns the streaming response body.
    ///
    /// The returned stream is ready to hand to `StreamSession::consume`. A
    /// non-success status is reported here, before any session starts. No
    /// overall timeout is applied to the stream; it runs until completion,
    /// failure, or cancellation.
    pub async fn open_chat_stream(
        &self,
        message: &str,
        conversation_id: &str,
    ) -> Result<ByteStream, ClientError> {
        if message.trim().is_empty() {
            return Err(ClientError::Validation("message must not be empty".into()));
        }
        if conversation_id.trim().is_empty() {
            return Err(ClientError::Validation(
                "conversation_id must not be empty".into(),
            ));
        }
        let body = ChatRequest {
            message: message.to_string(),
            conversation_id: conversation_id.to_string(),
        };
        debug!(conversation_id, "submitting chat message");

        let response = self
            .client
            .post(self.config.chat_url())
            .bearer_auth(&self.config.bearer_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("chat request failed: {e}")))?;
        let response = check_status(response).await?;

        Ok(Box::pin(response.bytes_stream().map_err(|e| {
            ClientError::Transport(format!("chat stream read failed: {e}"))
        })))
    }

    /// Runs one submission to completion and returns the full response text.
    ///
    /// Convenience for callers that do not render incrementally.
    pub async fn collect_text(
        &self,
        message: &str,
        conversation_id: &str,
    ) -> Result<String, ClientError> {
        let bytes = self.open_chat_stream(message, conversation_id).await?;
        let mut view = ChatView::new();
        let mut session = view.begin();
        match session.consume(bytes, &mut NullSink).await {
            SessionOutcome::Done => Ok(session.text().to_string()),
            SessionOutcome::Failed(failure) => Err(ClientError::Session(failure)),
            SessionOutcome::Cancelled => Err(ClientError::Cancelled),
        }
    }
}

/// Maps a non-success response to an API error carrying status and body.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatClientConfig;

    fn client() -> ChatClient {
        ChatClient::new(ChatClientConfig::new("test-token")).expect("client")
    }

    #[test]
    fn new_rejects_an_empty_bearer_token() {
        let err = ChatClient::new(ChatClientConfig::new("  "));
        assert!(matches!(err, Err(ClientError::Config(_))));
    }

    #[tokio::test]
    async fn open_chat_stream_rejects_an_empty_message() {
        let err = client().open_chat_stream("   ", "conv-1").await;
        assert!(
            matches!(err, Err(ClientError::Validation(msg)) if msg.contains("message"))
        );
    }

    #[tokio::test]
    async fn open_chat_stream_rejects_an_empty_conversation_id() {
        let err = client().open_chat_stream("hello", "").await;
        assert!(
            matches!(err, Err(ClientError::Validation(msg)) if msg.contains("conversation_id"))
        );
    }

    #[test]
    fn chat_request_serializes_both_fields() {
        let body = ChatRequest {
            message: "hello".into(),
            conversation_id: "conv-1".into(),
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(value.get("message").and_then(|v| v.as_str()), Some("hello"));
        assert_eq!(
            value.get("conversation_id").and_then(|v| v.as_str()),
            Some("conv-1")
        );
    }

    #[tokio::test]
    async fn env_gated_smoke_collect_text_if_token_present() {
        if std::env::var("CHAT_API_TOKEN")
            .unwrap_or_default()
            .trim()
            .is_empty()
        {
            eprintln!("skipping chat API smoke test (CHAT_API_TOKEN missing)");
            return;
        }

        let client = ChatClient::from_env().expect("client");
        let conversation = client.create_conversation().await.expect("conversation");
        let result = client.collect_text("Say hello.", &conversation.id).await;
        assert!(result.is_ok(), "chat smoke failed: {result:?}");
    }
}
