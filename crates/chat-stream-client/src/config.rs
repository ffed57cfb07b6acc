use std::time::Duration;

use crate::errors::ClientError;

/// Configuration for the chat API client.
#[derive(Clone, Debug)]
pub struct ChatClientConfig {
    /// Base URL of the chat backend.
    pub base_url: String,
    /// Bearer token attached to every request.
    pub bearer_token: String,
    /// Default HTTP timeout for non-streaming requests.
    pub timeout: Duration,
}

impl ChatClientConfig {
    /// Creates a config with defaults and a provided bearer token.
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            bearer_token: bearer_token.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds a config from `CHAT_API_TOKEN` and optionally
    /// `CHAT_API_BASE_URL`.
    pub fn from_env() -> Result<Self, ClientError> {
        let token = std::env::var("CHAT_API_TOKEN").unwrap_or_default();
        if token.trim().is_empty() {
            return Err(ClientError::Config(
                "missing CHAT_API_TOKEN for chat client".into(),
            ));
        }
        let mut config = Self::new(token);
        if let Ok(base_url) = std::env::var("CHAT_API_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Overrides the backend base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the default HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn conversations_url(&self) -> String {
        format!("{}/api/conversations", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn conversation_url(&self, conversation_id: &str) -> String {
        format!("{}/{conversation_id}", self.conversations_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_tolerate_a_trailing_slash_on_the_base() {
        let config = ChatClientConfig::new("t").base_url("https://chat.example.com/");
        assert_eq!(config.chat_url(), "https://chat.example.com/api/chat");
        assert_eq!(
            config.conversation_url("abc"),
            "https://chat.example.com/api/conversations/abc"
        );
    }
}
