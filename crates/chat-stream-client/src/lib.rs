//! Async client for a streaming chat API.
//!
//! Submits a message, consumes the newline-delimited `data: <json>` token
//! stream from the response body, and drives a render sink with the markdown
//! re-rendering of the full accumulated text after every token. One
//! `ChatView` owns at most one active session; starting a new submission
//! cancels the previous one.
//!
//! # Streaming usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use chat_stream_client::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ClientError> {
//! let client = ChatClient::from_env()?;
//! let conversation = client.create_conversation().await?;
//!
//! let mut view = ChatView::new();
//! let mut session = view.begin();
//! let stop = session.cancel_handle(); // wire to the stop control
//! let mut sink = MarkdownView::new(Arc::new(PulldownRenderer));
//!
//! let bytes = client
//!     .open_chat_stream("Explain borrowing briefly.", &conversation.id)
//!     .await?;
//! let outcome = session.consume(bytes, &mut sink).await;
//! drop(stop);
//!
//! println!("{:?}: {}", outcome, sink.html());
//! # Ok(())
//! # }
//! ```

/// HTTP client for the chat endpoint and the response byte stream type.
pub mod client;
/// Client configuration.
pub mod config;
/// Conversation store client and transcript export.
pub mod conversations;
/// Incremental line/frame decoding.
pub mod decoder;
/// Public error types.
pub mod errors;
/// Decoded stream events.
pub mod event;
/// Common imports for typical usage.
pub mod prelude;
/// Markdown rendering abstraction.
pub mod render;
/// Stream sessions, cancellation, and the single-active-session view.
pub mod session;
/// Render sink contract and the markdown view sink.
pub mod sink;

pub use client::{ByteStream, ChatClient, ChatRequest};
pub use config::ChatClientConfig;
pub use conversations::{Conversation, ConversationDetail, StoredMessage, transcript_markdown};
pub use decoder::FrameDecoder;
pub use errors::{ClientError, SessionFailure};
pub use event::StreamEvent;
pub use render::{MarkdownRender, PulldownRenderer};
pub use session::{CancelHandle, ChatView, SessionOutcome, StreamSession};
pub use sink::{MarkdownView, NullSink, RenderSink};
