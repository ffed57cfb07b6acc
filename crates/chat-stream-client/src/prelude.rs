//! Common imports for typical client usage.
//!
//! Exports the types most callers need so application code and examples can
//! get by with a single import line.
pub use crate::{
    CancelHandle, ChatClient, ChatClientConfig, ChatRequest, ChatView, ClientError, Conversation,
    ConversationDetail, MarkdownRender, MarkdownView, NullSink, PulldownRenderer, RenderSink,
    SessionFailure, SessionOutcome, StreamEvent, StreamSession,
};
