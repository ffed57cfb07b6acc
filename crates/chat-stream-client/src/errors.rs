/// Terminal failure of one streaming session, reported through
/// `SessionOutcome::Failed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionFailure {
    /// The server sent an `{"error": ...}` frame; the message is verbatim.
    #[error("server error: {message}")]
    Server { message: String },
    /// The network read failed mid-stream.
    #[error("transport failure: {message}")]
    Transport { message: String },
}

/// Top-level error type for the client API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Invalid caller input.
    #[error("validation error: {0}")]
    Validation(String),
    /// Request or stream I/O failed.
    #[error("transport error: {0}")]
    Transport(String),
    /// The API answered with a non-success status before any stream started.
    #[error("chat API returned status {status}: {body}")]
    Api { status: u16, body: String },
    /// A started session ended in failure.
    #[error(transparent)]
    Session(#[from] SessionFailure),
    /// The session was cancelled before producing a final result.
    #[error("cancelled")]
    Cancelled,
}
