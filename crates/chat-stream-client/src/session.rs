use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt as _;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::ByteStream;
use crate::decoder::FrameDecoder;
use crate::errors::SessionFailure;
use crate::event::StreamEvent;
use crate::sink::RenderSink;

/// Marker appended to the response buffer when the user stops generation,
/// so the partial text stays visible instead of being discarded.
const STOPPED_MARKER: &str = "\n\n*generation stopped by user*";

/// Generic message shown when the network read fails mid-stream.
const TRANSPORT_FAILURE_MESSAGE: &str = "failed to generate response";

/// Handle used to request cancellation of an in-flight session.
///
/// Cancellation is cooperative: the read loop observes the signal at its
/// next suspension point, renders the stop marker, and emits `on_cancelled`
/// as its final sink call.
#[derive(Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Requests cancellation.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Terminal outcome of one streaming session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The stream ended with `[DONE]` or a clean connection close.
    Done,
    /// The stream ended with a server error frame or a transport failure.
    Failed(SessionFailure),
    /// The session was stopped by the user or superseded by a newer one.
    Cancelled,
}

/// Owner of the single-active-session invariant for one chat output area.
///
/// Starting a new session cancels and invalidates the previous one, so two
/// sessions can never render into the same sink: a superseded session fails
/// its active check before every sink call and goes silent.
pub struct ChatView {
    current: Arc<AtomicU64>,
    handle: Option<CancelHandle>,
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            current: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    /// Starts a new session, cancelling any session previously started from
    /// this view.
    pub fn begin(&mut self) -> StreamSession {
        if let Some(prev) = self.handle.take() {
            prev.cancel();
        }
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, cancel_rx) = watch::channel(false);
        let handle = CancelHandle { tx };
        self.handle = Some(handle.clone());
        StreamSession::new(generation, Arc::clone(&self.current), cancel_rx, handle)
    }

    /// Cancels the active session, if any (the stop control).
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

/// One streamed chat response, from submission to terminal outcome.
///
/// Owns the accumulated text buffer, which only ever grows until the session
/// ends, and the cancellation state for the in-flight read.
pub struct StreamSession {
    session_id: uuid::Uuid,
    generation: u64,
    current: Arc<AtomicU64>,
    cancel_rx: watch::Receiver<bool>,
    handle: CancelHandle,
    buffer: String,
    first_token_seen: bool,
}

impl StreamSession {
    fn new(
        generation: u64,
        current: Arc<AtomicU64>,
        cancel_rx: watch::Receiver<bool>,
        handle: CancelHandle,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4(),
            generation,
            current,
            cancel_rx,
            handle,
            buffer: String::new(),
            first_token_seen: false,
        }
    }

    /// Returns the id of this session.
    pub fn session_id(&self) -> uuid::Uuid {
        self.session_id
    }

    /// Returns a handle that can cancel this session.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    /// Returns the accumulated response text so far.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Returns true once at least one token has been received; callers use
    /// this to drop "thinking" indicators.
    pub fn first_token_seen(&self) -> bool {
        self.first_token_seen
    }

    /// Returns false once a newer session has been started from the owning
    /// view.
    pub fn is_active(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Consumes the response byte stream to its terminal outcome, driving
    /// the sink after each decoded event.
    ///
    /// The byte stream (and with it the underlying connection) is dropped on
    /// every exit route. A stream that closes without a `[DONE]` frame is an
    /// implicit completion.
    pub async fn consume<S: RenderSink>(
        &mut self,
        mut bytes: ByteStream,
        sink: &mut S,
    ) -> SessionOutcome {
        let mut decoder = FrameDecoder::default();
        let mut cancel_rx = self.cancel_rx.clone();
        loop {
            if *self.cancel_rx.borrow() {
                return self.settle_cancelled(sink);
            }
            tokio::select! {
                biased;
                changed = cancel_rx.changed() => {
                    let cancelled = match changed {
                        Ok(()) => *cancel_rx.borrow(),
                        Err(_) => true,
                    };
                    if cancelled {
                        return self.settle_cancelled(sink);
                    }
                }
                next = bytes.next() => match next {
                    Some(Ok(chunk)) => {
                        for event in decoder.push_chunk(&chunk) {
                            if let Some(outcome) = self.apply(event, sink) {
                                return outcome;
                            }
                        }
                    }
                    Some(Err(err)) => {
                        warn!(session_id = %self.session_id, error = %err, "chat stream read failed");
                        if self.is_active() {
                            sink.on_error(TRANSPORT_FAILURE_MESSAGE);
                        }
                        return SessionOutcome::Failed(SessionFailure::Transport {
                            message: err.to_string(),
                        });
                    }
                    None => {
                        if let Some(event) = decoder.finish()
                            && let Some(outcome) = self.apply(event, sink)
                        {
                            return outcome;
                        }
                        // Stream closed without [DONE]: implicit completion.
                        debug!(session_id = %self.session_id, "stream closed, treating as done");
                        if self.is_active() {
                            sink.on_done();
                        }
                        return SessionOutcome::Done;
                    }
                }
            }
        }
    }

    fn apply<S: RenderSink>(&mut self, event: StreamEvent, sink: &mut S) -> Option<SessionOutcome> {
        if *self.cancel_rx.borrow() {
            return Some(self.settle_cancelled(sink));
        }
        if !self.is_active() {
            return Some(SessionOutcome::Cancelled);
        }
        match event {
            StreamEvent::Token { text } => {
                self.buffer.push_str(&text);
                self.first_token_seen = true;
                sink.on_token(&self.buffer);
                None
            }
            StreamEvent::Progress { message } => {
                debug!(session_id = %self.session_id, message, "progress update");
                sink.on_progress(&message);
                None
            }
            StreamEvent::Error { message } => {
                sink.on_error(&message);
                Some(SessionOutcome::Failed(SessionFailure::Server { message }))
            }
            StreamEvent::Done => {
                sink.on_done();
                Some(SessionOutcome::Done)
            }
        }
    }

    fn settle_cancelled<S: RenderSink>(&mut self, sink: &mut S) -> SessionOutcome {
        // A superseded session stays silent; its sink now belongs to the
        // newer session.
        if self.is_active() {
            debug!(session_id = %self.session_id, "generation stopped by user");
            self.buffer.push_str(STOPPED_MARKER);
            sink.on_token(&self.buffer);
            sink.on_cancelled();
        }
        SessionOutcome::Cancelled
    }
}
