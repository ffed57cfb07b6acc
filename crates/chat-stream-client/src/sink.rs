use std::sync::Arc;

use crate::render::MarkdownRender;

/// Rendering target driven by a streaming session.
///
/// `on_token` always receives the full accumulated buffer, not a delta, so
/// the sink can replace its displayed content wholesale. After `on_done`,
/// `on_error`, or `on_cancelled` the session issues no further calls.
pub trait RenderSink: Send {
    /// The accumulated response text grew; re-render and replace the display.
    fn on_token(&mut self, full_text: &str);
    /// Non-content status update (for example a "warming up" notice).
    fn on_progress(&mut self, message: &str);
    /// Terminal failure for this session.
    fn on_error(&mut self, message: &str);
    /// The stream completed successfully.
    fn on_done(&mut self);
    /// The session was stopped by the user.
    fn on_cancelled(&mut self);
}

/// Sink that ignores every callback, for collect-style consumption where the
/// caller only wants the final text.
pub struct NullSink;

impl RenderSink for NullSink {
    fn on_token(&mut self, _full_text: &str) {}
    fn on_progress(&mut self, _message: &str) {}
    fn on_error(&mut self, _message: &str) {}
    fn on_done(&mut self) {}
    fn on_cancelled(&mut self) {}
}

/// Sink that keeps an HTML rendering of the response plus a transient status
/// line, re-rendering the whole buffer through a markdown renderer on every
/// token.
pub struct MarkdownView {
    renderer: Arc<dyn MarkdownRender>,
    html: String,
    status: Option<String>,
}

impl MarkdownView {
    pub fn new(renderer: Arc<dyn MarkdownRender>) -> Self {
        Self {
            renderer,
            html: String::new(),
            status: None,
        }
    }

    /// Current HTML for the chat output area.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Current status line, if a progress update is pending display.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

impl RenderSink for MarkdownView {
    fn on_token(&mut self, full_text: &str) {
        self.status = None;
        self.html = self.renderer.render(full_text);
    }

    fn on_progress(&mut self, message: &str) {
        self.status = Some(message.to_string());
    }

    fn on_error(&mut self, message: &str) {
        self.status = None;
        self.html = self.renderer.render(&format!("Error: {message}"));
    }

    fn on_done(&mut self) {
        self.status = None;
    }

    fn on_cancelled(&mut self) {
        self.status = None;
    }
}
