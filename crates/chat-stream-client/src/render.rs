/// Markdown-to-HTML renderer used for the chat output area.
///
/// Implementations must be pure: rendering the same input twice yields the
/// same output, since the whole accumulated buffer is re-rendered after
/// every token.
pub trait MarkdownRender: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// Default implementation using pulldown-cmark.
pub struct PulldownRenderer;

impl MarkdownRender for PulldownRenderer {
    fn render(&self, markdown: &str) -> String {
        use pulldown_cmark::{Parser, html};
        let mut out = String::new();
        html::push_html(&mut out, Parser::new(markdown));
        out
    }
}
