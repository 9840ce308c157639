//! Markdown conversion.
//!
//! Markdown is turned into HTML by an asynchronous [`MarkdownToHtml`] collaborator and
//! the result goes through the same pipeline as [`convert_html`](crate::convert_html).
//! [`MarkdownConverter`] tracks the latest content; when the content changes while a
//! conversion is still in flight, only the newest conversion is ever applied.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pulldown_cmark::{html, Options, Parser};
use tracing::{debug, warn};

use crate::error::ConvertResult;
use crate::html::{ConvertOptions, HtmlConverter};
use crate::ui::UiNode;

/// Converts Markdown text to HTML text
#[async_trait]
pub trait MarkdownToHtml: Send + Sync {
    async fn to_html(&self, markdown: &str) -> ConvertResult<String>;
}

/// [`MarkdownToHtml`] backed by `pulldown-cmark`, with tables, strikethrough, footnotes
/// and task lists enabled
#[derive(Debug, Clone, Copy)]
pub struct PulldownConverter {
    options: Options,
}

impl Default for PulldownConverter {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }
}

impl PulldownConverter {
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[async_trait]
impl MarkdownToHtml for PulldownConverter {
    async fn to_html(&self, markdown: &str) -> ConvertResult<String> {
        Ok(self.render(markdown))
    }
}

#[derive(Default)]
struct MarkdownState {
    /// Bumped on every content change
    generation: u64,
    content: Option<String>,
    /// Latest converted HTML; empty until the current conversion lands
    html: String,
}

/// Markdown facade with last-request-wins semantics
pub struct MarkdownConverter {
    converter: Arc<dyn MarkdownToHtml>,
    html: HtmlConverter,
    state: Mutex<MarkdownState>,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter {
    /// Facade using `pulldown-cmark`, `ammonia` and `html5ever`
    pub fn new() -> Self {
        Self::with_converter(Arc::new(PulldownConverter::default()))
    }

    pub fn with_converter(converter: Arc<dyn MarkdownToHtml>) -> Self {
        Self::with_collaborators(converter, HtmlConverter::new())
    }

    pub fn with_collaborators(converter: Arc<dyn MarkdownToHtml>, html: HtmlConverter) -> Self {
        Self {
            converter,
            html,
            state: Mutex::new(MarkdownState::default()),
        }
    }

    /// Set the Markdown content and convert it.
    ///
    /// Unchanged content is a no-op. Otherwise the stored HTML is cleared and the
    /// converter is awaited. The result is applied only if no newer content was set in
    /// the meantime; stale results (including stale failures) are discarded. A failure
    /// of the current conversion is returned and leaves nothing to render; setting the
    /// same content again retries it.
    pub async fn set_content(&self, content: &str) -> ConvertResult<()> {
        let generation = {
            let mut state = self.lock();
            if state.content.as_deref() == Some(content) {
                return Ok(());
            }
            state.generation += 1;
            state.content = Some(content.to_string());
            state.html.clear();
            state.generation
        };

        let result = self.converter.to_html(content).await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                generation,
                current = state.generation,
                "discarding stale Markdown conversion"
            );
            return Ok(());
        }

        match result {
            Ok(html) => {
                state.html = html;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Markdown conversion failed");
                // Forget the content so setting it again retries the conversion
                state.content = None;
                Err(e)
            }
        }
    }

    /// UI nodes for the latest converted HTML; empty while a conversion is pending
    pub fn render(&self, options: &ConvertOptions) -> Vec<UiNode> {
        let html = self.html();
        if html.is_empty() {
            return Vec::new();
        }
        self.html.convert(&html, options)
    }

    /// Latest converted HTML
    pub fn html(&self) -> String {
        self.lock().html.clone()
    }

    /// Number of content changes seen so far
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    fn lock(&self) -> MutexGuard<'_, MarkdownState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One-shot Markdown conversion with the default collaborators
pub async fn convert_markdown(content: &str, options: &ConvertOptions) -> ConvertResult<Vec<UiNode>> {
    let converter = MarkdownConverter::new();
    converter.set_content(content).await?;
    Ok(converter.render(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::html::convert_html;
    use crate::markup::render_markup;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    /// Resolves each conversion only when its gate is opened by the test
    #[derive(Default)]
    struct GatedConverter {
        gates: Mutex<HashMap<String, oneshot::Receiver<ConvertResult<String>>>>,
    }

    impl GatedConverter {
        fn gate(&self, markdown: &str) -> oneshot::Sender<ConvertResult<String>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(markdown.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl MarkdownToHtml for GatedConverter {
        async fn to_html(&self, markdown: &str) -> ConvertResult<String> {
            let rx = self
                .gates
                .lock()
                .unwrap()
                .remove(markdown)
                .ok_or_else(|| ConvertError::MarkdownError(format!("no gate for {}", markdown)))?;
            rx.await
                .map_err(|e| ConvertError::MarkdownError(e.to_string()))?
        }
    }

    struct FailingConverter;

    #[async_trait]
    impl MarkdownToHtml for FailingConverter {
        async fn to_html(&self, _markdown: &str) -> ConvertResult<String> {
            Err(ConvertError::MarkdownError("converter crashed".to_string()))
        }
    }

    /// Fails on the first call, then renders every call
    #[derive(Default)]
    struct FlakyConverter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarkdownToHtml for FlakyConverter {
        async fn to_html(&self, markdown: &str) -> ConvertResult<String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ConvertError::MarkdownError("transient".to_string()));
            }
            Ok(PulldownConverter::default().render(markdown))
        }
    }

    #[test]
    fn test_pulldown_renders_heading() {
        let html = PulldownConverter::default().render("# Hello, world!");
        assert_eq!(html.trim(), "<h1>Hello, world!</h1>");
    }

    #[tokio::test]
    async fn test_heading_matches_html_conversion() {
        let options = ConvertOptions::default();
        let from_markdown = convert_markdown("# Hello, world!", &options).await.unwrap();
        let from_html = convert_html("<h1>Hello, world!</h1>", &options);
        assert_eq!(from_markdown, from_html);
        assert_eq!(render_markup(&from_markdown), "<h1>Hello, world!</h1>");
    }

    #[tokio::test]
    async fn test_renders_nothing_before_conversion() {
        let converter = MarkdownConverter::new();
        assert!(converter.render(&ConvertOptions::default()).is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_content_is_noop() {
        let converter = MarkdownConverter::new();
        converter.set_content("*hi*").await.unwrap();
        converter.set_content("*hi*").await.unwrap();
        assert_eq!(converter.generation(), 1);
    }

    #[tokio::test]
    async fn test_last_request_wins_when_older_resolves_last() {
        let gated = Arc::new(GatedConverter::default());
        let tx_a = gated.gate("A");
        let tx_b = gated.gate("B");
        let converter = MarkdownConverter::with_converter(gated);

        let driver = async {
            tokio::task::yield_now().await;
            tx_b.send(Ok("<p>B</p>".to_string())).unwrap();
            tokio::task::yield_now().await;
            tx_a.send(Ok("<p>A</p>".to_string())).unwrap();
        };
        let (a, b, ()) = tokio::join!(converter.set_content("A"), converter.set_content("B"), driver);
        assert!(a.is_ok());
        assert!(b.is_ok());

        assert_eq!(converter.html(), "<p>B</p>");
        assert_eq!(render_markup(&converter.render(&ConvertOptions::default())), "<p>B</p>");
    }

    #[tokio::test]
    async fn test_last_request_wins_when_older_resolves_first() {
        let gated = Arc::new(GatedConverter::default());
        let tx_a = gated.gate("A");
        let tx_b = gated.gate("B");
        let converter = MarkdownConverter::with_converter(gated);

        let driver = async {
            tokio::task::yield_now().await;
            tx_a.send(Ok("<p>A</p>".to_string())).unwrap();
            tokio::task::yield_now().await;
            assert_eq!(converter.html(), "");
            tx_b.send(Ok("<p>B</p>".to_string())).unwrap();
        };
        tokio::join!(converter.set_content("A"), converter.set_content("B"), driver);

        assert_eq!(converter.html(), "<p>B</p>");
    }

    #[tokio::test]
    async fn test_stale_failure_is_discarded() {
        let gated = Arc::new(GatedConverter::default());
        let tx_a = gated.gate("A");
        let tx_b = gated.gate("B");
        let converter = MarkdownConverter::with_converter(gated);

        let driver = async {
            tokio::task::yield_now().await;
            tx_b.send(Ok("<p>B</p>".to_string())).unwrap();
            tx_a.send(Err(ConvertError::MarkdownError("late".to_string()))).unwrap();
        };
        let (a, b, ()) = tokio::join!(converter.set_content("A"), converter.set_content("B"), driver);
        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(converter.html(), "<p>B</p>");
    }

    #[tokio::test]
    async fn test_failure_is_reported_and_renders_nothing() {
        let converter = MarkdownConverter::with_converter(Arc::new(FailingConverter));
        let result = converter.set_content("# Title").await;
        assert!(matches!(result, Err(ConvertError::MarkdownError(_))));
        assert!(converter.render(&ConvertOptions::default()).is_empty());
    }

    #[tokio::test]
    async fn test_content_change_clears_previous_html() {
        let gated = Arc::new(GatedConverter::default());
        let tx_a = gated.gate("A");
        let converter = MarkdownConverter::with_converter(gated.clone());
        tx_a.send(Ok("<p>A</p>".to_string())).unwrap();
        converter.set_content("A").await.unwrap();
        assert_eq!(converter.html(), "<p>A</p>");

        let tx_b = gated.gate("B");
        let pending = converter.set_content("B");
        let driver = async {
            tokio::task::yield_now().await;
            assert_eq!(converter.html(), "");
            tx_b.send(Ok("<p>B</p>".to_string())).unwrap();
        };
        let (result, ()) = tokio::join!(pending, driver);
        assert!(result.is_ok());
        assert_eq!(converter.html(), "<p>B</p>");
    }

    #[tokio::test]
    async fn test_same_content_retries_after_failure() {
        let flaky = Arc::new(FlakyConverter::default());
        let converter = MarkdownConverter::with_converter(flaky.clone());

        let first = converter.set_content("*retry*").await;
        assert!(matches!(first, Err(ConvertError::MarkdownError(_))));
        assert!(converter.render(&ConvertOptions::default()).is_empty());

        converter.set_content("*retry*").await.unwrap();
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            render_markup(&converter.render(&ConvertOptions::default())),
            "<p><em>retry</em></p>"
        );
    }
}
