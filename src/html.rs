//! HTML conversion: sanitize → parse → map, memoized on its inputs.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::ConvertResult;
use crate::mapper::map_nodes;
use crate::parser::{Html5everParser, HtmlParser};
use crate::registry::{ElemMap, DEFAULT_IGNORE_NODES};
use crate::sanitize::{AmmoniaSanitizer, SanitizeConfig, Sanitizer};
use crate::ui::UiNode;

/// Per-call overrides. Every `None` falls back to the process-wide default.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Replaces the default registry entirely when set
    pub elem_map: Option<ElemMap>,
    /// Node kinds or tag names dropped with their subtree
    pub ignore_nodes: Option<Vec<String>>,
    pub sanitize: Option<SanitizeConfig>,
}

impl ConvertOptions {
    pub fn with_elem_map(mut self, elem_map: ElemMap) -> Self {
        self.elem_map = Some(elem_map);
        self
    }

    pub fn with_ignore_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_nodes = Some(nodes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_sanitize(mut self, config: SanitizeConfig) -> Self {
        self.sanitize = Some(config);
        self
    }

    fn resolve(&self) -> ResolvedOptions {
        ResolvedOptions {
            elem_map: self.elem_map.clone().unwrap_or_else(ElemMap::defaults),
            ignore_nodes: self.ignore_nodes.clone().unwrap_or_else(|| {
                DEFAULT_IGNORE_NODES.iter().map(|s| s.to_string()).collect()
            }),
            sanitize: self.sanitize.clone().unwrap_or_default(),
        }
    }
}

struct ResolvedOptions {
    elem_map: ElemMap,
    ignore_nodes: Vec<String>,
    sanitize: SanitizeConfig,
}

/// Inputs of the last conversion and its output
struct Memo {
    content: String,
    elem_map: ElemMap,
    ignore_nodes: Vec<String>,
    sanitize: SanitizeConfig,
    output: Vec<UiNode>,
}

impl Memo {
    fn matches(&self, content: &str, options: &ResolvedOptions) -> bool {
        self.content == content
            && self.elem_map.ptr_eq(&options.elem_map)
            && self.ignore_nodes == options.ignore_nodes
            && self.sanitize == options.sanitize
    }
}

/// Converts HTML to UI nodes, recomputing only when the content or options change
pub struct HtmlConverter {
    sanitizer: Arc<dyn Sanitizer>,
    parser: Arc<dyn HtmlParser>,
    memo: Mutex<Option<Memo>>,
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlConverter {
    /// Converter using `ammonia` and `html5ever`
    pub fn new() -> Self {
        Self::with_collaborators(Arc::new(AmmoniaSanitizer), Arc::new(Html5everParser::default()))
    }

    pub fn with_collaborators(sanitizer: Arc<dyn Sanitizer>, parser: Arc<dyn HtmlParser>) -> Self {
        Self {
            sanitizer,
            parser,
            memo: Mutex::new(None),
        }
    }

    /// Convert `content`. Failures degrade to an empty result.
    pub fn convert(&self, content: &str, options: &ConvertOptions) -> Vec<UiNode> {
        let options = options.resolve();
        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(memo) = memo.as_ref().filter(|m| m.matches(content, &options)) {
            debug!("reusing memoized conversion");
            return memo.output.clone();
        }

        let output = match self.run(content, &options) {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "HTML conversion failed, rendering nothing");
                Vec::new()
            }
        };

        *memo = Some(Memo {
            content: content.to_string(),
            elem_map: options.elem_map,
            ignore_nodes: options.ignore_nodes,
            sanitize: options.sanitize,
            output: output.clone(),
        });
        output
    }

    /// Drop the memoized result
    pub fn clear(&self) {
        *self.memo.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn run(&self, content: &str, options: &ResolvedOptions) -> ConvertResult<Vec<UiNode>> {
        let sanitized = self.sanitizer.sanitize(content, &options.sanitize)?;
        let roots = self.parser.parse(&sanitized)?;
        let output = map_nodes(&roots, &options.elem_map, &options.ignore_nodes);
        debug!(roots = roots.len(), mapped = output.len(), "converted HTML");
        Ok(output)
    }
}

/// One-shot conversion with the default collaborators, without memoization
pub fn convert_html(content: &str, options: &ConvertOptions) -> Vec<UiNode> {
    HtmlConverter::new().convert(content, options)
}
