//! Tag render registry.
//!
//! Maps a tag name (or node kind, for text and comments) to a renderer. Lookups for
//! names with no entry fall back to [`passthrough`], which renders only the children,
//! so text inside unknown tags always reaches the output.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::node::HtmlNode;
use crate::ui::{UiElement, UiNode};

/// Node kinds and tag names dropped by default
pub const DEFAULT_IGNORE_NODES: &[&str] = &["comment"];

/// Inputs handed to a renderer
pub struct ElemProps<'a> {
    pub node: &'a HtmlNode,
    pub parent: Option<&'a HtmlNode>,
    /// Children already mapped, in order, with dropped nodes removed
    pub children: Vec<UiNode>,
}

/// A pure node renderer. Returning `None` drops the node.
pub type ElemRenderer = Arc<dyn Fn(ElemProps<'_>) -> Option<UiElement> + Send + Sync>;

/// An immutable tag-name → renderer map.
///
/// Cloning is cheap and clones share identity (see [`ElemMap::ptr_eq`]). Inserting into a
/// shared map copies it first, so the process-wide default is never mutated.
#[derive(Clone, Default)]
pub struct ElemMap {
    renderers: Arc<HashMap<String, ElemRenderer>>,
}

impl ElemMap {
    /// An empty map: every tag renders as passthrough
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default map
    pub fn defaults() -> ElemMap {
        static DEFAULT_ELEM_MAP: OnceLock<ElemMap> = OnceLock::new();
        DEFAULT_ELEM_MAP.get_or_init(build_default_map).clone()
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, renderer: F)
    where
        F: Fn(ElemProps<'_>) -> Option<UiElement> + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.renderers).insert(name.into(), Arc::new(renderer));
    }

    /// Builder form of [`ElemMap::insert`]
    pub fn with<F>(mut self, name: impl Into<String>, renderer: F) -> Self
    where
        F: Fn(ElemProps<'_>) -> Option<UiElement> + Send + Sync + 'static,
    {
        self.insert(name, renderer);
        self
    }

    pub fn remove(&mut self, name: &str) {
        Arc::make_mut(&mut self.renderers).remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&ElemRenderer> {
        self.renderers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// The renderer for `name`, or the passthrough renderer
    pub fn resolve(&self, name: &str) -> ElemRenderer {
        match self.renderers.get(name) {
            Some(renderer) => Arc::clone(renderer),
            None => passthrough_renderer(),
        }
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// True when both maps are the same shared instance
    pub fn ptr_eq(&self, other: &ElemMap) -> bool {
        Arc::ptr_eq(&self.renderers, &other.renderers)
    }
}

impl fmt::Debug for ElemMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.renderers.keys().collect();
        names.sort();
        f.debug_struct("ElemMap").field("renderers", &names).finish()
    }
}

/// Renders only the children of a node
pub fn passthrough(props: ElemProps<'_>) -> Option<UiElement> {
    Some(UiElement::fragment(props.children))
}

fn passthrough_renderer() -> ElemRenderer {
    static PASSTHROUGH: OnceLock<ElemRenderer> = OnceLock::new();
    Arc::clone(PASSTHROUGH.get_or_init(|| Arc::new(passthrough) as ElemRenderer))
}

/// Decodes HTML entities and trims. `None` when nothing is left.
pub fn decode_text(raw: &str) -> Option<String> {
    let decoded = html_escape::decode_html_entities(raw);
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn render_text(props: ElemProps<'_>) -> Option<UiElement> {
    props
        .node
        .content
        .as_deref()
        .and_then(decode_text)
        .map(UiElement::text)
}

fn render_container(props: ElemProps<'_>) -> Option<UiElement> {
    let tag = props.node.name.clone()?;
    Some(UiElement::element(tag, props.children))
}

fn render_with_attrs(props: ElemProps<'_>) -> Option<UiElement> {
    let tag = props.node.name.clone()?;
    Some(UiElement::element_with_attrs(
        tag,
        props.node.attributes.clone(),
        props.children,
    ))
}

fn render_image(props: ElemProps<'_>) -> Option<UiElement> {
    let tag = props.node.name.clone()?;
    Some(UiElement::element_with_attrs(
        tag,
        props.node.attributes.clone(),
        Vec::new(),
    ))
}

fn render_bare(props: ElemProps<'_>) -> Option<UiElement> {
    let tag = props.node.name.clone()?;
    Some(UiElement::element(tag, Vec::new()))
}

const CONTAINER_TAGS: &[&str] = &[
    "div", "span", "strong", "b", "em", "i", "u", "s", "del", "big", "small", "blockquote", "p",
    "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6",
];

fn build_default_map() -> ElemMap {
    let mut map = ElemMap::new().with("text", render_text);
    for &tag in CONTAINER_TAGS {
        map.insert(tag, render_container);
    }
    map.with("a", render_with_attrs)
        .with("img", render_image)
        .with("br", render_bare)
        .with("hr", render_bare)
}
