use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::{ConvertError, ConvertResult};
use crate::node::{Attribute, HtmlNode, NodeKind};

/// Deepest element nesting accepted from a document
pub const MAX_NESTING_DEPTH: usize = 256;

/// Elements that never have children
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Turns (sanitized) HTML text into an ordered list of root nodes
pub trait HtmlParser: Send + Sync {
    fn parse(&self, html: &str) -> ConvertResult<Vec<HtmlNode>>;
}

/// [`HtmlParser`] backed by `html5ever`.
///
/// The input is parsed as a full document and the implied `html`, `head` and `body`
/// wrappers are flattened away, so the roots are the nodes as written in the fragment.
#[derive(Debug, Clone, Copy)]
pub struct Html5everParser {
    max_depth: usize,
}

impl Default for Html5everParser {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl Html5everParser {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl HtmlParser for Html5everParser {
    fn parse(&self, html: &str) -> ConvertResult<Vec<HtmlNode>> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| ConvertError::ParseError(e.to_string()))?;

        let mut nodes = Vec::new();
        for handle in fragment_roots(&dom.document) {
            if let Some(node) = self.convert(&handle, 0)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }
}

impl Html5everParser {
    fn convert(&self, handle: &Handle, depth: usize) -> ConvertResult<Option<HtmlNode>> {
        if depth > self.max_depth {
            return Err(ConvertError::MaxNestingDepthExceeded {
                max_depth: self.max_depth,
            });
        }

        let node = match &handle.data {
            NodeData::Element { name, attrs, .. } => {
                let tag: &str = &name.local;
                let attributes = attrs
                    .borrow()
                    .iter()
                    .map(|attr| {
                        let name: &str = &attr.name.local;
                        let value: &str = &attr.value;
                        Attribute::new(name, value)
                    })
                    .collect();

                let mut children = Vec::new();
                for child in handle.children.borrow().iter() {
                    if let Some(node) = self.convert(child, depth + 1)? {
                        children.push(node);
                    }
                }

                HtmlNode {
                    kind: NodeKind::Tag,
                    name: Some(tag.to_string()),
                    attributes,
                    void_element: VOID_ELEMENTS.contains(&tag),
                    content: None,
                    children,
                }
            }
            NodeData::Text { contents } => {
                let contents = contents.borrow();
                let text: &str = &contents;
                // Text payloads are kept HTML-escaped; the mapper decodes them
                HtmlNode::text(html_escape::encode_text(text))
            }
            NodeData::Comment { contents } => {
                let body: &str = contents;
                HtmlNode::comment(body)
            }
            NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
                return Ok(None);
            }
        };

        Ok(Some(node))
    }
}

/// Children of the implied `html`/`head`/`body` wrappers, in document order
fn fragment_roots(document: &Handle) -> Vec<Handle> {
    let mut roots = Vec::new();
    for child in document.children.borrow().iter() {
        if is_element(child, "html") {
            for section in child.children.borrow().iter() {
                if is_element(section, "head") || is_element(section, "body") {
                    roots.extend(section.children.borrow().iter().cloned());
                } else {
                    roots.push(section.clone());
                }
            }
        } else {
            roots.push(child.clone());
        }
    }
    roots
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    match &handle.data {
        NodeData::Element { name, .. } => &*name.local == tag,
        _ => false,
    }
}
