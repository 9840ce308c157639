use serde::{Deserialize, Serialize};

/// Kind of a parsed HTML node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Tag,
    Text,
    Comment,
    /// Any other node kind a parser may emit (doctype, directive, ...)
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Tag => "tag",
            NodeKind::Text => "text",
            NodeKind::Comment => "comment",
            NodeKind::Other(kind) => kind,
        }
    }
}

impl From<String> for NodeKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "tag" => NodeKind::Tag,
            "text" => NodeKind::Text,
            "comment" => NodeKind::Comment,
            _ => NodeKind::Other(kind),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A single `name="value"` attribute, in source order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A node of a parsed HTML document.
///
/// Produced by an [`HtmlParser`](crate::parser::HtmlParser) and consumed read-only by the
/// mapper. `name` is only set for tags, `content` only for text and comments, and only
/// tags carry children. Use the constructors to keep those invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub void_element: bool,
    /// Raw (HTML-escaped) text payload for text nodes, comment body for comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HtmlNode>,
}

impl HtmlNode {
    /// A tag node with no attributes and no children
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Tag,
            name: Some(name.into()),
            attributes: Vec::new(),
            void_element: false,
            content: None,
            children: Vec::new(),
        }
    }

    /// A void tag node (`img`, `br`, `hr`, ...)
    pub fn void_tag(name: impl Into<String>) -> Self {
        Self {
            void_element: true,
            ..Self::tag(name)
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            name: None,
            attributes: Vec::new(),
            void_element: false,
            content: Some(content.into()),
            children: Vec::new(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Comment,
            ..Self::text(content)
        }
    }

    /// A childless node of an arbitrary kind
    pub fn other(kind: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::from(kind.into()),
            name: None,
            attributes: Vec::new(),
            void_element: false,
            content: None,
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Appends a child. Ignored for non-tag nodes.
    pub fn with_child(mut self, child: HtmlNode) -> Self {
        if self.kind == NodeKind::Tag {
            self.children.push(child);
        }
        self
    }

    pub fn with_children(self, children: impl IntoIterator<Item = HtmlNode>) -> Self {
        children.into_iter().fold(self, HtmlNode::with_child)
    }

    /// The registry key: the tag name, else the node kind. `None` when neither is usable.
    pub fn key(&self) -> Option<&str> {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => Some(name),
            _ => Some(self.kind.as_str()).filter(|kind| !kind.is_empty()),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn is_tag(&self) -> bool {
        self.kind == NodeKind::Tag
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefers_name() {
        assert_eq!(HtmlNode::tag("p").key(), Some("p"));
        assert_eq!(HtmlNode::text("hi").key(), Some("text"));
        assert_eq!(HtmlNode::comment("hi").key(), Some("comment"));
    }

    #[test]
    fn test_key_missing() {
        assert_eq!(HtmlNode::other("").key(), None);

        let mut node = HtmlNode::tag("");
        node.kind = NodeKind::Other(String::new());
        assert_eq!(node.key(), None);
    }

    #[test]
    fn test_text_nodes_have_no_children() {
        let node = HtmlNode::text("hi").with_child(HtmlNode::tag("p"));
        assert!(node.children.is_empty());
        assert!(node.name.is_none());
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "type": "tag",
            "name": "img",
            "voidElement": true,
            "attributes": [
                { "name": "src", "value": "https://example.com/lol.gif" },
                { "name": "alt", "value": "Hello, world!" }
            ]
        }"#;
        let node: HtmlNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind, NodeKind::Tag);
        assert!(node.void_element);
        assert_eq!(node.attribute("alt"), Some("Hello, world!"));
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_unknown_kind_round_trips() {
        let node: HtmlNode = serde_json::from_str(r#"{ "type": "directive" }"#).unwrap();
        assert_eq!(node.kind, NodeKind::Other("directive".to_string()));
        assert_eq!(node.key(), Some("directive"));
    }
}
