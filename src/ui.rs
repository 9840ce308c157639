use serde::{Deserialize, Serialize};

use crate::node::Attribute;

/// A renderable node of the UI tree, keyed for reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiNode {
    /// Stable key, unique among siblings
    pub key: String,
    #[serde(flatten)]
    pub element: UiElement,
}

/// What a UI node renders as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiElement {
    /// A typed element wrapping its children
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attributes: Vec<Attribute>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<UiNode>,
    },
    /// Plain text, already decoded
    Text { text: String },
    /// Children without any wrapping element
    Fragment {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<UiNode>,
    },
}

impl UiElement {
    /// An element with no attributes
    pub fn element(tag: impl Into<String>, children: Vec<UiNode>) -> Self {
        UiElement::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children,
        }
    }

    pub fn element_with_attrs(
        tag: impl Into<String>,
        attributes: Vec<Attribute>,
        children: Vec<UiNode>,
    ) -> Self {
        UiElement::Element {
            tag: tag.into(),
            attributes,
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        UiElement::Text { text: text.into() }
    }

    pub fn fragment(children: Vec<UiNode>) -> Self {
        UiElement::Fragment { children }
    }
}

impl UiNode {
    pub fn new(key: impl Into<String>, element: UiElement) -> Self {
        Self {
            key: key.into(),
            element,
        }
    }

    pub fn children(&self) -> &[UiNode] {
        match &self.element {
            UiElement::Element { children, .. } | UiElement::Fragment { children } => children,
            UiElement::Text { .. } => &[],
        }
    }

    /// Tag name for elements, `None` for text and fragments
    pub fn tag(&self) -> Option<&str> {
        match &self.element {
            UiElement::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.element {
            UiElement::Element { attributes, .. } => attributes
                .iter()
                .find(|attr| attr.name == name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        match &self.element {
            UiElement::Text { text } => text.clone(),
            _ => self.children().iter().map(UiNode::text_content).collect(),
        }
    }
}
