//! Static markup rendering of a UI tree.

use tracing::debug;

use crate::ui::{UiElement, UiNode};
use crate::validator::{validate_attribute, validate_tag};

/// Tags rendered self-closing
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Render UI nodes as static HTML. Fragments render only their children.
///
/// Elements with an invalid tag name render like fragments and attributes with an
/// invalid name are skipped, so names from a deserialized tree never inject markup.
pub fn render_markup(nodes: &[UiNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &UiNode, out: &mut String) {
    match &node.element {
        UiElement::Text { text } => out.push_str(&html_escape::encode_text(text)),
        UiElement::Fragment { children } => {
            for child in children {
                write_node(child, out);
            }
        }
        UiElement::Element {
            tag,
            attributes,
            children,
        } => {
            if validate_tag(tag).is_err() {
                debug!(tag = %tag, "rendering element with invalid tag name as fragment");
                for child in children {
                    write_node(child, out);
                }
                return;
            }

            out.push('<');
            out.push_str(tag);
            for attr in attributes {
                if validate_attribute(&attr.name).is_err() {
                    debug!(attribute = %attr.name, "skipping attribute with invalid name");
                    continue;
                }
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
                out.push('"');
            }

            if VOID_TAGS.contains(&tag.as_str()) {
                out.push_str("/>");
                return;
            }

            out.push('>');
            for child in children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}
