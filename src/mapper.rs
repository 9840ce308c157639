//! HTML AST → UI tree mapper.
//!
//! [`map_node`] is recursive: the children of a retained node are mapped first, then
//! the node's renderer wraps whatever survived.

use tracing::trace;

use crate::node::HtmlNode;
use crate::registry::{decode_text, ElemMap, ElemProps};
use crate::ui::UiNode;

/// Void tag that is kept even though it has no children
const IMAGE_TAG: &str = "img";

/// Reconciliation key for a node at `depth`, position `index` among its siblings
pub fn node_key(depth: usize, index: usize, key: &str) -> String {
    format!("html-ast-{}-{}-{}", depth, index, key)
}

/// Map one parsed node (and its subtree) to a UI node.
///
/// Returns `None` when the node is dropped: it has no usable key, its key is in
/// `ignore_nodes`, it is a void element other than `img`, a tag (other than `img`)
/// without children, a text node that is blank once decoded, or its renderer returns
/// `None`. Dropped nodes are not recursed into.
pub fn map_node(
    node: &HtmlNode,
    parent: Option<&HtmlNode>,
    index: usize,
    depth: usize,
    elem_map: &ElemMap,
    ignore_nodes: &[String],
) -> Option<UiNode> {
    let Some(key) = node.key() else {
        trace!(index, depth, "dropping node without a usable key");
        return None;
    };

    if ignore_nodes.iter().any(|ignored| ignored == key) {
        trace!(key, index, depth, "dropping ignored node");
        return None;
    }

    if is_blank(node) {
        return None;
    }

    let children = map_children(node, depth, elem_map, ignore_nodes);
    let renderer = elem_map.resolve(key);
    let element = renderer(ElemProps {
        node,
        parent,
        children,
    })?;

    Some(UiNode::new(node_key(depth, index, key), element))
}

/// Map every root node of a document, dropping the ones that map to nothing
pub fn map_nodes(nodes: &[HtmlNode], elem_map: &ElemMap, ignore_nodes: &[String]) -> Vec<UiNode> {
    nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| map_node(node, None, index, 0, elem_map, ignore_nodes))
        .collect()
}

fn map_children(
    node: &HtmlNode,
    depth: usize,
    elem_map: &ElemMap,
    ignore_nodes: &[String],
) -> Vec<UiNode> {
    node.children
        .iter()
        .enumerate()
        .filter_map(|(index, child)| {
            map_node(child, Some(node), index, depth + 1, elem_map, ignore_nodes)
        })
        .collect()
}

/// Void elements, empty tags and blank text carry nothing to display
fn is_blank(node: &HtmlNode) -> bool {
    let is_image = node.is_named(IMAGE_TAG);

    if node.void_element && !is_image {
        return true;
    }

    if node.is_tag() && !is_image && node.children.is_empty() {
        return true;
    }

    node.is_text() && node.content.as_deref().and_then(decode_text).is_none()
}
