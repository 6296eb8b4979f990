//! Mapping between the browser selection and engine points.
//!
//! The surface renders every text node as `<span data-key data-length>` with
//! one `<span data-offset>` per leaf, so a DOM position resolves to a text key
//! plus the leaf's start offset plus the offset inside the DOM text node.

use crate::engine::{NodeKey, Point, Range};
use crate::util::{char_idx_to_utf16, utf16_to_char_idx};
use wasm_bindgen::JsCast;
use web_sys::{Element, Node};

const KEY_ATTR: &str = "data-key";
const LENGTH_ATTR: &str = "data-length";
const OFFSET_ATTR: &str = "data-offset";
const VOID_ATTR: &str = "data-void";

fn attr_usize(element: &Element, name: &str) -> Option<usize> {
    element.get_attribute(name)?.parse().ok()
}

fn closest(element: &Element, attr: &str) -> Option<Element> {
    element.closest(&format!("[{attr}]")).ok().flatten()
}

fn key_of(text_el: &Element) -> Option<NodeKey> {
    text_el
        .get_attribute(KEY_ATTR)?
        .parse()
        .ok()
        .map(NodeKey)
}

fn char_len(node: &Node) -> usize {
    node.text_content().map_or(0, |s| s.chars().count())
}

/// The engine selection matching the browser's, if it lies inside `root`.
pub(crate) fn read_dom_selection(root: &Element) -> Option<Range> {
    let selection = web_sys::window()?.get_selection().ok()??;
    let anchor_node = selection.anchor_node()?;
    let focus_node = selection.focus_node()?;

    let root_node: &Node = root.as_ref();
    if !root_node.contains(Some(&anchor_node)) || !root_node.contains(Some(&focus_node)) {
        return None;
    }

    let anchor = dom_to_point(&anchor_node, selection.anchor_offset());
    let focus = dom_to_point(&focus_node, selection.focus_offset());
    match (anchor, focus) {
        (Some(anchor), Some(focus)) => Some(Range::new(anchor, focus)),
        _ => {
            tracing::trace!("dom selection does not map to a text position");
            None
        }
    }
}

fn dom_to_point(node: &Node, offset: u32) -> Option<Point> {
    if node.node_type() == Node::TEXT_NODE {
        let parent = node.parent_element()?;
        let text_el = closest(&parent, KEY_ATTR)?;
        let leaf_el = closest(&parent, OFFSET_ATTR)?;
        let start = attr_usize(&leaf_el, OFFSET_ATTR)?;
        let content = node.text_content().unwrap_or_default();
        return Some(Point::new(
            key_of(&text_el)?,
            start + utf16_to_char_idx(&content, offset),
        ));
    }

    // Element positions count child nodes.
    let element = node.dyn_ref::<Element>()?;
    let children = element.child_nodes();
    if offset < children.length() {
        first_point_within(&children.item(offset)?)
    } else {
        last_point_within(element)
    }
}

fn first_point_within(node: &Node) -> Option<Point> {
    if node.node_type() == Node::TEXT_NODE {
        return dom_to_point(node, 0);
    }
    let element = node.dyn_ref::<Element>()?;
    let leaf = match closest(element, OFFSET_ATTR) {
        Some(leaf) => leaf,
        None => element
            .query_selector(&format!("[{OFFSET_ATTR}]"))
            .ok()
            .flatten()?,
    };
    let text_el = closest(&leaf, KEY_ATTR)?;
    Some(Point::new(key_of(&text_el)?, attr_usize(&leaf, OFFSET_ATTR)?))
}

fn last_point_within(element: &Element) -> Option<Point> {
    if let Some(leaf) = closest(element, OFFSET_ATTR) {
        let text_el = closest(&leaf, KEY_ATTR)?;
        let start = attr_usize(&leaf, OFFSET_ATTR)?;
        return Some(Point::new(key_of(&text_el)?, start + char_len(leaf.as_ref())));
    }
    let text_el = match closest(element, KEY_ATTR) {
        Some(text_el) => text_el,
        None => {
            let all = element.query_selector_all(&format!("[{KEY_ATTR}]")).ok()?;
            all.item(all.length().checked_sub(1)?)?
                .dyn_into::<Element>()
                .ok()?
        }
    };
    Some(Point::new(key_of(&text_el)?, attr_usize(&text_el, LENGTH_ATTR)?))
}

fn first_text_node(node: &Node) -> Option<Node> {
    if node.node_type() == Node::TEXT_NODE {
        return Some(node.clone());
    }
    let children = node.child_nodes();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .find_map(|child| first_text_node(&child))
}

/// DOM position for an engine point. Points inside void blocks have none.
fn point_to_dom(root: &Element, point: Point) -> Option<(Node, u32)> {
    let text_el = root
        .query_selector(&format!("[{KEY_ATTR}=\"{}\"]", point.key.0))
        .ok()
        .flatten()?;
    if closest(&text_el, VOID_ATTR).is_some() {
        return None;
    }

    let leaves = text_el
        .query_selector_all(&format!("[{OFFSET_ATTR}]"))
        .ok()?;
    let mut chosen: Option<(Element, usize)> = None;
    for i in 0..leaves.length() {
        let Some(leaf) = leaves.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(start) = attr_usize(&leaf, OFFSET_ATTR) else {
            continue;
        };
        if start > point.offset {
            break;
        }
        chosen = Some((leaf, start));
    }
    let (leaf, start) = chosen?;

    match first_text_node(leaf.as_ref()) {
        Some(text) => {
            let content = text.text_content().unwrap_or_default();
            let units = char_idx_to_utf16(&content, point.offset.saturating_sub(start));
            Some((text, units))
        }
        // Empty text renders a `<br>` placeholder.
        None => Some((leaf.into(), 0)),
    }
}

/// Move the browser selection to `range` while the editor has focus.
pub(crate) fn restore_dom_selection(root: &Element, range: Range) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let root_node: &Node = root.as_ref();
    let focused = window
        .document()
        .and_then(|d| d.active_element())
        .is_some_and(|el| root_node.contains(Some(el.as_ref())));
    if !focused {
        return;
    }
    let Ok(Some(selection)) = window.get_selection() else {
        return;
    };

    match (point_to_dom(root, range.anchor), point_to_dom(root, range.focus)) {
        (Some((anchor, anchor_offset)), Some((focus, focus_offset))) => {
            if let Err(e) =
                selection.set_base_and_extent(&anchor, anchor_offset, &focus, focus_offset)
            {
                tracing::warn!(error = ?e, "failed to restore selection");
            }
        }
        _ => {
            let _ = selection.remove_all_ranges();
        }
    }
}
