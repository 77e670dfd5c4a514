//! Block geometry for the document.
//!
//! A simple top-to-bottom block model: enough to place every element on a
//! vertical axis so the visibility tracker can intersect headings with the
//! viewport. Inline elements flow inside their block's text height.

use std::collections::HashMap;

use crate::dom::{DomNode, NodeId, NodeType};

/// Bounding box for a laid-out DOM node, in document coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Element boxes keyed by node
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    boxes: HashMap<NodeId, LayoutBox>,
    /// Total document height
    pub height: f32,
}

impl Geometry {
    pub fn get(&self, id: NodeId) -> Option<LayoutBox> {
        self.boxes.get(&id).copied()
    }

    /// Pin a box explicitly, for hosts that measure elements themselves.
    pub fn insert(&mut self, id: NodeId, bounds: LayoutBox) {
        self.height = self.height.max(bounds.bottom());
        self.boxes.insert(id, bounds);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

const BLOCK_TAGS: &[&str] = &[
    "html",
    "body",
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "table",
    "tr",
    "td",
    "th",
    "form",
    "section",
    "article",
    "aside",
    "main",
    "header",
    "footer",
    "nav",
    "blockquote",
    "pre",
    "figure",
    "figcaption",
    "details",
    "summary",
];

/// Tags that take no space at all
const HIDDEN_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Per-tag vertical margins (top, bottom) in pixels.
fn tag_margins(tag: &str) -> (f32, f32) {
    match tag {
        "h1" => (24.0, 16.0),
        "h2" => (20.0, 12.0),
        "h3" | "h4" => (16.0, 10.0),
        "h5" | "h6" => (12.0, 8.0),
        "p" => (4.0, 10.0),
        "ul" | "ol" => (8.0, 8.0),
        "li" => (2.0, 2.0),
        "section" | "article" | "main" => (16.0, 16.0),
        "nav" | "header" | "footer" => (12.0, 12.0),
        "blockquote" => (12.0, 12.0),
        "pre" => (8.0, 8.0),
        _ => (0.0, 0.0),
    }
}

/// Per-tag padding in pixels.
fn tag_padding(tag: &str, is_block: bool) -> f32 {
    match tag {
        "section" | "article" | "main" | "aside" => 16.0,
        "nav" | "header" | "footer" => 12.0,
        "blockquote" => 20.0,
        _ if is_block => 4.0,
        _ => 0.0,
    }
}

/// Compute geometry for a DOM tree.
pub fn compute_layout(root: &DomNode, viewport_width: f32) -> Geometry {
    let mut geometry = Geometry::default();
    let mut cursor_y = 0.0;
    layout_node(root, 0.0, &mut cursor_y, viewport_width, 16.0, &mut geometry);
    geometry.height = geometry.height.max(cursor_y);
    geometry
}

fn layout_node(
    node: &DomNode,
    x: f32,
    cursor_y: &mut f32,
    available_width: f32,
    parent_font_size: f32,
    geometry: &mut Geometry,
) {
    if HIDDEN_TAGS.contains(&node.tag.as_str()) {
        return;
    }

    let is_block =
        node.node_type == NodeType::Element && BLOCK_TAGS.contains(&node.tag.as_str());

    let font_size = match node.tag.as_str() {
        "h1" => 32.0,
        "h2" => 24.0,
        "h3" => 20.0,
        "h4" => 18.0,
        "h5" | "h6" => 16.0,
        "small" => 12.0,
        _ => parent_font_size,
    };

    let (margin_top, margin_bottom) = if is_block {
        tag_margins(&node.tag)
    } else {
        (0.0, 0.0)
    };
    let padding = tag_padding(&node.tag, is_block);

    *cursor_y += margin_top;
    let start_y = *cursor_y;
    *cursor_y += padding;

    let child_x = x + padding;
    let child_width = (available_width - padding * 2.0).max(0.0);
    for child in &node.children {
        layout_node(child, child_x, cursor_y, child_width, font_size, geometry);
    }

    // Text content contributes to height
    if !node.text.trim().is_empty() {
        let line_height = font_size * 1.4;
        let chars_per_line = (available_width / (font_size * 0.6)).max(1.0) as usize;
        let lines = (node.text.len() as f32 / chars_per_line as f32).ceil().max(1.0);
        *cursor_y += lines * line_height;
    }

    *cursor_y += padding;
    let height = *cursor_y - start_y;
    *cursor_y += margin_bottom;

    if node.node_type != NodeType::Text {
        geometry.insert(
            node.node_id,
            LayoutBox {
                x,
                y: start_y,
                width: available_width,
                height,
            },
        );
    }
}
