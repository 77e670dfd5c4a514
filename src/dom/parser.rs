//! HTML → `DomTree` conversion.
//!
//! Text nodes are kept verbatim, whitespace-only runs included, so
//! `text_content` reads inline markup the way a browser does:
//! `<h2>Foo<em>bar</em></h2>` is `Foobar`, `<h2><b>A</b> <b>B</b></h2>` is
//! `A B`. Comments and processing instructions are dropped.

use crate::dom::{DomNode, DomTree};
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose content never reaches the outline or the layout
const OPAQUE_TAGS: &[&str] = &["script", "style", "noscript", "svg", "template"];

/// Parse a whole HTML document.
pub fn parse_html(html: &str, url: &str) -> DomTree {
    let document = Html::parse_document(html);
    let title = first_text(&document, "title").unwrap_or_default();
    let root = DomNode::document(vec![convert(document.root_element())]);
    DomTree::new(root, url, title.trim())
}

/// Parse an HTML fragment into detached nodes, ready for `append_child`
/// or `replace_body`.
pub fn parse_fragment(html: &str) -> Vec<DomNode> {
    let fragment = Html::parse_fragment(html);
    // html5ever wraps fragments in a synthetic <html> element
    convert(fragment.root_element()).children
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

fn convert(el: ElementRef<'_>) -> DomNode {
    let tag = el.value().name().to_string();
    let attributes = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let children = if OPAQUE_TAGS.contains(&tag.as_str()) {
        Vec::new()
    } else {
        el.children()
            .filter_map(|child| match child.value() {
                Node::Element(_) => ElementRef::wrap(child).map(convert),
                Node::Text(t) => Some(DomNode::text(&*t.text)),
                _ => None,
            })
            .collect()
    };

    DomNode::element(tag, attributes, children)
}
