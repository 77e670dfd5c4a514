pub mod parser;

use std::collections::HashMap;

/// Stable handle to an element inside a `DomTree`.
///
/// Allocated by the owning tree and never reused, so a handle held by the
/// outline engine either resolves to the same element or to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Placeholder carried by detached nodes until a tree adopts them
    pub const DETACHED: NodeId = NodeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
}

/// What kind of change a mutation record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Children added or removed
    ChildList,
    /// Text content rewritten
    CharacterData,
    /// An attribute was set
    Attributes,
}

/// One observed change to the tree, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
}

/// Internal DOM node representation.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub node_id: NodeId,
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
}

impl DomNode {
    pub fn document(children: Vec<DomNode>) -> Self {
        Self {
            node_id: NodeId::DETACHED,
            tag: "#document".into(),
            attributes: HashMap::new(),
            text: String::new(),
            children,
            node_type: NodeType::Document,
        }
    }

    pub fn element(
        tag: impl Into<String>,
        attrs: HashMap<String, String>,
        children: Vec<DomNode>,
    ) -> Self {
        Self {
            node_id: NodeId::DETACHED,
            tag: tag.into(),
            attributes: attrs,
            text: String::new(),
            children,
            node_type: NodeType::Element,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            node_id: NodeId::DETACHED,
            tag: String::new(),
            attributes: HashMap::new(),
            text: content.into(),
            children: Vec::new(),
            node_type: NodeType::Text,
        }
    }

    /// Element with a single text child, the common shape of a heading.
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::element(tag, HashMap::new(), vec![Self::text(text)])
    }

    /// Builder-style attribute setter for hand-built fixtures
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Recursively count all nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Collect all text content recursively
    pub fn collect_text(&self) -> String {
        let mut buf = String::new();
        self.collect_text_inner(&mut buf);
        buf
    }

    fn collect_text_inner(&self, buf: &mut String) {
        let trimmed = self.text.trim();
        if !trimmed.is_empty() {
            if !buf.is_empty() {
                buf.push(' ');
            }
            buf.push_str(trimmed);
        }
        for child in &self.children {
            child.collect_text_inner(buf);
        }
    }

    /// Raw text of every descendant text node, concatenated without
    /// separators or trimming (a DOM's `textContent`).
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.walk(&mut |n| {
            if n.node_type == NodeType::Text {
                buf.push_str(&n.text);
            }
        });
        buf
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Heading depth for `h1`..`h6`, `None` for everything else.
    pub fn heading_level(&self) -> Option<u8> {
        if self.node_type != NodeType::Element {
            return None;
        }
        match self.tag.as_str() {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    pub fn find(&self, id: NodeId) -> Option<&DomNode> {
        if self.node_id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        if self.node_id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Visit every node in document order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DomNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Parsed DOM tree with metadata
#[derive(Debug, Clone)]
pub struct DomTree {
    pub root: DomNode,
    pub url: String,
    pub title: String,
    next_id: u64,
    records: Vec<MutationRecord>,
}

impl DomTree {
    /// Adopt a detached node hierarchy, allocating a `NodeId` for every node.
    pub fn new(root: DomNode, url: impl Into<String>, title: impl Into<String>) -> Self {
        let mut tree = Self {
            root,
            url: url.into(),
            title: title.into(),
            next_id: 1,
            records: Vec::new(),
        };
        let mut next_id = tree.next_id;
        adopt(&mut tree.root, &mut next_id);
        tree.next_id = next_id;
        tree
    }

    pub fn find(&self, id: NodeId) -> Option<&DomNode> {
        self.root.find(id)
    }

    /// The `<body>` element, or the root when the document has none.
    pub fn body_id(&self) -> NodeId {
        let mut body = None;
        self.root.walk(&mut |n| {
            if body.is_none() && n.tag == "body" {
                body = Some(n.node_id);
            }
        });
        body.unwrap_or(self.root.node_id)
    }

    /// First element carrying `id="<value>"`
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        let mut found = None;
        self.root.walk(&mut |n| {
            if found.is_none() && n.node_type == NodeType::Element && n.attr("id") == Some(value) {
                found = Some(n.node_id);
            }
        });
        found
    }

    /// Append `node` (and its subtree) under `parent`. Returns the new node's id.
    pub fn append_child(&mut self, parent: NodeId, node: DomNode) -> Option<NodeId> {
        self.insert_child(parent, usize::MAX, node)
    }

    /// Insert `node` as the `index`-th child of `parent` (clamped to the end).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, mut node: DomNode) -> Option<NodeId> {
        let mut next_id = self.next_id;
        adopt(&mut node, &mut next_id);
        let new_id = node.node_id;
        let target = self.root.find_mut(parent)?;
        let index = index.min(target.children.len());
        target.children.insert(index, node);
        self.next_id = next_id;
        self.records.push(MutationRecord {
            kind: MutationKind::ChildList,
            target: parent,
        });
        Some(new_id)
    }

    /// Detach the subtree rooted at `id`. The root itself cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<DomNode> {
        let (parent, removed) = remove_from(&mut self.root, id)?;
        self.records.push(MutationRecord {
            kind: MutationKind::ChildList,
            target: parent,
        });
        Some(removed)
    }

    /// Replace the text content of an element, keeping its id and attributes.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        let mut next_id = self.next_id;
        let Some(node) = self.root.find_mut(id) else {
            return false;
        };
        let mut child = DomNode::text(text);
        adopt(&mut child, &mut next_id);
        node.children = vec![child];
        self.next_id = next_id;
        self.records.push(MutationRecord {
            kind: MutationKind::CharacterData,
            target: id,
        });
        true
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        let Some(node) = self.root.find_mut(id) else {
            return false;
        };
        node.attributes.insert(name.to_string(), value.into());
        self.records.push(MutationRecord {
            kind: MutationKind::Attributes,
            target: id,
        });
        true
    }

    /// Swap the whole body content, as a client-side router does on navigation.
    pub fn replace_body(&mut self, children: Vec<DomNode>) {
        let body = self.body_id();
        let mut next_id = self.next_id;
        let mut children = children;
        for child in &mut children {
            adopt(child, &mut next_id);
        }
        if let Some(node) = self.root.find_mut(body) {
            node.children = children;
        }
        self.next_id = next_id;
        self.records.push(MutationRecord {
            kind: MutationKind::ChildList,
            target: body,
        });
    }

    /// Drain the mutation records accumulated since the last call.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }
}

fn adopt(node: &mut DomNode, next_id: &mut u64) {
    node.node_id = NodeId(*next_id);
    *next_id += 1;
    for child in &mut node.children {
        adopt(child, next_id);
    }
}

fn remove_from(node: &mut DomNode, id: NodeId) -> Option<(NodeId, DomNode)> {
    if let Some(pos) = node.children.iter().position(|c| c.node_id == id) {
        return Some((node.node_id, node.children.remove(pos)));
    }
    node.children.iter_mut().find_map(|c| remove_from(c, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DomTree {
        let body = DomNode::element(
            "body",
            HashMap::new(),
            vec![DomNode::with_text("h1", "Title"), DomNode::with_text("p", "Body")],
        );
        let html = DomNode::element("html", HashMap::new(), vec![body]);
        DomTree::new(DomNode::document(vec![html]), "https://example.com", "")
    }

    #[test]
    fn adoption_assigns_distinct_ids() {
        let tree = sample();
        let mut ids = Vec::new();
        tree.root.walk(&mut |n| ids.push(n.node_id));
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert!(!ids.contains(&NodeId::DETACHED));
    }

    #[test]
    fn append_records_child_list_mutation() {
        let mut tree = sample();
        let body = tree.body_id();
        let id = tree.append_child(body, DomNode::with_text("h2", "More")).unwrap();
        assert_eq!(tree.find(id).unwrap().collect_text(), "More");

        let records = tree.take_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, MutationKind::ChildList);
        assert!(tree.take_records().is_empty());
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut tree = sample();
        let body = tree.body_id();
        let h1 = tree.find(body).unwrap().children[0].node_id;
        let removed = tree.remove(h1).unwrap();
        assert_eq!(removed.tag, "h1");
        assert!(tree.find(h1).is_none());
        assert!(tree.remove(tree.root.node_id).is_none());
    }

    #[test]
    fn set_text_keeps_attributes() {
        let mut tree = sample();
        let body = tree.body_id();
        let h1 = tree.find(body).unwrap().children[0].node_id;
        tree.set_attr(h1, "id", "title");
        tree.set_text(h1, "Renamed");

        let node = tree.find(h1).unwrap();
        assert_eq!(node.collect_text(), "Renamed");
        assert_eq!(node.attr("id"), Some("title"));
        assert_eq!(tree.element_by_id("title"), Some(h1));
    }

    #[test]
    fn insert_child_places_node_first() {
        let mut tree = sample();
        let body = tree.body_id();
        let id = tree.insert_child(body, 0, DomNode::with_text("h2", "Lead")).unwrap();
        assert_eq!(tree.find(body).unwrap().children[0].node_id, id);
        assert_eq!(tree.take_records()[0].kind, MutationKind::ChildList);
    }

    #[test]
    fn text_content_joins_inline_runs() {
        let heading = DomNode::element(
            "h2",
            HashMap::new(),
            vec![
                DomNode::text(" E = mc"),
                DomNode::element("sup", HashMap::new(), vec![DomNode::text("2")]),
                DomNode::text(" "),
            ],
        );
        assert_eq!(heading.text_content(), " E = mc2 ");
        assert_eq!(heading.collect_text(), "E = mc 2");
    }

    #[test]
    fn heading_levels() {
        assert_eq!(DomNode::with_text("h3", "x").heading_level(), Some(3));
        assert_eq!(DomNode::with_text("p", "x").heading_level(), None);
        assert_eq!(DomNode::text("h1").heading_level(), None);
    }
}
