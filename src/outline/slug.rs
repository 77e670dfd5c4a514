//! Identifier assignment.
//!
//! A heading keeps the `id` it already has when that id is unambiguous.
//! Otherwise one is derived from its text, and collisions are resolved by
//! appending `-2`, `-3`, ... until the id is free.

use std::collections::{HashMap, HashSet};

use crate::dom::{DomNode, NodeId, NodeType};

/// Every `id` attribute currently present in the document, with its owners.
#[derive(Debug, Default)]
pub struct IdIndex {
    owners: HashMap<String, Vec<NodeId>>,
}

impl IdIndex {
    pub fn build(root: &DomNode) -> Self {
        let mut owners: HashMap<String, Vec<NodeId>> = HashMap::new();
        root.walk(&mut |n| {
            if n.node_type != NodeType::Element {
                return;
            }
            if let Some(id) = n.attr("id").filter(|id| !id.is_empty()) {
                owners.entry(id.to_string()).or_default().push(n.node_id);
            }
        });
        Self { owners }
    }

    /// `id` resolves to exactly `node` and nothing else.
    pub fn resolves_uniquely(&self, id: &str, node: NodeId) -> bool {
        self.owners.get(id).is_some_and(|o| o.as_slice() == [node])
    }

    /// Some element other than `node` carries `id`.
    pub fn taken_by_other(&self, id: &str, node: NodeId) -> bool {
        self.owners
            .get(id)
            .is_some_and(|o| o.iter().any(|owner| *owner != node))
    }

    /// Move `node` from its previous id (if any) to `id`.
    fn reassign(&mut self, node: NodeId, previous: Option<&str>, id: &str) {
        if let Some(prev) = previous {
            if let Some(owners) = self.owners.get_mut(prev) {
                owners.retain(|o| *o != node);
                if owners.is_empty() {
                    self.owners.remove(prev);
                }
            }
        }
        self.owners.entry(id.to_string()).or_default().push(node);
    }
}

/// What the assigner needs to know about one heading element.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    pub node: NodeId,
    pub level: u8,
    pub text: String,
    pub existing_id: Option<String>,
    pub processed: bool,
    pub in_panel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub identifier: String,
    /// The element's `id` attribute must be (re)written
    pub write_id: bool,
}

/// Per-pass identifier allocator. Created fresh for every collection pass.
pub struct IdentifierAssigner {
    index: IdIndex,
    claimed: HashSet<String>,
    max_len: usize,
}

impl IdentifierAssigner {
    pub fn new(index: IdIndex, max_len: usize) -> Self {
        Self {
            index,
            claimed: HashSet::new(),
            max_len,
        }
    }

    /// Pick the identifier for `candidate`; `position` is its index among
    /// all headings scanned in this pass.
    pub fn assign(&mut self, candidate: &HeadingCandidate, position: usize) -> Assignment {
        let existing = candidate.existing_id.as_deref().filter(|id| !id.is_empty());

        if let Some(id) = existing {
            if !self.claimed.contains(id) && self.index.resolves_uniquely(id, candidate.node) {
                self.claimed.insert(id.to_string());
                return Assignment {
                    identifier: id.to_string(),
                    write_id: false,
                };
            }
        }

        let mut base = slugify(&candidate.text, self.max_len);
        if base.is_empty() {
            base = format!("heading-{position}");
        }

        let mut identifier = base.clone();
        let mut counter = 2usize;
        while self.is_taken(&identifier, candidate.node) {
            identifier = format!("{base}-{counter}");
            counter += 1;
        }

        self.index.reassign(candidate.node, existing, &identifier);
        self.claimed.insert(identifier.clone());
        Assignment {
            write_id: existing != Some(identifier.as_str()),
            identifier,
        }
    }

    fn is_taken(&self, id: &str, node: NodeId) -> bool {
        self.claimed.contains(id) || self.index.taken_by_other(id, node)
    }
}

/// Lower-case, keep `[a-z0-9]` and whitespace, turn whitespace runs into a
/// single hyphen, cut to `max_len` characters.
pub fn slugify(text: &str, max_len: usize) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
                in_space = true;
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_space = false;
        }
    }
    slug.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(node: u64, text: &str, existing: Option<&str>) -> HeadingCandidate {
        HeadingCandidate {
            node: NodeId(node),
            level: 2,
            text: text.into(),
            existing_id: existing.map(str::to_string),
            processed: false,
            in_panel: false,
        }
    }

    #[test]
    fn slug_basics() {
        assert_eq!(slugify("Hello, World!", 50), "hello-world");
        assert_eq!(slugify("  Getting   Started  ", 50), "getting-started");
        assert_eq!(slugify("Step 2: Install", 50), "step-2-install");
        assert_eq!(slugify("日本語", 50), "");
        assert_eq!(slugify(&"a".repeat(80), 50).len(), 50);
    }

    #[test]
    fn punctuation_between_words_keeps_one_hyphen() {
        assert_eq!(slugify("A - B", 50), "a-b");
    }

    #[test]
    fn collisions_get_numbered_suffixes() {
        let mut assigner = IdentifierAssigner::new(IdIndex::default(), 50);
        let a = assigner.assign(&candidate(1, "Usage", None), 0);
        let b = assigner.assign(&candidate(2, "Usage", None), 1);
        let c = assigner.assign(&candidate(3, "Usage", None), 2);
        assert_eq!(a.identifier, "usage");
        assert_eq!(b.identifier, "usage-2");
        assert_eq!(c.identifier, "usage-3");
        assert!(a.write_id && b.write_id && c.write_id);
    }

    #[test]
    fn avoids_ids_owned_by_other_elements() {
        let root = DomNode::document(vec![{
            let mut div = DomNode::element("div", HashMap::new(), vec![]).with_attr("id", "faq");
            div.node_id = NodeId(10);
            div
        }]);
        let mut assigner = IdentifierAssigner::new(IdIndex::build(&root), 50);
        let got = assigner.assign(&candidate(1, "FAQ", None), 0);
        assert_eq!(got.identifier, "faq-2");
    }

    #[test]
    fn unique_existing_id_is_reused() {
        let mut h = DomNode::with_text("h2", "Setup").with_attr("id", "custom");
        h.node_id = NodeId(1);
        let root = DomNode::document(vec![h]);
        let mut assigner = IdentifierAssigner::new(IdIndex::build(&root), 50);
        let got = assigner.assign(&candidate(1, "Setup", Some("custom")), 0);
        assert_eq!(
            got,
            Assignment {
                identifier: "custom".into(),
                write_id: false
            }
        );
    }

    #[test]
    fn duplicated_existing_id_is_replaced() {
        let mut h = DomNode::with_text("h2", "Setup").with_attr("id", "dup");
        h.node_id = NodeId(1);
        let mut other = DomNode::element("div", HashMap::new(), vec![]).with_attr("id", "dup");
        other.node_id = NodeId(2);
        let root = DomNode::document(vec![h, other]);
        let mut assigner = IdentifierAssigner::new(IdIndex::build(&root), 50);
        let got = assigner.assign(&candidate(1, "Setup", Some("dup")), 0);
        assert_eq!(got.identifier, "setup");
        assert!(got.write_id);
    }

    #[test]
    fn textless_slug_falls_back_to_position() {
        let mut assigner = IdentifierAssigner::new(IdIndex::default(), 50);
        let got = assigner.assign(&candidate(1, "¿¡…", None), 4);
        assert_eq!(got.identifier, "heading-4");
    }

    #[test]
    fn original_keeps_id_when_clone_precedes_it() {
        let mut clone = DomNode::with_text("h2", "Intro").with_attr("id", "intro");
        clone.node_id = NodeId(9);
        let mut original = DomNode::with_text("h2", "Intro").with_attr("id", "intro");
        original.node_id = NodeId(5);
        let root = DomNode::document(vec![clone, original]);
        let mut assigner = IdentifierAssigner::new(IdIndex::build(&root), 50);

        let mut first = candidate(9, "Intro", Some("intro"));
        first.processed = true;
        let mut second = candidate(5, "Intro", Some("intro"));
        second.processed = true;

        let renamed = assigner.assign(&first, 0);
        assert_eq!(renamed.identifier, "intro-2");
        assert!(renamed.write_id);
        assert_eq!(
            assigner.assign(&second, 1),
            Assignment {
                identifier: "intro".into(),
                write_id: false
            }
        );
    }
}
