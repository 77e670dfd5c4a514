//! Heading collection pass.
//!
//! Walks the tree in document order, skips empty headings and anything
//! inside the outline panel, then assigns identifiers and numbers with one
//! shared counter state. Newly labelled elements get their `id` and the
//! processed marker written back, which makes a second pass over an
//! unchanged tree reproduce the same list.

use crate::config::OutlineConfig;
use crate::dom::{DomNode, DomTree};

use super::numbering::CounterState;
use super::slug::{HeadingCandidate, IdIndex, IdentifierAssigner};
use super::HeadingRecord;

/// Collect the canonical heading list for the current state of `tree`.
pub fn collect(tree: &mut DomTree, config: &OutlineConfig) -> Vec<HeadingRecord> {
    let mut candidates = Vec::new();
    scan(&tree.root, false, config, &mut candidates);

    let mut assigner = IdentifierAssigner::new(IdIndex::build(&tree.root), config.max_slug_len);
    let mut counters = CounterState::new();
    let mut headings = Vec::with_capacity(candidates.len());

    for (position, candidate) in candidates.iter().enumerate() {
        if candidate.in_panel || candidate.text.is_empty() {
            continue;
        }

        let assignment = assigner.assign(candidate, position);
        if assignment.write_id {
            tree.set_attr(candidate.node, "id", assignment.identifier.clone());
        }
        if !candidate.processed {
            tree.set_attr(candidate.node, &config.processed_attribute, "true");
        }

        headings.push(HeadingRecord {
            identifier: assignment.identifier,
            text: candidate.text.clone(),
            level: candidate.level,
            number: counters.advance(candidate.level),
            node: candidate.node,
        });
    }

    log::debug!(
        "Collected {} headings ({} scanned) from {}",
        headings.len(),
        candidates.len(),
        tree.url
    );
    headings
}

fn scan(node: &DomNode, in_panel: bool, config: &OutlineConfig, out: &mut Vec<HeadingCandidate>) {
    let panel_id = config.panel_id.as_str();
    let in_panel = in_panel || (!panel_id.is_empty() && node.attr("id") == Some(panel_id));

    if let Some(level) = node.heading_level() {
        out.push(HeadingCandidate {
            node: node.node_id,
            level,
            text: node.text_content().trim().to_string(),
            existing_id: node.attr("id").map(str::to_string),
            processed: node.attr(&config.processed_attribute).is_some(),
            in_panel,
        });
    }

    for child in &node.children {
        scan(child, in_panel, config, out);
    }
}
