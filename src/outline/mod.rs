//! Heading model: discovery, identifiers, numbering, change detection and
//! filtering over a `DomTree`.
//!
//! Everything here is synchronous and owns no state between calls; the
//! long-lived pieces (debounce, visibility) live in `crate::engine`.

pub mod change;
pub mod collector;
pub mod filter;
pub mod numbering;
pub mod slug;

use crate::dom::NodeId;

pub use change::changed;
pub use collector::collect;
pub use filter::filter_headings;
pub use numbering::CounterState;

/// One discovered heading, the unit the outline operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRecord {
    /// Stable, document-unique identifier (the element's `id`)
    pub identifier: String,
    /// Trimmed visible text at collection time
    pub text: String,
    /// Semantic depth, 1..=6
    pub level: u8,
    /// Dotted hierarchical label, e.g. `2.3.1`
    pub number: String,
    /// Handle to the underlying element; the tree owns the element
    pub node: NodeId,
}
