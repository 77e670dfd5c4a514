//! A simulated host page: document, history, and scroll position.
//!
//! Stands in for the browser environment so the engine can be driven
//! end-to-end, from the CLI and from tests.

pub mod history;

use crate::config::OutlineConfig;
use crate::dom::parser::parse_fragment;
use crate::dom::DomTree;
use crate::engine::visibility::Viewport;
use crate::engine::watcher::HostEvent;
use crate::error::Result;
use crate::render::layout::{compute_layout, Geometry};

pub use history::SessionHistory;

pub struct Page {
    pub tree: DomTree,
    pub history: SessionHistory,
    pub scroll_y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Page {
    pub fn new(tree: DomTree, config: &OutlineConfig) -> Self {
        Self {
            history: SessionHistory::new(tree.url.clone()),
            tree,
            scroll_y: 0.0,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
        }
    }

    pub fn location(&self) -> &str {
        self.history.current()
    }

    pub fn geometry(&self) -> Geometry {
        compute_layout(&self.tree.root, self.viewport_width)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            scroll_y: self.scroll_y,
            width: self.viewport_width,
            height: self.viewport_height,
        }
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
    }

    /// Client-side route change: swap the body and push a history entry.
    /// The body swap is left in the tree's mutation records.
    pub fn navigate(&mut self, body_html: &str, url: &str) -> Result<HostEvent> {
        let event = self.history.push_state(url)?;
        self.tree.replace_body(parse_fragment(body_html));
        self.tree.url = self.history.current().to_string();
        self.scroll_y = 0.0;
        Ok(event)
    }

    /// History traversal; the host swaps content itself if it needs to.
    pub fn back(&mut self) -> Option<HostEvent> {
        let event = self.history.back()?;
        self.tree.url = self.history.current().to_string();
        Some(event)
    }
}
