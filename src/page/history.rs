//! Session history for a simulated page.
//!
//! Mirrors the browser's history stack: `push_state` truncates forward
//! entries, `back`/`forward` move the cursor. Every call hands back the
//! event a page script would observe, so it can be fed to the engine.

use url::Url;

use crate::engine::watcher::HostEvent;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<String>,
    index: usize,
}

impl SessionHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// `history.pushState` to `url`, resolved against the current entry.
    pub fn push_state(&mut self, url: &str) -> Result<HostEvent> {
        let resolved = self.resolve(url)?;
        self.push(resolved);
        Ok(HostEvent::PushState)
    }

    /// `history.replaceState`: rewrite the current entry in place.
    pub fn replace_state(&mut self, url: &str) -> Result<HostEvent> {
        let resolved = self.resolve(url)?;
        self.entries[self.index] = resolved;
        Ok(HostEvent::ReplaceState)
    }

    /// Change the fragment. Setting the fragment it already has is a no-op.
    pub fn set_hash(&mut self, fragment: &str) -> Result<Option<HostEvent>> {
        let mut url = Url::parse(self.current())?;
        let fragment = fragment.trim_start_matches('#');
        if url.fragment() == Some(fragment) {
            return Ok(None);
        }
        url.set_fragment(Some(fragment));
        self.push(url.to_string());
        Ok(Some(HostEvent::HashChange))
    }

    /// Navigate one step back in history.
    pub fn back(&mut self) -> Option<HostEvent> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        Some(HostEvent::PopState)
    }

    /// Navigate one step forward in history.
    pub fn forward(&mut self) -> Option<HostEvent> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        Some(HostEvent::PopState)
    }

    fn push(&mut self, url: String) {
        // Truncate forward history before pushing
        self.entries.truncate(self.index + 1);
        self.entries.push(url);
        self.index = self.entries.len() - 1;
    }

    fn resolve(&self, url: &str) -> Result<String> {
        let resolved = match Url::parse(self.current()) {
            Ok(base) => base.join(url)?,
            Err(_) => Url::parse(url)?,
        };
        Ok(resolved.to_string())
    }
}
