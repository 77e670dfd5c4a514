//! Engine configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) yields
//! the stock behaviour: a 750 ms debounce and a trigger band covering the
//! top fifth of the viewport.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{OutlineError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Quiet period before a burst of mutations triggers re-collection
    pub debounce_delay_ms: u64,
    /// Fraction of the viewport height, measured from the top, that counts
    /// as the intersection trigger band
    pub trigger_band: f32,
    /// Minimum visible fraction of a heading inside the band
    pub visibility_threshold: f32,
    /// `id` of the outline panel element; headings inside it are ignored
    pub panel_id: String,
    /// Attribute written onto headings once they have an identifier
    pub processed_attribute: String,
    /// Maximum length of a derived identifier, before any collision suffix
    pub max_slug_len: usize,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            debounce_delay_ms: 750,
            trigger_band: 0.2,
            visibility_threshold: 0.1,
            panel_id: "alice-outline-panel".into(),
            processed_attribute: "data-outline-processed".into(),
            max_slug_len: 50,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

impl OutlineConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| OutlineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_panel_id(mut self, panel_id: impl Into<String>) -> Self {
        self.panel_id = panel_id.into();
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }
}
