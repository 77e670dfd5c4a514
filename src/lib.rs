pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod net;
pub mod outline;
pub mod page;
pub mod render;

pub use config::OutlineConfig;
pub use engine::{OutlineEngine, OutlineEvent};
pub use error::{OutlineError, Result};
pub use outline::HeadingRecord;
