//! Frame input and run configuration.
//!
//! Decoding and directory traversal live here so the tracking stage only
//! ever sees fully decoded RGBA frames.

mod config;
mod frame;
mod loader;

pub use config::{ConfigError, FileConfig, InputConfig, OutputConfig, RenderConfig};
pub use frame::{Frame, CHANNELS, SIZE};
pub use loader::{DirectorySource, FrameSource, MemorySource, SourceError};
