//! Pixel Churn Library
//!
//! Counts, per pixel position, how often the colour changed across an
//! ordered sequence of fixed-size frames, and renders the resulting
//! histogram as a heatmap plus a mask of positions that never changed.
//!
//! # Architecture
//!
//! ```text
//! source → tracking → render
//!              ↓
//!       metrics / report
//! ```
//!
//! Frames must arrive in order: changes are defined over consecutive
//! pairs, so reordering the input changes the result.
//!
//! # Example
//!
//! ```no_run
//! use pixel_churn::{
//!     analyzer::{Analyzer, Termination},
//!     render::HeatmapRenderer,
//!     source::DirectorySource,
//! };
//!
//! let mut source = DirectorySource::from_dir("images", "*.png").unwrap();
//! let mut analyzer = Analyzer::new(HeatmapRenderer::default());
//!
//! let outcome = analyzer.run(&mut source).unwrap();
//! if let Termination::Saturated { frame } = outcome.termination {
//!     println!("every pixel changed by frame {frame}");
//! }
//! outcome.heatmaps.save("changes.png", "unchanged.png").unwrap();
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analyzer;
pub mod metrics;
pub mod render;
pub mod report;
pub mod source;
pub mod tracking;

// Re-export commonly used types at crate root
pub use analyzer::{AnalysisOutcome, Analyzer, AnalyzerError, Termination};
pub use render::{HeatmapRenderer, Heatmaps, WeightingCurve};
pub use report::RunReport;
pub use source::{DirectorySource, FileConfig, Frame, FrameSource, MemorySource, SIZE};
pub use tracking::{ChangeCounters, DiffError, FrameDiffer, Palette, PaletteIndex, Progress};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
