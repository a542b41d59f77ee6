//! Frame sources.
//!
//! A source hands frames to the analyzer one at a time, in the order the
//! results depend on. `DirectorySource` orders files lexically by path;
//! callers who need another order must name their files accordingly.

use super::Frame;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while producing frames.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid frame pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("failed to list frames: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("failed to decode frame {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Trait for anything that yields frames in arrival order.
pub trait FrameSource {
    /// Produces the next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Number of frames left, when known up front.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Reads frames from image files in a directory.
///
/// Paths are listed eagerly, decoding happens lazily so only the frame
/// in hand and the differ's previous frame are resident.
#[derive(Debug)]
pub struct DirectorySource {
    paths: VecDeque<PathBuf>,
    sequence: u64,
}

impl DirectorySource {
    /// Lists every file in `dir` matching `pattern`, sorted by path.
    pub fn from_dir(dir: impl AsRef<Path>, pattern: &str) -> Result<Self, SourceError> {
        let escaped = glob::Pattern::escape(&dir.as_ref().to_string_lossy());
        let full = Path::new(&escaped).join(pattern);
        let full = full.to_string_lossy();

        let entries = glob::glob(&full).map_err(|source| SourceError::Pattern {
            pattern: full.to_string(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?;
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        tracing::info!(
            dir = %dir.as_ref().display(),
            frames = paths.len(),
            "Listed frame files"
        );

        Ok(Self::from_paths(paths))
    }

    /// Uses an explicit, already ordered list of files.
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            sequence: 0,
        }
    }

    /// Files not yet decoded.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

impl FrameSource for DirectorySource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };

        let image = image::open(&path).map_err(|source| SourceError::Decode {
            path: path.clone(),
            source,
        })?;

        self.sequence += 1;
        tracing::trace!(path = %path.display(), sequence = self.sequence, "Decoded frame");

        Ok(Some(Frame::from_rgba(image.to_rgba8(), self.sequence)))
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.paths.len())
    }
}

/// In-memory source for tests and for callers that decode frames themselves.
#[derive(Debug, Default)]
pub struct MemorySource {
    frames: VecDeque<Frame>,
}

impl MemorySource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Appends a frame to the end of the queue.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(frame);
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        Ok(self.frames.pop_front())
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.frames.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_memory_source_preserves_order() {
        let mut source = MemorySource::new([
            Frame::solid(2, 2, [0, 0, 0, 255], 1),
            Frame::solid(2, 2, [1, 1, 1, 255], 2),
        ]);
        source.push(Frame::solid(2, 2, [2, 2, 2, 255], 3));

        assert_eq!(source.remaining(), Some(3));
        for expected in 1..=3 {
            let frame = source.next_frame().unwrap().unwrap();
            assert_eq!(frame.sequence(), expected);
        }
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_directory_source_sorts_lexically() {
        let dir = tempfile::tempdir().unwrap();
        for (name, shade) in [("b.png", 2u8), ("a.png", 1), ("c.png", 3)] {
            RgbaImage::from_pixel(2, 2, Rgba([shade, shade, shade, 255]))
                .save(dir.path().join(name))
                .unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut source = DirectorySource::from_dir(dir.path(), "*.png").unwrap();
        assert_eq!(source.remaining(), Some(3));

        let shades: Vec<u8> = std::iter::from_fn(|| source.next_frame().unwrap())
            .map(|frame| frame.pixel(0, 0)[0])
            .collect();
        assert_eq!(shades, vec![1, 2, 3]);
    }

    #[test]
    fn test_undecodable_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let mut source = DirectorySource::from_paths([path]);
        assert!(matches!(
            source.next_frame(),
            Err(SourceError::Decode { .. })
        ));
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = DirectorySource::from_dir(dir.path(), "*.png").unwrap();
        assert!(source.next_frame().unwrap().is_none());
    }
}
