//! Error types for visual diffing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a comparison.
#[derive(Debug, Error)]
pub enum DiffError {
    /// Output from an earlier run is still present.
    #[error("Diff output already exists at {}; clear the cached diff output before re-running", .0.display())]
    StaleOutput(PathBuf),

    /// The two sessions recorded a different number of frames.
    #[error("Frame count mismatch: {} has {left} frames, {} has {right}", .left_dir.display(), .right_dir.display())]
    FrameCountMismatch {
        left_dir: PathBuf,
        left: usize,
        right_dir: PathBuf,
        right: usize,
    },

    /// A frame index in `0..N` has no file.
    #[error("Missing frame {}", .0.display())]
    MissingFrame(PathBuf),

    /// The directory holds no frames at all.
    #[error("No frames found in {}", .0.display())]
    NoFrames(PathBuf),

    /// Two frames being compared differ in size.
    #[error(
        "Dimension mismatch: {} is {}x{}, {} is {}x{}",
        .left.display(), .left_size.0, .left_size.1,
        .right.display(), .right_size.0, .right_size.1
    )]
    DimensionMismatch {
        left: PathBuf,
        left_size: (u32, u32),
        right: PathBuf,
        right_size: (u32, u32),
    },

    /// A frame could not be read as an image.
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A diff image could not be written.
    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem error.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The diff log could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A loaded diff log violates its length invariants.
    #[error("Invalid diff report: {0}")]
    InvalidReport(String),
}

impl DiffError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_output_message() {
        let err = DiffError::StaleOutput(PathBuf::from("temp/diff"));
        let msg = err.to_string();
        assert!(msg.contains("temp/diff"));
        assert!(msg.contains("clear the cached diff output"));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = DiffError::DimensionMismatch {
            left: PathBuf::from("a/0.png"),
            left_size: (10, 20),
            right: PathBuf::from("b/0.png"),
            right_size: (10, 21),
        };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: a/0.png is 10x20, b/0.png is 10x21"
        );
    }

    #[test]
    fn test_frame_count_mismatch_message() {
        let err = DiffError::FrameCountMismatch {
            left_dir: PathBuf::from("a"),
            left: 3,
            right_dir: PathBuf::from("b"),
            right: 4,
        };
        assert_eq!(err.to_string(), "Frame count mismatch: a has 3 frames, b has 4");
    }
}
