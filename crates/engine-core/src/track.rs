//! `Track`: an in-memory byte buffer plus the format and duration describing it.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::format::TrackFormat;

/// An audio track: raw bytes in a known [`TrackFormat`], with a derived
/// duration and passthrough metadata.
///
/// Persistence and file-format decoding are external collaborators (see
/// crate docs); `Track` only ever holds bytes already in memory.
#[derive(Debug, Clone)]
pub struct Track {
    bytes: Vec<u8>,
    format: TrackFormat,
    duration_ms: f64,
    /// Opaque key/value metadata, passed through unexamined.
    pub metadata: HashMap<String, String>,
}

impl Track {
    /// Build a track from bytes already in `format`.
    ///
    /// `bytes.len()` must be a multiple of `format.bytes_per_frame()`.
    pub fn new(bytes: Vec<u8>, format: TrackFormat) -> Result<Self> {
        let bytes_per_frame = format.bytes_per_frame();
        if bytes_per_frame == 0 || bytes.len() % bytes_per_frame != 0 {
            return Err(Error::InvalidArgument(format!(
                "track byte length {} is not a multiple of bytes_per_frame {}",
                bytes.len(),
                bytes_per_frame
            )));
        }
        let frame_count = bytes.len() / bytes_per_frame;
        let duration_ms = frame_count as f64 * 1000.0 / f64::from(format.sample_rate);
        Ok(Self {
            bytes,
            format,
            duration_ms,
            metadata: HashMap::new(),
        })
    }

    /// The track's format.
    #[must_use]
    pub fn format(&self) -> TrackFormat {
        self.format
    }

    /// Raw byte buffer.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of multi-channel frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.bytes.len() / self.format.bytes_per_frame()
    }

    /// Duration in milliseconds, derived from frame count and sample rate.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}
