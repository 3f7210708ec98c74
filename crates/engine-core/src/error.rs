//! Error types shared by every layer of the audio engine core.

use thiserror::Error;

/// Errors surfaced by the host-thread APIs of the engine core.
///
/// The real-time audio callback never returns this type (see module docs on
/// [`crate::ring_buffer`]); it counts failures instead. This enum is for
/// open/close, conversion, and mixing paths that run on ordinary threads.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested device id does not match any enumerated device.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The OS reported a failure while opening or starting a device.
    #[error("failed to open device: {0}")]
    OpenDeviceFailure(String),

    /// A `TrackFormat` failed its internal consistency invariant.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// An argument violated a documented precondition (e.g. misaligned byte length).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A mixer call was given an empty or entirely-empty track list.
    #[error("empty input")]
    EmptyInput,

    /// The offline mixer failed for a reason not covered by the other variants.
    #[error("mixing failed: {0}")]
    MixingFailure(String),

    /// Allocation of a working buffer failed.
    #[error("out of memory")]
    OutOfMemory,

    /// The stream was used after `close`.
    #[error("stream closed")]
    StreamClosed,
}

/// Convenience result alias for the engine core.
pub type Result<T> = std::result::Result<T, Error>;
