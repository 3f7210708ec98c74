//! Error type for device enumeration and stream lifecycle operations.

use thiserror::Error;

/// Errors surfaced by [`crate::device`], [`crate::output_stream`], and
/// [`crate::input_stream`]. Mirrors [`engine_core::Error`]'s variant shape
/// with a bridge from the `cpal` error types at the I/O boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested device id or name does not match any enumerated device.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Opening a device or building a stream failed at the OS layer.
    #[error("failed to open device: {0}")]
    OpenDeviceFailure(String),

    /// A format was requested that the device or converter cannot honor.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// An argument violated a documented precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was attempted on a stream that has already been closed.
    #[error("stream closed")]
    StreamClosed,

    #[error("device enumeration failed: {0}")]
    DeviceEnumeration(#[from] cpal::DevicesError),

    #[error("failed to query default device: {0}")]
    DefaultStreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to query supported configs: {0}")]
    SupportedStreamConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("failed to build stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error(transparent)]
    Core(#[from] engine_core::Error),
}

/// Convenience result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
