//! Device enumeration and real-time streaming for the audio engine core.
//!
//! This crate provides:
//!
//! - **Device enumeration (C3)**: [`list_input_devices`]/[`list_output_devices`].
//! - **Output streaming (C4)**: [`OutputStream`], a non-blocking writer over
//!   a lock-free ring buffer consumed by the OS render callback.
//! - **Input streaming (C5)**: [`InputStream`], a blocking reader over a
//!   mutex-guarded capture buffer.
//!
//! Targets the system audio layer via [`cpal`] (ALSA / CoreAudio / WASAPI /
//! Oboe / WebAudio). Byte-level sample conversion and the ring buffer
//! primitive itself live in `engine-core`; offline mixing lives in
//! `engine-mixer`.

pub mod chunk_provider;
pub mod config;
pub mod device;
pub mod error;
pub mod input_stream;
pub mod output_stream;

pub use chunk_provider::ChunkProvider;
pub use config::{InputStreamConfig, OutputStreamConfig};
pub use device::{DeviceInfo, Scope, list_input_devices, list_output_devices};
pub use error::{Error, Result};
pub use input_stream::InputStream;
pub use output_stream::OutputStream;
