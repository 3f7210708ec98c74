//! Engine Core - data model, sample conversion, and ring buffer primitives
//! for the audio engine core.
//!
//! This crate provides:
//!
//! - **Data model**: [`TrackFormat`], [`Track`], [`SampleCodec`] describing
//!   the full PCM/float format matrix.
//! - **Sample conversion**: [`to_float32`]/[`from_float32`] for bidirectional
//!   conversion between any supported byte-level representation and
//!   canonical interleaved `float32`.
//! - **Ring buffer**: [`ring_buffer`], a lock-free single-producer/
//!   single-consumer buffer of interleaved frames for the real-time
//!   output path.
//!
//! Device enumeration and streaming live in `engine-io`; offline mixing
//! lives in `engine-mixer`. This crate has no OS audio dependency and no
//! allocation on the documented real-time paths.

pub mod convert;
pub mod error;
pub mod format;
pub mod ring_buffer;
pub mod track;

pub use convert::{from_float32, from_float32_into, to_float32, to_float32_into};
pub use error::{Error, Result};
pub use format::{ByteOrder, Codec, SampleCodec, TrackFormat};
pub use ring_buffer::{Consumer, Producer, ring_buffer};
pub use track::Track;
