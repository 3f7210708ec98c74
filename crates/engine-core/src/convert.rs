//! Bidirectional conversion between byte-level PCM/float and canonical `f32`.
//!
//! Canonical form is interleaved `float32` in nominal `[-1.0, 1.0]`, native
//! byte order. Every routine here is a pure function with no allocation on
//! its hot path — callers own the destination buffer.

use crate::error::{Error, Result};
use crate::format::{SampleCodec, TrackFormat};

const I8_SCALE: f32 = 128.0;
const I16_SCALE: f32 = 32768.0;
const I24_SCALE: f32 = 8_388_608.0;
const I32_SCALE: f32 = 2_147_483_648.0;

/// Convert a byte buffer in `format` to canonical interleaved `f32` samples.
///
/// `bytes.len()` must be a multiple of `format.bytes_per_frame()`. The
/// returned vector has `bytes.len() / format.bytes_per_sample()` elements.
pub fn to_float32(bytes: &[u8], format: &TrackFormat) -> Result<Vec<f32>> {
    let bytes_per_frame = format.bytes_per_frame();
    if bytes_per_frame == 0 || bytes.len() % bytes_per_frame != 0 {
        return Err(Error::InvalidArgument(format!(
            "byte length {} is not a multiple of bytes_per_frame {}",
            bytes.len(),
            bytes_per_frame
        )));
    }
    let tag = format.codec_tag()?;
    let bytes_per_sample = format.bytes_per_sample();
    let sample_count = bytes.len() / bytes_per_sample;
    let mut out = vec![0.0f32; sample_count];
    to_float32_into(bytes, tag, &mut out);
    Ok(out)
}

/// Same as [`to_float32`] but writes into a caller-owned, preallocated
/// destination slice — the real-time-safe entry point (no allocation).
///
/// `dst.len()` must equal `bytes.len() / bytes_per_sample(tag)`.
pub fn to_float32_into(bytes: &[u8], tag: SampleCodec, dst: &mut [f32]) {
    match tag {
        SampleCodec::Pcm8Signed => {
            for (b, s) in bytes.iter().zip(dst.iter_mut()) {
                *s = (*b as i8) as f32 / I8_SCALE;
            }
        }
        SampleCodec::Pcm8Unsigned => {
            for (b, s) in bytes.iter().zip(dst.iter_mut()) {
                *s = (*b as i32 - 128) as f32 / 127.0;
            }
        }
        SampleCodec::Pcm16SignedLe => {
            for (chunk, s) in bytes.chunks_exact(2).zip(dst.iter_mut()) {
                let v = i16::from_le_bytes([chunk[0], chunk[1]]);
                *s = v as f32 / I16_SCALE;
            }
        }
        SampleCodec::Pcm16SignedBe => {
            for (chunk, s) in bytes.chunks_exact(2).zip(dst.iter_mut()) {
                let v = i16::from_be_bytes([chunk[0], chunk[1]]);
                *s = v as f32 / I16_SCALE;
            }
        }
        SampleCodec::Pcm16UnsignedLe => {
            for (chunk, s) in bytes.chunks_exact(2).zip(dst.iter_mut()) {
                let v = u16::from_le_bytes([chunk[0], chunk[1]]);
                *s = (v as i32 - 32768) as f32 / I16_SCALE;
            }
        }
        SampleCodec::Pcm16UnsignedBe => {
            for (chunk, s) in bytes.chunks_exact(2).zip(dst.iter_mut()) {
                let v = u16::from_be_bytes([chunk[0], chunk[1]]);
                *s = (v as i32 - 32768) as f32 / I16_SCALE;
            }
        }
        SampleCodec::Pcm24SignedLe => {
            for (chunk, s) in bytes.chunks_exact(3).zip(dst.iter_mut()) {
                *s = sign_extend_24([chunk[0], chunk[1], chunk[2]]) as f32 / I24_SCALE;
            }
        }
        SampleCodec::Pcm24SignedBe => {
            for (chunk, s) in bytes.chunks_exact(3).zip(dst.iter_mut()) {
                *s = sign_extend_24([chunk[2], chunk[1], chunk[0]]) as f32 / I24_SCALE;
            }
        }
        SampleCodec::Pcm32SignedLe => {
            for (chunk, s) in bytes.chunks_exact(4).zip(dst.iter_mut()) {
                let v = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                *s = v as f32 / I32_SCALE;
            }
        }
        SampleCodec::Pcm32SignedBe => {
            for (chunk, s) in bytes.chunks_exact(4).zip(dst.iter_mut()) {
                let v = i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                *s = v as f32 / I32_SCALE;
            }
        }
        SampleCodec::Float32Le => {
            for (chunk, s) in bytes.chunks_exact(4).zip(dst.iter_mut()) {
                *s = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
        }
        SampleCodec::Float32Be => {
            for (chunk, s) in bytes.chunks_exact(4).zip(dst.iter_mut()) {
                *s = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
        }
        SampleCodec::Float64Le => {
            for (chunk, s) in bytes.chunks_exact(8).zip(dst.iter_mut()) {
                let arr: [u8; 8] = chunk.try_into().unwrap();
                *s = f64::from_le_bytes(arr) as f32;
            }
        }
        SampleCodec::Float64Be => {
            for (chunk, s) in bytes.chunks_exact(8).zip(dst.iter_mut()) {
                let arr: [u8; 8] = chunk.try_into().unwrap();
                *s = f64::from_be_bytes(arr) as f32;
            }
        }
    }
}

/// Convert canonical interleaved `f32` samples to bytes in `format`.
///
/// Samples are hard-clipped to `[-1.0, 1.0]` before scaling.
pub fn from_float32(samples: &[f32], format: &TrackFormat) -> Result<Vec<u8>> {
    let tag = format.codec_tag()?;
    let mut out = vec![0u8; samples.len() * format.bytes_per_sample()];
    from_float32_into(samples, tag, &mut out);
    Ok(out)
}

/// Same as [`from_float32`] but writes into a caller-owned destination slice.
pub fn from_float32_into(samples: &[f32], tag: SampleCodec, dst: &mut [u8]) {
    match tag {
        SampleCodec::Pcm8Signed => {
            for (s, b) in samples.iter().zip(dst.iter_mut()) {
                *b = clamp_to_i32(*s, I8_SCALE, -128, 127) as i8 as u8;
            }
        }
        SampleCodec::Pcm8Unsigned => {
            for (s, b) in samples.iter().zip(dst.iter_mut()) {
                let v = clamp_to_i32(*s, 127.0, -127, 127) + 128;
                *b = v as u8;
            }
        }
        SampleCodec::Pcm16SignedLe => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(2)) {
                let v = clamp_to_i32(*s, I16_SCALE, -32768, 32767) as i16;
                chunk.copy_from_slice(&v.to_le_bytes());
            }
        }
        SampleCodec::Pcm16SignedBe => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(2)) {
                let v = clamp_to_i32(*s, I16_SCALE, -32768, 32767) as i16;
                chunk.copy_from_slice(&v.to_be_bytes());
            }
        }
        SampleCodec::Pcm16UnsignedLe => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(2)) {
                let v = (clamp_to_i32(*s, I16_SCALE, -32768, 32767) + 32768) as u16;
                chunk.copy_from_slice(&v.to_le_bytes());
            }
        }
        SampleCodec::Pcm16UnsignedBe => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(2)) {
                let v = (clamp_to_i32(*s, I16_SCALE, -32768, 32767) + 32768) as u16;
                chunk.copy_from_slice(&v.to_be_bytes());
            }
        }
        SampleCodec::Pcm24SignedLe => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(3)) {
                let v = clamp_to_i32(*s, I24_SCALE, -8_388_608, 8_388_607);
                let b = v.to_le_bytes();
                chunk.copy_from_slice(&b[..3]);
            }
        }
        SampleCodec::Pcm24SignedBe => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(3)) {
                let v = clamp_to_i32(*s, I24_SCALE, -8_388_608, 8_388_607);
                let b = v.to_le_bytes();
                chunk[0] = b[2];
                chunk[1] = b[1];
                chunk[2] = b[0];
            }
        }
        SampleCodec::Pcm32SignedLe => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(4)) {
                let v = clamp_to_i64(*s, I32_SCALE, i32::MIN as i64, i32::MAX as i64) as i32;
                chunk.copy_from_slice(&v.to_le_bytes());
            }
        }
        SampleCodec::Pcm32SignedBe => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(4)) {
                let v = clamp_to_i64(*s, I32_SCALE, i32::MIN as i64, i32::MAX as i64) as i32;
                chunk.copy_from_slice(&v.to_be_bytes());
            }
        }
        SampleCodec::Float32Le => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(4)) {
                chunk.copy_from_slice(&s.to_le_bytes());
            }
        }
        SampleCodec::Float32Be => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(4)) {
                chunk.copy_from_slice(&s.to_be_bytes());
            }
        }
        SampleCodec::Float64Le => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(8)) {
                chunk.copy_from_slice(&(*s as f64).to_le_bytes());
            }
        }
        SampleCodec::Float64Be => {
            for (s, chunk) in samples.iter().zip(dst.chunks_exact_mut(8)) {
                chunk.copy_from_slice(&(*s as f64).to_be_bytes());
            }
        }
    }
}

/// Sign-extend a 24-bit two's complement value, given as 3 bytes in
/// little-endian byte order within the array (regardless of the source
/// stream's on-wire order — callers reorder before calling).
fn sign_extend_24(le_bytes: [u8; 3]) -> i32 {
    let raw = (le_bytes[0] as i32) | ((le_bytes[1] as i32) << 8) | ((le_bytes[2] as i32) << 16);
    (raw << 8) >> 8
}

#[inline]
fn clamp_to_i32(sample: f32, scale: f32, min: i32, max: i32) -> i32 {
    let clamped = sample.clamp(-1.0, 1.0);
    let scaled = clamped * scale;
    (scaled.round() as i32).clamp(min, max)
}

#[inline]
fn clamp_to_i64(sample: f32, scale: f32, min: i64, max: i64) -> i64 {
    let clamped = sample.clamp(-1.0, 1.0) as f64;
    let scaled = clamped * scale as f64;
    (scaled.round() as i64).clamp(min, max)
}
