//! Real-time input stream (C5): binds a device, appends captured bytes to a
//! mutex-guarded buffer, and serves a blocking read API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use engine_core::{SampleCodec, TrackFormat};

use crate::config::InputStreamConfig;
use crate::error::{Error, Result};

struct Inner {
    buffer: Mutex<Vec<u8>>,
    not_empty: Condvar,
    running: AtomicBool,
}

/// An open input stream bound to one device.
pub struct InputStream {
    stream: Option<cpal::Stream>,
    inner: Arc<Inner>,
    format: TrackFormat,
}

impl InputStream {
    /// Acquire the system's default input device (or the one named
    /// `device_id`), install a capture callback, and initialize the unit
    /// without starting it; the unit starts lazily on first [`Self::read`].
    pub fn open(
        device_id: Option<&str>,
        format: TrackFormat,
        config: InputStreamConfig,
    ) -> Result<Self> {
        let host = cpal::default_host();
        let device = match device_id {
            Some(name) => host
                .input_devices()
                .map_err(Error::DeviceEnumeration)?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| Error::DeviceNotFound(name.to_string()))?,
            None => host
                .default_input_device()
                .ok_or_else(|| Error::DeviceNotFound("no default input device".into()))?,
        };

        let supported = device
            .default_input_config()
            .map_err(Error::DefaultStreamConfig)?;

        if format.channels != supported.channels() {
            return Err(Error::InvalidFormat(format!(
                "requested format has {} channels but device has {}",
                format.channels,
                supported.channels()
            )));
        }
        let tag = format.codec_tag()?;

        let headroom_bytes = (config.buffer_seconds
            * supported.sample_rate().0 as f32
            * supported.channels() as f32
            * format.bytes_per_sample() as f32) as usize;

        let inner = Arc::new(Inner {
            buffer: Mutex::new(Vec::with_capacity(headroom_bytes)),
            not_empty: Condvar::new(),
            running: AtomicBool::new(false),
        });

        let stream_config = cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };

        let cb_inner = Arc::clone(&inner);
        let bytes_per_sample = format.bytes_per_sample();
        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    capture_frame(&cb_inner, data, tag, bytes_per_sample);
                },
                |err| {
                    tracing::warn!(error = %err, "input stream callback error");
                },
                None,
            )
            .map_err(Error::BuildStream)?;

        tracing::info!(device = ?device_id, "input stream opened");

        Ok(Self {
            stream: Some(stream),
            inner,
            format,
        })
    }

    /// The format captured bytes are encoded in, as passed to [`Self::open`].
    #[must_use]
    pub fn format(&self) -> TrackFormat {
        self.format
    }

    /// Block until at least one byte is available or the stream is closed,
    /// then copy up to `dst.len()` bytes into `dst`, removing them from the
    /// front of the internal buffer. Starts the unit on first call. Returns
    /// the number of bytes copied; `0` means the stream was closed
    /// concurrently.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        if !self.inner.running.swap(true, Ordering::AcqRel) {
            let stream = self
                .stream
                .as_ref()
                .ok_or(Error::StreamClosed)?;
            stream.play().map_err(Error::PlayStream)?;
        }

        let mut copied = 0;
        while copied < dst.len() {
            let mut buffer = self.inner.buffer.lock().unwrap();
            while buffer.is_empty() && self.inner.running.load(Ordering::Acquire) {
                buffer = self.inner.not_empty.wait(buffer).unwrap();
            }
            if buffer.is_empty() {
                // running went false while waiting: stream was closed.
                break;
            }
            let take = buffer.len().min(dst.len() - copied);
            dst[copied..copied + take].copy_from_slice(&buffer[..take]);
            buffer.drain(..take);
            copied += take;
        }
        Ok(copied)
    }

    /// Stop the unit, wake any blocked reader, and release native resources.
    pub fn close(&mut self) {
        self.inner.running.store(false, Ordering::Release);
        self.inner.not_empty.notify_all();
        if let Some(stream) = self.stream.take() {
            drop(stream);
        }
        tracing::info!("input stream closed");
    }
}

impl Drop for InputStream {
    fn drop(&mut self) {
        if self.stream.is_some() {
            self.close();
        }
    }
}

/// The capture callback body, extracted for testability without a
/// live `cpal::Stream`. Encodes `data` (captured as `f32` by the cpal
/// backend) into the stream's declared format in a small temporary, then
/// appends it to the internal buffer under the mutex — held only for the
/// copy and resize — and signals the condition variable.
fn capture_frame(inner: &Inner, data: &[f32], tag: SampleCodec, bytes_per_sample: usize) {
    let mut encoded = vec![0u8; data.len() * bytes_per_sample];
    engine_core::from_float32_into(data, tag, &mut encoded);
    let mut buffer = inner.buffer.lock().unwrap();
    buffer.extend_from_slice(&encoded);
    drop(buffer);
    inner.not_empty.notify_one();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_then_direct_read_recovers_bytes() {
        let inner = Inner {
            buffer: Mutex::new(Vec::new()),
            not_empty: Condvar::new(),
            running: AtomicBool::new(true),
        };
        capture_frame(&inner, &[1.0, -1.0], SampleCodec::Float32Le, 4);

        let buffer = inner.buffer.lock().unwrap();
        assert_eq!(buffer.len(), 8);
        assert_eq!(&buffer[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&buffer[4..8], &(-1.0f32).to_le_bytes());
    }

    #[test]
    fn capture_encodes_into_pcm16_when_that_is_the_declared_format() {
        let inner = Inner {
            buffer: Mutex::new(Vec::new()),
            not_empty: Condvar::new(),
            running: AtomicBool::new(true),
        };
        capture_frame(&inner, &[1.0, -1.0], SampleCodec::Pcm16SignedLe, 2);

        let buffer = inner.buffer.lock().unwrap();
        assert_eq!(buffer.len(), 4);
        assert_eq!(i16::from_le_bytes([buffer[0], buffer[1]]), i16::MAX);
        assert_eq!(i16::from_le_bytes([buffer[2], buffer[3]]), i16::MIN);
    }

    #[test]
    fn closing_wakes_a_blocked_reader_with_zero_bytes() {
        let inner = Arc::new(Inner {
            buffer: Mutex::new(Vec::new()),
            not_empty: Condvar::new(),
            running: AtomicBool::new(true),
        });

        let reader_inner = Arc::clone(&inner);
        let handle = std::thread::spawn(move || {
            let mut buffer = reader_inner.buffer.lock().unwrap();
            while buffer.is_empty() && reader_inner.running.load(Ordering::Acquire) {
                buffer = reader_inner.not_empty.wait(buffer).unwrap();
            }
            buffer.is_empty()
        });

        std::thread::sleep(std::time::Duration::from_millis(20));
        inner.running.store(false, Ordering::Release);
        inner.not_empty.notify_all();

        assert!(handle.join().unwrap());
    }
}
