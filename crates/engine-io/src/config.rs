//! Stream configuration knobs for buffer headroom.

/// Configuration for [`crate::output_stream::OutputStream::open`].
#[derive(Debug, Clone, Copy)]
pub struct OutputStreamConfig {
    /// Seconds of canonical-frame headroom the ring buffer is sized to hold
    /// (roughly 5 seconds of headroom by default).
    pub ring_buffer_seconds: f32,
}

impl Default for OutputStreamConfig {
    fn default() -> Self {
        Self {
            ring_buffer_seconds: 5.0,
        }
    }
}

/// Configuration for [`crate::input_stream::InputStream::open`].
#[derive(Debug, Clone, Copy)]
pub struct InputStreamConfig {
    /// Seconds of PCM headroom the internal capture buffer targets
    /// (roughly the last 2 seconds by default).
    pub buffer_seconds: f32,
}

impl Default for InputStreamConfig {
    fn default() -> Self {
        Self {
            buffer_seconds: 2.0,
        }
    }
}
