//! Optional pull-mode producer notification.
//!
//! Modeled only as a notification: the audio thread never calls into this
//! trait directly. A worker thread observes the low-water-mark signal and
//! invokes the callback outside the real-time critical section. The
//! synchronous buffer-returning variant considered in the source is rejected
//! here since it cannot be made real-time safe.

/// Notified when the output ring buffer has dropped below a watermark.
///
/// Implementations run off the audio thread. The call is best-effort: by the
/// time it runs, the buffer state may already have changed again, and it may
/// miss a render deadline without that being treated as an error.
pub trait ChunkProvider: Send {
    /// Called when the engine would like roughly `requested_bytes` more
    /// producer-format bytes written via [`crate::output_stream::OutputStream::write`].
    fn on_next_chunk_required(&self, requested_bytes: usize);
}
