//! Lock-free single-producer/single-consumer ring buffer of interleaved
//! `float32` frames.
//!
//! The producer (host thread) calls [`Producer::enqueue`]; the consumer (the
//! OS-owned real-time render callback) calls [`Consumer::dequeue`]. Neither
//! path allocates, locks, or makes a system call. One frame of capacity is
//! intentionally kept unused so that `write == read` unambiguously means
//! empty.
//!
//! Sample storage uses `AtomicU32` bit-patterns rather than a raw shared
//! buffer: the `read`/`write` index exchange already does the real
//! synchronization (release-store on the side that just finished writing,
//! acquire-load on the side about to read), so the per-sample stores only
//! need `Relaxed` ordering — they become visible through the happens-before
//! edge the index establishes. This keeps the whole buffer free of
//! `unsafe`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

struct Shared {
    data: Box<[AtomicU32]>,
    read: AtomicUsize,
    write: AtomicUsize,
    frames: usize,
    channels: usize,
}

/// Create a ring buffer sized for `frames` frames of `channels` channels,
/// returning its producer and consumer halves.
///
/// `frames` must be at least 2 (one usable frame plus the disambiguation
/// slot).
#[must_use]
pub fn ring_buffer(frames: usize, channels: usize) -> (Producer, Consumer) {
    assert!(frames >= 2, "ring buffer needs at least 2 frames of capacity");
    assert!(channels >= 1, "ring buffer needs at least 1 channel");
    let shared = Arc::new(Shared {
        data: (0..frames * channels)
            .map(|_| AtomicU32::new(0))
            .collect(),
        read: AtomicUsize::new(0),
        write: AtomicUsize::new(0),
        frames,
        channels,
    });
    (
        Producer {
            shared: Arc::clone(&shared),
        },
        Consumer { shared },
    )
}

impl Shared {
    fn available_frames(&self, write: usize, read: usize) -> usize {
        (write + self.frames - read) % self.frames
    }

    fn free_frames(&self, write: usize, read: usize) -> usize {
        self.frames - self.available_frames(write, read) - 1
    }
}

/// Producer half of a ring buffer. Owned by the host thread that submits
/// audio; not `Clone` — there is exactly one producer per buffer.
pub struct Producer {
    shared: Arc<Shared>,
}

/// Consumer half of a ring buffer. Owned by the real-time render callback;
/// not `Clone` — there is exactly one consumer per buffer.
pub struct Consumer {
    shared: Arc<Shared>,
}

impl Producer {
    /// Frames currently queued and not yet consumed.
    #[must_use]
    pub fn available_frames(&self) -> usize {
        let write = self.shared.write.load(Ordering::Relaxed);
        let read = self.shared.read.load(Ordering::Acquire);
        self.shared.available_frames(write, read)
    }

    /// Frames of free space remaining.
    #[must_use]
    pub fn free_frames(&self) -> usize {
        let write = self.shared.write.load(Ordering::Relaxed);
        let read = self.shared.read.load(Ordering::Acquire);
        self.shared.free_frames(write, read)
    }

    /// Enqueue up to `src.len() / channels` frames from `src` (interleaved).
    ///
    /// Writes `min(frames_in_src, free_frames())` frames, possibly crossing
    /// the wraparound in two segments, then release-stores the new write
    /// index. Returns the number of frames actually written.
    pub fn enqueue(&mut self, src: &[f32]) -> usize {
        let channels = self.shared.channels;
        let frames_in_src = src.len() / channels;
        let write = self.shared.write.load(Ordering::Relaxed);
        let read = self.shared.read.load(Ordering::Acquire);
        let free = self.shared.free_frames(write, read);
        let to_write = frames_in_src.min(free);

        let capacity_frames = self.shared.frames;
        for i in 0..to_write {
            let dst_frame = (write + i) % capacity_frames;
            for ch in 0..channels {
                let sample = src[i * channels + ch];
                self.shared.data[dst_frame * channels + ch]
                    .store(sample.to_bits(), Ordering::Relaxed);
            }
        }

        let new_write = (write + to_write) % capacity_frames;
        self.shared.write.store(new_write, Ordering::Release);
        to_write
    }
}

impl Consumer {
    /// Frames currently queued and not yet consumed.
    #[must_use]
    pub fn available_frames(&self) -> usize {
        let write = self.shared.write.load(Ordering::Acquire);
        let read = self.shared.read.load(Ordering::Relaxed);
        self.shared.available_frames(write, read)
    }

    /// Frames of free space remaining.
    #[must_use]
    pub fn free_frames(&self) -> usize {
        let write = self.shared.write.load(Ordering::Acquire);
        let read = self.shared.read.load(Ordering::Relaxed);
        self.shared.free_frames(write, read)
    }

    /// Dequeue up to `dst.len() / channels` frames into `dst` (interleaved).
    ///
    /// Reads `min(frames_requested, available_frames())` frames, possibly
    /// crossing the wraparound in two segments, then release-stores the new
    /// read index. Returns the number of frames actually read; any
    /// unfilled tail of `dst` is left untouched — callers on the render
    /// path must zero-fill it themselves when treating a short read as an
    /// underrun (see `engine-io`'s `OutputStream`).
    pub fn dequeue(&mut self, dst: &mut [f32]) -> usize {
        let channels = self.shared.channels;
        let frames_requested = dst.len() / channels;
        let write = self.shared.write.load(Ordering::Acquire);
        let read = self.shared.read.load(Ordering::Relaxed);
        let available = self.shared.available_frames(write, read);
        let to_read = frames_requested.min(available);

        let capacity_frames = self.shared.frames;
        for i in 0..to_read {
            let src_frame = (read + i) % capacity_frames;
            for ch in 0..channels {
                let bits = self.shared.data[src_frame * channels + ch].load(Ordering::Relaxed);
                dst[i * channels + ch] = f32::from_bits(bits);
            }
        }

        let new_read = (read + to_read) % capacity_frames;
        self.shared.read.store(new_read, Ordering::Release);
        to_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_buffer_reports_zero_available() {
        let (producer, consumer) = ring_buffer(8, 2);
        assert_eq!(producer.available_frames(), 0);
        assert_eq!(consumer.free_frames(), producer.free_frames());
    }

    #[test]
    fn capacity_invariant_holds_after_partial_fill() {
        let (mut producer, consumer) = ring_buffer(8, 1);
        let written = producer.enqueue(&[1.0, 2.0, 3.0]);
        assert_eq!(written, 3);
        assert_eq!(producer.available_frames() + producer.free_frames() + 1, 8);
        let _ = consumer;
    }

    #[test]
    fn one_frame_of_capacity_is_always_reserved() {
        let (mut producer, _consumer) = ring_buffer(4, 1);
        let written = producer.enqueue(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(written, 3); // capacity - 1
        assert_eq!(producer.free_frames(), 0);
    }

    #[test]
    fn dequeue_returns_samples_in_fifo_order_across_wraparound() {
        let (mut producer, mut consumer) = ring_buffer(4, 1);
        assert_eq!(producer.enqueue(&[1.0, 2.0, 3.0]), 3);

        let mut out = [0.0f32; 2];
        assert_eq!(consumer.dequeue(&mut out), 2);
        assert_eq!(out, [1.0, 2.0]);

        // Wrap: one slot free before this enqueue (capacity 4, available 1).
        assert_eq!(producer.enqueue(&[4.0, 5.0]), 2);

        let mut out2 = [0.0f32; 3];
        assert_eq!(consumer.dequeue(&mut out2), 3);
        assert_eq!(out2, [3.0, 4.0, 5.0]);
    }

    #[test]
    fn dequeue_more_than_available_returns_only_available() {
        let (mut producer, mut consumer) = ring_buffer(8, 1);
        producer.enqueue(&[1.0, 2.0]);
        let mut out = [0.0f32; 8];
        let read = consumer.dequeue(&mut out);
        assert_eq!(read, 2);
        assert_eq!(&out[..2], &[1.0, 2.0]);
    }

    #[test]
    fn stereo_frames_round_trip_interleaved() {
        let (mut producer, mut consumer) = ring_buffer(4, 2);
        producer.enqueue(&[1.0, -1.0, 2.0, -2.0]); // 2 stereo frames
        let mut out = [0.0f32; 4];
        assert_eq!(consumer.dequeue(&mut out), 2);
        assert_eq!(out, [1.0, -1.0, 2.0, -2.0]);
    }

    proptest! {
        #[test]
        fn sequential_enqueue_dequeue_preserves_order_and_capacity_invariant(
            batches in proptest::collection::vec(1usize..5, 1..20)
        ) {
            let (mut producer, mut consumer) = ring_buffer(6, 1);
            let mut next_value = 0.0f32;
            let mut expected = std::collections::VecDeque::new();

            for batch_len in batches {
                let src: Vec<f32> = (0..batch_len).map(|i| next_value + i as f32).collect();
                next_value += batch_len as f32;
                let written = producer.enqueue(&src);
                prop_assert!(written <= batch_len);
                for v in &src[..written] {
                    expected.push_back(*v);
                }
                prop_assert_eq!(
                    producer.available_frames() + producer.free_frames() + 1,
                    6
                );

                let mut dst = vec![0.0f32; 4];
                let read = consumer.dequeue(&mut dst);
                for i in 0..read {
                    prop_assert_eq!(dst[i], expected.pop_front().unwrap());
                }
            }
        }
    }
}
