//! Offline N-to-1 track mixer: resample → channel-adapt → sum → normalize → convert.

use engine_core::error::{Error, Result};
use engine_core::{Track, TrackFormat, convert, to_float32};

use crate::channel::adapt_channels;
use crate::config::MixerConfig;
use crate::normalize::normalize;
use crate::resample::linear_resample;

/// Mix `tracks` down to a single track in `target`.
///
/// Empty `tracks` returns [`Error::EmptyInput`]. `target` is validated as a
/// [`TrackFormat`] by the caller's construction; this function additionally
/// rejects a target whose rate or channel count is zero.
pub fn mix(tracks: &[Track], target: TrackFormat, config: MixerConfig) -> Result<Track> {
    if tracks.is_empty() {
        return Err(Error::EmptyInput);
    }
    if target.sample_rate == 0 || target.channels == 0 {
        return Err(Error::InvalidFormat(
            "target format must have positive rate and channel count".into(),
        ));
    }

    let target_channels = target.channels as usize;
    let mut processed: Vec<Vec<f32>> = Vec::with_capacity(tracks.len());

    for track in tracks {
        let format = track.format();
        let floats = to_float32(track.bytes(), &format).map_err(|e| {
            Error::MixingFailure(format!("failed to decode track: {e}"))
        })?;

        let resampled = linear_resample(
            &floats,
            format.channels as usize,
            format.sample_rate,
            target.sample_rate,
        );

        let adapted = adapt_channels(&resampled, format.channels as usize, target_channels);
        processed.push(adapted);
    }

    let max_frames = processed
        .iter()
        .map(|p| p.len() / target_channels)
        .max()
        .unwrap_or(0);

    if max_frames == 0 {
        return Err(Error::EmptyInput);
    }

    let mut accumulator = vec![0.0f32; max_frames * target_channels];
    for track_samples in &processed {
        for (acc, sample) in accumulator.iter_mut().zip(track_samples.iter()) {
            *acc += sample;
        }
    }

    normalize(&mut accumulator, config.knee);

    let bytes = convert::from_float32(&accumulator, &target)
        .map_err(|e| Error::MixingFailure(format!("failed to encode mix: {e}")))?;

    let mixed = Track::new(bytes, target)
        .map_err(|e| Error::MixingFailure(format!("failed to build mixed track: {e}")))?;

    tracing::info!(
        tracks = tracks.len(),
        frames = max_frames,
        sample_rate = target.sample_rate,
        channels = target.channels,
        "mixed tracks"
    );

    Ok(mixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{ByteOrder, Codec};
    use proptest::prelude::*;

    fn pcm16le(sample_rate: u32, channels: u16) -> TrackFormat {
        TrackFormat::new(sample_rate, channels, 16, true, ByteOrder::Little, Codec::Pcm16).unwrap()
    }

    fn constant_track(value: f32, frames: usize, format: TrackFormat) -> Track {
        let samples = vec![value; frames * format.channels as usize];
        let bytes = convert::from_float32(&samples, &format).unwrap();
        Track::new(bytes, format).unwrap()
    }

    #[test]
    fn empty_track_list_is_rejected() {
        let target = pcm16le(44100, 1);
        let err = mix(&[], target, MixerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn invalid_target_format_is_rejected() {
        let target = TrackFormat {
            sample_rate: 0,
            channels: 1,
            bits_per_sample: 16,
            signed: true,
            byte_order: ByteOrder::Little,
            codec: Codec::Pcm16,
        };
        let format = pcm16le(44100, 1);
        let tracks = vec![constant_track(0.1, 10, format)];
        let err = mix(&tracks, target, MixerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    // S1: two opposite-polarity mono tracks at matching rate cancel to silence.
    #[test]
    fn s1_opposite_polarity_tracks_cancel() {
        let format = pcm16le(44100, 1);
        let tracks = vec![
            constant_track(0.5, 100, format),
            constant_track(-0.5, 100, format),
        ];
        let mixed = mix(&tracks, format, MixerConfig::default()).unwrap();
        assert_eq!(mixed.frame_count(), 100);
        let samples = to_float32(mixed.bytes(), &format).unwrap();
        for s in samples {
            assert!(s.abs() < 1.0 / 32768.0 * 2.0);
        }
        assert!((mixed.duration_ms() - 2.0).abs() < 0.1);
    }

    // S2: one mono track upsampled 2x stays a constant value.
    #[test]
    fn s2_upsampled_constant_stays_constant() {
        let source_format = pcm16le(22050, 1);
        let target = pcm16le(44100, 1);
        let tracks = vec![constant_track(0.25, 100, source_format)];
        let mixed = mix(&tracks, target, MixerConfig::default()).unwrap();
        assert_eq!(mixed.frame_count(), 200);
        let samples = to_float32(mixed.bytes(), &target).unwrap();
        for s in samples {
            assert!((s - 0.25).abs() < 0.001);
        }
    }

    // S3: stereo L=1, R=-1 downmixed to mono cancels to silence.
    #[test]
    fn s3_stereo_to_mono_cancels() {
        let stereo = pcm16le(44100, 2);
        let mono = pcm16le(44100, 1);
        let samples: Vec<f32> = (0..1000).flat_map(|_| [1.0, -1.0]).collect();
        let bytes = convert::from_float32(&samples, &stereo).unwrap();
        let track = Track::new(bytes, stereo).unwrap();

        let mixed = mix(&[track], mono, MixerConfig::default()).unwrap();
        assert_eq!(mixed.frame_count(), 1000);
        let out = to_float32(mixed.bytes(), &mono).unwrap();
        for s in out {
            assert!(s.abs() < 1.0 / 32768.0 * 2.0);
        }
    }

    // S4: three 0.6-constant tracks, peak 1.8 pre-normalization, 0.99 after.
    #[test]
    fn s4_three_tracks_normalize_to_point99() {
        let format = pcm16le(48000, 1);
        let tracks: Vec<Track> = (0..3).map(|_| constant_track(0.6, 10, format)).collect();
        let mixed = mix(&tracks, format, MixerConfig::default()).unwrap();
        let out = to_float32(mixed.bytes(), &format).unwrap();
        for s in out {
            assert!((s - 0.99).abs() < 0.001);
        }
    }

    // S5: float32 ramp converted to pcm16 matches the expected scaled values.
    #[test]
    fn s5_float_ramp_converts_to_expected_pcm16() {
        let source_format = TrackFormat::canonical(48000, 1);
        let target = pcm16le(48000, 1);
        let samples = [0.0f32, 0.25, 0.5, 0.75, 1.0];
        let bytes = convert::from_float32(&samples, &source_format).unwrap();
        let track = Track::new(bytes, source_format).unwrap();

        let mixed = mix(&[track], target, MixerConfig::default()).unwrap();
        let out_bytes = mixed.bytes();
        let decoded: Vec<i16> = out_bytes
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(decoded[0], 0);
        assert!((decoded[1] - 8192).abs() <= 1);
        assert!((decoded[2] - 16384).abs() <= 1);
        assert!((decoded[3] - 24576).abs() <= 1);
        assert_eq!(decoded[4], 32767);
    }

    #[test]
    fn mixer_length_matches_longest_resampled_track() {
        let format_a = pcm16le(44100, 1);
        let format_b = pcm16le(22050, 1);
        let tracks = vec![
            constant_track(0.1, 50, format_a),
            constant_track(0.1, 50, format_b), // resamples to 100 frames at 44100
        ];
        let mixed = mix(&tracks, format_a, MixerConfig::default()).unwrap();
        assert_eq!(mixed.frame_count(), 100);
    }

    #[test]
    fn linearity_holds_below_the_one_over_n_threshold() {
        let format = pcm16le(44100, 1);
        // 1/3 peak per track stays within [-1, 1] when summed: no normalization.
        let tracks: Vec<Track> = (0..3).map(|_| constant_track(0.3, 5, format)).collect();
        let mixed = mix(&tracks, format, MixerConfig::default()).unwrap();
        let out = to_float32(mixed.bytes(), &format).unwrap();
        for s in out {
            assert!((s - 0.9).abs() < 0.001);
        }
    }

    proptest! {
        // Peak |mixed| must never exceed 1.0 after normalization,
        // for any number of constant-amplitude tracks at any amplitude.
        #[test]
        fn mixed_peak_never_exceeds_one(
            amplitude in 0.01f32..1.0,
            track_count in 1usize..8,
            frames in 1usize..32,
        ) {
            let format = pcm16le(44100, 1);
            let tracks: Vec<Track> = (0..track_count)
                .map(|_| constant_track(amplitude, frames, format))
                .collect();
            let mixed = mix(&tracks, format, MixerConfig::default()).unwrap();
            let out = to_float32(mixed.bytes(), &format).unwrap();
            let peak = out.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
            prop_assert!(peak <= 1.0 + 1e-3);
        }

        // Mixer output length tracks the longest
        // post-resample input.
        #[test]
        fn mixed_length_matches_longest_track(
            frames_a in 1usize..200,
            frames_b in 1usize..200,
        ) {
            let format = pcm16le(44100, 1);
            let tracks = vec![
                constant_track(0.1, frames_a, format),
                constant_track(0.1, frames_b, format),
            ];
            let mixed = mix(&tracks, format, MixerConfig::default()).unwrap();
            prop_assert_eq!(mixed.frame_count(), frames_a.max(frames_b));
        }
    }
}
