//! Linear resampling between sample rates.

/// Linearly resample interleaved `input` (at `in_rate`, `channels` channels)
/// to `out_rate`, returning `ceil(in_frames * out_rate / in_rate)` frames.
///
/// Position arithmetic is done in `f64` to avoid drift on long streams.
/// When the computed source index reaches the last input frame,
/// that frame is held rather than read out of bounds.
#[must_use]
pub fn linear_resample(input: &[f32], channels: usize, in_rate: u32, out_rate: u32) -> Vec<f32> {
    if channels == 0 || input.is_empty() {
        return Vec::new();
    }
    let in_frames = input.len() / channels;
    if in_rate == out_rate {
        return input.to_vec();
    }

    let in_rate = f64::from(in_rate);
    let out_rate = f64::from(out_rate);
    let out_frames = ((in_frames as f64) * out_rate / in_rate).ceil() as usize;

    let mut out = vec![0.0f32; out_frames * channels];
    for i in 0..out_frames {
        let pos = i as f64 * in_rate / out_rate;
        let idx0 = pos.floor() as usize;
        let idx0 = idx0.min(in_frames.saturating_sub(1));
        let idx1 = (idx0 + 1).min(in_frames - 1);
        let frac = (pos - idx0 as f64) as f32;

        for ch in 0..channels {
            let a = input[idx0 * channels + ch];
            let b = input[idx1 * channels + ch];
            out[i * channels + ch] = a * (1.0 - frac) + b * frac;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_rates_match() {
        let input = vec![1.0, 2.0, 3.0];
        let out = linear_resample(&input, 1, 44100, 44100);
        assert_eq!(out, input);
    }

    #[test]
    fn upsampling_constant_signal_stays_constant() {
        let input = vec![0.25f32; 100];
        let out = linear_resample(&input, 1, 22050, 44100);
        assert_eq!(out.len(), 200);
        for v in out {
            assert!((v - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn downsampling_halves_frame_count() {
        let input: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let out = linear_resample(&input, 1, 44100, 22050);
        assert_eq!(out.len(), 50);
    }

    #[test]
    fn last_frame_is_held_at_the_tail() {
        let input = vec![1.0, 2.0, 3.0];
        let out = linear_resample(&input, 1, 8000, 16000);
        assert!((out.last().unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn stereo_channels_are_interpolated_independently() {
        let input = vec![0.0, 1.0, 1.0, 0.0]; // 2 stereo frames: (L0,R0)=(0,1) (L1,R1)=(1,0)
        let out = linear_resample(&input, 2, 8000, 16000);
        assert_eq!(out.len(), 8);
        // Midpoint frame should be (0.5, 0.5)
        assert!((out[2] - 0.5).abs() < 1e-6);
        assert!((out[3] - 0.5).abs() < 1e-6);
    }
}
