//! Peak-based normalization of the mix accumulator.

use crate::config::NormalizationKnee;

/// Normalize `accumulator` in place if its peak absolute value exceeds 1.0.
/// Leaves the buffer unchanged when peak is already `<= 1.0`.
pub fn normalize(accumulator: &mut [f32], knee: NormalizationKnee) {
    let peak = accumulator
        .iter()
        .fold(0.0f32, |max, &s| max.max(s.abs()));

    if peak <= 1.0 {
        return;
    }

    match knee {
        NormalizationKnee::Hard => {
            let gain = 0.99 / peak;
            for sample in accumulator.iter_mut() {
                *sample *= gain;
            }
        }
        NormalizationKnee::Soft => {
            const THRESHOLD: f32 = 0.9;
            const KNEE_WIDTH: f32 = 0.1;
            let gain = soft_knee_gain(peak, THRESHOLD, KNEE_WIDTH);
            for sample in accumulator.iter_mut() {
                *sample *= gain;
            }
        }
    }
}

/// Gain that brings a peak of `peak` down to the soft-knee curve's output
/// for a threshold/knee-width pair, then scales the whole buffer by that
/// single gain (a static, not per-sample, compressor — appropriate for an
/// offline peak normalization pass rather than a dynamic limiter).
fn soft_knee_gain(peak: f32, threshold: f32, knee_width: f32) -> f32 {
    let knee_start = threshold - knee_width / 2.0;
    if peak <= knee_start {
        return 1.0;
    }
    let over = peak - knee_start;
    let compressed = knee_start + over * knee_width / (knee_width + over);
    compressed / peak
}
