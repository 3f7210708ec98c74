//! Mixer configuration knobs not dictated by the mix algorithm itself.

/// Normalization style applied when the pre-normalization peak exceeds 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationKnee {
    /// Scale the whole accumulator by `0.99 / peak`.
    Hard,
    /// Soft-knee compression around a 0.9 threshold with 0.1 knee width.
    Soft,
}

/// Configuration for [`crate::mix`].
#[derive(Debug, Clone, Copy)]
pub struct MixerConfig {
    /// Normalization style used when peak exceeds 1.0.
    pub knee: NormalizationKnee,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            knee: NormalizationKnee::Hard,
        }
    }
}
