//! Channel-count adaptation between a track's channel layout and the target.

/// Adapt interleaved `input` with `in_channels` channels to `out_channels`
/// channels:
///
/// - mono → stereo (or any N→M with `in_channels == 1`): duplicate the
///   single sample into every output channel.
/// - stereo → mono (`in_channels == 2, out_channels == 1`): average L and R.
/// - general N→M: channel `min(ch, in_channels - 1)` is replicated into
///   output channel `ch`.
#[must_use]
pub fn adapt_channels(input: &[f32], in_channels: usize, out_channels: usize) -> Vec<f32> {
    if in_channels == out_channels || in_channels == 0 || out_channels == 0 {
        return input.to_vec();
    }
    let frame_count = input.len() / in_channels;

    if in_channels == 1 {
        let mut out = vec![0.0f32; frame_count * out_channels];
        for f in 0..frame_count {
            let sample = input[f];
            for ch in 0..out_channels {
                out[f * out_channels + ch] = sample;
            }
        }
        return out;
    }

    if in_channels == 2 && out_channels == 1 {
        let mut out = vec![0.0f32; frame_count];
        for f in 0..frame_count {
            let l = input[f * 2];
            let r = input[f * 2 + 1];
            out[f] = (l + r) * 0.5;
        }
        return out;
    }

    let mut out = vec![0.0f32; frame_count * out_channels];
    for f in 0..frame_count {
        for ch in 0..out_channels {
            let src_ch = ch.min(in_channels - 1);
            out[f * out_channels + ch] = input[f * in_channels + src_ch];
        }
    }
    out
}
