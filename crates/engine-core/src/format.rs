//! `TrackFormat`: the immutable description of a byte-level PCM/float layout.

use crate::error::{Error, Result};

/// Byte order of a multi-byte sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first.
    Big,
}

/// The sample encoding family, independent of bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// 8-bit integer PCM.
    Pcm8,
    /// 16-bit integer PCM.
    Pcm16,
    /// 24-bit integer PCM (stored in 3 bytes per sample).
    Pcm24,
    /// 32-bit integer PCM.
    Pcm32,
    /// 32-bit IEEE float.
    Float32,
    /// 64-bit IEEE float.
    Float64,
}

/// Immutable description of a byte-level PCM/float stream layout.
///
/// Equality (and therefore [`DeviceInfo`](crate::device::DeviceInfo) set
/// membership) compares every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackFormat {
    /// Sample rate in Hz. Must be positive.
    pub sample_rate: u32,
    /// Interleaved channel count. Must be positive.
    pub channels: u16,
    /// Bits per sample; one of 8, 16, 24, 32, 64.
    pub bits_per_sample: u16,
    /// Whether integer samples are signed. Always `true` for float codecs.
    pub signed: bool,
    /// Byte order of multi-byte samples.
    pub byte_order: ByteOrder,
    /// Sample encoding family.
    pub codec: Codec,
}

impl TrackFormat {
    /// Construct a format, validating the codec/bit-depth/signedness invariant.
    pub fn new(
        sample_rate: u32,
        channels: u16,
        bits_per_sample: u16,
        signed: bool,
        byte_order: ByteOrder,
        codec: Codec,
    ) -> Result<Self> {
        let format = Self {
            sample_rate,
            channels,
            bits_per_sample,
            signed,
            byte_order,
            codec,
        };
        format.validate()?;
        Ok(format)
    }

    fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidFormat("sample_rate must be positive".into()));
        }
        if self.channels == 0 {
            return Err(Error::InvalidFormat("channels must be positive".into()));
        }
        let bits_ok = matches!(
            (self.codec, self.bits_per_sample),
            (Codec::Pcm8, 8)
                | (Codec::Pcm16, 16)
                | (Codec::Pcm24, 24)
                | (Codec::Pcm32, 32)
                | (Codec::Float32, 32)
                | (Codec::Float64, 64)
        );
        if !bits_ok {
            let msg = format!(
                "codec {:?} is incompatible with bits_per_sample {}",
                self.codec, self.bits_per_sample
            );
            tracing::warn!(codec = ?self.codec, bits_per_sample = self.bits_per_sample, "{msg}");
            return Err(Error::InvalidFormat(msg));
        }
        if matches!(self.codec, Codec::Float32 | Codec::Float64) && !self.signed {
            tracing::warn!(codec = ?self.codec, "float codecs are always signed");
            return Err(Error::InvalidFormat(
                "float codecs are always signed".into(),
            ));
        }
        Ok(())
    }

    /// Bytes occupied by one interleaved frame (`channels` samples).
    #[must_use]
    pub fn bytes_per_frame(&self) -> usize {
        self.bytes_per_sample() * self.channels as usize
    }

    /// Bytes occupied by a single sample.
    #[must_use]
    pub fn bytes_per_sample(&self) -> usize {
        self.bits_per_sample.div_ceil(8) as usize
    }

    /// Canonical interleaved `float32`, native byte order, at this format's
    /// sample rate and channel count.
    #[must_use]
    pub fn canonical(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample: 32,
            signed: true,
            byte_order: ByteOrder::Little,
            codec: Codec::Float32,
        }
    }

    /// Resolve the dynamic [`SampleCodec`] tag used to dispatch a converter,
    /// per the "do not branch in the inner loop" discipline of the format
    /// matrix (see crate-level docs).
    pub fn codec_tag(&self) -> Result<SampleCodec> {
        use ByteOrder::{Big, Little};
        use Codec::{Float32, Float64, Pcm8, Pcm16, Pcm24, Pcm32};
        let tag = match (self.codec, self.signed, self.byte_order) {
            (Pcm8, true, _) => SampleCodec::Pcm8Signed,
            (Pcm8, false, _) => SampleCodec::Pcm8Unsigned,
            (Pcm16, true, Little) => SampleCodec::Pcm16SignedLe,
            (Pcm16, true, Big) => SampleCodec::Pcm16SignedBe,
            (Pcm16, false, Little) => SampleCodec::Pcm16UnsignedLe,
            (Pcm16, false, Big) => SampleCodec::Pcm16UnsignedBe,
            (Pcm24, true, Little) => SampleCodec::Pcm24SignedLe,
            (Pcm24, true, Big) => SampleCodec::Pcm24SignedBe,
            (Pcm24, false, _) => {
                return Err(Error::InvalidFormat("unsigned PCM24 is not supported".into()));
            }
            (Pcm32, true, Little) => SampleCodec::Pcm32SignedLe,
            (Pcm32, true, Big) => SampleCodec::Pcm32SignedBe,
            (Pcm32, false, _) => {
                return Err(Error::InvalidFormat("unsigned PCM32 is not supported".into()));
            }
            (Float32, _, Little) => SampleCodec::Float32Le,
            (Float32, _, Big) => SampleCodec::Float32Be,
            (Float64, _, Little) => SampleCodec::Float64Le,
            (Float64, _, Big) => SampleCodec::Float64Be,
        };
        Ok(tag)
    }
}

/// The closed tagged sum of every (bits_per_sample, signed, byte_order,
/// codec) combination [`TrackFormat`] allows.
///
/// A converter is resolved to a `SampleCodec` once, at stream-open or
/// mixer-invocation time; the per-sample hot loop never re-branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleCodec {
    /// 8-bit signed PCM (two's complement byte).
    Pcm8Signed,
    /// 8-bit unsigned PCM (zero at 128).
    Pcm8Unsigned,
    /// 16-bit signed PCM, little-endian.
    Pcm16SignedLe,
    /// 16-bit signed PCM, big-endian.
    Pcm16SignedBe,
    /// 16-bit unsigned PCM, little-endian.
    Pcm16UnsignedLe,
    /// 16-bit unsigned PCM, big-endian.
    Pcm16UnsignedBe,
    /// 24-bit signed PCM, little-endian.
    Pcm24SignedLe,
    /// 24-bit signed PCM, big-endian.
    Pcm24SignedBe,
    /// 32-bit signed PCM, little-endian.
    Pcm32SignedLe,
    /// 32-bit signed PCM, big-endian.
    Pcm32SignedBe,
    /// 32-bit IEEE float, little-endian.
    Float32Le,
    /// 32-bit IEEE float, big-endian.
    Float32Be,
    /// 64-bit IEEE float, little-endian.
    Float64Le,
    /// 64-bit IEEE float, big-endian.
    Float64Be,
}
