use crate::error::{AnalysisError, Result};
use crate::format::AudioFormat;

/// Borrowing view over an interleaved 16-bit PCM decode.
///
/// The slice holds frames of `format.channels` samples each. Construction
/// rejects a slice whose length is not a whole number of frames.
#[derive(Debug, Clone, Copy)]
pub struct DecodedSampleBuffer<'a> {
    samples: &'a [i16],
    format: AudioFormat,
}

impl<'a> DecodedSampleBuffer<'a> {
    pub fn new(samples: &'a [i16], format: AudioFormat) -> Result<Self> {
        format.validate()?;
        if samples.len() % format.channels != 0 {
            return Err(AnalysisError::InvalidBufferLength {
                len: samples.len(),
                channels: format.channels,
            });
        }
        Ok(Self { samples, format })
    }

    pub fn samples(&self) -> &'a [i16] {
        self.samples
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.format.sample_rate_hz
    }

    /// Number of whole frames in the buffer.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels
    }

    /// Iterates the samples of one channel, deinterleaved.
    pub fn channel_iter(&self, channel: usize) -> impl Iterator<Item = i16> + 'a {
        self.samples
            .iter()
            .skip(channel)
            .step_by(self.format.channels)
            .copied()
    }
}
