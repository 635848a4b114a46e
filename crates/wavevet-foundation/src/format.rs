use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Lowest sample rate accepted by the analyzer.
pub const MIN_SAMPLE_RATE_HZ: u32 = 8_000;
/// Highest sample rate accepted by the analyzer.
pub const MAX_SAMPLE_RATE_HZ: u32 = 192_000;
/// Largest decoded channel count accepted by the analyzer.
pub const MAX_CHANNELS: usize = 8;

/// Format of a decoded PCM stream: sample rate and interleaved channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_rate_hz: u32,
    pub channels: usize,
}

impl AudioFormat {
    pub fn new(sample_rate_hz: u32, channels: usize) -> Self {
        Self {
            sample_rate_hz,
            channels,
        }
    }

    /// Checks the format against the supported ranges.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate_hz < MIN_SAMPLE_RATE_HZ || self.sample_rate_hz > MAX_SAMPLE_RATE_HZ {
            return Err(AnalysisError::InvalidSampleRate(self.sample_rate_hz));
        }
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(AnalysisError::InvalidChannelCount(self.channels));
        }
        Ok(())
    }
}
