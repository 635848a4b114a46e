use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Fatal verification failures.
///
/// Every variant reports a condition that invalidates the decode under
/// test. There is no recovery path: the first violated check aborts the
/// analysis and surfaces here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("no signal found in the decoded stream")]
    NoSignalFound,

    #[error("insufficient samples: needed {needed} segments, got {available}")]
    InsufficientSamples { needed: usize, available: usize },

    #[error("buffer length {len} is not a multiple of channel count {channels}")]
    InvalidBufferLength { len: usize, channels: usize },

    #[error("sample rate {0} Hz outside supported range")]
    InvalidSampleRate(u32),

    #[error("channel count {0} outside supported range")]
    InvalidChannelCount(usize),

    #[error("decoded channel count {decoded} exceeds encoded count {encoded}")]
    ChannelCountMismatch { decoded: usize, encoded: usize },

    #[error("{count} channels carry no signal, at most one LFE is allowed")]
    MultipleLfeChannels { count: usize },

    #[error("front channel order {observed:?} is not a permitted arrangement")]
    InvalidFrontChannelOrder { observed: Vec<usize> },

    #[error("logical position {position} is claimed by more than one channel")]
    ChannelMappingConflict { position: usize },

    #[error("channel {channel} carries no energy")]
    ZeroChannelEnergy { channel: usize },

    #[error(
        "channel {channel} minimum segment energy {min:.3e} below reference {reference:.3e}"
    )]
    InsufficientChannelEnergy {
        channel: usize,
        min: f64,
        reference: f64,
    },

    #[error("channel {channel} energy ratio {ratio:.4} below threshold {threshold:.4}")]
    EnergyRatioBelowThreshold {
        channel: usize,
        ratio: f64,
        threshold: f64,
    },

    #[error("channel {channel} segment {segment} retains energy {energy:.3e} outside its window")]
    UnexpectedResidualSignal {
        channel: usize,
        segment: usize,
        energy: f64,
    },

    #[error("segment {segment} carries no energy in any channel")]
    SilentSegment { segment: usize },

    #[error("segment {segment} total energy ratio {ratio:.4} outside margin {margin:.2}")]
    EnergyDropout {
        segment: usize,
        ratio: f64,
        margin: f64,
    },
}
