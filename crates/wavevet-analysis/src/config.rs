//! Configuration for segmental energy analysis.

use serde::{Deserialize, Serialize};

/// Tuning constants for the energy analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Absolute sample magnitude that counts as signal onset.
    /// Default: 1 (anything above the quietest representable level)
    pub onset_threshold: i16,

    /// Segments per nominal one-second content block.
    /// Default: 4
    pub segments_per_block: usize,

    /// Noise floor as a fraction of the loudest single-segment energy
    /// observed on physical channel 0.
    /// Typical range: 0.0001 to 0.01
    /// Default: 0.001
    pub noise_floor_fraction: f64,

    /// Minimum segment energy of a verified channel, as a fraction of the
    /// reference channel's minimum.
    /// Default: 0.85
    pub reference_min_fraction: f64,

    /// Energy allowed to bleed into the segment immediately after a
    /// channel's window, as a fraction of the window minimum.
    /// Default: 0.20
    pub bleed_through_fraction: f64,

    /// Minimum ratio of a channel's quietest to loudest window segment.
    /// Cumulative accumulation keeps this ratio near 1/n over an n-segment
    /// window, so the default sits well below that.
    /// Default: 0.01
    pub min_energy_ratio: f64,

    /// Allowed deviation of each segment's total energy from the average.
    /// Default: 0.25
    pub energy_margin: f64,

    /// Allowed deviation when a DRC effect has been applied to the stream.
    /// Default: 0.40
    pub energy_margin_drc: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            onset_threshold: 1,
            segments_per_block: 4,
            noise_floor_fraction: 0.001,
            reference_min_fraction: 0.85,
            bleed_through_fraction: 0.20,
            min_energy_ratio: 0.01,
            energy_margin: 0.25,
            energy_margin_drc: 0.40,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Configuration for level-normalized conformance content, where the
    /// segment balance is tightly controlled by the encoder.
    pub fn normalized_content() -> Self {
        Self {
            energy_margin: 0.15,
            min_energy_ratio: 0.02,
            ..Default::default()
        }
    }

    /// Configuration tolerant of heavy dynamics processing.
    pub fn processed_content() -> Self {
        Self {
            energy_margin: 0.40,
            energy_margin_drc: 0.55,
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Supported variables:
    /// - `WAVEVET_ONSET_THRESHOLD`: Sample magnitude for onset detection
    /// - `WAVEVET_NOISE_FLOOR_FRACTION`: Noise floor fraction
    /// - `WAVEVET_MIN_ENERGY_RATIO`: Min/max window ratio threshold
    /// - `WAVEVET_ENERGY_MARGIN`: Stability margin without DRC
    /// - `WAVEVET_ENERGY_MARGIN_DRC`: Stability margin with DRC applied
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("WAVEVET_ONSET_THRESHOLD") {
            if let Ok(threshold) = val.parse::<i16>() {
                config.onset_threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("WAVEVET_NOISE_FLOOR_FRACTION") {
            if let Ok(fraction) = val.parse::<f64>() {
                config.noise_floor_fraction = fraction;
            }
        }

        if let Ok(val) = std::env::var("WAVEVET_MIN_ENERGY_RATIO") {
            if let Ok(ratio) = val.parse::<f64>() {
                config.min_energy_ratio = ratio;
            }
        }

        if let Ok(val) = std::env::var("WAVEVET_ENERGY_MARGIN") {
            if let Ok(margin) = val.parse::<f64>() {
                config.energy_margin = margin;
            }
        }

        if let Ok(val) = std::env::var("WAVEVET_ENERGY_MARGIN_DRC") {
            if let Ok(margin) = val.parse::<f64>() {
                config.energy_margin_drc = margin;
            }
        }

        config
    }

    /// Stability margin for the given DRC state.
    pub fn margin_for(&self, drc_effect_applied: bool) -> f64 {
        if drc_effect_applied {
            self.energy_margin_drc
        } else {
            self.energy_margin
        }
    }
}

/// Builder for AnalyzerConfig.
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    onset_threshold: Option<i16>,
    segments_per_block: Option<usize>,
    noise_floor_fraction: Option<f64>,
    reference_min_fraction: Option<f64>,
    bleed_through_fraction: Option<f64>,
    min_energy_ratio: Option<f64>,
    energy_margin: Option<f64>,
    energy_margin_drc: Option<f64>,
}

impl AnalyzerConfigBuilder {
    pub fn onset_threshold(mut self, threshold: i16) -> Self {
        self.onset_threshold = Some(threshold);
        self
    }

    pub fn segments_per_block(mut self, segments: usize) -> Self {
        self.segments_per_block = Some(segments);
        self
    }

    pub fn noise_floor_fraction(mut self, fraction: f64) -> Self {
        self.noise_floor_fraction = Some(fraction);
        self
    }

    pub fn reference_min_fraction(mut self, fraction: f64) -> Self {
        self.reference_min_fraction = Some(fraction);
        self
    }

    pub fn bleed_through_fraction(mut self, fraction: f64) -> Self {
        self.bleed_through_fraction = Some(fraction);
        self
    }

    pub fn min_energy_ratio(mut self, ratio: f64) -> Self {
        self.min_energy_ratio = Some(ratio);
        self
    }

    pub fn energy_margin(mut self, margin: f64) -> Self {
        self.energy_margin = Some(margin);
        self
    }

    pub fn energy_margin_drc(mut self, margin: f64) -> Self {
        self.energy_margin_drc = Some(margin);
        self
    }

    pub fn build(self) -> AnalyzerConfig {
        let defaults = AnalyzerConfig::default();

        AnalyzerConfig {
            onset_threshold: self.onset_threshold.unwrap_or(defaults.onset_threshold),
            segments_per_block: self
                .segments_per_block
                .unwrap_or(defaults.segments_per_block),
            noise_floor_fraction: self
                .noise_floor_fraction
                .unwrap_or(defaults.noise_floor_fraction),
            reference_min_fraction: self
                .reference_min_fraction
                .unwrap_or(defaults.reference_min_fraction),
            bleed_through_fraction: self
                .bleed_through_fraction
                .unwrap_or(defaults.bleed_through_fraction),
            min_energy_ratio: self.min_energy_ratio.unwrap_or(defaults.min_energy_ratio),
            energy_margin: self.energy_margin.unwrap_or(defaults.energy_margin),
            energy_margin_drc: self
                .energy_margin_drc
                .unwrap_or(defaults.energy_margin_drc),
        }
    }
}
