//! Segmental energy analysis for decoded multichannel PCM.
//!
//! This crate verifies that a decoded stream carries the energy pattern its
//! conformance content was authored with. It provides:
//!
//! - Signal onset detection
//! - Per-channel cumulative segment energy accumulation
//! - Channel-to-logical-position inference (including LFE detection)
//! - Silence, channel-order, and energy-stability checks
//!
//! The decode step itself is out of scope: callers hand over interleaved
//! 16-bit PCM together with its format and receive an [`EnergyResult`] or
//! the first failed check as an error.
//!
//! # Example
//!
//! ```no_run
//! use wavevet_analysis::{
//!     AnalyzerConfig, AudioFormat, DecodedSampleBuffer, DrcMode, SignalEnergyAnalyzer,
//! };
//!
//! # fn main() -> wavevet_analysis::Result<()> {
//! let samples: Vec<i16> = vec![/* decoded PCM */];
//! let buffer = DecodedSampleBuffer::new(&samples, AudioFormat::new(48_000, 6))?;
//!
//! let analyzer = SignalEnergyAnalyzer::new(AnalyzerConfig::default());
//! let result = analyzer.analyze(&buffer, 6, DrcMode::Off, false)?;
//!
//! println!("total energy {:.3e}, offsets {:?}", result.total(), result.channel_offsets());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod level;
pub mod mapping;
pub mod onset;
pub mod segment;
pub mod types;

// Re-export main types
pub use config::AnalyzerConfig;
pub use mapping::ChannelOffsetMap;
pub use segment::SegmentEnergyTable;
pub use types::{DrcMode, EnergyResult};
pub use wavevet_foundation::{
    AnalysisError, AudioFormat, DecodedSampleBuffer, Result, MAX_CHANNELS,
};

use tracing::debug;

/// Signal positions the conformance content occupies for a given encoded
/// channel count. Mono and stereo content plays all channels at once;
/// layouts above five channels keep the LFE silent.
fn signal_positions(encoded_channels: usize) -> usize {
    match encoded_channels {
        1 | 2 => 1,
        n if n > 5 => n - 1,
        n => n,
    }
}

/// Segmental energy analyzer for decoded conformance content.
///
/// This is the primary interface of the crate. One call to
/// [`analyze`](Self::analyze) runs the full check battery over a decoded
/// buffer: onset detection, energy accumulation, offset inference, channel
/// placement validation, and stream-continuity checks. The first violated
/// check aborts the analysis with an [`AnalysisError`].
pub struct SignalEnergyAnalyzer {
    config: AnalyzerConfig,
}

impl SignalEnergyAnalyzer {
    /// Create a new analyzer with the given configuration.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a decoded buffer against the expected energy pattern.
    ///
    /// `encoded_channels` is the channel count on the encoder side; a
    /// smaller decoded count means the decoder applied a downmix.
    /// `DrcMode::Testing` relaxes channel placement checks for gain-processed
    /// content, and `drc_effect_applied` widens the stability margin.
    ///
    /// The computation is pure: identical inputs yield identical results.
    pub fn analyze(
        &self,
        buffer: &DecodedSampleBuffer<'_>,
        encoded_channels: usize,
        mode: DrcMode,
        drc_effect_applied: bool,
    ) -> Result<EnergyResult> {
        let channels = buffer.channels();
        if encoded_channels == 0 || encoded_channels > MAX_CHANNELS {
            return Err(AnalysisError::InvalidChannelCount(encoded_channels));
        }
        if channels > encoded_channels {
            return Err(AnalysisError::ChannelCountMismatch {
                decoded: channels,
                encoded: encoded_channels,
            });
        }
        let downmix = channels < encoded_channels;

        let segment_len = buffer.sample_rate_hz() as usize / self.config.segments_per_block;
        let window = 2 * self.config.segments_per_block;
        let expected_segments = window * signal_positions(encoded_channels);

        let onset = onset::detect(buffer.samples(), self.config.onset_threshold)
            .ok_or(AnalysisError::NoSignalFound)?;
        let onset_sample = onset.effective_start();
        let start_frame = onset_sample / channels;
        debug!(onset_sample, start_frame, "signal onset located");

        let mut table = SegmentEnergyTable::accumulate(buffer, start_frame, segment_len);
        if table.segments() == 0 {
            return Err(AnalysisError::InsufficientSamples {
                needed: expected_segments,
                available: 0,
            });
        }

        let peak = table.peak_segment_energy(0);
        if peak <= 0.0 {
            return Err(AnalysisError::ZeroChannelEnergy { channel: 0 });
        }
        let noise_floor = self.config.noise_floor_fraction * peak;
        debug!(noise_floor, peak, "noise floor derived from channel 0");

        let map = ChannelOffsetMap::infer(&table, noise_floor, self.config.segments_per_block)?;

        if table.segments() < expected_segments {
            return Err(AnalysisError::InsufficientSamples {
                needed: expected_segments,
                available: table.segments(),
            });
        }

        map.validate_front_order()?;

        let identity = mode.is_testing() || channels <= 2;
        let order = map.remap(identity)?;
        debug!(?order, identity, "channel traversal order resolved");

        let totals: Vec<f64> = (0..channels).map(|ch| table.channel_total(ch)).collect();
        let pristine = table.clone();

        if !mode.is_testing() {
            self.validate_regions(
                &mut table,
                &map,
                &order,
                expected_segments,
                noise_floor,
                downmix,
            )?;
        }

        self.check_coverage(&pristine, expected_segments)?;
        self.check_stability(&pristine, expected_segments, drc_effect_applied)?;

        Ok(EnergyResult::new(
            totals,
            onset_sample,
            map.offsets().to_vec(),
        ))
    }

    /// Verifies each channel's energy against its own placement window,
    /// front-to-back, zeroing each window once verified so residual energy
    /// outside it becomes visible.
    fn validate_regions(
        &self,
        table: &mut SegmentEnergyTable,
        map: &ChannelOffsetMap,
        order: &[usize],
        expected_segments: usize,
        noise_floor: f64,
        downmix: bool,
    ) -> Result<()> {
        let channels = table.channels();
        let nseg = table.segments();
        let window = 2 * self.config.segments_per_block;
        let mut reference_min: Option<f64> = None;

        for &ch in order {
            if map.lfe_channel() == Some(ch) {
                // The LFE carries no directional content. Its whole row must
                // stay under the floor.
                for seg in 0..nseg {
                    let energy = table.get(ch, seg);
                    if energy > noise_floor {
                        return Err(AnalysisError::UnexpectedResidualSignal {
                            channel: ch,
                            segment: seg,
                            energy,
                        });
                    }
                }
                continue;
            }

            let region = if downmix {
                0..expected_segments.min(nseg)
            } else if channels <= 2 {
                0..nseg
            } else {
                let start = (window * map.offsets()[ch]).min(nseg);
                start..(start + window).min(nseg)
            };

            let mut min = f64::INFINITY;
            let mut max = 0.0f64;
            for seg in region.clone() {
                let energy = table.get(ch, seg);
                min = min.min(energy);
                max = max.max(energy);
            }
            debug!(channel = ch, ?region, min, max, "channel window energies");

            if max <= 0.0 {
                return Err(AnalysisError::ZeroChannelEnergy { channel: ch });
            }

            match reference_min {
                None => reference_min = Some(min),
                Some(ref_min) => {
                    let mut reference = self.config.reference_min_fraction * ref_min;
                    if downmix {
                        reference /= 2.0;
                    }
                    if min < reference {
                        return Err(AnalysisError::InsufficientChannelEnergy {
                            channel: ch,
                            min,
                            reference,
                        });
                    }
                }
            }

            let ratio = min / max;
            if ratio < self.config.min_energy_ratio {
                return Err(AnalysisError::EnergyRatioBelowThreshold {
                    channel: ch,
                    ratio,
                    threshold: self.config.min_energy_ratio,
                });
            }

            let bleed_allowance = self.config.bleed_through_fraction * min;
            table.clear_region(ch, region.clone());
            for seg in 0..nseg {
                if region.contains(&seg) {
                    continue;
                }
                let limit = if seg == region.end {
                    noise_floor.max(bleed_allowance)
                } else {
                    noise_floor
                };
                let energy = table.get(ch, seg);
                if energy > limit {
                    return Err(AnalysisError::UnexpectedResidualSignal {
                        channel: ch,
                        segment: seg,
                        energy,
                    });
                }
            }
        }

        Ok(())
    }

    /// Stream continuity: every segment of the expected span must carry
    /// energy in at least one channel.
    fn check_coverage(&self, table: &SegmentEnergyTable, expected_segments: usize) -> Result<()> {
        for seg in 0..expected_segments.min(table.segments()) {
            let silent = (0..table.channels()).all(|ch| table.segment_energy(ch, seg) <= 0.0);
            if silent {
                return Err(AnalysisError::SilentSegment { segment: seg });
            }
        }
        Ok(())
    }

    /// Energy stability: each segment's summed energy must stay within the
    /// configured margin of the average. The average excludes segment 0,
    /// which may be shortened by onset alignment.
    fn check_stability(
        &self,
        table: &SegmentEnergyTable,
        expected_segments: usize,
        drc_effect_applied: bool,
    ) -> Result<()> {
        let span = expected_segments.min(table.segments());
        if span < 2 {
            return Ok(());
        }

        let sum: f64 = (1..span).map(|seg| table.total_segment_energy(seg)).sum();
        let average = sum / (span - 1) as f64;
        if average <= 0.0 {
            return Err(AnalysisError::SilentSegment { segment: 1 });
        }

        let margin = self.config.margin_for(drc_effect_applied);
        for seg in 0..span {
            let ratio = table.total_segment_energy(seg) / average;
            if ratio < 1.0 - margin || ratio > 1.0 + margin {
                debug!(seg, ratio, margin, "segment energy outside margin");
                return Err(AnalysisError::EnergyDropout {
                    segment: seg,
                    ratio,
                    margin,
                });
            }
        }
        Ok(())
    }
}
