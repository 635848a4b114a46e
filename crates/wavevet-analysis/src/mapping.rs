//! Channel-to-logical-position inference and validation.

use tracing::debug;
use wavevet_foundation::{AnalysisError, Result};

use crate::segment::SegmentEnergyTable;

/// Front-channel arrangements accepted for 5.1-and-up layouts:
/// center-left-right and left-right-center decoder orders.
const PERMITTED_FRONT_ORDERS: [[usize; 3]; 2] = [[0, 1, 2], [1, 2, 0]];

const UNASSIGNED: usize = usize::MAX;

/// Inferred physical-channel to logical-position map.
///
/// Staggered conformance content plays each position for two blocks in
/// front-to-back order, so the block index of a channel's noise-floor
/// crossing identifies its position. A channel that never crosses carries
/// no directional content and is taken to be the LFE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOffsetMap {
    offsets: Vec<usize>,
    lfe_channel: Option<usize>,
}

impl ChannelOffsetMap {
    /// Infers per-channel offsets from noise-floor crossings.
    pub fn infer(
        table: &SegmentEnergyTable,
        noise_floor: f64,
        segments_per_block: usize,
    ) -> Result<Self> {
        let channels = table.channels();
        let window = 2 * segments_per_block;
        let mut offsets = vec![UNASSIGNED; channels];
        let mut silent = Vec::new();

        for ch in 0..channels {
            match table.first_crossing(ch, noise_floor) {
                Some(seg) => offsets[ch] = seg / window,
                None => silent.push(ch),
            }
        }

        if silent.len() > 1 {
            return Err(AnalysisError::MultipleLfeChannels {
                count: silent.len(),
            });
        }

        let lfe_channel = silent.first().copied();
        if let Some(ch) = lfe_channel {
            // The LFE claims the lowest position no other channel took.
            let position = (0..=channels)
                .find(|pos| !offsets.contains(pos))
                .unwrap_or(channels);
            offsets[ch] = position;
            debug!(channel = ch, position, "assigned silent channel as LFE");
        }

        debug!(?offsets, "inferred channel offsets");
        Ok(Self {
            offsets,
            lfe_channel,
        })
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn channels(&self) -> usize {
        self.offsets.len()
    }

    /// Channel identified as the LFE, if any.
    pub fn lfe_channel(&self) -> Option<usize> {
        self.lfe_channel
    }

    /// Checks the first three physical channels against the permitted
    /// front arrangements. Layouts under five channels have no fixed
    /// front triple and always pass.
    pub fn validate_front_order(&self) -> Result<()> {
        if self.offsets.len() < 5 {
            return Ok(());
        }
        let front = [self.offsets[0], self.offsets[1], self.offsets[2]];
        if PERMITTED_FRONT_ORDERS.contains(&front) {
            Ok(())
        } else {
            Err(AnalysisError::InvalidFrontChannelOrder {
                observed: front.to_vec(),
            })
        }
    }

    /// Physical channel order sorted by logical position.
    ///
    /// With `identity` the physical order is kept as-is; otherwise every
    /// logical position must be claimed by exactly one channel.
    pub fn remap(&self, identity: bool) -> Result<Vec<usize>> {
        let n = self.offsets.len();
        if identity {
            return Ok((0..n).collect());
        }

        let mut by_position = vec![UNASSIGNED; n];
        for (ch, &pos) in self.offsets.iter().enumerate() {
            if pos >= n || by_position[pos] != UNASSIGNED {
                return Err(AnalysisError::ChannelMappingConflict { position: pos });
            }
            by_position[pos] = ch;
        }
        Ok(by_position)
    }
}
