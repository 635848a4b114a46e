//! Per-channel cumulative segment energy accumulation.

use std::ops::Range;

use wavevet_foundation::DecodedSampleBuffer;

/// `[channel][segment]` table of cumulative squared-sample energy.
///
/// Each stored value includes the energy of all earlier segments on that
/// channel, so a channel's row is monotonically non-decreasing. Offset
/// inference, window zeroing, and delta computation all rely on this.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEnergyTable {
    channels: usize,
    segments: usize,
    values: Vec<f64>,
}

impl SegmentEnergyTable {
    /// Accumulates squared samples from `start_frame`, recording the running
    /// sum at every segment boundary. Trailing frames short of a full
    /// segment are dropped.
    pub fn accumulate(
        buffer: &DecodedSampleBuffer<'_>,
        start_frame: usize,
        segment_len: usize,
    ) -> Self {
        let channels = buffer.channels();
        let usable_frames = buffer.frames().saturating_sub(start_frame);
        let segments = if segment_len == 0 {
            0
        } else {
            usable_frames / segment_len
        };

        let samples = buffer.samples();
        let mut values = vec![0.0; channels * segments];
        let mut running = vec![0i64; channels];

        for seg in 0..segments {
            let first = start_frame + seg * segment_len;
            for frame in first..first + segment_len {
                let base = frame * channels;
                for (ch, sum) in running.iter_mut().enumerate() {
                    let s = i64::from(samples[base + ch]);
                    *sum += s * s;
                }
            }
            for ch in 0..channels {
                values[ch * segments + seg] = running[ch] as f64;
            }
        }

        Self {
            channels,
            segments,
            values,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Cumulative energy of one channel at one segment boundary.
    pub fn get(&self, channel: usize, segment: usize) -> f64 {
        self.values[channel * self.segments + segment]
    }

    /// Energy contributed by one segment alone.
    pub fn segment_energy(&self, channel: usize, segment: usize) -> f64 {
        if segment == 0 {
            self.get(channel, 0)
        } else {
            self.get(channel, segment) - self.get(channel, segment - 1)
        }
    }

    /// Loudest single segment of a channel.
    pub fn peak_segment_energy(&self, channel: usize) -> f64 {
        (0..self.segments)
            .map(|seg| self.segment_energy(channel, seg))
            .fold(0.0, f64::max)
    }

    /// First segment whose cumulative energy exceeds `floor`.
    pub fn first_crossing(&self, channel: usize, floor: f64) -> Option<usize> {
        (0..self.segments).find(|&seg| self.get(channel, seg) > floor)
    }

    /// Cumulative total of a channel over the whole table.
    pub fn channel_total(&self, channel: usize) -> f64 {
        if self.segments == 0 {
            0.0
        } else {
            self.get(channel, self.segments - 1)
        }
    }

    /// Energy contributed by one segment summed across all channels.
    pub fn total_segment_energy(&self, segment: usize) -> f64 {
        (0..self.channels)
            .map(|ch| self.segment_energy(ch, segment))
            .sum()
    }

    /// Zeroes a verified window and removes its energy from the tail.
    ///
    /// After the call, segments past the window hold only the energy
    /// accumulated outside it, keeping the residual-silence comparison
    /// meaningful on cumulative values.
    pub fn clear_region(&mut self, channel: usize, region: Range<usize>) {
        if region.start >= region.end || region.end > self.segments {
            return;
        }
        let removed = self.get(channel, region.end - 1);
        let row = channel * self.segments;
        for seg in region.clone() {
            self.values[row + seg] = 0.0;
        }
        for seg in region.end..self.segments {
            self.values[row + seg] = (self.values[row + seg] - removed).max(0.0);
        }
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[Vec<f64>]) -> Self {
        let channels = rows.len();
        let segments = rows.first().map(Vec::len).unwrap_or(0);
        let mut values = Vec::with_capacity(channels * segments);
        for row in rows {
            values.extend_from_slice(row);
        }
        Self {
            channels,
            segments,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wavevet_foundation::AudioFormat;

    fn mono_buffer(samples: &[i16]) -> DecodedSampleBuffer<'_> {
        DecodedSampleBuffer::new(samples, AudioFormat::new(8_000, 1)).unwrap()
    }

    #[test]
    fn accumulation_is_cumulative() {
        // Four frames of magnitude 2 then four of magnitude 3, two-frame
        // segments: per-segment energies 8, 8, 18, 18.
        let samples = [2i16, 2, 2, 2, 3, 3, 3, 3];
        let table = SegmentEnergyTable::accumulate(&mono_buffer(&samples), 0, 2);

        assert_eq!(table.segments(), 4);
        assert_relative_eq!(table.get(0, 0), 8.0);
        assert_relative_eq!(table.get(0, 1), 16.0);
        assert_relative_eq!(table.get(0, 2), 34.0);
        assert_relative_eq!(table.get(0, 3), 52.0);
        assert_relative_eq!(table.segment_energy(0, 2), 18.0);
        assert_relative_eq!(table.channel_total(0), 52.0);
    }

    #[test]
    fn start_frame_skips_lead_in() {
        let samples = [100i16, 100, 1, 1, 1, 1];
        let table = SegmentEnergyTable::accumulate(&mono_buffer(&samples), 2, 2);

        assert_eq!(table.segments(), 2);
        assert_relative_eq!(table.get(0, 0), 2.0);
        assert_relative_eq!(table.get(0, 1), 4.0);
    }

    #[test]
    fn partial_trailing_segment_is_dropped() {
        let samples = [1i16; 7];
        let table = SegmentEnergyTable::accumulate(&mono_buffer(&samples), 0, 2);
        assert_eq!(table.segments(), 3);
    }

    #[test]
    fn interleaved_channels_accumulate_separately() {
        let samples = [10i16, 1, 10, 1, 10, 1, 10, 1];
        let buf = DecodedSampleBuffer::new(&samples, AudioFormat::new(8_000, 2)).unwrap();
        let table = SegmentEnergyTable::accumulate(&buf, 0, 2);

        assert_eq!(table.segments(), 2);
        assert_relative_eq!(table.get(0, 1), 400.0);
        assert_relative_eq!(table.get(1, 1), 4.0);
    }

    #[test]
    fn peak_and_crossing() {
        let table = SegmentEnergyTable::from_rows(&[vec![0.0, 5.0, 100.0, 105.0]]);
        assert_relative_eq!(table.peak_segment_energy(0), 95.0);
        assert_eq!(table.first_crossing(0, 10.0), Some(2));
        assert_eq!(table.first_crossing(0, 200.0), None);
    }

    #[test]
    fn clear_region_removes_window_energy_from_tail() {
        let table_rows = vec![vec![2.0, 50.0, 100.0, 101.0, 101.5]];
        let mut table = SegmentEnergyTable::from_rows(&table_rows);
        table.clear_region(0, 1..3);

        assert_relative_eq!(table.get(0, 0), 2.0);
        assert_relative_eq!(table.get(0, 1), 0.0);
        assert_relative_eq!(table.get(0, 2), 0.0);
        assert_relative_eq!(table.get(0, 3), 1.0);
        assert_relative_eq!(table.get(0, 4), 1.5);
    }

    #[test]
    fn total_segment_energy_sums_deltas() {
        let table = SegmentEnergyTable::from_rows(&[
            vec![1.0, 2.0, 3.0],
            vec![10.0, 10.0, 30.0],
        ]);
        assert_relative_eq!(table.total_segment_energy(0), 11.0);
        assert_relative_eq!(table.total_segment_energy(1), 1.0);
        assert_relative_eq!(table.total_segment_energy(2), 21.0);
    }
}
