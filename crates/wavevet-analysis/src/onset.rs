//! Signal onset detection over interleaved samples.

/// Location of the first audible signal in an interleaved stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Onset {
    /// First interleaved index whose magnitude exceeds the threshold.
    pub first_above_threshold: usize,
    /// First interleaved index holding any non-zero sample.
    pub first_nonzero: usize,
}

impl Onset {
    /// Index where accumulation should begin.
    ///
    /// Dither or codec ringing can produce isolated non-zero samples well
    /// before the content starts, so the effective start is the later of
    /// the two detections.
    pub fn effective_start(&self) -> usize {
        self.first_above_threshold.max(self.first_nonzero)
    }
}

/// Scans for signal onset, `None` when no sample exceeds the threshold.
pub fn detect(samples: &[i16], threshold: i16) -> Option<Onset> {
    let mut first_nonzero = None;
    for (i, &s) in samples.iter().enumerate() {
        if first_nonzero.is_none() && s != 0 {
            first_nonzero = Some(i);
        }
        if s.unsigned_abs() > threshold.unsigned_abs() {
            return Some(Onset {
                first_above_threshold: i,
                first_nonzero: first_nonzero.unwrap_or(i),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_has_no_onset() {
        assert_eq!(detect(&[0; 64], 1), None);
    }

    #[test]
    fn sub_threshold_noise_has_no_onset() {
        let samples = [0, 1, -1, 0, 1, 0, -1, 1];
        assert_eq!(detect(&samples, 1), None);
    }

    #[test]
    fn finds_first_crossing() {
        let mut samples = vec![0i16; 100];
        samples[40] = -500;
        let onset = detect(&samples, 1).unwrap();
        assert_eq!(onset.first_above_threshold, 40);
        assert_eq!(onset.first_nonzero, 40);
        assert_eq!(onset.effective_start(), 40);
    }

    #[test]
    fn leading_dither_does_not_advance_start() {
        let mut samples = vec![0i16; 100];
        samples[10] = 1;
        samples[50] = 2_000;
        let onset = detect(&samples, 1).unwrap();
        assert_eq!(onset.first_nonzero, 10);
        assert_eq!(onset.first_above_threshold, 50);
        assert_eq!(onset.effective_start(), 50);
    }

    #[test]
    fn handles_extreme_negative_sample() {
        let samples = [0i16, i16::MIN];
        let onset = detect(&samples, 1).unwrap();
        assert_eq!(onset.first_above_threshold, 1);
    }
}
