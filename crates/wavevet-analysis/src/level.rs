//! Energy-domain dB conversions.
//!
//! Energies here are sums of squared samples, so the linear/dB mapping is
//! `10 * log10`, not the amplitude-domain `20 * log10`.

/// Energy ratio expected between two streams that differ by `gain_db`.
pub fn expected_energy_ratio(gain_db: f64) -> f64 {
    10.0_f64.powf(gain_db / 10.0)
}

/// Gain in dB corresponding to an energy ratio.
///
/// A zero or negative ratio maps to negative infinity.
pub fn energy_gain_db(ratio: f64) -> f64 {
    if ratio <= 0.0 {
        f64::NEG_INFINITY
    } else {
        10.0 * ratio.log10()
    }
}
