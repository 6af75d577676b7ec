//! Numeric helpers shared by the operations.
//!
//! The dB conversion follows librosa's `power_to_db` (amplitude floor
//! `amin`, reference level), so thresholds given "in dB below the loudest
//! frame" mean the same thing as in the Python tooling these augmentations
//! are usually paired with.

/// Smallest power considered when converting to dB.
pub const AMIN: f64 = 1e-10;

/// Greatest common divisor.
pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Converts power to dB relative to `reference`.
///
/// `10 * log10(max(power, AMIN)) - 10 * log10(max(reference, AMIN))`
///
/// # Examples
///
/// ```rust
/// use audio_augment::utils::audio_math::power_to_db;
///
/// assert_eq!(power_to_db(1.0, 1.0), 0.0);
/// assert!((power_to_db(0.01, 1.0) + 20.0).abs() < 1e-9);
/// ```
pub fn power_to_db(power: f64, reference: f64) -> f64 {
    10.0 * power.max(AMIN).log10() - 10.0 * reference.max(AMIN).log10()
}

/// Converts a duration in milliseconds to a whole number of samples, truncating.
pub fn ms_to_samples(duration_ms: f64, sample_rate: u32) -> usize {
    (duration_ms / 1000.0 * f64::from(sample_rate)).max(0.0) as usize
}

/// Zeroth-order modified Bessel function of the first kind.
///
/// Power series, summed until the next term no longer changes the result.
pub fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    loop {
        term *= (half / k) * (half / k);
        sum += term;
        if term < sum * 1e-17 {
            break;
        }
        k += 1.0;
    }
    sum
}

/// Symmetric Kaiser window of `len` points.
pub fn kaiser_window(len: usize, beta: f64) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let denom = bessel_i0(beta);
    let m = (len - 1) as f64;
    (0..len)
        .map(|n| {
            let r = 2.0 * n as f64 / m - 1.0;
            bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / denom
        })
        .collect()
}

/// Normalised sinc, `sin(pi x) / (pi x)`.
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = std::f64::consts::PI * x;
        px.sin() / px
    }
}

/// Maps a unit-interval draw to an integer in `0..=max`.
///
/// Shape-dependent positions are drawn as fractions before the container is
/// seen; this turns the fraction into an index once the extent is known.
pub fn fraction_to_index(fraction: f64, max: usize) -> usize {
    let idx = (fraction.clamp(0.0, 1.0) * (max as f64 + 1.0)).floor() as usize;
    idx.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn gcd_of_common_rates() {
        assert_eq!(gcd(44_100, 16_000), 100);
        assert_eq!(gcd(48_000, 16_000), 16_000);
        assert_eq!(gcd(7, 0), 7);
    }

    #[test]
    fn bessel_matches_reference_values() {
        assert_approx_eq!(bessel_i0(0.0), 1.0, 1e-12);
        assert_approx_eq!(bessel_i0(1.0), 1.266_065_877_752_008_4, 1e-12);
        assert_approx_eq!(bessel_i0(5.0), 27.239_871_823_604_45, 1e-10);
    }

    #[test]
    fn kaiser_window_is_symmetric_with_unit_peak() {
        let w = kaiser_window(11, 5.0);
        assert_approx_eq!(w[5], 1.0, 1e-12);
        for i in 0..5 {
            assert_approx_eq!(w[i], w[10 - i], 1e-12);
        }
        assert!(w[0] < 0.1);
    }

    #[test]
    fn fraction_to_index_covers_full_range() {
        assert_eq!(fraction_to_index(0.0, 10), 0);
        assert_eq!(fraction_to_index(0.999_999, 10), 10);
        assert_eq!(fraction_to_index(1.0, 10), 10);
        assert_eq!(fraction_to_index(0.5, 0), 0);
    }

    #[test]
    fn ms_to_samples_truncates() {
        assert_eq!(ms_to_samples(20.0, 16_000), 320);
        assert_eq!(ms_to_samples(0.01, 16_000), 0);
    }
}
