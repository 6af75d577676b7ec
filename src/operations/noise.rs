//! Additive noise by spectral colour.
//!
//! White noise is drawn sample by sample. Coloured noise is synthesised in
//! the frequency domain: a random complex spectrum is shaped so its power
//! falls off as `1 / f^exponent`, then brought back to the time domain with
//! an inverse FFT and normalised to unit expected variance.

use ndarray::{Array1, Array2, Axis};
use num_complex::Complex;
use rand::Rng;
use rand_distr::StandardNormal;
use rustfft::FftPlanner;
use tracing::trace;

use super::types::NoiseColor;
use crate::{AugmentResult, ParameterError, Signal};

/// I.i.d. standard normal samples of the given shape.
pub fn white_noise<R>(shape: (usize, usize), rng: &mut R) -> Array2<f32>
where
    R: Rng + ?Sized,
{
    Array2::from_shape_simple_fn(shape, || rng.sample::<f32, _>(StandardNormal))
}

/// Gaussian noise with power spectral density proportional to `1 / f^exponent`.
///
/// `exponent` 0 is white, 1 pink, 2 brown; negative values tilt the spectrum
/// toward high frequencies. Frequencies are `k / n` for `k = 0..=n/2`, with
/// the DC bin clamped to the lowest non-zero frequency `1 / n`. The result is
/// scaled so its expected variance is one.
pub fn powerlaw_noise<R>(exponent: f64, n: usize, rng: &mut R) -> Array1<f32>
where
    R: Rng + ?Sized,
{
    if n < 2 {
        return Array1::from_shape_simple_fn(n, || rng.sample::<f32, _>(StandardNormal));
    }
    let bins = n / 2 + 1;
    let scale: Vec<f64> = (0..bins)
        .map(|k| {
            let f = (k as f64 / n as f64).max(1.0 / n as f64);
            f.powf(-exponent / 2.0)
        })
        .collect();

    // expected standard deviation of the unnormalised output
    let last_weight = (1.0 + (n % 2) as f64) / 2.0;
    let energy: f64 = scale[1..]
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let w = if i == bins - 2 { s * last_weight } else { *s };
            w * w
        })
        .sum();
    let sigma = 2.0 * energy.sqrt() / n as f64;

    let mut half: Vec<Complex<f64>> = scale
        .iter()
        .map(|s| {
            let re: f64 = rng.sample(StandardNormal);
            let im: f64 = rng.sample(StandardNormal);
            Complex::new(re * s, im * s)
        })
        .collect();
    // DC and (for even n) Nyquist must be real
    half[0] = Complex::new(half[0].re * std::f64::consts::SQRT_2, 0.0);
    if n % 2 == 0 {
        let last = bins - 1;
        half[last] = Complex::new(half[last].re * std::f64::consts::SQRT_2, 0.0);
    }

    let mut spectrum = vec![Complex::new(0.0, 0.0); n];
    spectrum[..bins].copy_from_slice(&half);
    for k in 1..n.div_ceil(2) {
        spectrum[n - k] = half[k].conj();
    }
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(n).process(&mut spectrum);

    let norm = n as f64 * sigma;
    Array1::from_iter(spectrum.iter().map(|c| (c.re / norm) as f32))
}

/// Adds noise of the given colour scaled by `level * mean(|signal|)`.
///
/// White noise is independent per channel; coloured noise is one sequence
/// shared by every channel.
///
/// # Errors
/// Returns an error if `level` is negative or not finite.
pub fn add_noise<R>(mut signal: Signal, level: f64, color: NoiseColor, rng: &mut R) -> AugmentResult<Signal>
where
    R: Rng + ?Sized,
{
    if !level.is_finite() || level < 0.0 {
        return Err(ParameterError::out_of_range("noise_level", level, "expected a finite value >= 0").into());
    }
    let data = signal.data_mut();
    if data.is_empty() {
        return Ok(signal);
    }
    let mean_abs = data.iter().map(|x| f64::from(x.abs())).sum::<f64>() / data.len() as f64;
    let gain = (level * mean_abs) as f32;
    trace!(%color, gain, "adding noise");

    match color {
        NoiseColor::White => {
            let noise = white_noise(data.dim(), rng);
            data.scaled_add(gain, &noise);
        }
        _ => {
            let noise = powerlaw_noise(f64::from(color.exponent()), data.ncols(), rng);
            for mut row in data.axis_iter_mut(Axis(0)) {
                row.scaled_add(gain, &noise);
            }
        }
    }
    Ok(signal)
}
