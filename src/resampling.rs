//! Module for handling sample-rate conversion.
//!
//! Rates are reduced by their greatest common divisor to an integer ratio
//! `up / down`. The default [`ResampleMethod::Polyphase`] path applies a
//! Kaiser-windowed sinc low-pass and only evaluates the filter at the output
//! samples that survive decimation. [`ResampleMethod::Fft`] hands the same
//! ratio to rubato's synchronous FFT resampler.
//!
//! Both paths produce `ceil(n * up / down)` samples per channel.

use ndarray::{Array2, ArrayView2, Axis};
use rubato::{FftFixedInOut, Resampler};
use tracing::debug;

use crate::operations::types::ResampleMethod;
use crate::utils::audio_math::{gcd, kaiser_window, sinc};
use crate::{AugmentResult, ParameterError, ProcessingError, Signal};

/// Kaiser window shape parameter for the anti-aliasing filter.
const KAISER_BETA: f64 = 5.0;
/// Filter half-length in units of the larger of `up` and `down`.
const HALF_LEN_FACTOR: usize = 10;
/// Input chunk requested from rubato; it rounds this to a multiple of `down`.
const FFT_CHUNK: usize = 1024;

/// Output length for a rational resampling of `n` samples.
pub const fn resampled_len(n: usize, up: usize, down: usize) -> usize {
    (n * up).div_ceil(down)
}

/// Designs the low-pass filter used by [`resample_poly`].
///
/// Odd length `2 * 10 * max(up, down) + 1`, cutoff `1 / max(up, down)` of
/// Nyquist, DC gain `up` to compensate for zero stuffing.
pub fn design_filter(up: usize, down: usize) -> Vec<f64> {
    let max_rate = up.max(down);
    let cutoff = 1.0 / max_rate as f64;
    let half_len = HALF_LEN_FACTOR * max_rate;
    let window = kaiser_window(2 * half_len + 1, KAISER_BETA);

    let mut taps: Vec<f64> = window
        .iter()
        .enumerate()
        .map(|(i, w)| cutoff * sinc(cutoff * (i as f64 - half_len as f64)) * w)
        .collect();
    let sum: f64 = taps.iter().sum();
    let gain = up as f64 / sum;
    taps.iter_mut().for_each(|t| *t *= gain);
    taps
}

/// Polyphase rational resampling along the time axis.
///
/// Equivalent to zero-stuffing by `up`, filtering with [`design_filter`]
/// centred on each output, and keeping every `down`-th sample, but only the
/// taps that meet non-zero input samples are evaluated.
pub fn resample_poly(data: ArrayView2<'_, f32>, up: usize, down: usize) -> Array2<f32> {
    let n = data.ncols();
    if up == down {
        return data.to_owned();
    }
    let taps = design_filter(up, down);
    let half_len = taps.len() / 2;
    let out_len = resampled_len(n, up, down);
    let mut out = Array2::<f32>::zeros((data.nrows(), out_len));

    for (row_in, mut row_out) in data.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
        for (k, y) in row_out.iter_mut().enumerate() {
            // position on the upsampled grid the filter is centred on
            let t0 = k * down + half_len;
            let j_min = if t0 + 1 > taps.len() {
                (t0 + 1 - taps.len()).div_ceil(up)
            } else {
                0
            };
            let j_max = (t0 / up).min(n.saturating_sub(1));
            let mut acc = 0.0f64;
            if n > 0 && j_min <= j_max {
                for j in j_min..=j_max {
                    acc += taps[t0 - j * up] * f64::from(row_in[j]);
                }
            }
            *y = acc as f32;
        }
    }
    out
}

fn resample_fft(data: ArrayView2<'_, f32>, from: usize, to: usize, out_len: usize) -> AugmentResult<Array2<f32>> {
    let channels = data.nrows();
    let n = data.ncols();
    let mut resampler = FftFixedInOut::<f32>::new(from, to, FFT_CHUNK, channels).map_err(|e| {
        ProcessingError::algorithm_failure("fft_resampler", format!("failed to create: {e}"))
    })?;
    let delay = resampler.output_delay();
    let chunk = resampler.input_frames_next();

    let mut collected: Vec<Vec<f32>> = vec![Vec::with_capacity(out_len + delay); channels];
    let mut buffer = vec![vec![0.0f32; chunk]; channels];
    let mut pos = 0;
    while collected[0].len() < out_len + delay {
        for (ch, buf) in buffer.iter_mut().enumerate() {
            let row = data.row(ch);
            for (i, slot) in buf.iter_mut().enumerate() {
                *slot = if pos + i < n { row[pos + i] } else { 0.0 };
            }
        }
        let processed = resampler.process(&buffer, None).map_err(|e| {
            ProcessingError::algorithm_failure(
                "fft_resampler",
                format!("chunk at {pos} of {n} (chunk={chunk}, channels={channels}): {e}"),
            )
        })?;
        for (dst, src) in collected.iter_mut().zip(processed) {
            dst.extend(src);
        }
        pos += chunk;
    }

    let mut out = Array2::<f32>::zeros((channels, out_len));
    for (mut row, samples) in out.axis_iter_mut(Axis(0)).zip(&collected) {
        for (dst, src) in row.iter_mut().zip(&samples[delay..delay + out_len]) {
            *dst = *src;
        }
    }
    Ok(out)
}

/// Resamples a signal to `target_rate`.
///
/// Returns the signal untouched when the rate already matches.
///
/// # Errors
/// Returns an error if `target_rate` is zero, the signal is empty, or the FFT
/// backend fails.
///
/// # Example
/// ```rust
/// use audio_augment::{Signal, resampling::resample, operations::types::ResampleMethod};
/// use ndarray::Array2;
///
/// let signal = Signal::new(Array2::zeros((2, 441)), 44_100).unwrap();
/// let out = resample(signal, 16_000, ResampleMethod::Polyphase).unwrap();
/// assert_eq!(out.sample_rate(), 16_000);
/// assert_eq!(out.num_samples(), 160);
/// assert_eq!(out.num_channels(), 2);
/// ```
pub fn resample(signal: Signal, target_rate: u32, method: ResampleMethod) -> AugmentResult<Signal> {
    if target_rate == 0 {
        return Err(ParameterError::invalid_value("sample_rate", "target rate must be > 0").into());
    }
    let from = signal.sample_rate();
    if from == target_rate {
        return Ok(signal);
    }
    if signal.num_samples() == 0 {
        return Err(ParameterError::invalid_value("signal", "cannot resample empty audio").into());
    }

    let g = gcd(u64::from(from), u64::from(target_rate));
    let up = (u64::from(target_rate) / g) as usize;
    let down = (u64::from(from) / g) as usize;
    let out_len = resampled_len(signal.num_samples(), up, down);
    debug!(from, to = target_rate, up, down, %method, "resampling");

    let data = match method {
        ResampleMethod::Polyphase => resample_poly(signal.data().view(), up, down),
        ResampleMethod::Fft => resample_fft(
            signal.data().view(),
            from as usize,
            target_rate as usize,
            out_len,
        )?,
    };
    let mut signal = signal.with_data(data)?;
    signal.set_sample_rate(target_rate);
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    fn sine(freq: f64, rate: u32, n: usize, channels: usize) -> Signal {
        let data = Array2::from_shape_fn((channels, n), |(_, t)| {
            (2.0 * std::f64::consts::PI * freq * t as f64 / f64::from(rate)).sin() as f32
        });
        Signal::new(data, rate).unwrap()
    }

    #[test]
    fn filter_has_gain_up_and_is_symmetric() {
        let taps = design_filter(3, 2);
        assert_eq!(taps.len(), 61);
        assert_approx_eq!(taps.iter().sum::<f64>(), 3.0, 1e-9);
        assert_approx_eq!(taps[10], taps[50], 1e-12);
    }

    #[test]
    fn output_length_uses_ceiling() {
        assert_eq!(resampled_len(1000, 441, 160), 2757);
        assert_eq!(resampled_len(1001, 1, 2), 501);
    }

    #[test]
    fn same_rate_is_a_no_op() {
        let signal = sine(440.0, 16_000, 256, 1);
        let out = resample(signal.clone(), 16_000, ResampleMethod::Polyphase).unwrap();
        assert_eq!(out, signal);
    }

    #[test]
    fn downsampling_preserves_a_low_tone() {
        let signal = sine(100.0, 16_000, 1_600, 1);
        let out = resample(signal, 8_000, ResampleMethod::Polyphase).unwrap();
        assert_eq!(out.num_samples(), 800);
        // compare away from the edges where the filter sees zero padding
        for t in 200..600 {
            let expected = (2.0 * std::f64::consts::PI * 100.0 * t as f64 / 8_000.0).sin();
            assert!(
                (f64::from(out.data()[[0, t]]) - expected).abs() < 1e-2,
                "sample {t}"
            );
        }
    }

    #[test]
    fn upsampling_keeps_channels_and_sets_rate() {
        let signal = sine(200.0, 8_000, 400, 2);
        let out = resample(signal, 22_050, ResampleMethod::Polyphase).unwrap();
        assert_eq!(out.num_channels(), 2);
        assert_eq!(out.sample_rate(), 22_050);
        assert_eq!(out.num_samples(), resampled_len(400, 441, 160));
    }

    #[test]
    fn fft_backend_matches_length_convention() {
        let signal = sine(300.0, 16_000, 3_000, 2);
        let out = resample(signal, 24_000, ResampleMethod::Fft).unwrap();
        assert_eq!(out.num_samples(), 4_500);
        assert_eq!(out.sample_rate(), 24_000);
        let peak = out
            .data()
            .slice(ndarray::s![.., 1_000..3_500])
            .iter()
            .fold(0.0f32, |m, x| m.max(x.abs()));
        assert!(peak > 0.95 && peak < 1.05, "peak {peak}");
    }

    #[test]
    fn zero_target_rate_is_rejected() {
        let signal = sine(100.0, 16_000, 10, 1);
        assert!(resample(signal, 0, ResampleMethod::Polyphase).is_err());
    }
}
