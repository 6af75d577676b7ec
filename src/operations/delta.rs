//! Delta (time-derivative) features.
//!
//! Derivatives are Savitzky–Golay estimates: within each window of `width`
//! frames a least-squares polynomial is fitted and differentiated. Interior
//! frames use the fixed filter for a centred window; the first and last
//! `width / 2` frames reuse the fit of the edge window, evaluated at their
//! own offset.

use ndarray::{Array3, ArrayView1, Axis, s};
use tracing::debug;

use crate::{AugmentResult, ParameterError, ProcessingError, Spectrogram};

/// Least-squares fit operator for a centred window.
///
/// Row `k` maps window samples to the coefficient of `u^k`, where `u` runs
/// from `-window/2` to `window/2`.
#[derive(Debug, Clone)]
struct PolyFit {
    rows: Vec<Vec<f64>>,
    half: usize,
}

impl PolyFit {
    fn new(window: usize, polyorder: usize) -> AugmentResult<Self> {
        let half = window / 2;
        let terms = polyorder + 1;
        let offsets: Vec<f64> = (0..window).map(|i| i as f64 - half as f64).collect();

        // normal equations: (A^T A) X = A^T, A the Vandermonde matrix of `offsets`
        let mut gram = vec![vec![0.0f64; terms]; terms];
        for (r, row) in gram.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = offsets.iter().map(|u| u.powi((r + c) as i32)).sum();
            }
        }
        let mut rhs: Vec<Vec<f64>> = (0..terms)
            .map(|k| offsets.iter().map(|u| u.powi(k as i32)).collect())
            .collect();

        for col in 0..terms {
            let pivot = (col..terms)
                .max_by(|&a, &b| gram[a][col].abs().total_cmp(&gram[b][col].abs()))
                .unwrap_or(col);
            if gram[pivot][col].abs() < 1e-12 {
                return Err(ProcessingError::algorithm_failure(
                    "savgol",
                    format!("singular fit for window {window} and polyorder {polyorder}"),
                )
                .into());
            }
            gram.swap(col, pivot);
            rhs.swap(col, pivot);
            for r in 0..terms {
                if r == col {
                    continue;
                }
                let factor = gram[r][col] / gram[col][col];
                if factor == 0.0 {
                    continue;
                }
                for c in col..terms {
                    gram[r][c] -= factor * gram[col][c];
                }
                for j in 0..window {
                    rhs[r][j] -= factor * rhs[col][j];
                }
            }
        }
        for (r, row) in rhs.iter_mut().enumerate() {
            let d = gram[r][r];
            row.iter_mut().for_each(|v| *v /= d);
        }
        Ok(Self { rows: rhs, half })
    }

    /// Weights giving the `deriv`-th derivative at offset `u` of the fitted polynomial.
    fn derivative_weights(&self, deriv: usize, u: f64) -> Vec<f64> {
        let window = self.rows[0].len();
        let mut weights = vec![0.0f64; window];
        for (k, row) in self.rows.iter().enumerate().skip(deriv) {
            let scale = falling_factorial(k, deriv) * u.powi((k - deriv) as i32);
            for (w, r) in weights.iter_mut().zip(row) {
                *w += scale * r;
            }
        }
        weights
    }
}

fn falling_factorial(k: usize, d: usize) -> f64 {
    ((k - d + 1)..=k).map(|x| x as f64).product()
}

fn check_window(width: usize) -> AugmentResult<()> {
    if width < 3 || width % 2 == 0 {
        return Err(ParameterError::out_of_range("width", width, "expected an odd integer >= 3").into());
    }
    Ok(())
}

/// Savitzky–Golay weights for the centre of a `window`-long frame.
///
/// The result is in correlation order: `y[t] = sum_i c[i] * x[t - window/2 + i]`.
///
/// # Errors
/// Returns an error if `window` is even or below 3, or if
/// `deriv > polyorder` or `polyorder >= window`.
///
/// ```rust
/// use audio_augment::operations::delta::savgol_coefficients;
///
/// let c = savgol_coefficients(5, 1, 1).unwrap();
/// let expected = [-0.2, -0.1, 0.0, 0.1, 0.2];
/// assert!(c.iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-12));
/// ```
pub fn savgol_coefficients(window: usize, polyorder: usize, deriv: usize) -> AugmentResult<Vec<f64>> {
    check_window(window)?;
    if polyorder >= window {
        return Err(ParameterError::out_of_range(
            "polyorder",
            polyorder,
            format!("must be below the window length {window}"),
        )
        .into());
    }
    if deriv > polyorder {
        return Err(ParameterError::out_of_range(
            "deriv",
            deriv,
            format!("must not exceed polyorder {polyorder}"),
        )
        .into());
    }
    Ok(PolyFit::new(window, polyorder)?.derivative_weights(deriv, 0.0))
}

fn apply_filter(
    x: ArrayView1<'_, f32>,
    fit: &PolyFit,
    centre: &[f64],
    head: &[Vec<f64>],
    tail: &[Vec<f64>],
    out: &mut [f32],
) {
    let n = x.len();
    let window = centre.len();
    let half = fit.half;
    let dot = |weights: &[f64], from: usize| -> f32 {
        weights
            .iter()
            .zip(x.slice(s![from..from + window]))
            .map(|(w, v)| w * f64::from(*v))
            .sum::<f64>() as f32
    };
    for (t, y) in out.iter_mut().enumerate() {
        *y = if t < half {
            dot(&head[t], 0)
        } else if t >= n - half {
            dot(&tail[t - (n - half)], n - window)
        } else {
            dot(centre, t - half)
        };
    }
}

/// Derivative of `order` along a 1-D sequence with a `width`-frame window.
///
/// The polynomial order equals the derivative order.
///
/// # Errors
/// Returns an error for an invalid window or a sequence shorter than `width`.
pub fn delta(x: ArrayView1<'_, f32>, width: usize, order: usize) -> AugmentResult<Vec<f32>> {
    check_window(width)?;
    if x.len() < width {
        return Err(too_narrow(width, x.len()).into());
    }
    let filter = DeltaFilter::new(width, order)?;
    let mut out = vec![0.0f32; x.len()];
    filter.run(x, &mut out);
    Ok(out)
}

struct DeltaFilter {
    fit: PolyFit,
    centre: Vec<f64>,
    head: Vec<Vec<f64>>,
    tail: Vec<Vec<f64>>,
}

impl DeltaFilter {
    fn new(width: usize, order: usize) -> AugmentResult<Self> {
        let fit = PolyFit::new(width, order)?;
        let half = fit.half as f64;
        let centre = fit.derivative_weights(order, 0.0);
        let head = (0..fit.half)
            .map(|t| fit.derivative_weights(order, t as f64 - half))
            .collect();
        let tail = (0..fit.half)
            .map(|t| fit.derivative_weights(order, t as f64 + 1.0))
            .collect();
        Ok(Self {
            fit,
            centre,
            head,
            tail,
        })
    }

    fn run(&self, x: ArrayView1<'_, f32>, out: &mut [f32]) {
        apply_filter(x, &self.fit, &self.centre, &self.head, &self.tail, out);
    }
}

fn too_narrow(width: usize, frames: usize) -> ProcessingError {
    ProcessingError::precondition(
        "delta",
        format!(
            "a delta width of {width} needs at least {width} time frames but only {frames} are available; \
             increase the padding or crop width upstream"
        ),
    )
}

/// Stacks each channel with its first and second time derivatives.
///
/// Output channels are ordered `[c0, d1(c0), d2(c0), c1, d1(c1), ...]`, so the
/// channel count triples. Bins, frames and metadata are unchanged.
///
/// # Errors
/// Returns an error if `width` is even or below 3, or the spectrogram has fewer
/// than `width` frames.
pub fn delta_features(spectrogram: Spectrogram, width: usize) -> AugmentResult<Spectrogram> {
    check_window(width)?;
    let frames = spectrogram.num_frames();
    if frames < width {
        return Err(too_narrow(width, frames).into());
    }
    let (channels, bins, _) = spectrogram.data().dim();
    let first = DeltaFilter::new(width, 1)?;
    let second = DeltaFilter::new(width, 2)?;

    let mut out = Array3::<f32>::zeros((channels * 3, bins, frames));
    let mut scratch = vec![0.0f32; frames];
    for (c, channel) in spectrogram.data().axis_iter(Axis(0)).enumerate() {
        out.index_axis_mut(Axis(0), 3 * c).assign(&channel);
        for (offset, filter) in [(1, &first), (2, &second)] {
            for (b, lane) in channel.axis_iter(Axis(0)).enumerate() {
                filter.run(lane, &mut scratch);
                out.slice_mut(s![3 * c + offset, b, ..])
                    .iter_mut()
                    .zip(&scratch)
                    .for_each(|(dst, src)| *dst = *src);
            }
        }
    }
    debug!(channels, out_channels = channels * 3, width, "computed delta features");
    spectrogram.with_data(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use ndarray::Array1;

    #[test]
    fn second_derivative_weights_for_five_points() {
        let c = savgol_coefficients(5, 2, 2).unwrap();
        let expected = [2.0, -1.0, -2.0, -1.0, 2.0].map(|v| v / 7.0);
        for (a, b) in c.iter().zip(expected) {
            assert_approx_eq!(*a, b, 1e-9);
        }
    }

    #[test]
    fn linear_ramp_has_unit_slope_everywhere() {
        let x = Array1::from_shape_fn(20, |t| 3.0 * t as f32 + 1.0);
        let d1 = delta(x.view(), 9, 1).unwrap();
        let d2 = delta(x.view(), 9, 2).unwrap();
        for (t, (a, b)) in d1.iter().zip(&d2).enumerate() {
            assert!((a - 3.0).abs() < 1e-3, "d1[{t}] = {a}");
            assert!(b.abs() < 1e-3, "d2[{t}] = {b}");
        }
    }

    #[test]
    fn quadratic_has_constant_curvature_including_edges() {
        let x = Array1::from_shape_fn(15, |t| (t * t) as f32);
        let d2 = delta(x.view(), 5, 2).unwrap();
        for v in d2 {
            assert!((v - 2.0).abs() < 1e-3, "{v}");
        }
        let d1 = delta(x.view(), 5, 1).unwrap();
        // centred slope of t^2 is 2t; edges take the slope of the edge window
        assert!((d1[7] - 14.0).abs() < 1e-3);
        assert!((d1[0] - 4.0).abs() < 1e-3);
        assert!((d1[14] - 24.0).abs() < 1e-3);
    }

    #[test]
    fn even_or_tiny_width_is_rejected() {
        assert!(savgol_coefficients(4, 1, 1).is_err());
        assert!(savgol_coefficients(1, 0, 0).is_err());
    }

    #[test]
    fn features_triple_channels_in_order() {
        let data = Array3::from_shape_fn((2, 3, 12), |(c, b, t)| (c * 100 + b) as f32 + t as f32);
        let sg = Spectrogram::new(data.clone(), 16_000, 160).unwrap();
        let out = delta_features(sg, 9).unwrap();
        assert_eq!(out.data().shape(), &[6, 3, 12]);
        assert_eq!(out.data().index_axis(Axis(0), 3), data.index_axis(Axis(0), 1));
        assert!((out.data()[[4, 2, 5]] - 1.0).abs() < 1e-3);
        assert!(out.data()[[5, 2, 5]].abs() < 1e-3);
    }

    #[test]
    fn too_few_frames_is_a_precondition_error() {
        let sg = Spectrogram::new(Array3::zeros((1, 4, 8)), 16_000, 160).unwrap();
        let err = delta_features(sg, 9).unwrap_err();
        assert!(err.to_string().contains("at least 9 time frames"));
    }
}
