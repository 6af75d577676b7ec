//! SpecAugment-style frequency and time masking.
//!
//! A mask overwrites a contiguous band of `size` rows (frequency bins) or
//! columns (time frames) across the whole other axis. The fill value defaults
//! to each channel's mean, measured once before any mask is applied so later
//! masks do not see earlier ones.

use ndarray::{Array3, Axis, s};
use tracing::trace;

use crate::utils::fraction_to_index;
use crate::{AugmentResult, ParameterError, Spectrogram};

fn mask_rows(
    data: &mut Array3<f32>,
    num_masks: usize,
    size: usize,
    start: Option<usize>,
    fill: Option<f32>,
    fractions: &[f64],
    axis_name: &'static str,
) -> AugmentResult<()> {
    let shape = data.shape().to_vec();
    let rows = shape[1];
    if size > rows {
        return Err(ParameterError::out_of_range(
            "size",
            size,
            format!("mask size cannot exceed the {rows} {axis_name} of a spectrogram shaped {shape:?}"),
        )
        .into());
    }
    let max_start = rows - size;
    if let Some(start) = start.filter(|&s| s > max_start) {
        return Err(ParameterError::out_of_range(
            "start",
            start,
            format!("expected 0..={max_start} for a {size}-wide mask over {axis_name} of a spectrogram shaped {shape:?}"),
        )
        .into());
    }
    if start.is_none() && fractions.len() < num_masks {
        return Err(ParameterError::invalid_value(
            "fractions",
            format!("{num_masks} masks need {num_masks} start fractions, got {}", fractions.len()),
        )
        .into());
    }

    let fills: Vec<f32> = match fill {
        Some(v) => vec![v; shape[0]],
        None => data
            .axis_iter(Axis(0))
            .map(|channel| channel.mean().unwrap_or(0.0))
            .collect(),
    };

    for i in 0..num_masks {
        let first = start.unwrap_or_else(|| fraction_to_index(fractions[i], max_start));
        trace!(axis = axis_name, first, size, "mask");
        for (c, value) in fills.iter().enumerate() {
            data.slice_mut(s![c, first..first + size, ..]).fill(*value);
        }
    }
    Ok(())
}

/// Masks `num_masks` bands of `size` frequency bins.
///
/// Each band starts at `start` when given, otherwise at
/// `floor(fractions[i] * (bins - size + 1))`. `fill` defaults to the
/// per-channel mean.
///
/// # Errors
/// Returns an error if `size` exceeds the number of bins, if an explicit
/// `start` leaves the band hanging off the end (the message carries the
/// spectrogram shape), or if too few fractions are supplied.
///
/// ```rust
/// use audio_augment::{Spectrogram, operations::masking::mask_frequency_band};
/// use ndarray::Array3;
///
/// let sg = Spectrogram::new(Array3::ones((1, 8, 4)), 16_000, 160).unwrap();
/// let masked = mask_frequency_band(sg, 1, 2, Some(3), Some(0.0), &[]).unwrap();
/// assert_eq!(masked.data()[[0, 3, 0]], 0.0);
/// assert_eq!(masked.data()[[0, 5, 0]], 1.0);
/// ```
pub fn mask_frequency_band(
    mut spectrogram: Spectrogram,
    num_masks: usize,
    size: usize,
    start: Option<usize>,
    fill: Option<f32>,
    fractions: &[f64],
) -> AugmentResult<Spectrogram> {
    mask_rows(
        spectrogram.data_mut(),
        num_masks,
        size,
        start,
        fill,
        fractions,
        "frequency bins",
    )?;
    Ok(spectrogram)
}

/// Masks `num_masks` bands of `size` time frames.
///
/// Same semantics as [`mask_frequency_band`] with time in place of frequency.
///
/// # Errors
/// See [`mask_frequency_band`].
pub fn mask_time_band(
    spectrogram: Spectrogram,
    num_masks: usize,
    size: usize,
    start: Option<usize>,
    fill: Option<f32>,
    fractions: &[f64],
) -> AugmentResult<Spectrogram> {
    let mut spectrogram = spectrogram;
    let mut transposed = std::mem::take(spectrogram.data_mut());
    transposed.swap_axes(1, 2);
    let mut transposed = transposed.as_standard_layout().into_owned();
    mask_rows(
        &mut transposed,
        num_masks,
        size,
        start,
        fill,
        fractions,
        "time frames",
    )?;
    transposed.swap_axes(1, 2);
    spectrogram.with_data(transposed.as_standard_layout().into_owned())
}
