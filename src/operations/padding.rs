//! Length matching along the time axis.
//!
//! All functions here work on the last axis of any `ndarray` buffer, so the
//! same code handles `(channels, samples)` signals and `(channels, bins,
//! frames)` spectrograms. Random choices (where to crop, how to split zero
//! padding) are passed in as a unit-interval `position` drawn by the caller,
//! which keeps these functions deterministic.

use ndarray::{Array, Axis, Dimension, RemoveAxis, Slice, concatenate};
use tracing::trace;

use super::types::PadMode;
use crate::utils::{fraction_to_index, ms_to_samples};
use crate::{AugmentResult, ParameterError, Signal, Spectrogram};

fn time_axis<D: Dimension>(data: &Array<f32, D>) -> Axis {
    Axis(data.ndim() - 1)
}

/// Pads `data` along its last axis to exactly `width`.
///
/// * `Zeros` puts `floor(position * (needed + 1))` zeros in front and the rest
///   behind, i.e. a uniform split when `position` is uniform in `[0, 1)`.
/// * `ZerosAfter` appends every zero.
/// * `Repeat` tiles the data and truncates.
///
/// # Errors
/// Returns an error if `width` is smaller than the current length, or if
/// `Repeat` is asked to tile an empty buffer.
///
/// # Examples
/// ```rust
/// use audio_augment::operations::{padding::pad_to_width, types::PadMode};
/// use ndarray::array;
///
/// let data = array![[1.0f32, 2.0, 3.0]];
/// let tiled = pad_to_width(&data, 7, PadMode::Repeat, 0.0).unwrap();
/// assert_eq!(tiled, array![[1.0f32, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]]);
/// ```
pub fn pad_to_width<D>(
    data: &Array<f32, D>,
    width: usize,
    mode: PadMode,
    position: f64,
) -> AugmentResult<Array<f32, D>>
where
    D: Dimension + RemoveAxis,
{
    let axis = time_axis(data);
    let len = data.len_of(axis);
    if width < len {
        return Err(ParameterError::out_of_range(
            "width",
            width,
            format!("padding cannot shrink a buffer of length {len}"),
        )
        .into());
    }
    if width == len {
        return Ok(data.clone());
    }

    match mode {
        PadMode::Zeros | PadMode::ZerosAfter => {
            let needed = width - len;
            let front = match mode {
                PadMode::Zeros => fraction_to_index(position, needed),
                _ => 0,
            };
            let mut dim = data.raw_dim();
            dim[axis.index()] = width;
            let mut padded = Array::zeros(dim);
            padded
                .slice_axis_mut(axis, Slice::from(front..front + len))
                .assign(data);
            trace!(front, back = needed - front, "zero padded");
            Ok(padded)
        }
        PadMode::Repeat => {
            if len == 0 {
                return Err(ParameterError::invalid_value(
                    "data",
                    "cannot repeat-pad an empty buffer",
                )
                .into());
            }
            let repeats = width / len + 1;
            let views = vec![data.view(); repeats];
            let tiled = concatenate(axis, &views)?;
            Ok(tiled.slice_axis(axis, Slice::from(0..width)).to_owned())
        }
    }
}

/// Crops or pads `data` along its last axis to exactly `target`.
///
/// Longer buffers are cut at `floor(position * (len - target + 1))`; shorter
/// ones go through [`pad_to_width`] with `mode`. The crop start is returned
/// alongside the buffer when a crop happened.
///
/// # Errors
/// Propagates padding errors.
pub fn crop_to_length<D>(
    data: Array<f32, D>,
    target: usize,
    mode: PadMode,
    position: f64,
) -> AugmentResult<(Array<f32, D>, Option<usize>)>
where
    D: Dimension + RemoveAxis,
{
    let axis = time_axis(&data);
    let len = data.len_of(axis);
    if len == target {
        Ok((data, None))
    } else if len < target {
        Ok((pad_to_width(&data, target, mode, position)?, None))
    } else {
        let start = fraction_to_index(position, len - target);
        let cropped = data
            .slice_axis(axis, Slice::from(start..start + target))
            .to_owned();
        Ok((cropped, Some(start)))
    }
}

/// Crops or pads a signal to `duration_ms`.
///
/// When the signal is cropped, `crop_start`/`crop_end` are set in samples,
/// offset by any earlier crop.
///
/// # Errors
/// Returns an error if the duration is shorter than one sample.
pub fn crop_signal(
    signal: Signal,
    duration_ms: f64,
    mode: PadMode,
    position: f64,
) -> AugmentResult<Signal> {
    let target = ms_to_samples(duration_ms, signal.sample_rate());
    if target == 0 {
        return Err(ParameterError::out_of_range(
            "duration_ms",
            duration_ms,
            format!(
                "must cover at least one sample at {} Hz",
                signal.sample_rate()
            ),
        )
        .into());
    }
    let base = signal.crop_start.unwrap_or(0);
    let mut signal = signal;
    let data = std::mem::take(signal.data_mut());
    let (data, start) = crop_to_length(data, target, mode, position)?;
    let mut signal = signal.with_data(data)?;
    if let Some(start) = start {
        signal.crop_start = Some(base + start);
        signal.crop_end = Some(base + start + target);
    }
    Ok(signal)
}

/// Number of spectrogram frames covering `duration_ms`.
///
/// `round(sample_rate * duration_ms / (1000 * hop_length)) + 1`
///
/// ```rust
/// use audio_augment::operations::padding::time_crop_width;
/// assert_eq!(time_crop_width(16_000, 160, 300.0), 31);
/// ```
pub fn time_crop_width(sample_rate: u32, hop_length: usize, duration_ms: f64) -> usize {
    let frames = f64::from(sample_rate) * duration_ms / (1000.0 * hop_length as f64);
    frames.max(0.0).round() as usize + 1
}

/// Crops or pads a spectrogram along time to cover `duration_ms`.
///
/// When cropped, `crop_start` is the first frame times the hop length and
/// `crop_end` is `crop_start` plus the duration in samples.
///
/// # Errors
/// Propagates padding errors.
pub fn crop_time(
    spectrogram: Spectrogram,
    duration_ms: f64,
    mode: PadMode,
    position: f64,
) -> AugmentResult<Spectrogram> {
    let hop = spectrogram.hop_length();
    let sample_rate = spectrogram.sample_rate();
    let width = time_crop_width(sample_rate, hop, duration_ms);
    let base = spectrogram.crop_start.unwrap_or(0);

    let mut spectrogram = spectrogram;
    let data = std::mem::take(spectrogram.data_mut());
    let (data, start) = crop_to_length(data, width, mode, position)?;
    let mut spectrogram = spectrogram.with_data(data)?;
    if let Some(start) = start {
        let crop_start = base + start * hop;
        spectrogram.crop_start = Some(crop_start);
        spectrogram.crop_end = Some(crop_start + ms_to_samples(duration_ms, sample_rate));
    }
    Ok(spectrogram)
}
