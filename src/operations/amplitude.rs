//! Gain, cutout and random dropout.

use ndarray::{Axis, Slice};
use rand::Rng;
use tracing::trace;

use crate::utils::fraction_to_index;
use crate::{AugmentResult, ParameterError, Signal};

/// Rejects fractions outside `[0, 1]`.
pub(crate) fn check_fraction(parameter: &'static str, value: f64) -> AugmentResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ParameterError::out_of_range(parameter, value, "expected a fraction in [0, 1]").into());
    }
    Ok(())
}

/// Multiplies every sample by `gain`.
pub fn apply_gain(mut signal: Signal, gain: f32) -> Signal {
    signal.data_mut().mapv_inplace(|x| x * gain);
    signal
}

/// Zeroes one contiguous block of `round(num_samples * cut_fraction)` samples.
///
/// The block starts at `floor(position * (num_samples - block + 1))`, so a
/// uniform `position` places it uniformly among all positions where it fits.
///
/// # Errors
/// Returns an error if `cut_fraction` is outside `[0, 1]`.
///
/// ```rust
/// use audio_augment::{Signal, operations::amplitude::cutout};
/// use ndarray::Array2;
///
/// let signal = Signal::new(Array2::ones((1, 10)), 1_000).unwrap();
/// let out = cutout(signal, 0.3, 0.0).unwrap();
/// assert_eq!(out.data().row(0).to_vec(), vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
/// ```
pub fn cutout(mut signal: Signal, cut_fraction: f64, position: f64) -> AugmentResult<Signal> {
    check_fraction("cut_fraction", cut_fraction)?;
    let n = signal.num_samples();
    let block = ((n as f64 * cut_fraction).round() as usize).min(n);
    let start = fraction_to_index(position, n - block);
    trace!(start, block, "cutout");
    signal
        .data_mut()
        .slice_axis_mut(Axis(1), Slice::from(start..start + block))
        .fill(0.0);
    Ok(signal)
}

/// Drops each time index with probability `loss_fraction`.
///
/// One keep/drop decision is made per time index and applied to every
/// channel, so all channels lose the same instants.
///
/// # Errors
/// Returns an error if `loss_fraction` is outside `[0, 1]`.
pub fn lose_signal<R>(mut signal: Signal, loss_fraction: f64, rng: &mut R) -> AugmentResult<Signal>
where
    R: Rng + ?Sized,
{
    check_fraction("loss_fraction", loss_fraction)?;
    if loss_fraction == 0.0 {
        return Ok(signal);
    }
    let keep_probability = 1.0 - loss_fraction;
    let mask: Vec<bool> = (0..signal.num_samples())
        .map(|_| rng.random_bool(keep_probability))
        .collect();
    for mut row in signal.data_mut().axis_iter_mut(Axis(0)) {
        for (x, keep) in row.iter_mut().zip(&mask) {
            if !keep {
                *x = 0.0;
            }
        }
    }
    Ok(signal)
}
