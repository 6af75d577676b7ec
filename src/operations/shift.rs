//! Time shifts along the last axis.

use ndarray::{ArrayBase, Axis, DataMut, Dimension};

use crate::Spectrogram;

/// Shifts every lane of the last axis by `offset` positions.
///
/// Positive offsets move data toward higher indices. With `wrap` the data
/// rotates around (no loss); without it, values pushed past the end are
/// dropped and the vacated positions are zeroed.
///
/// ```rust
/// use audio_augment::operations::shift::shift;
/// use ndarray::array;
///
/// let mut a = array![[1.0f32, 2.0, 3.0, 4.0]];
/// shift(&mut a, 1, false);
/// assert_eq!(a, array![[0.0f32, 1.0, 2.0, 3.0]]);
///
/// let mut b = array![[1.0f32, 2.0, 3.0, 4.0]];
/// shift(&mut b, -1, true);
/// assert_eq!(b, array![[2.0f32, 3.0, 4.0, 1.0]]);
/// ```
pub fn shift<S, D>(data: &mut ArrayBase<S, D>, offset: isize, wrap: bool)
where
    S: DataMut<Elem = f32>,
    D: Dimension,
{
    if offset == 0 || data.ndim() == 0 {
        return;
    }
    let axis = Axis(data.ndim() - 1);
    let len = data.len_of(axis);
    if len == 0 {
        return;
    }
    let mut scratch = vec![0.0f32; len];
    for mut lane in data.lanes_mut(axis) {
        if wrap {
            let k = offset.rem_euclid(len as isize) as usize;
            for (i, x) in lane.iter().enumerate() {
                scratch[(i + k) % len] = *x;
            }
        } else {
            scratch.fill(0.0);
            let magnitude = offset.unsigned_abs();
            if magnitude < len {
                let kept = len - magnitude;
                for i in 0..kept {
                    if offset > 0 {
                        scratch[i + magnitude] = lane[i];
                    } else {
                        scratch[i] = lane[i + magnitude];
                    }
                }
            }
        }
        for (dst, src) in lane.iter_mut().zip(&scratch) {
            *dst = *src;
        }
    }
}

/// Circular rotation along the last axis; `shift(.., offset, true)`.
pub fn roll<S, D>(data: &mut ArrayBase<S, D>, offset: isize)
where
    S: DataMut<Elem = f32>,
    D: Dimension,
{
    shift(data, offset, true);
}

/// Integer offset for a shift factor in `[-1, 1]`.
///
/// Scales by `max_pct * length`, or by `max_time * rate` when a time budget
/// in seconds is given, then truncates toward zero.
pub fn shift_offset(factor: f64, max_pct: f64, max_time: Option<f64>, length: usize, rate: f64) -> isize {
    let amount = match max_time {
        Some(seconds) => factor * seconds * rate,
        None => factor * max_pct * length as f64,
    };
    amount.trunc() as isize
}

/// Rolls a spectrogram along time by `round(frames * amount * max_shift_fraction) * sign`.
///
/// `amount` is a draw from `[0, 1)` and `sign` is -1 or 1.
pub fn roll_spectrogram(
    mut spectrogram: Spectrogram,
    max_shift_fraction: f64,
    sign: i32,
    amount: f64,
) -> Spectrogram {
    let frames = spectrogram.num_frames() as f64;
    let roll_by = (frames * amount * max_shift_fraction).round() as isize * sign as isize;
    roll(spectrogram.data_mut(), roll_by);
    spectrogram
}
