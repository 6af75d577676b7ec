//! Channel layout changes.

use ndarray::Axis;
use tracing::debug;

use crate::{AugmentResult, Signal};

/// Averages all channels into one.
///
/// The input is left untouched; the result keeps its sample rate and crop
/// provenance. A mono input comes back as an identical copy.
///
/// # Errors
/// Propagates [`Signal::with_data`] errors; the averaged buffer always has
/// one row, so none are expected in practice.
///
/// ```rust
/// use audio_augment::{Signal, operations::channels::downmix};
/// use ndarray::array;
///
/// let stereo = Signal::new(array![[1.0f32, 0.0], [0.0, 1.0]], 16_000).unwrap();
/// let mono = downmix(&stereo).unwrap();
/// assert_eq!(mono.data(), &array![[0.5f32, 0.5]]);
/// assert_eq!(stereo.num_channels(), 2);
/// ```
pub fn downmix(signal: &Signal) -> AugmentResult<Signal> {
    if signal.num_channels() == 1 {
        return Ok(signal.clone());
    }
    let data = signal.data();
    let channels = data.nrows() as f32;
    let mono = data.sum_axis(Axis(0)).mapv(|x| x / channels).insert_axis(Axis(0));
    debug!(channels = data.nrows(), "downmixed to mono");
    let mut out = Signal::new(mono, signal.sample_rate())?;
    out.crop_start = signal.crop_start;
    out.crop_end = signal.crop_end;
    Ok(out)
}
