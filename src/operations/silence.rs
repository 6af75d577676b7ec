//! Silence detection and removal.
//!
//! Detection frames the signal with a window and hop equal to the padding
//! length, measures per-frame power and keeps frames within `threshold_db`
//! of the loudest frame. Runs of kept frames become sample intervals, which
//! are then merged when the silent gap between them is shorter than two
//! padding widths.

use ndarray::{ArrayView2, Axis, Slice, concatenate};
use tracing::{debug, warn};

use super::types::RemoveType;
use crate::utils::{ms_to_samples, power_to_db};
use crate::{AugmentResult, ParameterError, Signal};

/// Half-open sample range `[start, end)`.
pub type Interval = (usize, usize);

/// Finds non-silent sample intervals.
///
/// Frames are centred (the signal is zero padded by `frame_length / 2` on both
/// sides), giving `1 + (n + 2 * (frame_length / 2) - frame_length) / hop_length`
/// frames. A frame is non-silent when, in any channel, its mean-square power
/// is within `top_db` of the loudest frame of the whole signal.
pub fn non_silent_intervals(
    data: ArrayView2<'_, f32>,
    top_db: f64,
    frame_length: usize,
    hop_length: usize,
) -> Vec<Interval> {
    let n = data.ncols();
    let pad = frame_length / 2;
    let padded_len = n + 2 * pad;
    if frame_length == 0 || hop_length == 0 || padded_len < frame_length {
        return Vec::new();
    }
    let n_frames = 1 + (padded_len - frame_length) / hop_length;

    let mut power = vec![vec![0.0f64; n_frames]; data.nrows()];
    for (channel, row) in data.axis_iter(Axis(0)).enumerate() {
        let mut prefix = Vec::with_capacity(n + 1);
        prefix.push(0.0f64);
        let mut acc = 0.0f64;
        for &x in row {
            acc += f64::from(x) * f64::from(x);
            prefix.push(acc);
        }
        for (i, p) in power[channel].iter_mut().enumerate() {
            // frame i spans [i*hop - pad, i*hop - pad + frame) in signal coordinates
            let lo = (i * hop_length).saturating_sub(pad).min(n);
            let hi = (i * hop_length + frame_length).saturating_sub(pad).min(n);
            *p = (prefix[hi] - prefix[lo]) / frame_length as f64;
        }
    }

    let reference = power
        .iter()
        .flatten()
        .copied()
        .fold(0.0f64, f64::max);
    let non_silent: Vec<bool> = (0..n_frames)
        .map(|i| {
            power
                .iter()
                .any(|ch| power_to_db(ch[i], reference) > -top_db)
        })
        .collect();

    let mut intervals = Vec::new();
    let mut run_start = None;
    for (i, &loud) in non_silent.iter().enumerate() {
        match (loud, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                intervals.push(((start * hop_length).min(n), (i * hop_length).min(n)));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        intervals.push(((start * hop_length).min(n), (n_frames * hop_length).min(n)));
    }
    intervals.retain(|(a, b)| b > a);
    intervals
}

/// Merges intervals separated by less than two padding widths and pads each group.
///
/// Walking left to right, the next interval joins the current group while the
/// previous interval ends before the last interval's end and
/// `prev.end + padding >= next.start - padding`. Each group is widened by
/// `padding` on both sides and clipped to `[0, total]`.
pub fn merge_intervals(intervals: &[Interval], padding: usize, total: usize) -> Vec<Interval> {
    let Some(&(_, clip_end)) = intervals.last() else {
        return Vec::new();
    };
    let mut merged = Vec::new();
    let mut i = 0;
    while i < intervals.len() {
        let start = intervals[i].0;
        while i + 1 < intervals.len()
            && intervals[i].1 < clip_end
            && intervals[i].1 + padding >= intervals[i + 1].0.saturating_sub(padding)
        {
            i += 1;
        }
        let end = intervals[i].1;
        merged.push((start.saturating_sub(padding), (end + padding).min(total)));
        i += 1;
    }
    merged
}

struct Detection {
    padding: usize,
    intervals: Vec<Interval>,
}

fn detect(signal: &Signal, threshold_db: f64, pad_ms: f64) -> AugmentResult<Option<Detection>> {
    if !threshold_db.is_finite() || threshold_db < 0.0 {
        return Err(ParameterError::out_of_range(
            "threshold",
            threshold_db,
            "expected a finite number of dB >= 0",
        )
        .into());
    }
    let padding = ms_to_samples(pad_ms, signal.sample_rate());
    if padding == 0 {
        return Err(ParameterError::out_of_range(
            "pad_ms",
            pad_ms,
            format!(
                "must cover at least one sample at {} Hz",
                signal.sample_rate()
            ),
        )
        .into());
    }
    if padding > signal.num_samples() {
        debug!(
            padding,
            samples = signal.num_samples(),
            "silence frame longer than signal, leaving it unchanged"
        );
        return Ok(None);
    }
    let intervals = non_silent_intervals(signal.data().view(), threshold_db, padding, padding);
    if intervals.is_empty() {
        warn!("no non-silent frames found, leaving signal unchanged");
        return Ok(None);
    }
    Ok(Some(Detection { padding, intervals }))
}

fn slice_time(signal: &Signal, (start, end): Interval) -> ArrayView2<'_, f32> {
    signal.data().slice_axis(Axis(1), Slice::from(start..end))
}

/// Removes silence according to `mode`.
///
/// * `None` returns the signal untouched.
/// * `Trim` keeps everything from the first padded non-silent sample to the last.
/// * `Split` and `All` keep every merged, padded group and join them in order.
///
/// A padding longer than the signal, or a signal with no non-silent frame, is
/// returned unchanged.
///
/// # Errors
/// Returns an error for a negative threshold or a padding below one sample.
pub fn remove_silence(
    signal: Signal,
    mode: RemoveType,
    threshold_db: f64,
    pad_ms: f64,
) -> AugmentResult<Signal> {
    if mode == RemoveType::None {
        return Ok(signal);
    }
    let Some(Detection { padding, intervals }) = detect(&signal, threshold_db, pad_ms)? else {
        return Ok(signal);
    };
    let total = signal.num_samples();

    let data = match mode {
        RemoveType::Trim => {
            let start = intervals[0].0.saturating_sub(padding);
            let end = (intervals[intervals.len() - 1].1 + padding).min(total);
            slice_time(&signal, (start, end)).to_owned()
        }
        RemoveType::Split | RemoveType::All => {
            let groups = merge_intervals(&intervals, padding, total);
            let views: Vec<_> = groups.iter().map(|&g| slice_time(&signal, g)).collect();
            concatenate(Axis(1), &views)?
        }
        RemoveType::None => unreachable!("handled above"),
    };
    debug!(
        mode = %mode,
        before = total,
        after = data.ncols(),
        "removed silence"
    );
    signal.with_data(data)
}

/// Cuts the signal at every silent gap and returns the pieces.
///
/// Each piece carries `crop_start`/`crop_end` locating it in the input
/// (offset by any earlier crop). Degenerate inputs come back as a single
/// unchanged piece.
///
/// # Errors
/// Returns an error for a negative threshold or a padding below one sample.
pub fn split_on_silence(signal: Signal, threshold_db: f64, pad_ms: f64) -> AugmentResult<Vec<Signal>> {
    let Some(Detection { padding, intervals }) = detect(&signal, threshold_db, pad_ms)? else {
        return Ok(vec![signal]);
    };
    let base = signal.crop_start.unwrap_or(0);
    merge_intervals(&intervals, padding, signal.num_samples())
        .into_iter()
        .map(|(start, end)| {
            let mut piece = signal
                .clone()
                .with_data(slice_time(&signal, (start, end)).to_owned())?;
            piece.crop_start = Some(base + start);
            piece.crop_end = Some(base + end);
            Ok(piece)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn bursts(total: usize, loud: &[Interval]) -> Signal {
        let data = Array2::from_shape_fn((1, total), |(_, t)| {
            if loud.iter().any(|&(a, b)| t >= a && t < b) {
                if t % 2 == 0 { 0.5 } else { -0.5 }
            } else {
                0.0
            }
        });
        Signal::new(data, 1_000).unwrap()
    }

    #[test]
    fn merge_joins_gaps_under_two_paddings() {
        let merged = merge_intervals(&[(10, 20), (25, 30), (60, 70)], 3, 100);
        assert_eq!(merged, vec![(7, 33), (57, 73)]);
    }

    #[test]
    fn merge_clips_to_signal_bounds() {
        let merged = merge_intervals(&[(1, 5), (95, 100)], 10, 100);
        assert_eq!(merged, vec![(0, 15), (85, 100)]);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge_intervals(&[], 4, 10).is_empty());
    }

    #[test]
    fn detection_finds_each_burst() {
        let signal = bursts(1_000, &[(200, 400), (700, 800)]);
        let intervals = non_silent_intervals(signal.data().view(), 20.0, 20, 20);
        assert_eq!(intervals.len(), 2);
        let (a, b) = intervals[0];
        assert!(a <= 200 && a + 20 >= 200, "start {a}");
        assert!(b >= 400 && b <= 420, "end {b}");
    }

    #[test]
    fn trim_keeps_interior_gap() {
        let signal = bursts(1_000, &[(200, 400), (700, 800)]);
        let out = remove_silence(signal, RemoveType::Trim, 20.0, 20.0).unwrap();
        // a single slice from ~180 to ~820 keeps the 400..700 gap
        assert!(out.num_samples() >= 600 && out.num_samples() <= 680);
    }

    #[test]
    fn all_drops_interior_gap() {
        let signal = bursts(1_000, &[(200, 400), (700, 800)]);
        let trimmed = remove_silence(signal.clone(), RemoveType::Trim, 20.0, 20.0).unwrap();
        let all = remove_silence(signal, RemoveType::All, 20.0, 20.0).unwrap();
        assert!(all.num_samples() < trimmed.num_samples() - 200);
    }

    #[test]
    fn split_exposes_boundaries() {
        let signal = bursts(1_000, &[(200, 400), (700, 800)]);
        let pieces = split_on_silence(signal, 20.0, 20.0).unwrap();
        assert_eq!(pieces.len(), 2);
        let first = &pieces[0];
        assert_eq!(
            first.crop_end.unwrap() - first.crop_start.unwrap(),
            first.num_samples()
        );
        assert!(pieces[1].crop_start.unwrap() > first.crop_end.unwrap());
    }

    #[test]
    fn padding_longer_than_signal_is_a_no_op() {
        let signal = bursts(10, &[(2, 5)]);
        let out = remove_silence(signal.clone(), RemoveType::All, 20.0, 50.0).unwrap();
        assert_eq!(out, signal);
    }

    #[test]
    fn none_mode_is_identity() {
        let signal = bursts(100, &[(20, 50)]);
        let out = remove_silence(signal.clone(), RemoveType::None, 20.0, 5.0).unwrap();
        assert_eq!(out, signal);
    }

    #[test]
    fn sub_sample_padding_is_rejected() {
        let signal = bursts(100, &[(20, 50)]);
        assert!(remove_silence(signal, RemoveType::Trim, 20.0, 0.1).is_err());
    }

    #[test]
    fn split_mode_joins_the_padded_groups() {
        let signal = bursts(1_000, &[(200, 400), (700, 800)]);
        let split = remove_silence(signal.clone(), RemoveType::Split, 20.0, 20.0).unwrap();
        let all = remove_silence(signal.clone(), RemoveType::All, 20.0, 20.0).unwrap();
        assert_eq!(split, all);

        let pieces = split_on_silence(signal, 20.0, 20.0).unwrap();
        let joined: Vec<f32> = pieces.iter().flat_map(|p| p.data().row(0).to_vec()).collect();
        assert_eq!(split.data().row(0).to_vec(), joined);
    }
}
