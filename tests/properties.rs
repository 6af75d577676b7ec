//! Randomised property checks over the core operations.
//!
//! Each test loops over inputs drawn from a seeded `StdRng`, so failures are
//! reproducible.

use audio_augment::operations::{
    PadMode, ResampleMethod, crop_to_length, delta_features, lose_signal, mask_frequency_band,
    pad_to_width, shift,
};
use audio_augment::resampling::resample;
use audio_augment::{AugmentError, Signal, Spectrogram};
use ndarray::{Array2, Array3, Axis, s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CASES: usize = 64;

fn random_buffer(rng: &mut StdRng, channels: usize, len: usize) -> Array2<f32> {
    Array2::from_shape_simple_fn((channels, len), || rng.random_range(-1.0..1.0))
}

fn contains_run(haystack: &[f32], needle: &[f32]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn padding_reaches_width_and_keeps_the_original() {
    let mut rng = StdRng::seed_from_u64(0xA11CE);
    for case in 0..CASES {
        let len = rng.random_range(1..40);
        let width = len + rng.random_range(0..60);
        let data = random_buffer(&mut rng, 2, len);
        let position: f64 = rng.random();
        for mode in [PadMode::Zeros, PadMode::ZerosAfter, PadMode::Repeat] {
            let padded = pad_to_width(&data, width, mode, position).unwrap();
            assert_eq!(padded.dim(), (2, width), "case {case} {mode}");
            for (orig, out) in data.rows().into_iter().zip(padded.rows()) {
                let orig = orig.to_vec();
                let out = out.to_vec();
                match mode {
                    PadMode::Repeat => {
                        for (i, v) in out.iter().enumerate() {
                            assert_eq!(*v, orig[i % len], "case {case} tile index {i}");
                        }
                    }
                    _ => assert!(contains_run(&out, &orig), "case {case} {mode}"),
                }
            }
        }
    }
}

#[test]
fn cropping_yields_a_contiguous_window() {
    let mut rng = StdRng::seed_from_u64(7);
    for case in 0..CASES {
        let len = rng.random_range(1..200);
        let target = rng.random_range(1..=len);
        let data = random_buffer(&mut rng, 1, len);
        let (cropped, start) = crop_to_length(data.clone(), target, PadMode::Zeros, rng.random()).unwrap();
        assert_eq!(cropped.ncols(), target, "case {case}");
        let start = start.unwrap_or(0);
        assert_eq!(cropped, data.slice(s![.., start..start + target]), "case {case}");
    }
}

#[test]
fn wrapping_shift_is_invertible_and_zero_shift_is_identity() {
    let mut rng = StdRng::seed_from_u64(99);
    for case in 0..CASES {
        let len = rng.random_range(1..100);
        let data = random_buffer(&mut rng, 3, len);
        let k = rng.random_range(-250i64..250) as isize;

        let mut rolled = data.clone();
        shift(&mut rolled, k, true);
        shift(&mut rolled, -k, true);
        assert_eq!(rolled, data, "case {case} k={k}");

        for wrap in [true, false] {
            let mut same = data.clone();
            shift(&mut same, 0, wrap);
            assert_eq!(same, data);
        }
    }
}

#[test]
fn resample_round_trip_restores_rate_with_bounded_growth() {
    let mut rng = StdRng::seed_from_u64(1234);
    let pairs = [(16_000u32, 44_100u32), (48_000, 16_000), (22_050, 8_000), (8_000, 12_000)];
    for (r1, r2) in pairs {
        for _ in 0..4 {
            let n = rng.random_range(50..400);
            let signal = Signal::new(random_buffer(&mut rng, 2, n), r1).unwrap();
            let there = resample(signal, r2, ResampleMethod::Polyphase).unwrap();
            let back = resample(there, r1, ResampleMethod::Polyphase).unwrap();
            assert_eq!(back.sample_rate(), r1);
            assert_eq!(back.num_channels(), 2);
            let growth = back.num_samples() - n;
            assert!(growth <= r1.div_ceil(r2) as usize, "{r1}->{r2}: n={n} back={}", back.num_samples());
        }
    }
}

#[test]
fn frequency_mask_start_bounds() {
    let mut rng = StdRng::seed_from_u64(5);
    for case in 0..CASES {
        let bins = rng.random_range(1..64);
        let size = rng.random_range(1..=bins);
        let frames = rng.random_range(1..20);
        let data = Array3::from_shape_simple_fn((1, bins, frames), || rng.random_range(1.0..2.0));
        let sg = Spectrogram::new(data, 16_000, 160).unwrap();

        let bad = rng.random_range(bins - size + 1..bins + 10);
        let err = mask_frequency_band(sg.clone(), 1, size, Some(bad), None, &[]).unwrap_err();
        assert!(matches!(err, AugmentError::Parameter(_)), "case {case}");

        let good = rng.random_range(0..=bins - size);
        let masked = mask_frequency_band(sg, 1, size, Some(good), Some(-3.0), &[]).unwrap();
        let filled: Vec<usize> = masked
            .data()
            .axis_iter(Axis(1))
            .enumerate()
            .filter(|(_, row)| row.iter().all(|x| *x == -3.0))
            .map(|(b, _)| b)
            .collect();
        assert_eq!(filled, (good..good + size).collect::<Vec<_>>(), "case {case}");
    }
}

#[test]
fn delta_needs_width_frames_and_triples_channels() {
    let mut rng = StdRng::seed_from_u64(77);
    for case in 0..CASES {
        let width = 2 * rng.random_range(1..6) + 1;
        let frames = rng.random_range(1..20);
        let channels = rng.random_range(1..4);
        let data = Array3::from_shape_simple_fn((channels, 4, frames), || rng.random_range(-1.0..1.0));
        let sg = Spectrogram::new(data, 16_000, 160).unwrap();
        match delta_features(sg, width) {
            Ok(out) => {
                assert!(frames >= width, "case {case}");
                assert_eq!(out.num_channels(), 3 * channels);
                assert_eq!(out.num_frames(), frames);
            }
            Err(err) => {
                assert!(frames < width, "case {case}: {err}");
                assert!(matches!(err, AugmentError::Processing(_)));
            }
        }
    }
}

#[test]
fn signal_loss_extremes() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..16 {
        let len = rng.random_range(1..500);
        let signal = Signal::new(random_buffer(&mut rng, 2, len), 16_000).unwrap();
        assert_eq!(lose_signal(signal.clone(), 0.0, &mut rng).unwrap(), signal);
        let silent = lose_signal(signal, 1.0, &mut rng).unwrap();
        assert!(silent.data().iter().all(|x| *x == 0.0));
    }
}
