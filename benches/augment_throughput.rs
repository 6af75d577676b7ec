//! Throughput benchmark for the heavier augmentation paths
//!
//! Times polyphase and FFT resampling, coloured-noise synthesis and
//! spectrogram masking on clips of increasing length.

use audio_augment::operations::{NoiseColor, ResampleMethod, add_noise, mask_frequency_band, mask_time_band};
use audio_augment::resampling::resample;
use audio_augment::{Seed, Signal, Spectrogram};
use ndarray::{Array2, Array3};
use std::time::Instant;

/// Generate a stereo sine wave
fn generate_test_audio(duration_seconds: f64, sample_rate: u32) -> Signal {
    let num_samples = (duration_seconds * f64::from(sample_rate)) as usize;
    let frequency = 440.0; // A4
    let data = Array2::from_shape_fn((2, num_samples), |(_, i)| {
        let t = i as f64 / f64::from(sample_rate);
        ((2.0 * std::f64::consts::PI * frequency * t).sin() * 0.5) as f32
    });
    Signal::new(data, sample_rate).expect("valid benchmark signal")
}

fn generate_test_spectrogram(frames: usize) -> Spectrogram {
    let data = Array3::from_shape_fn((1, 128, frames), |(_, b, t)| ((b + t) % 17) as f32);
    Spectrogram::new(data, 16_000, 160).expect("valid benchmark spectrogram")
}

/// Runs `f` a few times to warm up, then reports timing statistics in ms
fn time_runs<F: FnMut()>(label: &str, mut f: F) {
    for _ in 0..2 {
        f();
    }
    let num_runs = 10;
    let mut times = Vec::with_capacity(num_runs);
    for _ in 0..num_runs {
        let start = Instant::now();
        f();
        times.push(start.elapsed().as_secs_f64() * 1000.0);
    }
    times.sort_by(f64::total_cmp);
    let mean = times.iter().sum::<f64>() / times.len() as f64;
    let std = (times.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / times.len() as f64).sqrt();
    println!(
        "  {label:<28} {mean:>8.2}ms ± {std:.2}ms (median: {:.2}ms, range: {:.2}-{:.2}ms)",
        times[times.len() / 2],
        times[0],
        times[times.len() - 1]
    );
}

fn main() {
    println!("audio_augment throughput");
    println!("========================");

    for duration in [1.0, 5.0, 30.0] {
        println!("{duration:.1}s stereo clip at 44.1 kHz");
        let audio = generate_test_audio(duration, 44_100);

        time_runs("resample polyphase -> 16k", || {
            resample(audio.clone(), 16_000, ResampleMethod::Polyphase).expect("resample");
        });
        time_runs("resample fft -> 16k", || {
            resample(audio.clone(), 16_000, ResampleMethod::Fft).expect("resample");
        });

        let mut rng = Seed::new(0).to_rng();
        for color in [NoiseColor::White, NoiseColor::Pink, NoiseColor::Brown] {
            time_runs(&format!("add_noise {color}"), || {
                add_noise(audio.clone(), 0.05, color, &mut rng).expect("noise");
            });
        }
        println!();
    }

    for frames in [100, 1_000, 10_000] {
        println!("spectrogram 1 x 128 x {frames}");
        let sg = generate_test_spectrogram(frames);
        time_runs("mask_frequency_band x2", || {
            mask_frequency_band(sg.clone(), 2, 20, None, None, &[0.1, 0.7]).expect("mask");
        });
        time_runs("mask_time_band x2", || {
            mask_time_band(sg.clone(), 2, 20, None, None, &[0.1, 0.7]).expect("mask");
        });
        println!();
    }
}
