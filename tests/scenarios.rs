//! End-to-end scenarios through the transform lifecycle.

use audio_augment::config::{AugmentConfig, build_chain};
use audio_augment::operations::{PadMode, RemoveType};
use audio_augment::transforms::{CropSignal, CropTime, RemoveSilence};
use audio_augment::{AudioItem, Seed, Signal, Spectrogram};
use ndarray::{Array2, Array3, s};

#[test]
fn trim_removes_edge_silence_and_keeps_the_interior() {
    let rate = 16_000;
    let data = Array2::from_shape_fn((1, 32_000), |(_, t)| {
        if (1_600..30_400).contains(&t) {
            (0.5 * (2.0 * std::f64::consts::PI * 440.0 * t as f64 / f64::from(rate)).sin()) as f32
        } else {
            0.0
        }
    });
    let signal = Signal::new(data.clone(), rate).unwrap();

    let mut trim = RemoveSilence::new(RemoveType::Trim, 20.0, 20.0).unwrap();
    trim.sample(&mut Seed::new(0).to_rng());
    let out = trim.apply_signal(signal).unwrap();

    // 20 ms at 16 kHz is a 320 sample window; one window of margin is kept
    assert_eq!(out.num_samples(), 31_040 - 1_280);
    assert_eq!(out.data(), &data.slice(s![.., 1_280..31_040]));
}

#[test]
fn crop_time_to_300ms_gives_31_frames() {
    let data = Array3::from_shape_fn((1, 128, 50), |(_, b, t)| (b * 50 + t) as f32);
    let sg = Spectrogram::new(data.clone(), 16_000, 160).unwrap();

    let mut crop = CropTime::new(300.0, PadMode::Zeros).unwrap();
    crop.sample(&mut Seed::new(11).to_rng());
    let out = crop.apply_spectrogram(sg).unwrap();

    assert_eq!(out.data().dim(), (1, 128, 31));
    let start_sample = out.crop_start.unwrap();
    assert_eq!(start_sample % 160, 0);
    let start_frame = start_sample / 160;
    assert!(start_frame <= 19);
    assert_eq!(out.crop_end, Some(start_sample + 4_800));
    assert_eq!(out.data(), &data.slice(s![.., .., start_frame..start_frame + 31]));
}

#[test]
fn one_draw_crops_a_signal_and_its_label_alike() {
    let audio = Signal::new(Array2::from_shape_fn((1, 4_000), |(_, t)| t as f32), 8_000).unwrap();
    let label = Signal::new(Array2::from_shape_fn((1, 4_000), |(_, t)| -(t as f32)), 8_000).unwrap();

    let mut crop = CropSignal::new(100.0, PadMode::Zeros).unwrap();
    crop.sample(&mut Seed::new(4).to_rng());
    let out = crop
        .apply_all(vec![AudioItem::from(audio), AudioItem::from(label)])
        .unwrap();

    let a = out[0].as_signal().unwrap();
    let b = out[1].as_signal().unwrap();
    assert_eq!(a.crop_start, b.crop_start);
    assert_eq!(a.data().mapv(|x| -x), *b.data());
}

#[test]
fn json_pipeline_runs_end_to_end() {
    let json = r#"[
        {"type": "DownmixMono"},
        {"type": "Resample", "sample_rate": 8000},
        {"type": "CropSignal", "duration_ms": 500.0, "pad_mode": "repeat"},
        {"type": "SignalShifter", "p": 1.0, "roll": true},
        {"type": "ChangeVolume", "p": 1.0, "lower": 0.9, "upper": 1.1},
        {"type": "AddNoise", "noise_level": 0.01, "color": "brown"}
    ]"#;
    let configs: Vec<AugmentConfig> = serde_json::from_str(json).unwrap();
    let mut chain = build_chain(&configs).unwrap();
    assert_eq!(chain.len(), 6);

    let stereo = Signal::new(Array2::from_elem((2, 3_000), 0.25), 16_000).unwrap();
    let mut rng = Seed::new(2024).to_rng();
    let out = chain.augment(AudioItem::from(stereo), &mut rng).unwrap();
    let out = out.into_signal().unwrap();
    assert_eq!(out.num_channels(), 1);
    assert_eq!(out.sample_rate(), 8_000);
    assert_eq!(out.num_samples(), 4_000);
}
