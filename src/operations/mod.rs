//! Deterministic signal-processing primitives behind the transforms.
//!
//! Every function here takes its random choices as plain arguments (unit
//! fractions, offsets, or an explicit RNG), so it can be called directly
//! without the sample-then-apply lifecycle of [`crate::transforms`].
//!
//! ## Module Organization
//!
//! - [`types`] - Closed option sets (`PadMode`, `RemoveType`, ...)
//! - [`padding`] - Padding and cropping along time
//! - [`silence`] - Silence detection, merging and removal
//! - [`shift`] - Zero-filling and circular shifts
//! - [`noise`] - White and power-law noise
//! - [`amplitude`] - Gain, cutout and dropout
//! - [`channels`] - Downmixing
//! - [`masking`] - Frequency and time masks
//! - [`delta`] - Savitzky–Golay delta features
//!
//! ## Quick Start
//!
//! ```rust
//! use audio_augment::{Signal, operations::*};
//! use ndarray::Array2;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let signal = Signal::new(Array2::ones((2, 16_000)), 16_000)?;
//! let signal = crop_signal(signal, 500.0, PadMode::Zeros, 0.5)?;
//! let signal = apply_gain(signal, 0.8);
//! let mono = downmix(&signal)?;
//! assert_eq!(mono.num_samples(), 8_000);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod amplitude;
pub mod channels;
pub mod delta;
pub mod masking;
pub mod noise;
pub mod padding;
pub mod shift;
pub mod silence;
pub mod types;

pub use amplitude::{apply_gain, cutout, lose_signal};
pub use channels::downmix;
pub use delta::{delta, delta_features, savgol_coefficients};
pub use masking::{mask_frequency_band, mask_time_band};
pub use noise::{add_noise, powerlaw_noise, white_noise};
pub use padding::{crop_signal, crop_time, crop_to_length, pad_to_width, time_crop_width};
pub use shift::{roll, roll_spectrogram, shift, shift_offset};
pub use silence::{Interval, merge_intervals, non_silent_intervals, remove_silence, split_on_silence};
pub use types::{NoiseColor, PadMode, RemoveType, ResampleMethod, ShiftDirection};
