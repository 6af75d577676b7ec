// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::box_collection)] // Warns on boxed `Vec`, `String`, etc.
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![cfg_attr(not(test), warn(clippy::unwrap_used))] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_safety_doc)] // Docs for `unsafe` functions
#![allow(clippy::too_many_arguments)]
// Allow functions with many parameters (very few and far between)
#![deny(missing_docs)] // Documentation is a must for release

//! # audio_augment
//!
//! Stochastic data augmentation for audio signals and spectrograms.
//!
//! Transforms diversify training data for audio models: they trim silence,
//! resample, crop, shift, add coloured noise, change volume, cut out or drop
//! samples, downmix, and on the spectrogram side crop in time, mask
//! frequency and time bands, roll, and stack delta features.
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! audio_augment = "0.1.0"
//! ```
//!
//! Parallel batch helpers live behind a feature:
//!
//! ```toml
//! [dependencies]
//! audio_augment = { version = "0.1.0", features = ["parallel-processing"] }
//! ```
//!
//! ## Features
//!
//! - `parallel-processing`: [`batch`] helpers that augment many items on the
//!   rayon pool with reproducible per-item seeds.
//!
//! ## Sample, then apply
//!
//! Every transform follows the same lifecycle. `sample(rng)` decides whether
//! the transform fires this time and draws all of its random values;
//! `apply(item)` then uses exactly those values. The same draw can be applied
//! to several related items (a signal and its label mask, say) with
//! `apply_all`, and calling `apply` without a fresh `sample` is an error.
//!
//! ```rust
//! use audio_augment::{AudioItem, Signal, Seed};
//! use audio_augment::operations::{PadMode, RemoveType};
//! use audio_augment::transforms::{CropSignal, RemoveSilence, SignalShifter};
//! use audio_augment::operations::ShiftDirection;
//! use ndarray::Array2;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rng = Seed::new(7).to_rng();
//! let mut trim = RemoveSilence::new(RemoveType::Trim, 20.0, 20.0)?;
//! let mut crop = CropSignal::new(250.0, PadMode::Zeros)?;
//! let mut shift = SignalShifter::new(1.0, 0.2, ShiftDirection::Bidirectional, true)?;
//!
//! let mut item = AudioItem::from(Signal::new(Array2::from_elem((2, 8_000), 0.1), 16_000)?);
//! for step in [&mut trim as &mut dyn audio_augment::Augmentation, &mut crop, &mut shift] {
//!     step.sample(&mut rng);
//!     item = step.apply(item)?;
//! }
//! assert_eq!(item.as_signal().map(Signal::num_samples), Some(4_000));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Error Handling
//!
//! Errors are grouped the way operations fail:
//!
//! ```rust
//! use audio_augment::{AugmentError, AugmentResult, ParameterError};
//!
//! let result: AugmentResult<()> = Err(AugmentError::Parameter(
//!     ParameterError::invalid_value("width", "must be odd"),
//! ));
//!
//! match result {
//!     Ok(()) => {}
//!     Err(AugmentError::Parameter(err)) => eprintln!("Invalid parameter: {err}"),
//!     Err(AugmentError::Processing(err)) => eprintln!("Cannot process: {err}"),
//!     Err(other) => eprintln!("Other error: {other}"),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` when a transform fires or is
//! skipped, `trace` for drawn parameters, `warn` when silence detection finds
//! nothing). Install any subscriber to see them.

#[cfg(feature = "parallel-processing")]
pub mod batch;
pub mod config;
mod error;
pub mod operations;
mod repr;
pub mod resampling;
mod seed;
pub mod transforms;
pub mod utils;

pub use error::{AugmentError, AugmentResult, ParameterError, ProcessingError};
pub use repr::{AudioItem, Signal, Spectrogram};
pub use seed::Seed;
pub use transforms::{Augmentation, Compose, RandomTransform, SampleState, Stochastic};
