//! Utility functions shared across the augmentation operations.
//!
//! # Modules
//!
//! - [`audio_math`] - dB conversion, window functions and integer helpers

pub mod audio_math;

pub use audio_math::{fraction_to_index, gcd, ms_to_samples, power_to_db};
