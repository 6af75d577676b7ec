//! Preprocessing transforms for time-domain signals.
//!
//! These usually run with `p = 1` at the start of a pipeline to bring every
//! clip to a common rate, length and channel layout.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::{RandomTransform, Stochastic};
use crate::operations::{
    PadMode, RemoveType, ResampleMethod, crop_signal, downmix, remove_silence,
};
use crate::resampling::resample;
use crate::{AugmentResult, ParameterError, Signal};

/// Settings for [`RemoveSilence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveSilenceConfig {
    /// Which silence to remove.
    pub remove_type: RemoveType,
    /// dB below the loudest frame under which a frame counts as silent.
    pub threshold: f64,
    /// Frame length, hop and kept margin, in milliseconds.
    pub pad_ms: f64,
    /// Firing probability.
    pub p: f64,
}

impl Default for RemoveSilenceConfig {
    fn default() -> Self {
        Self {
            remove_type: RemoveType::Trim,
            threshold: 20.0,
            pad_ms: 20.0,
            p: 1.0,
        }
    }
}

impl RemoveSilenceConfig {
    /// Checks threshold and padding.
    ///
    /// # Errors
    /// Returns an error for a negative threshold or a non-positive padding.
    pub fn validate(&self) -> AugmentResult<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ParameterError::out_of_range("threshold", self.threshold, "expected dB >= 0").into());
        }
        if !self.pad_ms.is_finite() || self.pad_ms <= 0.0 {
            return Err(ParameterError::out_of_range("pad_ms", self.pad_ms, "expected a duration > 0").into());
        }
        Ok(())
    }
}

impl RandomTransform for RemoveSilenceConfig {
    type Params = ();
    const NAME: &'static str = "RemoveSilence";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        RemoveSilenceConfig::validate(self)
    }

    fn draw(&self, _rng: &mut dyn RngCore) {}

    fn apply_signal(&self, signal: Signal, _params: &()) -> AugmentResult<Signal> {
        remove_silence(signal, self.remove_type, self.threshold, self.pad_ms)
    }
}

/// Removes leading, trailing or all silence from a signal.
pub type RemoveSilence = Stochastic<RemoveSilenceConfig>;

impl RemoveSilence {
    /// Builds an always-on silence remover.
    ///
    /// # Errors
    /// See [`RemoveSilenceConfig::validate`].
    pub fn new(remove_type: RemoveType, threshold: f64, pad_ms: f64) -> AugmentResult<Self> {
        Self::from_config(RemoveSilenceConfig {
            remove_type,
            threshold,
            pad_ms,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`RemoveSilenceConfig::validate`].
    pub fn from_config(config: RemoveSilenceConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Settings for [`Resample`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Target rate in Hz.
    pub sample_rate: u32,
    /// Interpolation backend.
    pub method: ResampleMethod,
    /// Firing probability.
    pub p: f64,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            method: ResampleMethod::Polyphase,
            p: 1.0,
        }
    }
}

impl ResampleConfig {
    /// Checks the target rate.
    ///
    /// # Errors
    /// Returns an error if the target rate is zero.
    pub fn validate(&self) -> AugmentResult<()> {
        if self.sample_rate == 0 {
            return Err(ParameterError::invalid_value("sample_rate", "target rate must be > 0").into());
        }
        Ok(())
    }
}

impl RandomTransform for ResampleConfig {
    type Params = ();
    const NAME: &'static str = "Resample";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        ResampleConfig::validate(self)
    }

    fn draw(&self, _rng: &mut dyn RngCore) {}

    fn apply_signal(&self, signal: Signal, _params: &()) -> AugmentResult<Signal> {
        resample(signal, self.sample_rate, self.method)
    }
}

/// Converts every signal to one sample rate.
pub type Resample = Stochastic<ResampleConfig>;

impl Resample {
    /// Builds an always-on polyphase resampler to `sample_rate`.
    ///
    /// # Errors
    /// Returns an error if `sample_rate` is zero.
    pub fn new(sample_rate: u32) -> AugmentResult<Self> {
        Self::from_config(ResampleConfig {
            sample_rate,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`ResampleConfig::validate`].
    pub fn from_config(config: ResampleConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Position drawn for crop-or-pad transforms.
///
/// Used as the crop start fraction when the input is too long and as the
/// front share of the padding when it is too short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropParams {
    /// Uniform draw in `[0, 1)`.
    pub position: f64,
}

impl CropParams {
    pub(crate) fn draw(rng: &mut dyn RngCore) -> Self {
        Self {
            position: rng.random(),
        }
    }
}

pub(crate) fn check_duration(duration_ms: f64) -> AugmentResult<()> {
    if !duration_ms.is_finite() || duration_ms <= 0.0 {
        return Err(ParameterError::out_of_range("duration_ms", duration_ms, "expected a duration > 0").into());
    }
    Ok(())
}

/// Settings for [`CropSignal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropSignalConfig {
    /// Output length in milliseconds.
    pub duration_ms: f64,
    /// How short signals are padded.
    pub pad_mode: PadMode,
    /// Firing probability.
    pub p: f64,
}

impl Default for CropSignalConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1_000.0,
            pad_mode: PadMode::Zeros,
            p: 1.0,
        }
    }
}

impl CropSignalConfig {
    /// Checks the duration.
    ///
    /// # Errors
    /// Returns an error for a non-positive duration.
    pub fn validate(&self) -> AugmentResult<()> {
        check_duration(self.duration_ms)
    }
}

impl RandomTransform for CropSignalConfig {
    type Params = CropParams;
    const NAME: &'static str = "CropSignal";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        CropSignalConfig::validate(self)
    }

    fn draw(&self, rng: &mut dyn RngCore) -> CropParams {
        CropParams::draw(rng)
    }

    fn apply_signal(&self, signal: Signal, params: &CropParams) -> AugmentResult<Signal> {
        crop_signal(signal, self.duration_ms, self.pad_mode, params.position)
    }
}

/// Crops or pads a signal to a fixed duration at a random position.
pub type CropSignal = Stochastic<CropSignalConfig>;

impl CropSignal {
    /// Builds an always-on crop to `duration_ms`.
    ///
    /// # Errors
    /// Returns an error for a non-positive duration.
    pub fn new(duration_ms: f64, pad_mode: PadMode) -> AugmentResult<Self> {
        Self::from_config(CropSignalConfig {
            duration_ms,
            pad_mode,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`CropSignalConfig::validate`].
    pub fn from_config(config: CropSignalConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Settings for [`DownmixMono`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownmixMonoConfig {
    /// Firing probability.
    pub p: f64,
}

impl Default for DownmixMonoConfig {
    fn default() -> Self {
        Self { p: 1.0 }
    }
}

impl RandomTransform for DownmixMonoConfig {
    type Params = ();
    const NAME: &'static str = "DownmixMono";

    fn probability(&self) -> f64 {
        self.p
    }

    fn draw(&self, _rng: &mut dyn RngCore) {}

    fn apply_signal(&self, signal: Signal, _params: &()) -> AugmentResult<Signal> {
        downmix(&signal)
    }
}

/// Averages multichannel signals down to one channel.
pub type DownmixMono = Stochastic<DownmixMonoConfig>;

impl DownmixMono {
    /// Builds an always-on downmixer.
    ///
    /// # Errors
    /// Never fails with the default probability.
    pub fn new() -> AugmentResult<Self> {
        Self::from_config(DownmixMonoConfig::default())
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// Returns an error if the probability is outside `[0, 1]`.
    pub fn from_config(config: DownmixMonoConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}
