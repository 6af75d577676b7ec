//! Augmentations for spectrograms.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::preprocess::{CropParams, check_duration};
use super::{RandomTransform, Stochastic};
use crate::operations::{
    PadMode, ShiftDirection, crop_time, delta_features, mask_frequency_band, mask_time_band,
    roll_spectrogram,
};
use crate::{AugmentResult, ParameterError, Spectrogram};

/// Settings for [`CropTime`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropTimeConfig {
    /// Covered duration in milliseconds.
    pub duration_ms: f64,
    /// How short spectrograms are padded.
    pub pad_mode: PadMode,
    /// Firing probability.
    pub p: f64,
}

impl Default for CropTimeConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1_000.0,
            pad_mode: PadMode::Zeros,
            p: 1.0,
        }
    }
}

impl CropTimeConfig {
    /// Checks the duration.
    ///
    /// # Errors
    /// Returns an error for a non-positive duration.
    pub fn validate(&self) -> AugmentResult<()> {
        check_duration(self.duration_ms)
    }
}

impl RandomTransform for CropTimeConfig {
    type Params = CropParams;
    const NAME: &'static str = "CropTime";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        CropTimeConfig::validate(self)
    }

    fn draw(&self, rng: &mut dyn RngCore) -> CropParams {
        CropParams::draw(rng)
    }

    fn apply_spectrogram(&self, spectrogram: Spectrogram, params: &CropParams) -> AugmentResult<Spectrogram> {
        crop_time(spectrogram, self.duration_ms, self.pad_mode, params.position)
    }
}

/// Crops or pads a spectrogram along time to a fixed duration.
pub type CropTime = Stochastic<CropTimeConfig>;

impl CropTime {
    /// Builds an always-on time crop.
    ///
    /// # Errors
    /// Returns an error for a non-positive duration.
    pub fn new(duration_ms: f64, pad_mode: PadMode) -> AugmentResult<Self> {
        Self::from_config(CropTimeConfig {
            duration_ms,
            pad_mode,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`CropTimeConfig::validate`].
    pub fn from_config(config: CropTimeConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Start positions drawn for masking transforms, one per mask.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskParams {
    /// Uniform draws in `[0, 1)`, mapped onto the valid start range at apply time.
    pub fractions: Vec<f64>,
}

fn draw_mask_fractions(num_masks: usize, rng: &mut dyn RngCore) -> MaskParams {
    MaskParams {
        fractions: (0..num_masks).map(|_| rng.random()).collect(),
    }
}

/// Settings for [`MaskFreq`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskFreqConfig {
    /// Number of bands masked per call.
    pub num_masks: usize,
    /// Bins per band.
    pub size: usize,
    /// Fixed first bin; drawn at random when unset.
    pub start: Option<usize>,
    /// Fill value; the per-channel mean when unset.
    pub val: Option<f32>,
    /// Firing probability.
    pub p: f64,
}

impl Default for MaskFreqConfig {
    fn default() -> Self {
        Self {
            num_masks: 1,
            size: 20,
            start: None,
            val: None,
            p: 1.0,
        }
    }
}

impl RandomTransform for MaskFreqConfig {
    type Params = MaskParams;
    const NAME: &'static str = "MaskFreq";

    fn probability(&self) -> f64 {
        self.p
    }

    fn draw(&self, rng: &mut dyn RngCore) -> MaskParams {
        draw_mask_fractions(self.num_masks, rng)
    }

    fn apply_spectrogram(&self, spectrogram: Spectrogram, params: &MaskParams) -> AugmentResult<Spectrogram> {
        mask_frequency_band(
            spectrogram,
            self.num_masks,
            self.size,
            self.start,
            self.val,
            &params.fractions,
        )
    }
}

/// Masks random frequency bands.
pub type MaskFreq = Stochastic<MaskFreqConfig>;

impl MaskFreq {
    /// Builds an always-on mask of `num_masks` bands of `size` bins.
    ///
    /// # Errors
    /// Never fails with the default probability.
    pub fn new(num_masks: usize, size: usize) -> AugmentResult<Self> {
        Self::from_config(MaskFreqConfig {
            num_masks,
            size,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// Returns an error if the probability is outside `[0, 1]`.
    pub fn from_config(config: MaskFreqConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Settings for [`MaskTime`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskTimeConfig {
    /// Number of bands masked per call.
    pub num_masks: usize,
    /// Frames per band.
    pub size: usize,
    /// Fixed first frame; drawn at random when unset.
    pub start: Option<usize>,
    /// Fill value; the per-channel mean when unset.
    pub val: Option<f32>,
    /// Firing probability.
    pub p: f64,
}

impl Default for MaskTimeConfig {
    fn default() -> Self {
        Self {
            num_masks: 1,
            size: 20,
            start: None,
            val: None,
            p: 1.0,
        }
    }
}

impl RandomTransform for MaskTimeConfig {
    type Params = MaskParams;
    const NAME: &'static str = "MaskTime";

    fn probability(&self) -> f64 {
        self.p
    }

    fn draw(&self, rng: &mut dyn RngCore) -> MaskParams {
        draw_mask_fractions(self.num_masks, rng)
    }

    fn apply_spectrogram(&self, spectrogram: Spectrogram, params: &MaskParams) -> AugmentResult<Spectrogram> {
        mask_time_band(
            spectrogram,
            self.num_masks,
            self.size,
            self.start,
            self.val,
            &params.fractions,
        )
    }
}

/// Masks random time bands.
pub type MaskTime = Stochastic<MaskTimeConfig>;

impl MaskTime {
    /// Builds an always-on mask of `num_masks` bands of `size` frames.
    ///
    /// # Errors
    /// Never fails with the default probability.
    pub fn new(num_masks: usize, size: usize) -> AugmentResult<Self> {
        Self::from_config(MaskTimeConfig {
            num_masks,
            size,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// Returns an error if the probability is outside `[0, 1]`.
    pub fn from_config(config: MaskTimeConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Settings for [`SgRoll`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgRollConfig {
    /// Largest roll as a fraction of the frame count.
    pub max_shift_pct: f64,
    /// Allowed direction.
    pub direction: ShiftDirection,
    /// Firing probability.
    pub p: f64,
}

impl Default for SgRollConfig {
    fn default() -> Self {
        Self {
            max_shift_pct: 0.5,
            direction: ShiftDirection::Bidirectional,
            p: 1.0,
        }
    }
}

impl SgRollConfig {
    /// Checks the roll limit.
    ///
    /// # Errors
    /// Returns an error for a negative or non-finite limit.
    pub fn validate(&self) -> AugmentResult<()> {
        if !self.max_shift_pct.is_finite() || self.max_shift_pct < 0.0 {
            return Err(ParameterError::out_of_range(
                "max_shift_pct",
                self.max_shift_pct,
                "expected a value >= 0",
            )
            .into());
        }
        Ok(())
    }
}

/// Roll drawn by [`SgRoll`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollParams {
    /// -1 or 1.
    pub sign: i32,
    /// Uniform draw in `[0, 1)`.
    pub amount: f64,
}

impl RandomTransform for SgRollConfig {
    type Params = RollParams;
    const NAME: &'static str = "SgRoll";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        SgRollConfig::validate(self)
    }

    fn draw(&self, rng: &mut dyn RngCore) -> RollParams {
        let sign = match self.direction {
            ShiftDirection::Bidirectional => {
                if rng.random_bool(0.5) {
                    1
                } else {
                    -1
                }
            }
            direction => direction.sign(),
        };
        RollParams {
            sign,
            amount: rng.random(),
        }
    }

    fn apply_spectrogram(&self, spectrogram: Spectrogram, params: &RollParams) -> AugmentResult<Spectrogram> {
        Ok(roll_spectrogram(
            spectrogram,
            self.max_shift_pct,
            params.sign,
            params.amount,
        ))
    }
}

/// Rolls a spectrogram along time with wrap-around.
pub type SgRoll = Stochastic<SgRollConfig>;

impl SgRoll {
    /// Builds an always-on roller.
    ///
    /// # Errors
    /// Returns an error for a negative limit.
    pub fn new(max_shift_pct: f64, direction: ShiftDirection) -> AugmentResult<Self> {
        Self::from_config(SgRollConfig {
            max_shift_pct,
            direction,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`SgRollConfig::validate`].
    pub fn from_config(config: SgRollConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Settings for [`Delta`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaConfig {
    /// Savitzky–Golay window in frames; odd and at least 3.
    pub width: usize,
    /// Firing probability.
    pub p: f64,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self { width: 9, p: 1.0 }
    }
}

impl DeltaConfig {
    /// Checks the window width.
    ///
    /// # Errors
    /// Returns an error for an even width or one below 3.
    pub fn validate(&self) -> AugmentResult<()> {
        if self.width < 3 || self.width % 2 == 0 {
            return Err(ParameterError::out_of_range("width", self.width, "expected an odd integer >= 3").into());
        }
        Ok(())
    }
}

impl RandomTransform for DeltaConfig {
    type Params = ();
    const NAME: &'static str = "Delta";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        DeltaConfig::validate(self)
    }

    fn draw(&self, _rng: &mut dyn RngCore) {}

    fn apply_spectrogram(&self, spectrogram: Spectrogram, _params: &()) -> AugmentResult<Spectrogram> {
        delta_features(spectrogram, self.width)
    }
}

/// Stacks first and second time derivatives onto each channel.
pub type Delta = Stochastic<DeltaConfig>;

impl Delta {
    /// Builds an always-on delta stacker.
    ///
    /// # Errors
    /// Returns an error for an even width or one below 3.
    pub fn new(width: usize) -> AugmentResult<Self> {
        Self::from_config(DeltaConfig {
            width,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`DeltaConfig::validate`].
    pub fn from_config(config: DeltaConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}
