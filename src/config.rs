//! Declarative augmentation lists.
//!
//! [`AugmentConfig`] is a serde-friendly description of one transform,
//! tagged by a `"type"` field. A list of them can be read from JSON, TOML or
//! any other serde format and turned into a runnable [`Compose`] chain.
//!
//! ```rust
//! use audio_augment::config::{AugmentConfig, build_chain};
//! use audio_augment::transforms::{ChangeVolumeConfig, CropSignalConfig};
//!
//! let configs = vec![
//!     AugmentConfig::CropSignal(CropSignalConfig { duration_ms: 500.0, ..Default::default() }),
//!     AugmentConfig::ChangeVolume(ChangeVolumeConfig::default()),
//! ];
//! let chain = build_chain(&configs).unwrap();
//! assert_eq!(chain.names(), vec!["CropSignal", "ChangeVolume"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::AugmentResult;
use crate::transforms::{
    AddNoise, AddNoiseConfig, Augmentation, ChangeVolume, ChangeVolumeConfig, Compose, CropSignal,
    CropSignalConfig, CropTime, CropTimeConfig, Delta, DeltaConfig, DownmixMono, DownmixMonoConfig,
    MaskFreq, MaskFreqConfig, MaskTime, MaskTimeConfig, RemoveSilence, RemoveSilenceConfig,
    Resample, ResampleConfig, SgRoll, SgRollConfig, SignalCutout, SignalCutoutConfig, SignalLoss,
    SignalLossConfig, SignalShifter, SignalShifterConfig,
};

/// One transform and its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AugmentConfig {
    /// See [`RemoveSilence`].
    RemoveSilence(RemoveSilenceConfig),
    /// See [`Resample`].
    Resample(ResampleConfig),
    /// See [`CropSignal`].
    CropSignal(CropSignalConfig),
    /// See [`SignalShifter`].
    SignalShifter(SignalShifterConfig),
    /// See [`AddNoise`].
    AddNoise(AddNoiseConfig),
    /// See [`ChangeVolume`].
    ChangeVolume(ChangeVolumeConfig),
    /// See [`SignalCutout`].
    SignalCutout(SignalCutoutConfig),
    /// See [`SignalLoss`].
    SignalLoss(SignalLossConfig),
    /// See [`DownmixMono`].
    DownmixMono(DownmixMonoConfig),
    /// See [`CropTime`].
    CropTime(CropTimeConfig),
    /// See [`MaskFreq`].
    MaskFreq(MaskFreqConfig),
    /// See [`MaskTime`].
    MaskTime(MaskTimeConfig),
    /// See [`SgRoll`].
    SgRoll(SgRollConfig),
    /// See [`Delta`].
    Delta(DeltaConfig),
}

impl AugmentConfig {
    /// Validates the settings and builds the transform.
    ///
    /// # Errors
    /// Returns the transform's validation error.
    pub fn build(&self) -> AugmentResult<Box<dyn Augmentation>> {
        let built: Box<dyn Augmentation> = match self.clone() {
            AugmentConfig::RemoveSilence(c) => Box::new(RemoveSilence::from_config(c)?),
            AugmentConfig::Resample(c) => Box::new(Resample::from_config(c)?),
            AugmentConfig::CropSignal(c) => Box::new(CropSignal::from_config(c)?),
            AugmentConfig::SignalShifter(c) => Box::new(SignalShifter::from_config(c)?),
            AugmentConfig::AddNoise(c) => Box::new(AddNoise::from_config(c)?),
            AugmentConfig::ChangeVolume(c) => Box::new(ChangeVolume::from_config(c)?),
            AugmentConfig::SignalCutout(c) => Box::new(SignalCutout::from_config(c)?),
            AugmentConfig::SignalLoss(c) => Box::new(SignalLoss::from_config(c)?),
            AugmentConfig::DownmixMono(c) => Box::new(DownmixMono::from_config(c)?),
            AugmentConfig::CropTime(c) => Box::new(CropTime::from_config(c)?),
            AugmentConfig::MaskFreq(c) => Box::new(MaskFreq::from_config(c)?),
            AugmentConfig::MaskTime(c) => Box::new(MaskTime::from_config(c)?),
            AugmentConfig::SgRoll(c) => Box::new(SgRoll::from_config(c)?),
            AugmentConfig::Delta(c) => Box::new(Delta::from_config(c)?),
        };
        Ok(built)
    }
}

/// Builds every entry, in order, into one chain.
///
/// # Errors
/// Returns the first validation error.
pub fn build_chain(configs: &[AugmentConfig]) -> AugmentResult<Compose> {
    configs
        .iter()
        .map(AugmentConfig::build)
        .collect::<AugmentResult<Vec<_>>>()
        .map(Compose::new)
}
