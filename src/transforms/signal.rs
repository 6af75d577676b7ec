//! Augmentations for time-domain signals.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{RandomTransform, Stochastic};
use crate::operations::amplitude::check_fraction;
use crate::operations::{
    NoiseColor, ShiftDirection, add_noise, apply_gain, cutout, lose_signal, shift, shift_offset,
};
use crate::{AugmentResult, ParameterError, Signal, Spectrogram};

/// Settings for [`SignalShifter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalShifterConfig {
    /// Firing probability.
    pub p: f64,
    /// Largest shift as a fraction of the length.
    pub max_pct: f64,
    /// Largest shift in seconds; overrides `max_pct` when set.
    pub max_time: Option<f64>,
    /// Allowed direction.
    pub direction: ShiftDirection,
    /// Wrap shifted-out data around instead of zero filling.
    pub roll: bool,
}

impl Default for SignalShifterConfig {
    fn default() -> Self {
        Self {
            p: 0.5,
            max_pct: 0.2,
            max_time: None,
            direction: ShiftDirection::Bidirectional,
            roll: false,
        }
    }
}

impl SignalShifterConfig {
    /// Checks the shift limits.
    ///
    /// # Errors
    /// Returns an error for a negative or non-finite limit.
    pub fn validate(&self) -> AugmentResult<()> {
        if !self.max_pct.is_finite() || self.max_pct < 0.0 {
            return Err(ParameterError::out_of_range("max_pct", self.max_pct, "expected a value >= 0").into());
        }
        if let Some(t) = self.max_time.filter(|t| !t.is_finite() || *t < 0.0) {
            return Err(ParameterError::out_of_range("max_time", t, "expected seconds >= 0").into());
        }
        Ok(())
    }
}

/// Shift drawn by [`SignalShifter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftParams {
    /// Signed fraction of the configured maximum, in `[-1, 1]`.
    pub factor: f64,
}

impl RandomTransform for SignalShifterConfig {
    type Params = ShiftParams;
    const NAME: &'static str = "SignalShifter";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        SignalShifterConfig::validate(self)
    }

    fn draw(&self, rng: &mut dyn RngCore) -> ShiftParams {
        let u: f64 = rng.random_range(-1.0..=1.0);
        let factor = match self.direction {
            ShiftDirection::Bidirectional => u,
            direction => f64::from(direction.sign()) * u.abs(),
        };
        ShiftParams { factor }
    }

    fn apply_signal(&self, mut signal: Signal, params: &ShiftParams) -> AugmentResult<Signal> {
        let offset = shift_offset(
            params.factor,
            self.max_pct,
            self.max_time,
            signal.num_samples(),
            f64::from(signal.sample_rate()),
        );
        shift(signal.data_mut(), offset, self.roll);
        Ok(signal)
    }

    fn apply_spectrogram(
        &self,
        mut spectrogram: Spectrogram,
        params: &ShiftParams,
    ) -> AugmentResult<Spectrogram> {
        let offset = shift_offset(
            params.factor,
            self.max_pct,
            self.max_time,
            spectrogram.num_frames(),
            spectrogram.frame_rate(),
        );
        shift(spectrogram.data_mut(), offset, self.roll);
        Ok(spectrogram)
    }
}

/// Shifts signals or spectrograms along time by a random amount.
pub type SignalShifter = Stochastic<SignalShifterConfig>;

impl SignalShifter {
    /// Builds a shifter limited to `max_pct` of the length.
    ///
    /// # Errors
    /// Returns an error for an invalid probability or limit.
    pub fn new(p: f64, max_pct: f64, direction: ShiftDirection, roll: bool) -> AugmentResult<Self> {
        Self::from_config(SignalShifterConfig {
            p,
            max_pct,
            direction,
            roll,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`SignalShifterConfig::validate`].
    pub fn from_config(config: SignalShifterConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Settings for [`AddNoise`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddNoiseConfig {
    /// Noise amplitude relative to the mean absolute signal level.
    pub noise_level: f64,
    /// Spectral colour.
    pub color: NoiseColor,
    /// Firing probability.
    pub p: f64,
}

impl Default for AddNoiseConfig {
    fn default() -> Self {
        Self {
            noise_level: 0.05,
            color: NoiseColor::White,
            p: 1.0,
        }
    }
}

impl AddNoiseConfig {
    /// Checks the noise level.
    ///
    /// # Errors
    /// Returns an error for a negative or non-finite level.
    pub fn validate(&self) -> AugmentResult<()> {
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(ParameterError::out_of_range("noise_level", self.noise_level, "expected a value >= 0").into());
        }
        Ok(())
    }
}

/// Seed for the noise generator, so one draw reproduces the same noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseParams {
    /// Seed for a [`StdRng`].
    pub seed: u64,
}

impl RandomTransform for AddNoiseConfig {
    type Params = NoiseParams;
    const NAME: &'static str = "AddNoise";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        AddNoiseConfig::validate(self)
    }

    fn draw(&self, rng: &mut dyn RngCore) -> NoiseParams {
        NoiseParams { seed: rng.next_u64() }
    }

    fn apply_signal(&self, signal: Signal, params: &NoiseParams) -> AugmentResult<Signal> {
        let mut noise_rng = StdRng::seed_from_u64(params.seed);
        add_noise(signal, self.noise_level, self.color, &mut noise_rng)
    }
}

/// Adds white or coloured noise.
pub type AddNoise = Stochastic<AddNoiseConfig>;

impl AddNoise {
    /// Builds an always-on noise adder.
    ///
    /// # Errors
    /// Returns an error for a negative level.
    pub fn new(noise_level: f64, color: NoiseColor) -> AugmentResult<Self> {
        Self::from_config(AddNoiseConfig {
            noise_level,
            color,
            ..Default::default()
        })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`AddNoiseConfig::validate`].
    pub fn from_config(config: AddNoiseConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Settings for [`ChangeVolume`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeVolumeConfig {
    /// Firing probability.
    pub p: f64,
    /// Smallest gain.
    pub lower: f64,
    /// Largest gain.
    pub upper: f64,
}

impl Default for ChangeVolumeConfig {
    fn default() -> Self {
        Self {
            p: 0.5,
            lower: 0.5,
            upper: 1.5,
        }
    }
}

impl ChangeVolumeConfig {
    /// Checks the gain range.
    ///
    /// # Errors
    /// Returns an error if `lower > upper` or either bound is not finite.
    pub fn validate(&self) -> AugmentResult<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower > self.upper {
            return Err(ParameterError::out_of_range(
                "lower",
                self.lower,
                format!("expected a finite value <= upper ({})", self.upper),
            )
            .into());
        }
        Ok(())
    }
}

/// Gain drawn by [`ChangeVolume`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainParams {
    /// Linear gain.
    pub gain: f64,
}

impl RandomTransform for ChangeVolumeConfig {
    type Params = GainParams;
    const NAME: &'static str = "ChangeVolume";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        ChangeVolumeConfig::validate(self)
    }

    fn draw(&self, rng: &mut dyn RngCore) -> GainParams {
        GainParams {
            gain: rng.random_range(self.lower..=self.upper),
        }
    }

    fn apply_signal(&self, signal: Signal, params: &GainParams) -> AugmentResult<Signal> {
        Ok(apply_gain(signal, params.gain as f32))
    }
}

/// Scales a signal by a random gain.
pub type ChangeVolume = Stochastic<ChangeVolumeConfig>;

impl ChangeVolume {
    /// Builds a volume changer drawing gains from `[lower, upper]`.
    ///
    /// # Errors
    /// Returns an error for an invalid probability or `lower > upper`.
    pub fn new(p: f64, lower: f64, upper: f64) -> AugmentResult<Self> {
        Self::from_config(ChangeVolumeConfig { p, lower, upper })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`ChangeVolumeConfig::validate`].
    pub fn from_config(config: ChangeVolumeConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Settings for [`SignalCutout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalCutoutConfig {
    /// Firing probability.
    pub p: f64,
    /// Largest share of the signal zeroed.
    pub max_cut_pct: f64,
}

impl Default for SignalCutoutConfig {
    fn default() -> Self {
        Self {
            p: 0.5,
            max_cut_pct: 0.15,
        }
    }
}

impl SignalCutoutConfig {
    /// Checks the cut fraction.
    ///
    /// # Errors
    /// Returns an error if `max_cut_pct` is outside `[0, 1]`.
    pub fn validate(&self) -> AugmentResult<()> {
        check_fraction("max_cut_pct", self.max_cut_pct)
    }
}

/// Block drawn by [`SignalCutout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoutParams {
    /// Share of the signal to zero.
    pub cut_fraction: f64,
    /// Where the block starts, as a fraction of the free range.
    pub position: f64,
}

impl RandomTransform for SignalCutoutConfig {
    type Params = CutoutParams;
    const NAME: &'static str = "SignalCutout";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        SignalCutoutConfig::validate(self)
    }

    fn draw(&self, rng: &mut dyn RngCore) -> CutoutParams {
        CutoutParams {
            cut_fraction: rng.random_range(0.0..=self.max_cut_pct),
            position: rng.random(),
        }
    }

    fn apply_signal(&self, signal: Signal, params: &CutoutParams) -> AugmentResult<Signal> {
        cutout(signal, params.cut_fraction, params.position)
    }
}

/// Zeroes one random block of a signal.
pub type SignalCutout = Stochastic<SignalCutoutConfig>;

impl SignalCutout {
    /// Builds a cutout of at most `max_cut_pct` of the signal.
    ///
    /// # Errors
    /// Returns an error for an invalid probability or fraction.
    pub fn new(p: f64, max_cut_pct: f64) -> AugmentResult<Self> {
        Self::from_config(SignalCutoutConfig { p, max_cut_pct })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`SignalCutoutConfig::validate`].
    pub fn from_config(config: SignalCutoutConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

/// Settings for [`SignalLoss`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalLossConfig {
    /// Firing probability.
    pub p: f64,
    /// Largest share of time indices dropped.
    pub max_loss_pct: f64,
}

impl Default for SignalLossConfig {
    fn default() -> Self {
        Self {
            p: 0.5,
            max_loss_pct: 0.15,
        }
    }
}

impl SignalLossConfig {
    /// Checks the loss fraction.
    ///
    /// # Errors
    /// Returns an error if `max_loss_pct` is outside `[0, 1]`.
    pub fn validate(&self) -> AugmentResult<()> {
        check_fraction("max_loss_pct", self.max_loss_pct)
    }
}

/// Dropout drawn by [`SignalLoss`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossParams {
    /// Probability of dropping each time index.
    pub loss_fraction: f64,
    /// Seed for the keep mask.
    pub seed: u64,
}

impl RandomTransform for SignalLossConfig {
    type Params = LossParams;
    const NAME: &'static str = "SignalLoss";

    fn probability(&self) -> f64 {
        self.p
    }

    fn validate(&self) -> AugmentResult<()> {
        SignalLossConfig::validate(self)
    }

    fn draw(&self, rng: &mut dyn RngCore) -> LossParams {
        LossParams {
            loss_fraction: rng.random_range(0.0..=self.max_loss_pct),
            seed: rng.next_u64(),
        }
    }

    fn apply_signal(&self, signal: Signal, params: &LossParams) -> AugmentResult<Signal> {
        let mut mask_rng = StdRng::seed_from_u64(params.seed);
        lose_signal(signal, params.loss_fraction, &mut mask_rng)
    }
}

/// Randomly zeroes individual time indices across all channels.
pub type SignalLoss = Stochastic<SignalLossConfig>;

impl SignalLoss {
    /// Builds a dropout of at most `max_loss_pct` of the samples.
    ///
    /// # Errors
    /// Returns an error for an invalid probability or fraction.
    pub fn new(p: f64, max_loss_pct: f64) -> AugmentResult<Self> {
        Self::from_config(SignalLossConfig { p, max_loss_pct })
    }

    /// Builds from a configuration value.
    ///
    /// # Errors
    /// See [`SignalLossConfig::validate`].
    pub fn from_config(config: SignalLossConfig) -> AugmentResult<Self> {
        Stochastic::wrap(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AudioItem;
    use crate::transforms::SampleState;
    use ndarray::{Array2, Array3};

    fn ramp(n: usize) -> Signal {
        Signal::new(Array2::from_shape_fn((2, n), |(_, t)| t as f32 + 1.0), 1_000).unwrap()
    }

    #[test]
    fn right_only_shifter_never_moves_left() {
        let cfg = SignalShifterConfig {
            direction: ShiftDirection::Right,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            assert!(cfg.draw(&mut rng).factor >= 0.0);
        }
    }

    #[test]
    fn shifter_zero_fills_by_max_pct() {
        let mut shifter = SignalShifter::new(1.0, 0.2, ShiftDirection::Bidirectional, false)
            .unwrap()
            .with_params(ShiftParams { factor: 1.0 });
        let out = shifter.apply_signal(ramp(100)).unwrap();
        assert!(out.data().slice(ndarray::s![.., ..20]).iter().all(|x| *x == 0.0));
        assert_eq!(out.data()[[0, 20]], 1.0);
    }

    #[test]
    fn shifter_uses_max_time_and_frame_rate_for_spectrograms() {
        let cfg = SignalShifterConfig {
            p: 1.0,
            max_time: Some(0.05),
            roll: true,
            ..Default::default()
        };
        let sg = Spectrogram::new(
            Array3::from_shape_fn((1, 1, 20), |(_, _, t)| t as f32),
            16_000,
            160,
        )
        .unwrap();
        // 0.05 s at 100 frames/s is 5 frames
        let mut shifter = SignalShifter::from_config(cfg)
            .unwrap()
            .with_params(ShiftParams { factor: -1.0 });
        let out = shifter.apply_spectrogram(sg).unwrap();
        assert_eq!(out.data()[[0, 0, 0]], 5.0);
        assert_eq!(out.data()[[0, 0, 19]], 4.0);
    }

    #[test]
    fn noise_replays_from_seed() {
        let mut noise = AddNoise::new(0.1, NoiseColor::Pink).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        noise.sample(&mut rng);
        let params = match noise.state() {
            SampleState::Drawn(p) => *p,
            other => panic!("expected a draw, got {other:?}"),
        };
        let a = noise.apply_signal(ramp(256)).unwrap();
        let b = AddNoise::new(0.1, NoiseColor::Pink)
            .unwrap()
            .with_params(params)
            .apply_signal(ramp(256))
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, ramp(256));
    }

    #[test]
    fn volume_gain_stays_in_range() {
        let mut volume = ChangeVolume::new(1.0, 0.8, 1.2).unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..50 {
            volume.sample(&mut rng);
            let out = volume.apply_signal(ramp(4)).unwrap();
            let g = out.data()[[0, 0]];
            assert!((0.8..=1.2).contains(&g), "gain {g}");
        }
    }

    #[test]
    fn volume_rejects_inverted_range() {
        assert!(ChangeVolume::new(0.5, 1.5, 0.5).is_err());
    }

    #[test]
    fn cutout_zeroes_at_most_max_share() {
        let mut cut = SignalCutout::new(1.0, 0.15).unwrap();
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..30 {
            cut.sample(&mut rng);
            let out = cut.apply_signal(ramp(200)).unwrap();
            let zeros = out.data().row(0).iter().filter(|x| **x == 0.0).count();
            assert!(zeros <= 30, "zeros {zeros}");
        }
    }

    #[test]
    fn loss_transform_keeps_shape() {
        let mut loss = SignalLoss::new(1.0, 0.5).unwrap();
        loss.sample(&mut StdRng::seed_from_u64(2));
        let out = loss.apply(AudioItem::from(ramp(500))).unwrap();
        assert_eq!(out.as_signal().unwrap().data().dim(), (2, 500));
    }

    #[test]
    fn loss_rejects_fraction_above_one() {
        assert!(SignalLoss::new(0.5, 1.2).is_err());
    }

    #[test]
    fn named_and_config_constructors_agree() {
        let named = ChangeVolume::new(0.5, 0.8, 1.2).unwrap();
        let cfg = ChangeVolumeConfig { p: 0.5, lower: 0.8, upper: 1.2 };
        let from_config = ChangeVolume::from_config(cfg.clone()).unwrap();
        let wrapped = Stochastic::wrap(cfg.clone()).unwrap();
        assert_eq!(named.transform(), &cfg);
        assert_eq!(from_config.transform(), &cfg);
        assert_eq!(wrapped.transform(), &cfg);
        assert_eq!(named.state(), &SampleState::Unsampled);
    }

    #[test]
    fn cut_and_loss_fractions_share_one_range_check() {
        let expect_range = |err: crate::AugmentError, name: &str| match err {
            crate::AugmentError::Parameter(ParameterError::OutOfRange { parameter, valid_range, .. }) => {
                assert_eq!(parameter, name);
                assert_eq!(valid_range, "expected a fraction in [0, 1]");
            }
            other => panic!("unexpected error {other}"),
        };
        expect_range(SignalCutout::new(0.5, 1.5).unwrap_err(), "max_cut_pct");
        expect_range(SignalLoss::new(0.5, -0.1).unwrap_err(), "max_loss_pct");
        expect_range(cutout(ramp(10), 1.5, 0.0).unwrap_err(), "cut_fraction");
    }
}
