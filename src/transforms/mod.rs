//! Stochastic transforms and their sample-then-apply lifecycle.
//!
//! Every transform is split in two halves:
//!
//! - a configuration value implementing [`RandomTransform`], which knows how
//!   to draw its random parameters and how to apply them to each container
//!   variant, and
//! - [`Stochastic`], which owns that configuration plus the parameters drawn
//!   for the current invocation.
//!
//! A call is always `sample(rng)` followed by `apply(item)`. `sample` decides
//! (with the configured probability) whether the transform fires and, if so,
//! draws every random value it needs. `apply` is then deterministic, so the
//! same draw can be applied to several related containers with
//! [`Stochastic::apply_all`].
//!
//! ```rust
//! use audio_augment::{AudioItem, Signal, transforms::ChangeVolume};
//! use ndarray::Array2;
//! use rand::SeedableRng;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let mut volume = ChangeVolume::new(1.0, 0.5, 1.5)?;
//!
//! let item = AudioItem::from(Signal::new(Array2::ones((1, 4)), 16_000)?);
//! volume.sample(&mut rng);
//! let out = volume.apply(item)?;
//! let gain = out.as_signal().unwrap().data()[[0, 0]];
//! assert!((0.5..=1.5).contains(&gain));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::fmt;

use rand::{Rng, RngCore};
use tracing::{debug, trace};

use crate::{AudioItem, AugmentError, AugmentResult, ParameterError, Signal, Spectrogram};

pub mod preprocess;
pub mod signal;
pub mod spectrogram;

pub use preprocess::{
    CropSignal, CropSignalConfig, DownmixMono, DownmixMonoConfig, RemoveSilence,
    RemoveSilenceConfig, Resample, ResampleConfig,
};
pub use signal::{
    AddNoise, AddNoiseConfig, ChangeVolume, ChangeVolumeConfig, SignalCutout, SignalCutoutConfig,
    SignalLoss, SignalLossConfig, SignalShifter, SignalShifterConfig,
};
pub use spectrogram::{
    CropTime, CropTimeConfig, Delta, DeltaConfig, MaskFreq, MaskFreqConfig, MaskTime,
    MaskTimeConfig, SgRoll, SgRollConfig,
};

/// The configuration half of a stochastic transform.
///
/// Implementors hold only immutable settings. Everything random is produced
/// by [`draw`](RandomTransform::draw) and handed back to the `apply_*`
/// methods, which must be deterministic given those parameters. A variant
/// the transform does not handle is passed through unchanged by the default
/// implementations.
pub trait RandomTransform: Clone + fmt::Debug + Send + Sync {
    /// Values drawn once per invocation.
    type Params: Clone + fmt::Debug + Send + Sync;

    /// Name used in logs and errors.
    const NAME: &'static str;

    /// Probability in `[0, 1]` that the transform fires on a given call.
    fn probability(&self) -> f64;

    /// Checks the settings; called once when the transform is constructed.
    fn validate(&self) -> AugmentResult<()> {
        Ok(())
    }

    /// Draws the parameters for one invocation.
    fn draw(&self, rng: &mut dyn RngCore) -> Self::Params;

    /// Applies drawn parameters to a signal.
    fn apply_signal(&self, signal: Signal, _params: &Self::Params) -> AugmentResult<Signal> {
        Ok(signal)
    }

    /// Applies drawn parameters to a spectrogram.
    fn apply_spectrogram(
        &self,
        spectrogram: Spectrogram,
        _params: &Self::Params,
    ) -> AugmentResult<Spectrogram> {
        Ok(spectrogram)
    }
}

/// Outcome of the most recent [`Stochastic::sample`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleState<P> {
    /// Nothing drawn yet, or the last draw was consumed by `apply`.
    Unsampled,
    /// The transform decided not to fire; `apply` is a no-op.
    Skipped,
    /// Parameters for the next `apply`.
    Drawn(P),
}

/// A transform plus the parameters drawn for its current invocation.
#[derive(Debug, Clone)]
pub struct Stochastic<T: RandomTransform> {
    transform: T,
    state: SampleState<T::Params>,
}

/// Rejects probabilities outside `[0, 1]`.
pub(crate) fn check_probability(p: f64) -> AugmentResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ParameterError::out_of_range("p", p, "probability must be in [0, 1]").into());
    }
    Ok(())
}

impl<T: RandomTransform> Stochastic<T> {
    /// Wraps a configuration after validating it.
    ///
    /// # Errors
    /// Returns an error if the probability is outside `[0, 1]` or the
    /// configuration's own checks fail.
    pub fn wrap(transform: T) -> AugmentResult<Self> {
        check_probability(transform.probability())?;
        transform.validate()?;
        Ok(Self {
            transform,
            state: SampleState::Unsampled,
        })
    }

    /// The configuration.
    pub const fn transform(&self) -> &T {
        &self.transform
    }

    /// The pending draw, if any.
    pub const fn state(&self) -> &SampleState<T::Params> {
        &self.state
    }

    /// Decides whether to fire and draws parameters if so.
    ///
    /// One uniform value is always consumed for the firing decision, so the
    /// random stream advances the same way whatever the outcome of earlier
    /// calls.
    pub fn sample(&mut self, rng: &mut dyn RngCore) -> &SampleState<T::Params> {
        let fires = rng.random::<f64>() < self.transform.probability();
        self.state = if fires {
            let params = self.transform.draw(rng);
            debug!(transform = T::NAME, "sampled");
            trace!(transform = T::NAME, ?params, "drawn parameters");
            SampleState::Drawn(params)
        } else {
            debug!(transform = T::NAME, "skipped");
            SampleState::Skipped
        };
        &self.state
    }

    /// Replaces the pending draw with fixed parameters.
    pub fn with_params(mut self, params: T::Params) -> Self {
        self.state = SampleState::Drawn(params);
        self
    }

    fn take_state(&mut self) -> AugmentResult<SampleState<T::Params>> {
        match std::mem::replace(&mut self.state, SampleState::Unsampled) {
            SampleState::Unsampled => Err(AugmentError::NotSampled { transform: T::NAME }),
            state => Ok(state),
        }
    }

    fn dispatch(&self, state: &SampleState<T::Params>, item: AudioItem) -> AugmentResult<AudioItem> {
        let SampleState::Drawn(params) = state else {
            return Ok(item);
        };
        trace!(transform = T::NAME, kind = item.kind(), "applying");
        Ok(match item {
            AudioItem::Signal(s) => AudioItem::Signal(self.transform.apply_signal(s, params)?),
            AudioItem::Spectrogram(s) => {
                AudioItem::Spectrogram(self.transform.apply_spectrogram(s, params)?)
            }
        })
    }

    /// Applies the pending draw to `item` and clears it.
    ///
    /// # Errors
    /// Returns [`AugmentError::NotSampled`] if [`sample`](Self::sample) has not
    /// been called since the last apply, or any error from the transform.
    pub fn apply(&mut self, item: AudioItem) -> AugmentResult<AudioItem> {
        let state = self.take_state()?;
        self.dispatch(&state, item)
    }

    /// Applies one draw to several related containers, then clears it.
    ///
    /// # Errors
    /// Same as [`apply`](Self::apply); stops at the first failing item.
    pub fn apply_all(&mut self, items: Vec<AudioItem>) -> AugmentResult<Vec<AudioItem>> {
        let state = self.take_state()?;
        items
            .into_iter()
            .map(|item| self.dispatch(&state, item))
            .collect()
    }

    /// Typed [`apply`](Self::apply) for signals.
    ///
    /// # Errors
    /// Same as [`apply`](Self::apply).
    pub fn apply_signal(&mut self, signal: Signal) -> AugmentResult<Signal> {
        self.apply(signal.into())?.into_signal()
    }

    /// Typed [`apply`](Self::apply) for spectrograms.
    ///
    /// # Errors
    /// Same as [`apply`](Self::apply).
    pub fn apply_spectrogram(&mut self, spectrogram: Spectrogram) -> AugmentResult<Spectrogram> {
        self.apply(spectrogram.into())?.into_spectrogram()
    }

    /// `sample` then `apply` in one call.
    ///
    /// # Errors
    /// Any error from the transform.
    pub fn augment(&mut self, item: AudioItem, rng: &mut dyn RngCore) -> AugmentResult<AudioItem> {
        self.sample(rng);
        self.apply(item)
    }
}

/// Object-safe view of any [`Stochastic`] transform.
pub trait Augmentation: Send + Sync + fmt::Debug {
    /// Transform name.
    fn name(&self) -> &'static str;

    /// See [`Stochastic::sample`].
    fn sample(&mut self, rng: &mut dyn RngCore);

    /// See [`Stochastic::apply`].
    ///
    /// # Errors
    /// See [`Stochastic::apply`].
    fn apply(&mut self, item: AudioItem) -> AugmentResult<AudioItem>;

    /// Clones into a fresh box, keeping any pending draw.
    fn box_clone(&self) -> Box<dyn Augmentation>;
}

impl<T: RandomTransform + 'static> Augmentation for Stochastic<T> {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn sample(&mut self, rng: &mut dyn RngCore) {
        Stochastic::sample(self, rng);
    }

    fn apply(&mut self, item: AudioItem) -> AugmentResult<AudioItem> {
        Stochastic::apply(self, item)
    }

    fn box_clone(&self) -> Box<dyn Augmentation> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Augmentation> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Runs a list of augmentations in order, each sampled right before it is applied.
#[derive(Debug, Clone, Default)]
pub struct Compose {
    augmentations: Vec<Box<dyn Augmentation>>,
}

impl Compose {
    /// Wraps an ordered list.
    pub fn new(augmentations: Vec<Box<dyn Augmentation>>) -> Self {
        Self { augmentations }
    }

    /// Appends one augmentation.
    pub fn push(&mut self, augmentation: Box<dyn Augmentation>) {
        self.augmentations.push(augmentation);
    }

    /// Number of augmentations.
    pub fn len(&self) -> usize {
        self.augmentations.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.augmentations.is_empty()
    }

    /// Names, in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.augmentations.iter().map(|a| a.name()).collect()
    }

    /// Samples and applies every augmentation in turn.
    ///
    /// # Errors
    /// Stops at, and returns, the first error.
    pub fn augment(&mut self, mut item: AudioItem, rng: &mut dyn RngCore) -> AugmentResult<AudioItem> {
        for augmentation in &mut self.augmentations {
            augmentation.sample(rng);
            item = augmentation.apply(item)?;
        }
        Ok(item)
    }
}
