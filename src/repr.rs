//! Audio containers handed to the transforms.
//!
//! Two container kinds exist:
//!
//! - [`Signal`] - time-domain audio stored as an `Array2<f32>` of shape
//!   `(channels, samples)`.
//! - [`Spectrogram`] - a time-frequency representation stored as an
//!   `Array3<f32>` of shape `(channels, frequency_bins, time_frames)`.
//!
//! [`AudioItem`] tags one of the two so a transform can pick the handler for
//! the concrete variant.
//!
//! ```rust
//! use audio_augment::{AudioItem, Signal};
//! use ndarray::array;
//!
//! let signal = Signal::new(array![[0.1f32, 0.5, -0.3], [0.8, -0.2, 0.4]], 16_000).unwrap();
//! assert_eq!(signal.num_channels(), 2);
//! assert_eq!(signal.num_samples(), 3);
//!
//! let item = AudioItem::from(signal);
//! assert!(item.as_signal().is_some());
//! ```

use ndarray::{Array1, Array2, Array3, Axis};

use crate::{AugmentError, AugmentResult, ParameterError};

/// Time-domain audio with its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    data: Array2<f32>,
    sample_rate: u32,
    /// First sample of this clip inside the recording it was cut from.
    pub crop_start: Option<usize>,
    /// One past the last sample of this clip inside the original recording.
    pub crop_end: Option<usize>,
}

impl Signal {
    /// Wraps a `(channels, samples)` buffer.
    ///
    /// # Errors
    /// Returns an error if the buffer has no channels or `sample_rate` is zero.
    pub fn new(data: Array2<f32>, sample_rate: u32) -> AugmentResult<Self> {
        validate_rate(sample_rate)?;
        if data.nrows() == 0 {
            return Err(ParameterError::invalid_value(
                "data",
                "a signal needs at least one channel",
            )
            .into());
        }
        Ok(Self {
            data,
            sample_rate,
            crop_start: None,
            crop_end: None,
        })
    }

    /// Wraps a single channel.
    ///
    /// # Errors
    /// Returns an error if `sample_rate` is zero.
    pub fn new_mono(data: Array1<f32>, sample_rate: u32) -> AugmentResult<Self> {
        Self::new(data.insert_axis(Axis(0)), sample_rate)
    }

    /// Builds a signal from per-channel sample vectors of equal length.
    ///
    /// # Errors
    /// Returns an error if the channels differ in length or the list is empty.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> AugmentResult<Self> {
        let rows = channels.len();
        let cols = channels.first().map_or(0, Vec::len);
        if channels.iter().any(|c| c.len() != cols) {
            return Err(ParameterError::invalid_value(
                "channels",
                "every channel must have the same number of samples",
            )
            .into());
        }
        let flat: Vec<f32> = channels.into_iter().flatten().collect();
        Self::new(Array2::from_shape_vec((rows, cols), flat)?, sample_rate)
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples per channel.
    pub fn num_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Sample rate in Hz.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples() as f64 / f64::from(self.sample_rate)
    }

    /// Borrow the underlying buffer.
    pub const fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Mutably borrow the underlying buffer.
    pub fn data_mut(&mut self) -> &mut Array2<f32> {
        &mut self.data
    }

    /// Consume the signal and return its buffer.
    pub fn into_data(self) -> Array2<f32> {
        self.data
    }

    /// Replace the buffer, keeping sample rate and crop provenance.
    ///
    /// # Errors
    /// Returns an error if the new buffer has no channels.
    pub fn with_data(mut self, data: Array2<f32>) -> AugmentResult<Self> {
        if data.nrows() == 0 {
            return Err(ParameterError::invalid_value(
                "data",
                "a signal needs at least one channel",
            )
            .into());
        }
        self.data = data;
        Ok(self)
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }
}

/// Time-frequency representation linked back to sample positions by `hop_length`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    data: Array3<f32>,
    sample_rate: u32,
    hop_length: usize,
    /// First original sample covered by this (cropped) spectrogram.
    pub crop_start: Option<usize>,
    /// One past the last original sample covered.
    pub crop_end: Option<usize>,
}

impl Spectrogram {
    /// Wraps a `(channels, bins, frames)` buffer.
    ///
    /// # Errors
    /// Returns an error if the buffer has no channels, or `sample_rate` or
    /// `hop_length` is zero.
    pub fn new(data: Array3<f32>, sample_rate: u32, hop_length: usize) -> AugmentResult<Self> {
        validate_rate(sample_rate)?;
        if hop_length == 0 {
            return Err(ParameterError::invalid_value("hop_length", "must be > 0").into());
        }
        if data.len_of(Axis(0)) == 0 {
            return Err(ParameterError::invalid_value(
                "data",
                "a spectrogram needs at least one channel",
            )
            .into());
        }
        Ok(Self {
            data,
            sample_rate,
            hop_length,
            crop_start: None,
            crop_end: None,
        })
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Number of frequency bins.
    pub fn num_bins(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// Number of time frames.
    pub fn num_frames(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// Sample rate of the signal this spectrogram was computed from.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples advanced per frame.
    pub const fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> f64 {
        f64::from(self.sample_rate) / self.hop_length as f64
    }

    /// Borrow the underlying buffer.
    pub const fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Mutably borrow the underlying buffer.
    pub fn data_mut(&mut self) -> &mut Array3<f32> {
        &mut self.data
    }

    /// Consume the spectrogram and return its buffer.
    pub fn into_data(self) -> Array3<f32> {
        self.data
    }

    /// Replace the buffer, keeping rate, hop length and crop provenance.
    ///
    /// # Errors
    /// Returns an error if the new buffer has no channels.
    pub fn with_data(mut self, data: Array3<f32>) -> AugmentResult<Self> {
        if data.len_of(Axis(0)) == 0 {
            return Err(ParameterError::invalid_value(
                "data",
                "a spectrogram needs at least one channel",
            )
            .into());
        }
        self.data = data;
        Ok(self)
    }
}

/// Either container, tagged for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioItem {
    /// Time-domain audio.
    Signal(Signal),
    /// Time-frequency audio.
    Spectrogram(Spectrogram),
}

impl AudioItem {
    /// Short name of the variant, used in log output.
    pub const fn kind(&self) -> &'static str {
        match self {
            AudioItem::Signal(_) => "signal",
            AudioItem::Spectrogram(_) => "spectrogram",
        }
    }

    /// Borrow as a signal, if it is one.
    pub const fn as_signal(&self) -> Option<&Signal> {
        match self {
            AudioItem::Signal(s) => Some(s),
            AudioItem::Spectrogram(_) => None,
        }
    }

    /// Borrow as a spectrogram, if it is one.
    pub const fn as_spectrogram(&self) -> Option<&Spectrogram> {
        match self {
            AudioItem::Spectrogram(s) => Some(s),
            AudioItem::Signal(_) => None,
        }
    }

    /// Unwrap a signal.
    ///
    /// # Errors
    /// Returns an error if the item is a spectrogram.
    pub fn into_signal(self) -> AugmentResult<Signal> {
        match self {
            AudioItem::Signal(s) => Ok(s),
            AudioItem::Spectrogram(_) => Err(AugmentError::from(ParameterError::invalid_value(
                "item",
                "expected a signal, found a spectrogram",
            ))),
        }
    }

    /// Unwrap a spectrogram.
    ///
    /// # Errors
    /// Returns an error if the item is a signal.
    pub fn into_spectrogram(self) -> AugmentResult<Spectrogram> {
        match self {
            AudioItem::Spectrogram(s) => Ok(s),
            AudioItem::Signal(_) => Err(AugmentError::from(ParameterError::invalid_value(
                "item",
                "expected a spectrogram, found a signal",
            ))),
        }
    }
}

impl From<Signal> for AudioItem {
    fn from(signal: Signal) -> Self {
        AudioItem::Signal(signal)
    }
}

impl From<Spectrogram> for AudioItem {
    fn from(spectrogram: Spectrogram) -> Self {
        AudioItem::Spectrogram(spectrogram)
    }
}

fn validate_rate(sample_rate: u32) -> AugmentResult<()> {
    if sample_rate == 0 {
        return Err(ParameterError::invalid_value("sample_rate", "must be > 0").into());
    }
    Ok(())
}
