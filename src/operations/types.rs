//! Supporting enums for the augmentation operations.
//!
//! Every enum here is a closed set. Parsing from a string is case-insensitive
//! and an unknown value fails with a [`ParameterError::InvalidOption`] naming
//! every accepted spelling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParameterError;

/// How a buffer shorter than the target width is padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadMode {
    /// Zeros, split randomly between the front and the back.
    #[default]
    Zeros,
    /// Zeros, all appended after the data.
    ZerosAfter,
    /// Tile the data and truncate to the target width.
    Repeat,
}

impl PadMode {
    /// Accepted string spellings.
    pub const OPTIONS: &'static [&'static str] = &["zeros", "zeros_after", "repeat"];

    /// The canonical string form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PadMode::Zeros => "zeros",
            PadMode::ZerosAfter => "zeros_after",
            PadMode::Repeat => "repeat",
        }
    }
}

impl FromStr for PadMode {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zeros" => Ok(PadMode::Zeros),
            "zeros_after" => Ok(PadMode::ZerosAfter),
            "repeat" => Ok(PadMode::Repeat),
            _ => Err(ParameterError::invalid_option("pad_mode", s, Self::OPTIONS)),
        }
    }
}

/// Which silent stretches silence removal cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveType {
    /// Leave the signal alone.
    None,
    /// Cut leading and trailing silence only.
    #[default]
    Trim,
    /// Cut every interior gap, keeping the segments separate.
    Split,
    /// Cut every gap and join what remains.
    All,
}

impl RemoveType {
    /// Accepted string spellings.
    pub const OPTIONS: &'static [&'static str] = &["none", "trim", "split", "all"];

    /// The canonical string form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RemoveType::None => "none",
            RemoveType::Trim => "trim",
            RemoveType::Split => "split",
            RemoveType::All => "all",
        }
    }
}

impl FromStr for RemoveType {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(RemoveType::None),
            "trim" => Ok(RemoveType::Trim),
            "split" => Ok(RemoveType::Split),
            "all" => Ok(RemoveType::All),
            _ => Err(ParameterError::invalid_option(
                "silence removal",
                s,
                Self::OPTIONS,
            )),
        }
    }
}

/// Noise colour, i.e. the exponent of the power-law spectrum `1 / f^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseColor {
    /// Exponent -2, power rising with frequency squared.
    Violet,
    /// Exponent -1.
    Blue,
    /// Exponent 0, flat spectrum.
    #[default]
    White,
    /// Exponent 1, equal power per octave.
    Pink,
    /// Exponent 2, random-walk like.
    Brown,
}

impl NoiseColor {
    /// Accepted string spellings.
    pub const OPTIONS: &'static [&'static str] = &["violet", "blue", "white", "pink", "brown"];

    /// Spectral exponent of this colour.
    pub const fn exponent(&self) -> i32 {
        match self {
            NoiseColor::Violet => -2,
            NoiseColor::Blue => -1,
            NoiseColor::White => 0,
            NoiseColor::Pink => 1,
            NoiseColor::Brown => 2,
        }
    }

    /// The canonical string form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NoiseColor::Violet => "violet",
            NoiseColor::Blue => "blue",
            NoiseColor::White => "white",
            NoiseColor::Pink => "pink",
            NoiseColor::Brown => "brown",
        }
    }
}

impl TryFrom<i32> for NoiseColor {
    type Error = ParameterError;

    fn try_from(exponent: i32) -> Result<Self, Self::Error> {
        match exponent {
            -2 => Ok(NoiseColor::Violet),
            -1 => Ok(NoiseColor::Blue),
            0 => Ok(NoiseColor::White),
            1 => Ok(NoiseColor::Pink),
            2 => Ok(NoiseColor::Brown),
            other => Err(ParameterError::out_of_range(
                "noise exponent",
                other,
                "expected one of -2, -1, 0, 1, 2",
            )),
        }
    }
}

impl FromStr for NoiseColor {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "violet" => Ok(NoiseColor::Violet),
            "blue" => Ok(NoiseColor::Blue),
            "white" => Ok(NoiseColor::White),
            "pink" => Ok(NoiseColor::Pink),
            "brown" => Ok(NoiseColor::Brown),
            _ => Err(ParameterError::invalid_option(
                "noise color",
                s,
                Self::OPTIONS,
            )),
        }
    }
}

/// Constraint on the sign of a random shift or roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftDirection {
    /// Toward lower indices only (-1).
    Left,
    /// Either way (0).
    #[default]
    Bidirectional,
    /// Toward higher indices only (+1).
    Right,
}

impl ShiftDirection {
    /// Accepted string spellings.
    pub const OPTIONS: &'static [&'static str] = &["left", "bidirectional", "right"];

    /// -1, 0 or 1.
    pub const fn sign(&self) -> i32 {
        match self {
            ShiftDirection::Left => -1,
            ShiftDirection::Bidirectional => 0,
            ShiftDirection::Right => 1,
        }
    }

    /// The canonical string form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ShiftDirection::Left => "left",
            ShiftDirection::Bidirectional => "bidirectional",
            ShiftDirection::Right => "right",
        }
    }
}

impl TryFrom<i32> for ShiftDirection {
    type Error = ParameterError;

    fn try_from(direction: i32) -> Result<Self, Self::Error> {
        match direction {
            -1 => Ok(ShiftDirection::Left),
            0 => Ok(ShiftDirection::Bidirectional),
            1 => Ok(ShiftDirection::Right),
            other => Err(ParameterError::out_of_range(
                "direction",
                other,
                "Direction must be -1(left) 0(bidirectional) or 1(right)",
            )),
        }
    }
}

impl FromStr for ShiftDirection {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "-1" => Ok(ShiftDirection::Left),
            "bidirectional" | "0" => Ok(ShiftDirection::Bidirectional),
            "right" | "1" => Ok(ShiftDirection::Right),
            _ => Err(ParameterError::invalid_option(
                "direction",
                s,
                Self::OPTIONS,
            )),
        }
    }
}

/// Backend used for sample-rate conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleMethod {
    /// Kaiser-windowed sinc FIR evaluated polyphase-style.
    #[default]
    Polyphase,
    /// rubato's synchronous FFT resampler.
    Fft,
}

impl ResampleMethod {
    /// Accepted string spellings.
    pub const OPTIONS: &'static [&'static str] = &["polyphase", "fft"];

    /// The canonical string form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResampleMethod::Polyphase => "polyphase",
            ResampleMethod::Fft => "fft",
        }
    }
}

impl FromStr for ResampleMethod {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "polyphase" => Ok(ResampleMethod::Polyphase),
            "fft" => Ok(ResampleMethod::Fft),
            _ => Err(ParameterError::invalid_option(
                "resample method",
                s,
                Self::OPTIONS,
            )),
        }
    }
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

impl_display_via_as_str!(PadMode, RemoveType, NoiseColor, ShiftDirection, ResampleMethod);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_mode_parses_case_insensitively() {
        assert_eq!("Zeros_After".parse::<PadMode>().unwrap(), PadMode::ZerosAfter);
        assert_eq!("REPEAT".parse::<PadMode>().unwrap(), PadMode::Repeat);
    }

    #[test]
    fn unknown_pad_mode_names_the_valid_set() {
        let err = "reflect".parse::<PadMode>().unwrap_err();
        let msg = err.to_string();
        for opt in PadMode::OPTIONS {
            assert!(msg.contains(opt), "{msg} should mention {opt}");
        }
        assert!(msg.contains("reflect"));
    }

    #[test]
    fn unknown_remove_type_is_rejected() {
        let err = "middle".parse::<RemoveType>().unwrap_err();
        assert!(matches!(err, ParameterError::InvalidOption { .. }));
        assert!(err.to_string().contains("'split'"));
    }

    #[test]
    fn noise_color_exponents_round_trip() {
        for color in [
            NoiseColor::Violet,
            NoiseColor::Blue,
            NoiseColor::White,
            NoiseColor::Pink,
            NoiseColor::Brown,
        ] {
            assert_eq!(NoiseColor::try_from(color.exponent()).unwrap(), color);
            assert_eq!(color.to_string().parse::<NoiseColor>().unwrap(), color);
        }
        assert!(NoiseColor::try_from(3).is_err());
    }

    #[test]
    fn direction_outside_sign_set_is_rejected() {
        assert_eq!(ShiftDirection::try_from(-1).unwrap(), ShiftDirection::Left);
        let err = ShiftDirection::try_from(2).unwrap_err();
        assert!(err.to_string().contains("-1(left) 0(bidirectional) or 1(right)"));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&PadMode::ZerosAfter).unwrap();
        assert_eq!(json, "\"zeros_after\"");
        let dir: ShiftDirection = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(dir, ShiftDirection::Right);
    }
}
