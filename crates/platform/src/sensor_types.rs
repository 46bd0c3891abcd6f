//! Sensor domain newtypes.
//!
//! - `Gain`: the four AGAIN settings, validated before reaching hardware
//! - `Channel`: one RGBC channel and its register pair
//! - `RgbcReading`: four channel samples taken one after another

use crate::tcs34725::{REG_BDATAL, REG_CDATAL, REG_GDATAL, REG_RDATAL};

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: i64,
    /// The inclusive minimum allowed value.
    pub min: i64,
    /// The inclusive maximum allowed value.
    pub max: i64,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} is outside {}..={}", self.value, self.min, self.max)
    }
}

// ── Gain ─────────────────────────────────────────────────────────────────────

/// RGBC analog gain (CONTROL.AGAIN).
///
/// The discriminant is the raw register value. Anything outside 0–3 has no
/// representation, so an invalid gain cannot be written to CONTROL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Gain {
    /// 1× amplification.
    X1 = 0,
    /// 4× amplification.
    X4 = 1,
    /// 16× amplification.
    X16 = 2,
    /// 60× amplification.
    X60 = 3,
}

impl Gain {
    /// All gains, lowest first.
    pub const ALL: [Gain; 4] = [Gain::X1, Gain::X4, Gain::X16, Gain::X60];

    /// Decode a raw CONTROL value.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `raw > 3`.
    pub const fn from_raw(raw: u8) -> Result<Self, OutOfRangeError> {
        match raw {
            0 => Ok(Gain::X1),
            1 => Ok(Gain::X4),
            2 => Ok(Gain::X16),
            3 => Ok(Gain::X60),
            _ => Err(OutOfRangeError {
                value: raw as i64,
                min: 0,
                max: 3,
            }),
        }
    }

    /// Register value written to CONTROL.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Amplification factor.
    #[must_use]
    pub const fn multiplier(self) -> u8 {
        match self {
            Gain::X1 => 1,
            Gain::X4 => 4,
            Gain::X16 => 16,
            Gain::X60 => 60,
        }
    }
}

impl TryFrom<i32> for Gain {
    type Error = OutOfRangeError;

    /// Validate a gain index arriving from the command boundary.
    ///
    /// Checks the full `i32` before narrowing, so `256` is rejected rather
    /// than wrapping to `0`.
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(raw) => Gain::from_raw(raw),
            Err(_) => Err(OutOfRangeError {
                value: i64::from(value),
                min: 0,
                max: 3,
            }),
        }
    }
}

impl TryFrom<u8> for Gain {
    type Error = OutOfRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Gain::from_raw(value)
    }
}

impl core::fmt::Display for Gain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x", self.multiplier())
    }
}

// ── Channel ──────────────────────────────────────────────────────────────────

/// One RGBC measurement channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Unfiltered photodiodes.
    Clear,
    /// Red-filtered photodiodes.
    Red,
    /// Green-filtered photodiodes.
    Green,
    /// Blue-filtered photodiodes.
    Blue,
}

impl Channel {
    /// Read order used for a full RGBC sample.
    pub const ALL: [Channel; 4] = [Channel::Clear, Channel::Red, Channel::Green, Channel::Blue];

    /// Address of the low byte. The high byte is at the next address.
    #[must_use]
    pub const fn low_register(self) -> u8 {
        match self {
            Channel::Clear => REG_CDATAL,
            Channel::Red => REG_RDATAL,
            Channel::Green => REG_GDATAL,
            Channel::Blue => REG_BDATAL,
        }
    }

    /// Address of the high byte.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn high_register(self) -> u8 {
        self.low_register() + 1
    }

    /// Short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Clear => "CLEAR",
            Channel::Red => "RED",
            Channel::Green => "GREEN",
            Channel::Blue => "BLUE",
        }
    }
}

/// Compose a 16-bit channel sample from its two data registers.
#[inline]
#[must_use]
pub const fn compose_sample(low: u8, high: u8) -> u16 {
    u16::from_le_bytes([low, high])
}

// ── RgbcReading ──────────────────────────────────────────────────────────────

/// One sample per channel.
///
/// The four values come from four separate register-pair reads; they are not
/// guaranteed to belong to the same integration cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbcReading {
    /// Clear channel count.
    pub clear: u16,
    /// Red channel count.
    pub red: u16,
    /// Green channel count.
    pub green: u16,
    /// Blue channel count.
    pub blue: u16,
}

impl RgbcReading {
    /// Sample for a single channel.
    #[must_use]
    pub const fn get(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Clear => self.clear,
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// Store a sample for a single channel.
    pub fn set(&mut self, channel: Channel, value: u16) {
        match channel {
            Channel::Clear => self.clear = value,
            Channel::Red => self.red = value,
            Channel::Green => self.green = value,
            Channel::Blue => self.blue = value,
        }
    }

    /// Strongest of the red, green and blue channels.
    ///
    /// Ties resolve toward red, then green.
    #[must_use]
    pub const fn dominant(&self) -> DominantColor {
        if self.red >= self.green && self.red >= self.blue {
            DominantColor::Red
        } else if self.green >= self.red && self.green >= self.blue {
            DominantColor::Green
        } else {
            DominantColor::Blue
        }
    }
}

/// Result of [`RgbcReading::dominant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DominantColor {
    /// Red channel is the largest.
    Red,
    /// Green channel is the largest.
    Green,
    /// Blue channel is the largest.
    Blue,
}

impl core::fmt::Display for DominantColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Red => write!(f, "RED"),
            Self::Green => write!(f, "GREEN"),
            Self::Blue => write!(f, "BLUE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_bits_match_discriminant() {
        for (i, gain) in Gain::ALL.iter().enumerate() {
            assert_eq!(usize::from(gain.bits()), i);
        }
    }

    #[test]
    fn gain_rejects_wrapping_values() {
        assert!(Gain::try_from(256_i32).is_err());
        assert!(Gain::try_from(-1_i32).is_err());
        assert!(Gain::try_from(4_u8).is_err());
    }

    #[test]
    fn compose_sample_is_low_byte_first() {
        assert_eq!(compose_sample(0x34, 0x12), 0x1234);
        assert_eq!(compose_sample(0x10, 0x00), 16);
        assert_eq!(compose_sample(0xFF, 0xFF), u16::MAX);
    }

    #[test]
    fn dominant_ties_prefer_red_then_green() {
        let all_equal = RgbcReading { clear: 0, red: 5, green: 5, blue: 5 };
        assert_eq!(all_equal.dominant(), DominantColor::Red);
        let green_blue = RgbcReading { clear: 0, red: 1, green: 5, blue: 5 };
        assert_eq!(green_blue.dominant(), DominantColor::Green);
        let blue = RgbcReading { clear: 0, red: 1, green: 2, blue: 3 };
        assert_eq!(blue.dominant(), DominantColor::Blue);
    }

    #[test]
    fn reading_set_get_per_channel() {
        let mut r = RgbcReading::default();
        r.set(Channel::Green, 42);
        assert_eq!(r.get(Channel::Green), 42);
        assert_eq!(r.get(Channel::Red), 0);
    }
}
