use serde::Serialize;
use std::fmt;

const SCALE: u16 = 1000;

/// Extraction confidence in thousandths, rendered with exactly three
/// fractional digits (`"0.000"` through `"1.000"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Confidence {
    milli: u16,
}

impl Confidence {
    /// Used when no usable confidence value is available.
    pub const DEFAULT: Confidence = Confidence { milli: 500 };

    /// Converts a float, clamping to `[0, 1]` and rounding at the third
    /// decimal. Rounding uses the exact binary value of the float, and an
    /// exact tie picks the larger neighbour, so `0.0045` gives `0.004`
    /// while `0.0625` gives `0.063`. Non-finite input yields `None`.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let clamped = value.clamp(0.0, 1.0);
        Some(Self {
            milli: round_thousandths(clamped).min(SCALE),
        })
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.milli / SCALE, self.milli % SCALE)
    }
}

impl From<Confidence> for String {
    fn from(value: Confidence) -> Self {
        value.to_string()
    }
}

/// Nearest integer to `value * 1000` for a finite `value` in `[0, 1]`,
/// computed on the exact mantissa and exponent of the float.
fn round_thousandths(value: f64) -> u16 {
    let bits = value.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exp) = if exp_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exp_bits - 1075)
    };

    let scaled = u128::from(mantissa) * u128::from(SCALE);
    if exp >= 0 {
        return (scaled << exp).min(u128::from(SCALE)) as u16;
    }
    let shift = exp.unsigned_abs();
    // scaled < 2^63, so anything shifted this far is below one half.
    if shift >= 64 {
        return 0;
    }
    let quotient = scaled >> shift;
    let remainder = scaled - (quotient << shift);
    let half = 1u128 << (shift - 1);
    let rounded = if remainder >= half {
        quotient + 1
    } else {
        quotient
    };
    rounded.min(u128::from(SCALE)) as u16
}
