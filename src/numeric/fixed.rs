//! Two's-complement fixed-point scalars with a run-time format.
//!
//! A [`FixedFormat`] is described by its total word length `W` and its integer length `I`
//! (sign bit included), leaving `F = W - I` fractional bits. A value is stored as a raw
//! integer `raw` in `[-2^(W-1), 2^(W-1) - 1]` and represents `raw / 2^F`.
//!
//! Every conversion into a format (from `f64` or from another format) applies the
//! *destination's* policies:
//! - [`Quantization`] decides what happens to fractional bits that do not fit,
//! - [`Overflow`] decides what happens to values outside the representable range.
//!
//! Word lengths go up to [`MAX_WORD_LEN`] so that every raw value fits an `i64`. The integer
//! length never exceeds the word length: formats with a negative fractional length are not
//! supported.

use std::{fmt::Display, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use super::{ElementType, TableNumeric};

/// Widest supported word length.
pub const MAX_WORD_LEN: u32 = 63;

/// Errors that can occur when building a fixed-point format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixedFormatError {
    /// The word length must hold at least the sign bit and fit the raw storage.
    #[error("Word length {0} is outside the supported range 1..={max}.", max = MAX_WORD_LEN)]
    WordLength(u32),

    /// The integer part cannot be wider than the word itself.
    #[error("Integer length {int_len} exceeds the word length {word_len}.")]
    IntegerLength { word_len: u32, int_len: u32 },
}

/// Handling of fractional bits dropped when narrowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Quantization {
    /// Drop the excess bits, i.e. round toward negative infinity.
    #[default]
    Truncate,
    /// Round to the nearest representable value, ties toward positive infinity.
    RoundHalfUp,
}

/// Handling of values outside the representable range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Overflow {
    /// Keep the low `W` bits, as two's-complement hardware does.
    #[default]
    Wrap,
    /// Clamp to the most positive or most negative representable value.
    Saturate,
}

impl FromStr for Quantization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "truncate" | "trn" => Ok(Self::Truncate),
            "round" | "rnd" => Ok(Self::RoundHalfUp),
            _ => Err(format!("Invalid quantization mode: {s}")),
        }
    }
}

impl FromStr for Overflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrap" => Ok(Self::Wrap),
            "saturate" | "sat" => Ok(Self::Saturate),
            _ => Err(format!("Invalid overflow mode: {s}")),
        }
    }
}

/// Layout and policies of a fixed-point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FixedFormat {
    word_len: u32,
    int_len: u32,
    quantization: Quantization,
    overflow: Overflow,
}

impl FixedFormat {
    /// Creates a format with `word_len` total bits, `int_len` of which are integer bits.
    ///
    /// The format truncates and wraps until told otherwise.
    pub const fn new(word_len: u32, int_len: u32) -> Result<Self, FixedFormatError> {
        if word_len == 0 || word_len > MAX_WORD_LEN {
            return Err(FixedFormatError::WordLength(word_len));
        }
        if int_len > word_len {
            return Err(FixedFormatError::IntegerLength { word_len, int_len });
        }
        Ok(Self {
            word_len,
            int_len,
            quantization: Quantization::Truncate,
            overflow: Overflow::Wrap,
        })
    }

    #[must_use]
    pub const fn with_quantization(self, quantization: Quantization) -> Self {
        Self {
            quantization,
            ..self
        }
    }

    #[must_use]
    pub const fn with_overflow(self, overflow: Overflow) -> Self {
        Self { overflow, ..self }
    }

    /// Same layout, truncating quantization and wrapping overflow.
    #[must_use]
    pub const fn truncating(self) -> Self {
        self.with_quantization(Quantization::Truncate)
            .with_overflow(Overflow::Wrap)
    }

    /// Same layout, round-half-up quantization and saturating overflow.
    #[must_use]
    pub const fn rounding_saturating(self) -> Self {
        self.with_quantization(Quantization::RoundHalfUp)
            .with_overflow(Overflow::Saturate)
    }

    #[must_use]
    pub const fn word_len(&self) -> u32 {
        self.word_len
    }

    #[must_use]
    pub const fn int_len(&self) -> u32 {
        self.int_len
    }

    #[must_use]
    pub const fn frac_len(&self) -> u32 {
        self.word_len - self.int_len
    }

    #[must_use]
    pub const fn quantization(&self) -> Quantization {
        self.quantization
    }

    #[must_use]
    pub const fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Smallest raw value, `-2^(W-1)`.
    #[must_use]
    pub const fn min_raw(&self) -> i64 {
        -(1i64 << (self.word_len - 1))
    }

    /// Largest raw value, `2^(W-1) - 1`.
    #[must_use]
    pub const fn max_raw(&self) -> i64 {
        (1i64 << (self.word_len - 1)) - 1
    }

    /// Weight of the least significant bit, `2^-F`.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        1.0 / self.scale()
    }

    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.min_raw() as f64 / self.scale()
    }

    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.max_raw() as f64 / self.scale()
    }

    fn scale(&self) -> f64 {
        (1u64 << self.frac_len()) as f64
    }

    /// Drops `bits` fractional bits from `raw` according to the quantization mode.
    const fn quantize(&self, raw: i128, bits: u32) -> i128 {
        if bits == 0 {
            return raw;
        }
        match self.quantization {
            Quantization::Truncate => raw >> bits,
            Quantization::RoundHalfUp => (raw + (1i128 << (bits - 1))) >> bits,
        }
    }

    /// Brings an unbounded raw value into `[min_raw, max_raw]` according to the overflow mode.
    const fn fit(&self, raw: i128) -> i64 {
        match self.overflow {
            Overflow::Saturate => {
                if raw < self.min_raw() as i128 {
                    self.min_raw()
                } else if raw > self.max_raw() as i128 {
                    self.max_raw()
                } else {
                    raw as i64
                }
            }
            Overflow::Wrap => {
                let shift = i128::BITS - self.word_len;
                ((raw << shift) >> shift) as i64
            }
        }
    }
}

impl Display for FixedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fixed<{}, {}, {:?}, {:?}>",
            self.word_len, self.int_len, self.quantization, self.overflow
        )
    }
}

/// A fixed-point value tagged with its format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fixed {
    raw: i64,
    format: FixedFormat,
}

impl Fixed {
    /// Wraps a raw integer, applying the format's overflow policy if it does not fit.
    #[must_use]
    pub const fn from_raw(raw: i64, format: FixedFormat) -> Self {
        Self {
            raw: format.fit(raw as i128),
            format,
        }
    }

    /// Quantizes a real value into `format`.
    ///
    /// NaN maps to zero; infinities behave like out-of-range values of the same sign.
    #[must_use]
    pub fn from_f64(value: f64, format: FixedFormat) -> Self {
        let scaled = value * format.scale();
        let quantized = match format.quantization {
            Quantization::Truncate => scaled.floor(),
            Quantization::RoundHalfUp => {
                // `scaled + 0.5` can round up to the next integer below the halfway point.
                let floor = scaled.floor();
                if scaled - floor >= 0.5 {
                    floor + 1.0
                } else {
                    floor
                }
            }
        };
        // `as` saturates at the i128 bounds and sends NaN to 0.
        Self {
            raw: format.fit(quantized as i128),
            format,
        }
    }

    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.raw as f64 / self.format.scale()
    }

    /// Converts into `target`, using the target's quantization and overflow policies.
    #[must_use]
    pub const fn cast(self, target: FixedFormat) -> Self {
        let src_frac = self.format.frac_len();
        let dst_frac = target.frac_len();
        let raw = self.raw as i128;
        let aligned = if dst_frac >= src_frac {
            raw << (dst_frac - src_frac)
        } else {
            target.quantize(raw, src_frac - dst_frac)
        };
        Self {
            raw: target.fit(aligned),
            format: target,
        }
    }

    #[must_use]
    pub const fn raw(&self) -> i64 {
        self.raw
    }

    #[must_use]
    pub const fn format(&self) -> FixedFormat {
        self.format
    }
}

impl Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

/// Fixed-point table storage.
///
/// The element type is the configured format, policies included. The truncating cast keeps the
/// layout with truncation and wrap-around; the rounding cast keeps the layout with round-half-up
/// and saturation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedRepr {
    format: FixedFormat,
}

impl FixedRepr {
    #[must_use]
    pub const fn new(format: FixedFormat) -> Self {
        Self { format }
    }

    #[must_use]
    pub const fn format(&self) -> FixedFormat {
        self.format
    }
}

impl TableNumeric for FixedRepr {
    type Scalar = Fixed;

    fn element_type(&self) -> ElementType {
        ElementType::Fixed(self.format)
    }

    fn truncating_cast_type(&self) -> ElementType {
        ElementType::Fixed(self.format.truncating())
    }

    fn rounding_saturating_cast_type(&self) -> ElementType {
        ElementType::Fixed(self.format.rounding_saturating())
    }

    fn from_f64(&self, value: f64) -> Fixed {
        Fixed::from_f64(value, self.format)
    }

    fn to_f64(&self, value: Fixed) -> f64 {
        value.to_f64()
    }

    fn truncating_cast(&self, value: Fixed) -> Fixed {
        value.cast(self.format.truncating())
    }

    fn rounding_saturating_cast(&self, value: Fixed) -> Fixed {
        value.cast(self.format.rounding_saturating())
    }
}
