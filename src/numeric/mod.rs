//! Numeric representations of twiddle and phase-exponential table entries.
//!
//! The set of representations is closed: single precision, double precision, and fixed point.
//! Each one implements the [`TableNumeric`] capability trait, which answers the three questions a
//! table consumer has: which element type to store, which type a truncating cast produces, and
//! which type a rounding+saturating cast produces. [`NumericRepresentation`] is the tagged
//! configuration value selecting one of them at run time.

use std::{fmt::Debug, fmt::Display, str::FromStr};

use num_complex::Complex;
use serde::Serialize;

use self::{
    fixed::{Fixed, FixedFormat, FixedFormatError, FixedRepr},
    float::{DoublePrecision, SinglePrecision},
};

pub mod fixed;
pub mod float;

/// Storage type of one real component of a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementType {
    /// IEEE-754 single precision.
    Float,
    /// IEEE-754 double precision.
    Double,
    /// Two's-complement fixed point.
    Fixed(FixedFormat),
}

impl ElementType {
    /// Width in bits of one real component.
    #[must_use]
    pub const fn bit_width(&self) -> u32 {
        match self {
            Self::Float => 32,
            Self::Double => 64,
            Self::Fixed(format) => format.word_len(),
        }
    }

    /// Width in bits of a complex entry (real and imaginary parts).
    #[must_use]
    pub const fn complex_bit_width(&self) -> u32 {
        2 * self.bit_width()
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::Fixed(format) => write!(f, "{format}"),
        }
    }
}

/// Capabilities of a table numeric representation.
pub trait TableNumeric {
    /// Scalar stored in one real component of a table entry.
    type Scalar: Copy + Debug + PartialEq;

    /// Element type used to store table entries.
    fn element_type(&self) -> ElementType;

    /// Type produced by [`Self::truncating_cast`].
    fn truncating_cast_type(&self) -> ElementType;

    /// Type produced by [`Self::rounding_saturating_cast`].
    fn rounding_saturating_cast_type(&self) -> ElementType;

    /// Quantizes a real value into the element type.
    fn from_f64(&self, value: f64) -> Self::Scalar;

    fn to_f64(&self, value: Self::Scalar) -> f64;

    /// Narrows by dropping excess fractional bits, without overflow handling.
    fn truncating_cast(&self, value: Self::Scalar) -> Self::Scalar;

    /// Narrows by rounding to nearest and clamping to the representable range.
    fn rounding_saturating_cast(&self, value: Self::Scalar) -> Self::Scalar;

    fn complex_from_f64(&self, value: Complex<f64>) -> Complex<Self::Scalar> {
        Complex::new(self.from_f64(value.re), self.from_f64(value.im))
    }

    fn truncating_cast_complex(&self, value: Complex<Self::Scalar>) -> Complex<Self::Scalar> {
        Complex::new(
            self.truncating_cast(value.re),
            self.truncating_cast(value.im),
        )
    }

    fn rounding_saturating_cast_complex(
        &self,
        value: Complex<Self::Scalar>,
    ) -> Complex<Self::Scalar> {
        Complex::new(
            self.rounding_saturating_cast(value.re),
            self.rounding_saturating_cast(value.im),
        )
    }
}

/// A scalar of any supported representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    F32(f32),
    F64(f64),
    Fixed(Fixed),
}

impl Scalar {
    #[must_use]
    pub fn to_f64(self) -> f64 {
        match self {
            Self::F32(x) => f64::from(x),
            Self::F64(x) => x,
            Self::Fixed(x) => x.to_f64(),
        }
    }
}

/// Run-time selection of the table numeric representation.
///
/// Dispatches every [`TableNumeric`] capability to the matching representation. Casting a
/// [`Scalar`] of another representation first converts it into this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumericRepresentation {
    Float,
    Double,
    Fixed(FixedFormat),
}

impl NumericRepresentation {
    /// Fixed point with `word_len` bits, `int_len` of them integer bits, truncating and wrapping.
    pub const fn fixed(word_len: u32, int_len: u32) -> Result<Self, FixedFormatError> {
        match FixedFormat::new(word_len, int_len) {
            Ok(format) => Ok(Self::Fixed(format)),
            Err(err) => Err(err),
        }
    }

    /// Short name of the representation family.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::Fixed(_) => "fixed",
        }
    }

    fn to_fixed(value: Scalar, target: FixedFormat) -> Fixed {
        match value {
            Scalar::Fixed(x) => x.cast(target),
            other => Fixed::from_f64(other.to_f64(), target),
        }
    }
}

impl TableNumeric for NumericRepresentation {
    type Scalar = Scalar;

    fn element_type(&self) -> ElementType {
        match self {
            Self::Float => SinglePrecision::new().element_type(),
            Self::Double => DoublePrecision::new().element_type(),
            Self::Fixed(format) => FixedRepr::new(*format).element_type(),
        }
    }

    fn truncating_cast_type(&self) -> ElementType {
        match self {
            Self::Float => SinglePrecision::new().truncating_cast_type(),
            Self::Double => DoublePrecision::new().truncating_cast_type(),
            Self::Fixed(format) => FixedRepr::new(*format).truncating_cast_type(),
        }
    }

    fn rounding_saturating_cast_type(&self) -> ElementType {
        match self {
            Self::Float => SinglePrecision::new().rounding_saturating_cast_type(),
            Self::Double => DoublePrecision::new().rounding_saturating_cast_type(),
            Self::Fixed(format) => FixedRepr::new(*format).rounding_saturating_cast_type(),
        }
    }

    fn from_f64(&self, value: f64) -> Scalar {
        match self {
            Self::Float => Scalar::F32(SinglePrecision::new().from_f64(value)),
            Self::Double => Scalar::F64(value),
            Self::Fixed(format) => Scalar::Fixed(FixedRepr::new(*format).from_f64(value)),
        }
    }

    fn to_f64(&self, value: Scalar) -> f64 {
        value.to_f64()
    }

    fn truncating_cast(&self, value: Scalar) -> Scalar {
        match self {
            Self::Float | Self::Double => self.from_f64(value.to_f64()),
            Self::Fixed(format) => Scalar::Fixed(Self::to_fixed(value, format.truncating())),
        }
    }

    fn rounding_saturating_cast(&self, value: Scalar) -> Scalar {
        match self {
            Self::Float | Self::Double => self.from_f64(value.to_f64()),
            Self::Fixed(format) => {
                Scalar::Fixed(Self::to_fixed(value, format.rounding_saturating()))
            }
        }
    }
}

impl Display for NumericRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element_type())
    }
}

impl FromStr for NumericRepresentation {
    type Err = String;

    /// Parses `float`, `double`, or `fixed<W,I>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float" | "f32" => Ok(Self::Float),
            "double" | "f64" => Ok(Self::Double),
            _ => {
                let invalid = || format!("Invalid numeric representation: {s}");
                let lengths = s
                    .strip_prefix("fixed<")
                    .and_then(|rest| rest.strip_suffix('>'))
                    .ok_or_else(invalid)?;
                let (word_len, int_len) = lengths.split_once(',').ok_or_else(invalid)?;
                let word_len = word_len.trim().parse().map_err(|_| invalid())?;
                let int_len = int_len.trim().parse().map_err(|_| invalid())?;
                Self::fixed(word_len, int_len).map_err(|err| err.to_string())
            }
        }
    }
}
