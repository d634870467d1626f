use std::{fmt::Debug, marker::PhantomData};

use num_traits::{Float, NumCast};

use super::{ElementType, TableNumeric};

/// Floating-point scalars usable as table entries.
pub trait FloatElement: Float + Debug {
    const ELEMENT_TYPE: ElementType;
}

impl FloatElement for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::Float;
}

impl FloatElement for f64 {
    const ELEMENT_TYPE: ElementType = ElementType::Double;
}

/// Floating-point table storage.
///
/// No narrowing ever happens inside a floating-point table, so both cast variants are the
/// identity and share the element type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FloatRepr<T>(PhantomData<T>);

pub type SinglePrecision = FloatRepr<f32>;
pub type DoublePrecision = FloatRepr<f64>;

impl<T> FloatRepr<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: FloatElement> TableNumeric for FloatRepr<T> {
    type Scalar = T;

    fn element_type(&self) -> ElementType {
        T::ELEMENT_TYPE
    }

    fn truncating_cast_type(&self) -> ElementType {
        T::ELEMENT_TYPE
    }

    fn rounding_saturating_cast_type(&self) -> ElementType {
        T::ELEMENT_TYPE
    }

    fn from_f64(&self, value: f64) -> T {
        // f64 -> f32 rounds to nearest and never fails.
        <T as NumCast>::from(value).unwrap_or_else(T::nan)
    }

    fn to_f64(&self, value: T) -> f64 {
        value.to_f64().unwrap_or(f64::NAN)
    }

    fn truncating_cast(&self, value: T) -> T {
        value
    }

    fn rounding_saturating_cast(&self, value: T) -> T {
        value
    }
}

#[cfg(test)]
mod tests {
    use num_complex::Complex;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_element_types() {
        assert_eq!(SinglePrecision::new().element_type(), ElementType::Float);
        assert_eq!(DoublePrecision::new().element_type(), ElementType::Double);
        assert_eq!(
            SinglePrecision::new().truncating_cast_type(),
            ElementType::Float
        );
        assert_eq!(
            DoublePrecision::new().rounding_saturating_cast_type(),
            ElementType::Double
        );
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(SinglePrecision::new().from_f64(0.1), 0.1f32);
        assert_eq!(DoublePrecision::new().from_f64(0.1), 0.1f64);
        assert_eq!(SinglePrecision::new().to_f64(0.5), 0.5);
    }

    #[test]
    fn test_complex_casts_are_identity() {
        let repr = DoublePrecision::new();
        let z = Complex::new(0.707_106_781_186_547_5, -0.707_106_781_186_547_5);
        assert_eq!(repr.truncating_cast_complex(z), z);
        assert_eq!(repr.rounding_saturating_cast_complex(z), z);
    }

    proptest! {
        #[test]
        fn prop_single_casts_are_identity(value in prop::num::f32::NORMAL) {
            let repr = SinglePrecision::new();
            prop_assert_eq!(repr.truncating_cast(value), value);
            prop_assert_eq!(repr.rounding_saturating_cast(value), value);
        }

        #[test]
        fn prop_double_casts_are_identity(value in prop::num::f64::NORMAL) {
            let repr = DoublePrecision::new();
            prop_assert_eq!(repr.truncating_cast(value), value);
            prop_assert_eq!(repr.rounding_saturating_cast(value), value);
        }
    }
}
