//! Main error types for the SSR FFT reorder stage.

use thiserror::Error;

use crate::{numeric::fixed::FixedFormatError, parameters::ConfigError};

/// Top-level error type for configuring the reorder stage and its lookup tables.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SsrFftError {
    /// The transform geometry or the table settings are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The fixed-point format of the tables is invalid.
    #[error(transparent)]
    FixedFormat(#[from] FixedFormatError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{numeric::fixed::FixedFormat, parameters::SsrParameters};

    fn configure(transform_len: usize, radix: usize, word_len: u32) -> Result<(), SsrFftError> {
        SsrParameters::new(transform_len, radix)?;
        FixedFormat::new(word_len, 1)?;
        Ok(())
    }

    #[test]
    fn test_errors_convert_transparently() {
        assert!(configure(64, 4, 16).is_ok());

        let err = configure(64, 3, 16).unwrap_err();
        assert_eq!(err, SsrFftError::Config(ConfigError::RadixNotPowerOfTwo(3)));
        assert_eq!(
            err.to_string(),
            "Radix 3 is not a power of two greater than one."
        );

        let err = configure(64, 4, 70).unwrap_err();
        assert_eq!(
            err,
            SsrFftError::FixedFormat(FixedFormatError::WordLength(70))
        );
        assert_eq!(
            err.to_string(),
            "Word length 70 is outside the supported range 1..=63."
        );
    }
}
