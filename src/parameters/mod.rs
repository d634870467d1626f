use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use crate::utils::{checked_pow, is_power_of, log2_strict, num_stages};

/// Errors that can occur when validating an SSR FFT configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The number of parallel lanes must be a power of two, at least 2.
    #[error("Radix {0} is not a power of two greater than one.")]
    RadixNotPowerOfTwo(usize),

    /// Every lane must hold the same number of samples.
    #[error("Transform length {length} is not a positive multiple of the radix {radix}.")]
    LengthNotMultipleOfRadix { length: usize, radix: usize },

    /// The transform length is neither a power of the radix nor an integer fraction of the
    /// next power of the radix, so no table-sizing rule applies.
    #[error("Transform length {length} has no table-sizing rule for radix {radix}.")]
    UnsupportedLength { length: usize, radix: usize },

    /// The forking factor must be zero (no forking) or a divisor of the radix.
    #[error("Forking factor {forking_factor} does not divide the radix {radix}.")]
    InvalidForkingFactor { forking_factor: usize, radix: usize },

    /// The criss-cross drain reads whole `radix`-wide column blocks from every lane.
    #[error("Lane depth {depth} is not a multiple of the radix {radix}.")]
    DepthNotMultipleOfRadix { depth: usize, radix: usize },

    /// All lanes of a buffer must share one depth.
    #[error("Lane {lane} holds {found} samples, expected {expected}.")]
    LaneDepthMismatch {
        lane: usize,
        expected: usize,
        found: usize,
    },

    /// Table lengths are floored at the minimum, which therefore cannot be zero.
    #[error("Minimum table length shouldn't be zero.")]
    ZeroMinTableLen,
}

/// Geometry of a super-sample-rate FFT: `transform_len` points processed `radix` at a time.
///
/// The samples are held in `radix` lanes of depth `transform_len / radix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SsrParameters {
    /// Number of points `L` of the transform.
    transform_len: usize,
    /// Number of parallel lanes `R`, also the butterfly radix.
    radix: usize,
    /// Ratio between the next power of `R` and `L`, or 0 when `L` is a power of `R`.
    forking_factor: usize,
}

impl SsrParameters {
    /// Validates the geometry and derives the forking factor.
    ///
    /// When `transform_len` is an exact power of `radix` the forking factor is 0. Otherwise it is
    /// `radix^num_stages / transform_len`, which must be an integer dividing `radix`.
    pub fn new(transform_len: usize, radix: usize) -> Result<Self, ConfigError> {
        if radix < 2 || !radix.is_power_of_two() {
            return Err(ConfigError::RadixNotPowerOfTwo(radix));
        }
        if transform_len == 0 || transform_len % radix != 0 {
            return Err(ConfigError::LengthNotMultipleOfRadix {
                length: transform_len,
                radix,
            });
        }

        let forking_factor = if is_power_of(transform_len, radix) {
            0
        } else {
            let span = checked_pow(radix, num_stages(transform_len, radix))
                .filter(|span| span % transform_len == 0)
                .ok_or(ConfigError::UnsupportedLength {
                    length: transform_len,
                    radix,
                })?;
            span / transform_len
        };

        Ok(Self {
            transform_len,
            radix,
            forking_factor,
        })
    }

    /// Overrides the derived forking factor.
    ///
    /// Zero means "no forking"; any other value must divide the radix.
    pub const fn with_forking_factor(self, forking_factor: usize) -> Result<Self, ConfigError> {
        if forking_factor != 0 && (forking_factor > self.radix || self.radix % forking_factor != 0)
        {
            return Err(ConfigError::InvalidForkingFactor {
                forking_factor,
                radix: self.radix,
            });
        }
        Ok(Self {
            forking_factor,
            ..self
        })
    }

    #[must_use]
    pub const fn transform_len(&self) -> usize {
        self.transform_len
    }

    #[must_use]
    pub const fn radix(&self) -> usize {
        self.radix
    }

    #[must_use]
    pub const fn forking_factor(&self) -> usize {
        self.forking_factor
    }

    /// Number of samples held by each lane, `L / R`.
    #[must_use]
    pub const fn lane_depth(&self) -> usize {
        self.transform_len / self.radix
    }

    /// Mask implementing `x mod R` as `x & mask`.
    #[must_use]
    pub const fn radix_mask(&self) -> usize {
        self.radix - 1
    }

    #[must_use]
    pub const fn log2_radix(&self) -> u32 {
        log2_strict(self.radix)
    }

    /// Number of butterfly stages, `ceil(log_R(L))`.
    #[must_use]
    pub const fn num_stages(&self) -> usize {
        num_stages(self.transform_len, self.radix)
    }

    /// Returns `true` when the transform length is an exact power of the radix.
    #[must_use]
    pub const fn is_radix_power(&self) -> bool {
        self.forking_factor == 0
    }

    /// Checks that the lanes can be drained by whole `R`-wide column blocks.
    pub const fn check_drainable(&self) -> Result<(), ConfigError> {
        if self.lane_depth() % self.radix == 0 {
            Ok(())
        } else {
            Err(ConfigError::DepthNotMultipleOfRadix {
                depth: self.lane_depth(),
                radix: self.radix,
            })
        }
    }
}

impl Display for SsrParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "L = {}, R = {} ({} lanes of depth {}), stages: {}, forking factor: {}",
            self.transform_len,
            self.radix,
            self.radix,
            self.lane_depth(),
            self.num_stages(),
            self.forking_factor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_power_of_radix() {
        let params = SsrParameters::new(64, 8).unwrap();
        assert_eq!(params.transform_len(), 64);
        assert_eq!(params.radix(), 8);
        assert_eq!(params.lane_depth(), 8);
        assert_eq!(params.radix_mask(), 7);
        assert_eq!(params.log2_radix(), 3);
        assert_eq!(params.num_stages(), 2);
        assert_eq!(params.forking_factor(), 0);
        assert!(params.is_radix_power());
    }

    #[test]
    fn test_new_derives_forking_factor() {
        // 32 = 64 / 2 with 64 = 4^3
        let params = SsrParameters::new(32, 4).unwrap();
        assert_eq!(params.num_stages(), 3);
        assert_eq!(params.forking_factor(), 2);
        assert!(!params.is_radix_power());

        // 128 = 512 / 4 with 512 = 8^3
        let params = SsrParameters::new(128, 8).unwrap();
        assert_eq!(params.forking_factor(), 4);
    }

    #[test]
    fn test_new_rejects_bad_radix() {
        assert_eq!(
            SsrParameters::new(64, 6),
            Err(ConfigError::RadixNotPowerOfTwo(6))
        );
        assert_eq!(
            SsrParameters::new(64, 1),
            Err(ConfigError::RadixNotPowerOfTwo(1))
        );
        assert_eq!(
            SsrParameters::new(64, 0),
            Err(ConfigError::RadixNotPowerOfTwo(0))
        );
    }

    #[test]
    fn test_new_rejects_bad_length() {
        assert_eq!(
            SsrParameters::new(0, 4),
            Err(ConfigError::LengthNotMultipleOfRadix {
                length: 0,
                radix: 4
            })
        );
        assert_eq!(
            SsrParameters::new(18, 4),
            Err(ConfigError::LengthNotMultipleOfRadix {
                length: 18,
                radix: 4
            })
        );
        // 24 is a multiple of 4 but 64 / 24 is not an integer.
        assert_eq!(
            SsrParameters::new(24, 4),
            Err(ConfigError::UnsupportedLength {
                length: 24,
                radix: 4
            })
        );
    }

    #[test]
    fn test_with_forking_factor() {
        let params = SsrParameters::new(64, 8).unwrap();
        assert_eq!(params.with_forking_factor(2).unwrap().forking_factor(), 2);
        assert_eq!(params.with_forking_factor(0).unwrap().forking_factor(), 0);
        assert_eq!(
            params.with_forking_factor(3),
            Err(ConfigError::InvalidForkingFactor {
                forking_factor: 3,
                radix: 8
            })
        );
        assert_eq!(
            params.with_forking_factor(16),
            Err(ConfigError::InvalidForkingFactor {
                forking_factor: 16,
                radix: 8
            })
        );
    }

    #[test]
    fn test_check_drainable() {
        assert!(SsrParameters::new(16, 4).unwrap().check_drainable().is_ok());
        assert_eq!(
            SsrParameters::new(8, 4).unwrap().check_drainable(),
            Err(ConfigError::DepthNotMultipleOfRadix { depth: 2, radix: 4 })
        );
    }

    #[test]
    fn test_display() {
        let params = SsrParameters::new(16, 4).unwrap();
        assert_eq!(
            params.to_string(),
            "L = 16, R = 4 (4 lanes of depth 4), stages: 2, forking factor: 0"
        );
    }
}
