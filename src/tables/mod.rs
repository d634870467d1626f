//! Sizing and typing of the twiddle-factor and phase-exponential lookup tables.
//!
//! Only lengths and element types are derived here; the table contents are produced by the
//! surrounding pipeline.

use std::{
    collections::HashMap,
    fmt::Display,
    sync::{Arc, LazyLock, Mutex, PoisonError},
};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    constant::{DEFAULT_MIN_TABLE_LEN, RADIX2_MIN_EXP_TABLE_LEN},
    numeric::{ElementType, NumericRepresentation, TableNumeric},
    parameters::{ConfigError, SsrParameters},
};

type TableKey = (SsrParameters, NumericRepresentation, TableConfig);

/// Global cache of table descriptors, indexed by their full input tuple.
static TRAITS_CACHE: LazyLock<Mutex<HashMap<TableKey, Arc<TableTraits>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Deployment-wide table settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TableConfig {
    /// Floor applied to every extended table length.
    min_table_len: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_table_len: DEFAULT_MIN_TABLE_LEN,
        }
    }
}

impl TableConfig {
    pub const fn new(min_table_len: usize) -> Result<Self, ConfigError> {
        if min_table_len == 0 {
            return Err(ConfigError::ZeroMinTableLen);
        }
        Ok(Self { min_table_len })
    }

    #[must_use]
    pub const fn min_table_len(&self) -> usize {
        self.min_table_len
    }

    /// Pads `len` up to the configured floor.
    #[must_use]
    pub const fn extended(&self, len: usize) -> usize {
        extended_table_len(len, self.min_table_len)
    }
}

/// Number of stored twiddle factors for an `L`-point transform.
///
/// The twiddle sequence is symmetric over the four quadrants of the unit circle, so only one
/// quadrant, `L / 4` entries, is stored. Lookups fold the other quadrants onto it.
#[must_use]
pub const fn twiddle_table_len(transform_len: usize) -> usize {
    transform_len / 4
}

/// Number of entries of the phase-exponential table used by every stage but the last.
#[must_use]
pub const fn exp_table_len(radix: usize, forking_factor: usize) -> usize {
    if forking_factor == 0 && radix == 2 {
        RADIX2_MIN_EXP_TABLE_LEN
    } else {
        radix
    }
}

/// Number of entries of the phase-exponential table used by the last stage.
///
/// Only defined when the transform length is not a power of the radix: the last stage then works
/// on blocks `forking_factor` times shorter than the radix.
#[must_use]
pub const fn exp_table_len_last_stage(radix: usize, forking_factor: usize) -> Option<usize> {
    if forking_factor == 0 {
        None
    } else {
        Some(radix / forking_factor)
    }
}

/// `max(len, min_table_len)`.
#[must_use]
pub const fn extended_table_len(len: usize, min_table_len: usize) -> usize {
    if len > min_table_len {
        len
    } else {
        min_table_len
    }
}

/// Lengths and element types of the lookup tables of one FFT configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableTraits {
    params: SsrParameters,
    representation: NumericRepresentation,
    min_table_len: usize,
    twiddle_table_len: usize,
    extended_twiddle_table_len: usize,
    exp_table_len: usize,
    extended_exp_table_len: usize,
    exp_table_len_last_stage: Option<usize>,
    extended_exp_table_len_last_stage: Option<usize>,
    element_type: ElementType,
    truncating_cast_type: ElementType,
    rounding_saturating_cast_type: ElementType,
}

impl TableTraits {
    /// Derives the table descriptor of a configuration.
    #[instrument(skip_all, fields(
        transform_len = params.transform_len(),
        radix = params.radix(),
        forking_factor = params.forking_factor(),
        representation = %representation,
    ), level = "debug")]
    #[must_use]
    pub fn new(
        params: SsrParameters,
        representation: NumericRepresentation,
        config: TableConfig,
    ) -> Self {
        let radix = params.radix();
        let forking_factor = params.forking_factor();

        let twiddle_table_len = twiddle_table_len(params.transform_len());
        let exp_table_len = exp_table_len(radix, forking_factor);
        let exp_table_len_last_stage = exp_table_len_last_stage(radix, forking_factor);

        let traits = Self {
            params,
            representation,
            min_table_len: config.min_table_len(),
            twiddle_table_len,
            extended_twiddle_table_len: config.extended(twiddle_table_len),
            exp_table_len,
            extended_exp_table_len: config.extended(exp_table_len),
            exp_table_len_last_stage,
            extended_exp_table_len_last_stage: exp_table_len_last_stage
                .map(|len| config.extended(len)),
            element_type: representation.element_type(),
            truncating_cast_type: representation.truncating_cast_type(),
            rounding_saturating_cast_type: representation.rounding_saturating_cast_type(),
        };
        debug!(
            twiddle = traits.extended_twiddle_table_len,
            exp = traits.extended_exp_table_len,
            exp_last_stage = ?traits.extended_exp_table_len_last_stage,
            "derived table lengths"
        );
        traits
    }

    /// Same as [`Self::new`], shared through a process-wide cache.
    #[must_use]
    pub fn cached(
        params: SsrParameters,
        representation: NumericRepresentation,
        config: TableConfig,
    ) -> Arc<Self> {
        let mut cache = TRAITS_CACHE
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cache
            .entry((params, representation, config))
            .or_insert_with(|| Arc::new(Self::new(params, representation, config)))
            .clone()
    }

    #[must_use]
    pub const fn params(&self) -> &SsrParameters {
        &self.params
    }

    #[must_use]
    pub const fn representation(&self) -> NumericRepresentation {
        self.representation
    }

    #[must_use]
    pub const fn min_table_len(&self) -> usize {
        self.min_table_len
    }

    #[must_use]
    pub const fn twiddle_table_len(&self) -> usize {
        self.twiddle_table_len
    }

    #[must_use]
    pub const fn extended_twiddle_table_len(&self) -> usize {
        self.extended_twiddle_table_len
    }

    #[must_use]
    pub const fn exp_table_len(&self) -> usize {
        self.exp_table_len
    }

    #[must_use]
    pub const fn extended_exp_table_len(&self) -> usize {
        self.extended_exp_table_len
    }

    /// `None` when the transform length is a power of the radix.
    #[must_use]
    pub const fn exp_table_len_last_stage(&self) -> Option<usize> {
        self.exp_table_len_last_stage
    }

    #[must_use]
    pub const fn extended_exp_table_len_last_stage(&self) -> Option<usize> {
        self.extended_exp_table_len_last_stage
    }

    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    #[must_use]
    pub const fn truncating_cast_type(&self) -> ElementType {
        self.truncating_cast_type
    }

    #[must_use]
    pub const fn rounding_saturating_cast_type(&self) -> ElementType {
        self.rounding_saturating_cast_type
    }

    /// Storage in bits of the extended twiddle table (complex entries).
    #[must_use]
    pub const fn twiddle_table_bits(&self) -> usize {
        self.extended_twiddle_table_len * self.element_type.complex_bit_width() as usize
    }

    /// Storage in bits of the extended phase-exponential table(s) (complex entries).
    #[must_use]
    pub const fn exp_table_bits(&self) -> usize {
        let entries = match self.extended_exp_table_len_last_stage {
            Some(last) => self.extended_exp_table_len + last,
            None => self.extended_exp_table_len,
        };
        entries * self.element_type.complex_bit_width() as usize
    }
}

impl Display for TableTraits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.params)?;
        writeln!(
            f,
            "element: {}, truncating cast: {}, rounding cast: {}",
            self.element_type, self.truncating_cast_type, self.rounding_saturating_cast_type
        )?;
        writeln!(
            f,
            "twiddle table: {} (extended {}), exp table: {} (extended {})",
            self.twiddle_table_len,
            self.extended_twiddle_table_len,
            self.exp_table_len,
            self.extended_exp_table_len
        )?;
        match (
            self.exp_table_len_last_stage,
            self.extended_exp_table_len_last_stage,
        ) {
            (Some(len), Some(extended)) => write!(
                f,
                "last-stage exp table: {len} (extended {extended}), min table length: {}",
                self.min_table_len
            ),
            _ => write!(f, "min table length: {}", self.min_table_len),
        }
    }
}
