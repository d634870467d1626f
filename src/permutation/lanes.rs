use std::ops::{Index, IndexMut};

use crate::parameters::{ConfigError, SsrParameters};

/// `radix` memory banks of identical depth.
///
/// Banks are stored back to back: sample `offset` of lane `lane` lives at
/// `lane * depth + offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneBuffers<T> {
    radix: usize,
    depth: usize,
    data: Vec<T>,
}

impl<T> LaneBuffers<T> {
    /// Builds the buffers from one vector per lane.
    ///
    /// The number of lanes must be a power of two (at least 2) and all lanes must have the same
    /// depth.
    pub fn from_banks(banks: Vec<Vec<T>>) -> Result<Self, ConfigError> {
        let radix = banks.len();
        if radix < 2 || !radix.is_power_of_two() {
            return Err(ConfigError::RadixNotPowerOfTwo(radix));
        }
        let depth = banks[0].len();
        if let Some((lane, bank)) = banks
            .iter()
            .enumerate()
            .find(|(_, bank)| bank.len() != depth)
        {
            return Err(ConfigError::LaneDepthMismatch {
                lane,
                expected: depth,
                found: bank.len(),
            });
        }

        Ok(Self {
            radix,
            depth,
            data: banks.into_iter().flatten().collect(),
        })
    }

    /// Builds the buffers of an SSR geometry, `f(lane, offset)` giving each sample.
    pub fn from_fn(params: &SsrParameters, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let radix = params.radix();
        let depth = params.lane_depth();
        let data = (0..radix)
            .flat_map(|lane| (0..depth).map(move |offset| (lane, offset)))
            .map(|(lane, offset)| f(lane, offset))
            .collect();
        Self { radix, depth, data }
    }

    /// Number of lanes.
    #[must_use]
    pub const fn radix(&self) -> usize {
        self.radix
    }

    /// Number of samples per lane.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of samples.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Samples of one lane.
    ///
    /// # Panics
    /// Panics if `lane >= radix`.
    #[must_use]
    pub fn lane(&self, lane: usize) -> &[T] {
        assert!(lane < self.radix, "lane {lane} out of range");
        &self.data[lane * self.depth..(lane + 1) * self.depth]
    }

    /// Mutable samples of one lane.
    ///
    /// # Panics
    /// Panics if `lane >= radix`.
    pub fn lane_mut(&mut self, lane: usize) -> &mut [T] {
        assert!(lane < self.radix, "lane {lane} out of range");
        &mut self.data[lane * self.depth..(lane + 1) * self.depth]
    }

    /// Sample `offset` of lane `lane`, if in range.
    #[must_use]
    pub fn get(&self, lane: usize, offset: usize) -> Option<&T> {
        if lane < self.radix && offset < self.depth {
            Some(&self.data[lane * self.depth + offset])
        } else {
            None
        }
    }

    /// Returns `true` if the buffers have the lane geometry of `params`.
    #[must_use]
    pub const fn matches(&self, params: &SsrParameters) -> bool {
        self.radix == params.radix() && self.depth == params.lane_depth()
    }

    /// Splits the buffers back into one vector per lane.
    #[must_use]
    pub fn into_banks(self) -> Vec<Vec<T>> {
        let mut data = self.data.into_iter();
        (0..self.radix)
            .map(|_| data.by_ref().take(self.depth).collect())
            .collect()
    }
}

impl<T> Index<(usize, usize)> for LaneBuffers<T> {
    type Output = T;

    fn index(&self, (lane, offset): (usize, usize)) -> &T {
        assert!(lane < self.radix, "lane {lane} out of range");
        assert!(
            offset < self.depth,
            "offset {offset} out of range for lane depth {}",
            self.depth
        );
        &self.data[lane * self.depth + offset]
    }
}

impl<T> IndexMut<(usize, usize)> for LaneBuffers<T> {
    fn index_mut(&mut self, (lane, offset): (usize, usize)) -> &mut T {
        assert!(lane < self.radix, "lane {lane} out of range");
        assert!(
            offset < self.depth,
            "offset {offset} out of range for lane depth {}",
            self.depth
        );
        &mut self.data[lane * self.depth + offset]
    }
}
