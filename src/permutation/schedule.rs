use crate::parameters::{ConfigError, SsrParameters};

/// Inputs of the criss-cross network for one output cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrainStep {
    /// Output cycle, in `[0, L/R)`.
    pub cycle: usize,
    /// Rule applied during the cycle, `cycle mod R`.
    pub stage_index: usize,
    /// First offset of the column block read during the cycle, `R * floor(cycle / R)`.
    pub time_offset: usize,
}

/// Drive sequence that drains all lanes in `L / R` cycles.
///
/// The lanes are consumed one `R`-wide column block at a time. Within a block, the `R` cycles step
/// through the `R` rules, so that every `(lane, offset)` pair of the block is read exactly once.
#[derive(Debug, Clone)]
pub struct DrainSchedule {
    radix_mask: usize,
    cycles: usize,
    next: usize,
}

impl DrainSchedule {
    /// Schedule of an SSR geometry whose lane depth is a multiple of the radix.
    pub const fn new(params: &SsrParameters) -> Result<Self, ConfigError> {
        if let Err(err) = params.check_drainable() {
            return Err(err);
        }
        Ok(Self::from_validated(params))
    }

    pub(crate) const fn from_validated(params: &SsrParameters) -> Self {
        Self {
            radix_mask: params.radix_mask(),
            cycles: params.lane_depth(),
            next: 0,
        }
    }

    /// Total number of cycles, `L / R`.
    #[must_use]
    pub const fn cycles(&self) -> usize {
        self.cycles
    }

    /// Step of an arbitrary cycle.
    #[must_use]
    pub const fn step(&self, cycle: usize) -> DrainStep {
        DrainStep {
            cycle,
            stage_index: cycle & self.radix_mask,
            time_offset: cycle & !self.radix_mask,
        }
    }
}

impl Iterator for DrainSchedule {
    type Item = DrainStep;

    fn next(&mut self) -> Option<DrainStep> {
        if self.next == self.cycles {
            return None;
        }
        let step = self.step(self.next);
        self.next += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cycles - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DrainSchedule {}
