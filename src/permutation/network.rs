#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{instrument, trace};

use super::{
    lanes::LaneBuffers,
    rule::CrissCrossRule,
    schedule::{DrainSchedule, DrainStep},
};
use crate::parameters::{ConfigError, SsrParameters};

/// Criss-cross multiplexer reading `R` lanes onto `R` output streams.
///
/// The network holds one [`CrissCrossRule`] per stage index; the rule of a cycle is selected by
/// indexing, never by searching.
#[derive(Debug, Clone)]
pub struct CrissCrossNetwork {
    params: SsrParameters,
    rules: Vec<CrissCrossRule>,
}

impl CrissCrossNetwork {
    /// Builds the network of an SSR geometry.
    ///
    /// The lanes must be deep enough to be drained by whole `R`-wide column blocks.
    pub fn new(params: SsrParameters) -> Result<Self, ConfigError> {
        params.check_drainable()?;
        let radix = params.radix();
        let rules: Vec<_> = (0..radix)
            .map(|stage_index| CrissCrossRule::new(stage_index, radix))
            .collect();
        debug_assert!(rules.iter().all(CrissCrossRule::is_bijection));
        Ok(Self { params, rules })
    }

    #[must_use]
    pub const fn params(&self) -> &SsrParameters {
        &self.params
    }

    /// Rule applied for `stage_index`.
    ///
    /// # Panics
    /// Panics if `stage_index >= R`.
    #[must_use]
    pub fn rule(&self, stage_index: usize) -> &CrissCrossRule {
        self.check_stage_index(stage_index);
        &self.rules[stage_index]
    }

    /// Drive sequence draining the lanes of this geometry.
    #[must_use]
    pub const fn schedule(&self) -> DrainSchedule {
        DrainSchedule::from_validated(&self.params)
    }

    /// Produces the `R` outputs of one cycle.
    ///
    /// `output[r] = lanes[(stage_index + r) mod R][r + time_offset]`.
    ///
    /// # Panics
    /// Panics if the lanes do not have the network's geometry, if `stage_index >= R`, or if
    /// `time_offset + R > L / R` (some output stream would read past the end of its lane).
    #[must_use]
    pub fn permute<T: Copy>(
        &self,
        stage_index: usize,
        time_offset: usize,
        lanes: &LaneBuffers<T>,
    ) -> Vec<T> {
        self.check_lanes(lanes);
        let mut out = vec![lanes[(0, 0)]; self.params.radix()];
        self.permute_into(stage_index, time_offset, lanes, &mut out);
        out
    }

    /// Same as [`Self::permute`], writing into `out` (of length `R`).
    pub fn permute_into<T: Copy>(
        &self,
        stage_index: usize,
        time_offset: usize,
        lanes: &LaneBuffers<T>,
        out: &mut [T],
    ) {
        self.check_lanes(lanes);
        self.check_stage_index(stage_index);
        let radix = self.params.radix();
        let depth = self.params.lane_depth();
        assert!(
            time_offset + radix <= depth,
            "time offset {time_offset} reads past the lane depth {depth} (radix {radix})"
        );
        assert_eq!(out.len(), radix, "output must hold one sample per lane");

        self.rules[stage_index].apply(time_offset, lanes, out);
    }

    /// Lazily produces the output vector of every cycle, in drive order.
    pub fn cycles<'a, T: Copy>(
        &'a self,
        lanes: &'a LaneBuffers<T>,
    ) -> impl ExactSizeIterator<Item = (DrainStep, Vec<T>)> + 'a {
        self.check_lanes(lanes);
        self.schedule().map(move |step| {
            let out = self.permute(step.stage_index, step.time_offset, lanes);
            (step, out)
        })
    }

    /// Drains all lanes, returning the `L` outputs in drive order.
    #[must_use]
    pub fn drain<T: Copy + Send + Sync>(&self, lanes: &LaneBuffers<T>) -> Vec<T> {
        self.check_lanes(lanes);
        let mut out = vec![lanes[(0, 0)]; self.params.transform_len()];
        self.drain_into(lanes, &mut out);
        out
    }

    /// Drains all lanes into `out` (of length `L`), cycle `t` filling `out[t * R..(t + 1) * R]`.
    ///
    /// Lanes are read-only during the drain, so with the `parallel` feature the cycles are
    /// evaluated concurrently.
    #[instrument(skip_all, fields(
        transform_len = self.params.transform_len(),
        radix = self.params.radix(),
    ), level = "debug")]
    pub fn drain_into<T: Copy + Send + Sync>(&self, lanes: &LaneBuffers<T>, out: &mut [T]) {
        self.check_lanes(lanes);
        assert_eq!(
            out.len(),
            self.params.transform_len(),
            "output must hold the whole transform"
        );
        let radix = self.params.radix();
        let schedule = self.schedule();

        #[cfg(feature = "parallel")]
        out.par_chunks_exact_mut(radix)
            .enumerate()
            .for_each(|(cycle, chunk)| {
                let step = schedule.step(cycle);
                self.rules[step.stage_index].apply(step.time_offset, lanes, chunk);
            });

        #[cfg(not(feature = "parallel"))]
        for (chunk, step) in out.chunks_exact_mut(radix).zip(schedule) {
            self.rules[step.stage_index].apply(step.time_offset, lanes, chunk);
        }

        trace!(cycles = self.params.lane_depth(), "drained lanes");
    }

    /// Write-side inverse of [`Self::drain`]: distributes `samples` over the lanes so that
    /// draining them yields `samples` back in order.
    ///
    /// # Panics
    /// Panics if `samples.len() != L`.
    #[must_use]
    pub fn scatter<T: Copy>(&self, samples: &[T]) -> LaneBuffers<T> {
        assert_eq!(
            samples.len(),
            self.params.transform_len(),
            "expected one sample per transform point"
        );
        let radix = self.params.radix();
        let mut lanes = LaneBuffers::from_fn(&self.params, |_, _| samples[0]);
        for (step, chunk) in self.schedule().zip(samples.chunks_exact(radix)) {
            let rule = &self.rules[step.stage_index];
            for (r, (&lane, &sample)) in rule.source_lanes().iter().zip(chunk).enumerate() {
                lanes[(lane, step.time_offset + r)] = sample;
            }
        }
        lanes
    }

    fn check_stage_index(&self, stage_index: usize) {
        assert!(
            stage_index < self.params.radix(),
            "stage index {stage_index} out of range for radix {}",
            self.params.radix()
        );
    }

    fn check_lanes<T>(&self, lanes: &LaneBuffers<T>) {
        assert!(
            lanes.matches(&self.params),
            "lane buffers are {} x {}, expected {} x {}",
            lanes.radix(),
            lanes.depth(),
            self.params.radix(),
            self.params.lane_depth()
        );
    }
}
