//! Criss-cross output reordering of a super-sample-rate FFT.
//!
//! After the butterfly stages, the `L` results sit in `R` lanes of depth `L / R`, digit-reversed
//! in time and shuffled across lanes. The criss-cross network reads one sample from every lane per
//! cycle and routes lane `(s + r) mod R` to output stream `r`, `s` being the stage index of the
//! cycle. Over the `L / R` cycles of the [`DrainSchedule`] every sample is read exactly once.

pub mod lanes;
pub mod network;
pub mod rule;
pub mod schedule;

pub use lanes::LaneBuffers;
pub use network::CrissCrossNetwork;
pub use rule::{CrissCrossRule, source_lane, source_offset};
pub use schedule::{DrainSchedule, DrainStep};
