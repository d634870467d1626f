pub mod constant;
pub mod errors;
pub mod numeric;
pub mod parameters;
pub mod permutation;
pub mod tables;
pub mod utils;
