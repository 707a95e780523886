//! Compute module - Level generation and parameter tuning.

mod generator;
mod grid;
mod rng;
mod rule_pipeline;
mod windowed;

pub mod tuner;

pub use generator::*;
pub use grid::*;
pub use rng::*;
pub use rule_pipeline::*;
pub use windowed::*;
