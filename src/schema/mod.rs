//! Schema module - Tiles, parameters, configuration and tuning result types.

mod config;
mod params;
mod tile;
mod tuning;

pub use config::*;
pub use params::*;
pub use tile::*;
pub use tuning::*;
