//! Level Tuner - Procedural platformer levels with self-tuning parameters.
//!
//! This crate builds 2D platformer levels on a tile grid and tunes the
//! parameters of its constructive generator by simulating playthroughs of
//! the levels it produces.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Tiles, parameter search space, configuration and result types
//! - `compute`: Grid storage, the two generators and the evolutionary tuner
//!
//! # Example
//!
//! ```rust,no_run
//! use level_tuner::{
//!     compute::{LevelGenerator, LevelGrid, LevelRng, WindowedGenerator},
//!     schema::ParameterVector,
//! };
//!
//! // Bind a parameter vector (indices into the search space)
//! let generator = WindowedGenerator::new(&ParameterVector::new([2, 1, 0, 3, 1, 2, 0])).unwrap();
//!
//! // Generate a 150x16 level
//! let mut grid = LevelGrid::new(150, 16);
//! let mut rng = LevelRng::new(42);
//! let level = generator.generate(&mut grid, &mut rng).unwrap();
//!
//! println!("{level}");
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{LevelGrid, RulePipelineGenerator, WindowedGenerator, tuner::Tuner};
pub use schema::{GeneratorConfig, ParameterVector, Tile, TunerConfig};
