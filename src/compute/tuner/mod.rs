//! Self-tuning of windowed generator parameters through simulated play.
//!
//! # Overview
//!
//! - **Fitness** (`fitness`): the [`Simulator`] collaborator interface and
//!   win-rate evaluation of a parameter vector
//! - **Mutation** (`mutation`): random sampling and per-index mutation of
//!   vectors over the search space
//! - **Search** (`search`): the evolve/mutate loop and majority-vote choice
//!   of the final vector
//! - **Parallel** (`parallel`): batch evaluation of independent candidates
//!
//! # Example
//!
//! ```rust,no_run
//! use level_tuner::compute::tuner::{SimulationError, Simulator, Tuner};
//! use level_tuner::schema::{Outcome, TunerConfig};
//!
//! struct CoinFlip;
//!
//! impl Simulator for CoinFlip {
//!     type Agent = ();
//!
//!     fn play(&mut self, level: &str, _: &mut (), _: u32) -> Result<Outcome, SimulationError> {
//!         Ok(if level.len() % 2 == 0 { Outcome::Win } else { Outcome::Lose })
//!     }
//! }
//!
//! let mut tuner = Tuner::new(TunerConfig::default(), CoinFlip, ()).unwrap();
//! let result = tuner.tune(10, 20).unwrap();
//! println!("chosen: {:?} (fallback: {})", result.parameters, result.stats.fallback);
//! ```

mod fitness;
mod mutation;
mod parallel;
mod search;

pub use fitness::{FitnessEvaluator, PlayStats, SimulationError, Simulator};
pub use mutation::{mutate, random_point};
pub use parallel::evaluate_parallel;
pub use search::{TuneError, Tuner};
