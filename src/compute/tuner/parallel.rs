//! Batch evaluation of independent candidates on worker threads.

use std::sync::Mutex;

use rayon::prelude::*;

use crate::compute::{GenerateError, LevelRng, WindowedGenerator};
use crate::schema::{EvaluationConfig, LevelConfig, ParameterVector, WinTally};

use super::TuneError;
use super::fitness::{FitnessEvaluator, Simulator};

/// Evaluate `candidates` in parallel and return their fitness in input order.
///
/// Every worker builds its own simulator and agent from the factories and
/// draws from its own stream. Stream seeds come from a master stream seeded
/// with `seed`, drawn in candidate order, so results do not depend on
/// scheduling. Candidates that win at least one
/// playthrough are recorded once in the returned tally.
pub fn evaluate_parallel<S, F, A>(
    candidates: &[ParameterVector],
    simulator_factory: F,
    agent_factory: A,
    level: &LevelConfig,
    evaluation: &EvaluationConfig,
    seed: u64,
) -> Result<(Vec<f32>, WinTally), TuneError>
where
    S: Simulator,
    F: Fn() -> S + Sync,
    A: Fn() -> S::Agent + Sync,
{
    let evaluator = FitnessEvaluator::new(*level, evaluation.clone());
    let tally = Mutex::new(WinTally::default());
    let mut master = LevelRng::new(seed);
    let seeds: Vec<u64> = candidates.iter().map(|_| master.next_seed()).collect();

    let fitness = candidates
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(candidate, &stream)| -> Result<f32, TuneError> {
            let generator = WindowedGenerator::new(candidate).map_err(GenerateError::from)?;
            let mut simulator = simulator_factory();
            let mut agent = agent_factory();
            let mut rng = LevelRng::new(stream);

            let stats = evaluator.evaluate(&generator, &mut simulator, &mut agent, &mut rng)?;
            if stats.wins > 0 {
                tally
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .record(candidate);
            }
            Ok(stats.win_rate())
        })
        .collect::<Result<Vec<f32>, TuneError>>()?;

    let tally = tally
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok((fitness, tally))
}
