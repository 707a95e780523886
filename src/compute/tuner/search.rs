//! (1+1) evolutionary search over parameter vectors.

use std::time::Instant;

use log::{debug, info, warn};

use crate::compute::{GenerateError, LevelRng, ParamLevelGenerator, WindowedGenerator};
use crate::schema::{
    ConfigError, Parameter, ParameterVector, TuneProgress, TunerConfig, TuningResult, TuningStats,
    WinTally,
};

use super::fitness::{FitnessEvaluator, SimulationError, Simulator};
use super::mutation::{mutate, random_point};

/// Tuning failures. Lost or timed-out playthroughs are not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TuneError {
    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimulationError),
    #[error("Level generation failed: {0}")]
    Generate(#[from] GenerateError),
}

/// Tunes a [`WindowedGenerator`] against a [`Simulator`].
///
/// Each evolve cycle starts from a random vector and hill-climbs with
/// mutation, accepting only strictly fitter candidates. The cycle's best
/// vector then plays one confirmation level; wins are tallied per
/// parameter value and the final vector takes, for every parameter, the
/// value that won most often.
pub struct Tuner<S: Simulator> {
    config: TunerConfig,
    simulator: S,
    agent: S::Agent,
    generator: WindowedGenerator,
    evaluator: FitnessEvaluator,
    rng: LevelRng,
    best: ParameterVector,
    tally: WinTally,
    evaluations: u64,
    playthroughs: u64,
}

impl<S: Simulator> Tuner<S> {
    /// Create a tuner bound to a random initial vector.
    pub fn new(config: TunerConfig, simulator: S, agent: S::Agent) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = LevelRng::from_seed_option(config.random_seed);
        let mut generator = WindowedGenerator::default();
        let best = random_point(generator.parameter_search_space(), &mut rng);
        generator.set_parameters(&best)?;
        let evaluator = FitnessEvaluator::new(config.level, config.evaluation.clone());

        Ok(Self {
            config,
            simulator,
            agent,
            generator,
            evaluator,
            rng,
            best,
            tally: WinTally::default(),
            evaluations: 0,
            playthroughs: 0,
        })
    }

    /// The vector currently bound to the generator.
    pub fn current_best(&self) -> &ParameterVector {
        &self.best
    }

    /// Win tally of the last tuning run.
    pub fn tally(&self) -> &WinTally {
        &self.tally
    }

    pub fn generator(&self) -> &WindowedGenerator {
        &self.generator
    }

    /// Release the tuned generator for standalone use.
    pub fn into_generator(self) -> WindowedGenerator {
        self.generator
    }

    /// Win rate of levels generated under `candidate`.
    fn fitness_of(&mut self, candidate: &ParameterVector) -> Result<f32, TuneError> {
        let generator = WindowedGenerator::new(candidate).map_err(GenerateError::from)?;
        let stats = self.evaluator.evaluate(
            &generator,
            &mut self.simulator,
            &mut self.agent,
            &mut self.rng,
        )?;
        self.evaluations += 1;
        self.playthroughs += stats.plays as u64;
        Ok(stats.win_rate())
    }

    /// Per parameter, the most-won index; ties broken uniformly at random.
    fn majority_vector(&mut self) -> ParameterVector {
        let mut chosen = ParameterVector::default();
        for parameter in Parameter::ALL {
            let counts = self.tally.counts(parameter);
            let max = counts.iter().copied().max().unwrap_or(0);
            let leaders: Vec<usize> = (0..counts.len()).filter(|&i| counts[i] == max).collect();
            chosen.indices_mut()[parameter.index()] =
                self.rng.choose(&leaders).copied().unwrap_or(0);
        }
        chosen
    }

    /// Run tuning (blocking).
    pub fn tune(
        &mut self,
        evolve_iterations: usize,
        mutate_iterations: usize,
    ) -> Result<TuningResult, TuneError> {
        self.tune_with_callback(evolve_iterations, mutate_iterations, |_| {})
    }

    /// Run tuning, reporting progress after each evaluation.
    ///
    /// The tally and counters restart with every call. With zero evolve
    /// cycles the bound vector is returned as is and the simulator is never
    /// called.
    pub fn tune_with_callback<F>(
        &mut self,
        evolve_iterations: usize,
        mutate_iterations: usize,
        mut callback: F,
    ) -> Result<TuningResult, TuneError>
    where
        F: FnMut(&TuneProgress),
    {
        let start_time = Instant::now();
        let rate = self.config.effective_mutation_rate();
        self.tally = WinTally::default();
        self.evaluations = 0;
        self.playthroughs = 0;

        for cycle in 0..evolve_iterations {
            let mut best = random_point(self.generator.parameter_search_space(), &mut self.rng);
            let mut best_fitness = self.fitness_of(&best)?;

            let mut report = |tuner: &Self, iteration: usize, best_fitness: f32| {
                callback(&TuneProgress {
                    cycle,
                    total_cycles: evolve_iterations,
                    iteration,
                    total_iterations: mutate_iterations,
                    best_fitness,
                    wins: tuner.tally.wins(),
                    evaluations: tuner.evaluations,
                });
            };
            report(&*self, 0, best_fitness);

            for iteration in 1..=mutate_iterations {
                let space = self.generator.parameter_search_space();
                let candidate = mutate(&best, space, rate, &mut self.rng);
                let fitness = self.fitness_of(&candidate)?;
                debug!(
                    "cycle {cycle} step {iteration}: {:?} fitness {fitness:.3} (best {best_fitness:.3})",
                    candidate.indices()
                );
                if fitness > best_fitness {
                    best = candidate;
                    best_fitness = fitness;
                }
                report(&*self, iteration, best_fitness);
            }

            self.best = best;
            self.generator
                .set_parameters(&best)
                .map_err(GenerateError::from)?;
            let outcome = self.evaluator.play_once(
                &self.generator,
                &mut self.simulator,
                &mut self.agent,
                &mut self.rng,
            )?;
            self.playthroughs += 1;
            if outcome.is_win() {
                self.tally.record(&best);
            }
            info!(
                "cycle {}/{}: best {:?} fitness {:.3}, confirmation {:?}",
                cycle + 1,
                evolve_iterations,
                best.indices(),
                best_fitness,
                outcome
            );
        }

        let fallback = self.tally.wins() == 0;
        if fallback {
            if evolve_iterations > 0 {
                warn!(
                    "no winning cycle in {} attempts, keeping last best {:?}",
                    evolve_iterations,
                    self.best.indices()
                );
            }
        } else {
            self.best = self.majority_vector();
            self.generator
                .set_parameters(&self.best)
                .map_err(GenerateError::from)?;
            info!(
                "majority vector {:?} from {} winning cycles",
                self.best.indices(),
                self.tally.wins()
            );
        }

        Ok(TuningResult {
            parameters: self.best,
            settings: self.generator.settings().clone(),
            tally: self.tally.clone(),
            stats: TuningStats {
                evolve_cycles: evolve_iterations,
                evaluations: self.evaluations,
                playthroughs: self.playthroughs,
                wins: self.tally.wins(),
                fallback,
                elapsed_seconds: start_time.elapsed().as_secs_f64(),
            },
        })
    }
}
