//! Playthrough-based fitness for generation parameters.
//!
//! A candidate's fitness is the win rate of simulated playthroughs of the
//! levels it generates.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::compute::{LevelGenerator, LevelGrid, LevelRng};
use crate::schema::{EvaluationConfig, LevelConfig, Outcome};

use super::TuneError;

/// Runs a full playthrough of a serialized level.
///
/// The engine and the agent live outside this crate; implementations
/// adapt them to this interface.
pub trait Simulator {
    /// The playing agent handed to each playthrough.
    type Agent;

    /// Play `level` with `agent` until it ends or `time_budget` runs out.
    fn play(
        &mut self,
        level: &str,
        agent: &mut Self::Agent,
        time_budget: u32,
    ) -> Result<Outcome, SimulationError>;
}

/// Failures raised by a [`Simulator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("Malformed level: {0}")]
    MalformedLevel(String),
    #[error("Simulation engine failure: {0}")]
    Engine(String),
}

/// Win/lose accumulator over several playthroughs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayStats {
    pub plays: u32,
    pub wins: u32,
    pub losses: u32,
    pub timeouts: u32,
}

impl PlayStats {
    /// Count one playthrough.
    pub fn record(&mut self, outcome: Outcome) {
        self.plays += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Lose => self.losses += 1,
            Outcome::Timeout => self.timeouts += 1,
        }
    }

    /// Add another accumulator's counts.
    pub fn merge(&mut self, other: &PlayStats) {
        self.plays += other.plays;
        self.wins += other.wins;
        self.losses += other.losses;
        self.timeouts += other.timeouts;
    }

    /// Fraction of playthroughs won; zero before any play.
    pub fn win_rate(&self) -> f32 {
        if self.plays == 0 {
            0.0
        } else {
            self.wins as f32 / self.plays as f32
        }
    }
}

/// Generates levels and plays them through a [`Simulator`].
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    level: LevelConfig,
    evaluation: EvaluationConfig,
}

impl FitnessEvaluator {
    pub fn new(level: LevelConfig, evaluation: EvaluationConfig) -> Self {
        Self { level, evaluation }
    }

    /// Playthroughs performed by one [`FitnessEvaluator::evaluate`] call.
    pub fn plays_per_evaluation(&self) -> u64 {
        (self.evaluation.levels_per_evaluation * self.evaluation.plays_per_level) as u64
    }

    /// Play `levels_per_evaluation` fresh levels `plays_per_level` times each.
    pub fn evaluate<L, S>(
        &self,
        generator: &L,
        simulator: &mut S,
        agent: &mut S::Agent,
        rng: &mut LevelRng,
    ) -> Result<PlayStats, TuneError>
    where
        L: LevelGenerator,
        S: Simulator,
    {
        let mut stats = PlayStats::default();
        for _ in 0..self.evaluation.levels_per_evaluation {
            let level = self.generate(generator, rng)?;
            for _ in 0..self.evaluation.plays_per_level {
                let outcome = simulator.play(&level, agent, self.evaluation.time_budget)?;
                stats.record(outcome);
            }
        }
        debug!(
            "{}: {}/{} wins ({} timeouts)",
            generator.name(),
            stats.wins,
            stats.plays,
            stats.timeouts
        );
        Ok(stats)
    }

    /// Generate one level and play it once.
    pub fn play_once<L, S>(
        &self,
        generator: &L,
        simulator: &mut S,
        agent: &mut S::Agent,
        rng: &mut LevelRng,
    ) -> Result<Outcome, TuneError>
    where
        L: LevelGenerator,
        S: Simulator,
    {
        let level = self.generate(generator, rng)?;
        Ok(simulator.play(&level, agent, self.evaluation.time_budget)?)
    }

    fn generate<L: LevelGenerator>(
        &self,
        generator: &L,
        rng: &mut LevelRng,
    ) -> Result<String, TuneError> {
        let mut grid = LevelGrid::new(self.level.width, self.level.height);
        Ok(generator.generate(&mut grid, rng)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::WindowedGenerator;

    /// Replays a fixed outcome sequence, cycling.
    struct Scripted {
        outcomes: Vec<Outcome>,
        next: usize,
        budgets: Vec<u32>,
    }

    impl Simulator for Scripted {
        type Agent = ();

        fn play(
            &mut self,
            level: &str,
            _: &mut (),
            time_budget: u32,
        ) -> Result<Outcome, SimulationError> {
            assert!(level.contains('M'));
            self.budgets.push(time_budget);
            let outcome = self.outcomes[self.next % self.outcomes.len()];
            self.next += 1;
            Ok(outcome)
        }
    }

    #[test]
    fn test_play_stats() {
        let mut stats = PlayStats::default();
        assert_eq!(stats.win_rate(), 0.0);

        stats.record(Outcome::Win);
        stats.record(Outcome::Lose);
        stats.record(Outcome::Timeout);
        stats.record(Outcome::Win);
        assert_eq!(stats.plays, 4);
        assert_eq!(stats.win_rate(), 0.5);

        let mut total = PlayStats::default();
        total.merge(&stats);
        total.merge(&stats);
        assert_eq!(total.plays, 8);
        assert_eq!(total.timeouts, 2);
        assert_eq!(total.win_rate(), 0.5);
    }

    #[test]
    fn test_evaluate_counts_every_play() {
        let evaluator = FitnessEvaluator::new(
            LevelConfig::default(),
            EvaluationConfig {
                levels_per_evaluation: 2,
                plays_per_level: 3,
                time_budget: 20,
            },
        );
        let mut simulator = Scripted {
            outcomes: vec![Outcome::Win, Outcome::Lose, Outcome::Lose],
            next: 0,
            budgets: Vec::new(),
        };
        let mut rng = LevelRng::new(3);

        let stats = evaluator
            .evaluate(&WindowedGenerator::default(), &mut simulator, &mut (), &mut rng)
            .unwrap();
        assert_eq!(stats.plays, 6);
        assert_eq!(stats.wins, 2);
        assert_eq!(evaluator.plays_per_evaluation(), 6);
        assert!(simulator.budgets.iter().all(|&b| b == 20));
    }

    #[test]
    fn test_generation_errors_propagate() {
        let evaluator = FitnessEvaluator::new(
            LevelConfig {
                width: 20,
                height: 16,
            },
            EvaluationConfig::default(),
        );
        let mut simulator = Scripted {
            outcomes: vec![Outcome::Win],
            next: 0,
            budgets: Vec::new(),
        };
        let mut rng = LevelRng::new(0);

        let err = evaluator
            .play_once(&WindowedGenerator::default(), &mut simulator, &mut (), &mut rng)
            .unwrap_err();
        assert!(matches!(err, TuneError::Generate(_)));
        assert!(simulator.budgets.is_empty());
    }
}
