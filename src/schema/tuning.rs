//! Tuning outcome, progress and result types.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{GenerationSettings, PARAMETER_COUNT, Parameter, ParameterVector, VALUES_PER_PARAMETER};

/// Terminal result of one simulated playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
    Timeout,
}

impl Outcome {
    #[inline]
    pub fn is_win(self) -> bool {
        self == Outcome::Win
    }
}

/// Per-parameter, per-value win counters.
///
/// One sample is recorded for every evolve cycle whose best vector wins
/// its confirmation playthrough.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTally {
    counts: [[u32; VALUES_PER_PARAMETER]; PARAMETER_COUNT],
    wins: u32,
}

impl WinTally {
    /// Record a winning vector.
    pub fn record(&mut self, params: &ParameterVector) {
        self.wins += 1;
        for (row, &index) in self.counts.iter_mut().zip(params.indices()) {
            if let Some(slot) = row.get_mut(index) {
                *slot += 1;
            }
        }
    }

    /// Merge another tally into this one.
    pub fn merge(&mut self, other: &WinTally) {
        self.wins += other.wins;
        for (row, other_row) in self.counts.iter_mut().zip(&other.counts) {
            for (slot, other_slot) in row.iter_mut().zip(other_row) {
                *slot += other_slot;
            }
        }
    }

    /// Total recorded wins.
    pub fn wins(&self) -> u32 {
        self.wins
    }

    /// Win counts for each candidate value of a parameter.
    pub fn counts(&self, parameter: Parameter) -> &[u32; VALUES_PER_PARAMETER] {
        &self.counts[parameter.index()]
    }

    /// Sum of a parameter's counters; equals `wins()` for every parameter.
    pub fn parameter_total(&self, parameter: Parameter) -> u32 {
        self.counts(parameter).iter().sum()
    }
}

/// Progress report emitted after each evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuneProgress {
    /// Current evolve cycle (0-based).
    pub cycle: usize,
    /// Total evolve cycles requested.
    pub total_cycles: usize,
    /// Mutation step within the cycle (0 is the random initial vector).
    pub iteration: usize,
    /// Mutation steps per cycle.
    pub total_iterations: usize,
    /// Best fitness within the current cycle.
    pub best_fitness: f32,
    /// Winning cycles so far.
    pub wins: u32,
    /// Evaluations performed so far.
    pub evaluations: u64,
}

/// Statistics from a tuning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningStats {
    /// Evolve cycles run.
    pub evolve_cycles: usize,
    /// Candidate evaluations performed.
    pub evaluations: u64,
    /// Simulated playthroughs, confirmation plays included.
    pub playthroughs: u64,
    /// Cycles whose best vector won its confirmation playthrough.
    pub wins: u32,
    /// No win was ever observed; the last best vector was kept.
    pub fallback: bool,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
}

/// Final result of a tuning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningResult {
    /// The vector bound to the generator.
    pub parameters: ParameterVector,
    /// Concrete settings of the bound vector.
    pub settings: GenerationSettings,
    /// Win counts per parameter value.
    pub tally: WinTally,
    /// Run statistics.
    pub stats: TuningStats,
}

impl TuningResult {
    /// Write as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Read a result written by [`TuningResult::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_record() {
        let mut tally = WinTally::default();
        tally.record(&ParameterVector::new([0, 1, 2, 3, 4, 0, 1]));
        tally.record(&ParameterVector::new([0, 1, 2, 3, 4, 4, 4]));

        assert_eq!(tally.wins(), 2);
        assert_eq!(tally.counts(Parameter::GroundYLength), &[2, 0, 0, 0, 0]);
        assert_eq!(tally.counts(Parameter::PipeProb), &[0, 1, 0, 0, 1]);
        for parameter in Parameter::ALL {
            assert_eq!(tally.parameter_total(parameter), 2);
        }
    }

    #[test]
    fn test_tally_merge() {
        let mut a = WinTally::default();
        let mut b = WinTally::default();
        a.record(&ParameterVector::new([1; PARAMETER_COUNT]));
        b.record(&ParameterVector::new([1; PARAMETER_COUNT]));
        b.record(&ParameterVector::new([3; PARAMETER_COUNT]));
        a.merge(&b);

        assert_eq!(a.wins(), 3);
        assert_eq!(a.counts(Parameter::CoinProb), &[0, 2, 0, 1, 0]);
    }

    #[test]
    fn test_outcome_is_win() {
        assert!(Outcome::Win.is_win());
        assert!(!Outcome::Lose.is_win());
        assert!(!Outcome::Timeout.is_win());
    }
}
