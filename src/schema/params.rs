//! Tunable generation parameters and their discretized search space.

use serde::{Deserialize, Serialize};

/// Number of tunable parameters.
pub const PARAMETER_COUNT: usize = 7;

/// Number of candidate values per parameter.
pub const VALUES_PER_PARAMETER: usize = 5;

/// A tunable parameter of the windowed generator, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Lowest row a base floor may rise to; also bounds new floor seeding.
    GroundYLength,
    /// Probability of placing or expanding ground rather than bricks.
    GroundProb,
    /// Probability of expanding ground/brick obstacles.
    ObstaclesProb,
    /// Probability of placing a coin.
    CoinProb,
    /// Probability of placing an enemy.
    EnemyProb,
    /// Upper bound driver for pipe length.
    PipeLength,
    /// Probability of placing a pipe in a window.
    PipeProb,
}

impl Parameter {
    pub const ALL: [Parameter; PARAMETER_COUNT] = [
        Parameter::GroundYLength,
        Parameter::GroundProb,
        Parameter::ObstaclesProb,
        Parameter::CoinProb,
        Parameter::EnemyProb,
        Parameter::PipeLength,
        Parameter::PipeProb,
    ];

    /// Position of this parameter in a vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Parameter::GroundYLength => "GROUND_Y_LENGTH",
            Parameter::GroundProb => "GROUND_PROB",
            Parameter::ObstaclesProb => "OBSTACLES_PROB",
            Parameter::CoinProb => "COIN_PROB",
            Parameter::EnemyProb => "ENEMY_PROB",
            Parameter::PipeLength => "PIPE_LENGTH",
            Parameter::PipeProb => "PIPE_PROB",
        }
    }
}

/// Fixed table of candidate values, one row per [`Parameter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    rows: [[f32; VALUES_PER_PARAMETER]; PARAMETER_COUNT],
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            rows: [
                [11.0, 12.0, 13.0, 14.0, 15.0],
                [0.3, 0.35, 0.4, 0.45, 0.5],
                [0.2, 0.25, 0.3, 0.35, 0.4],
                [0.1, 0.15, 0.2, 0.25, 0.3],
                [0.1, 0.125, 0.15, 0.175, 0.2],
                [1.0, 2.0, 3.0, 4.0, 5.0],
                [0.1, 0.15, 0.2, 0.25, 0.3],
            ],
        }
    }
}

impl SearchSpace {
    /// All rows, in parameter order.
    pub fn rows(&self) -> &[[f32; VALUES_PER_PARAMETER]; PARAMETER_COUNT] {
        &self.rows
    }

    /// Candidate values for one parameter.
    pub fn values(&self, parameter: Parameter) -> &[f32; VALUES_PER_PARAMETER] {
        &self.rows[parameter.index()]
    }

    /// Number of candidate values for the parameter at `position`.
    pub fn len_of(&self, position: usize) -> usize {
        self.rows.get(position).map_or(0, |row| row.len())
    }

    /// Resolve a vector into concrete settings, rejecting out-of-range indices.
    pub fn resolve(&self, params: &ParameterVector) -> Result<GenerationSettings, ParamError> {
        self.check(params)?;
        let value = |p: Parameter| self.rows[p.index()][params.get(p)];

        Ok(GenerationSettings {
            ground_y_length: value(Parameter::GroundYLength) as usize,
            ground_prob: value(Parameter::GroundProb),
            obstacles_prob: value(Parameter::ObstaclesProb),
            coin_prob: value(Parameter::CoinProb),
            enemy_prob: value(Parameter::EnemyProb),
            pipe_length: value(Parameter::PipeLength) as usize,
            pipe_prob: value(Parameter::PipeProb),
        })
    }

    /// Validate that every index addresses its row.
    pub fn check(&self, params: &ParameterVector) -> Result<(), ParamError> {
        for parameter in Parameter::ALL {
            let index = params.get(parameter);
            let len = self.len_of(parameter.index());
            if index >= len {
                return Err(ParamError::IndexOutOfRange {
                    parameter: parameter.name(),
                    index,
                    len,
                });
            }
        }
        Ok(())
    }
}

/// Ordered indices into a [`SearchSpace`], one per [`Parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ParameterVector([usize; PARAMETER_COUNT]);

impl ParameterVector {
    pub fn new(indices: [usize; PARAMETER_COUNT]) -> Self {
        Self(indices)
    }

    /// Build from a slice, rejecting the wrong length.
    pub fn from_slice(indices: &[usize]) -> Result<Self, ParamError> {
        let array: [usize; PARAMETER_COUNT] =
            indices.try_into().map_err(|_| ParamError::WrongLength {
                expected: PARAMETER_COUNT,
                got: indices.len(),
            })?;
        Ok(Self(array))
    }

    #[inline]
    pub fn get(&self, parameter: Parameter) -> usize {
        self.0[parameter.index()]
    }

    pub fn indices(&self) -> &[usize; PARAMETER_COUNT] {
        &self.0
    }

    pub(crate) fn indices_mut(&mut self) -> &mut [usize; PARAMETER_COUNT] {
        &mut self.0
    }
}

/// Concrete numeric settings derived from a bound [`ParameterVector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub ground_y_length: usize,
    pub ground_prob: f32,
    pub obstacles_prob: f32,
    pub coin_prob: f32,
    pub enemy_prob: f32,
    pub pipe_length: usize,
    pub pipe_prob: f32,
}

/// Parameter binding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("Expected {expected} parameter indices, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("Index {index} for {parameter} is outside its {len} candidate values")]
    IndexOutOfRange {
        parameter: &'static str,
        index: usize,
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_space_shape() {
        let space = SearchSpace::default();
        assert_eq!(space.rows().len(), PARAMETER_COUNT);
        for row in space.rows() {
            assert_eq!(row.len(), VALUES_PER_PARAMETER);
        }
        assert_eq!(space.values(Parameter::PipeLength)[0], 1.0);
    }

    #[test]
    fn test_resolve() {
        let space = SearchSpace::default();
        let settings = space
            .resolve(&ParameterVector::new([0, 1, 2, 3, 4, 0, 4]))
            .unwrap();
        assert_eq!(settings.ground_y_length, 11);
        assert_eq!(settings.ground_prob, 0.35);
        assert_eq!(settings.obstacles_prob, 0.3);
        assert_eq!(settings.coin_prob, 0.25);
        assert_eq!(settings.enemy_prob, 0.2);
        assert_eq!(settings.pipe_length, 1);
        assert_eq!(settings.pipe_prob, 0.3);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let space = SearchSpace::default();
        let err = space
            .resolve(&ParameterVector::new([0, 0, 0, 0, 5, 0, 0]))
            .unwrap_err();
        assert_eq!(
            err,
            ParamError::IndexOutOfRange {
                parameter: "ENEMY_PROB",
                index: 5,
                len: 5
            }
        );
    }

    #[test]
    fn test_from_slice_length() {
        assert!(ParameterVector::from_slice(&[0; 7]).is_ok());
        assert_eq!(
            ParameterVector::from_slice(&[0; 6]),
            Err(ParamError::WrongLength {
                expected: 7,
                got: 6
            })
        );
    }
}
