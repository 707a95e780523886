//! Configuration types for level generation and tuning.

use serde::{Deserialize, Serialize};

use super::{PARAMETER_COUNT, ParamError, ParameterVector, SearchSpace};

/// Level grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level width in tiles.
    pub width: usize,
    /// Level height in tiles. Row `height - 1` is the floor.
    pub height: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 16,
        }
    }
}

impl LevelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        Ok(())
    }
}

/// Draw thresholds for the rule pipeline.
///
/// Each rule compares a fresh standard normal draw (or its magnitude)
/// against one of these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// Initial fill keeps a random tile when `|N| < fill`.
    #[serde(default = "default_fill")]
    pub fill: f64,
    /// A floor cell becomes ground when `N < floor`.
    #[serde(default = "default_floor")]
    pub floor: f64,
    /// A cell above ground is cleared when `N < clear_above_ground`.
    #[serde(default = "default_clear_above_ground")]
    pub clear_above_ground: f64,
    /// An enemy or pipe is seeded above ground when `N > enemy_seed`.
    #[serde(default = "default_enemy_seed")]
    pub enemy_seed: f64,
    /// A pipe gains a flower when `N < pipe_flower`.
    #[serde(default = "default_pipe_flower")]
    pub pipe_flower: f64,
    /// A brick is placed three rows above ground when `|N| > overhead_brick`.
    #[serde(default = "default_overhead_brick")]
    pub overhead_brick: f64,
    /// A floating walking enemy is removed when `|N| < flying_removal`, else it grows wings.
    #[serde(default = "default_flying_removal")]
    pub flying_removal: f64,
    /// An upper-region tile is cleared when `|N| > density_thinning`.
    #[serde(default = "default_density_thinning")]
    pub density_thinning: f64,
    /// Platform extension thresholds for one, two and three extra tiles.
    #[serde(default = "default_platform_extension")]
    pub platform_extension: (f64, f64, f64),
    /// An enemy is removed when `|N| > enemy_thinning`.
    #[serde(default = "default_enemy_thinning")]
    pub enemy_thinning: f64,
    /// A tile just above the floor is removed when `|N| > ground_enemy_reduction`.
    #[serde(default = "default_ground_enemy_reduction")]
    pub ground_enemy_reduction: f64,
    /// Two rows above a block are cleared when `|N| < clearance`.
    #[serde(default = "default_clearance")]
    pub clearance: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            fill: default_fill(),
            floor: default_floor(),
            clear_above_ground: default_clear_above_ground(),
            enemy_seed: default_enemy_seed(),
            pipe_flower: default_pipe_flower(),
            overhead_brick: default_overhead_brick(),
            flying_removal: default_flying_removal(),
            density_thinning: default_density_thinning(),
            platform_extension: default_platform_extension(),
            enemy_thinning: default_enemy_thinning(),
            ground_enemy_reduction: default_ground_enemy_reduction(),
            clearance: default_clearance(),
        }
    }
}

fn default_fill() -> f64 {
    0.5
}
fn default_floor() -> f64 {
    0.75
}
fn default_clear_above_ground() -> f64 {
    0.55
}
fn default_enemy_seed() -> f64 {
    0.7
}
fn default_pipe_flower() -> f64 {
    0.5
}
fn default_overhead_brick() -> f64 {
    1.0
}
fn default_flying_removal() -> f64 {
    1.0
}
fn default_density_thinning() -> f64 {
    0.6
}
fn default_platform_extension() -> (f64, f64, f64) {
    (0.5, 1.5, 2.0)
}
fn default_enemy_thinning() -> f64 {
    0.5
}
fn default_ground_enemy_reduction() -> f64 {
    0.7
}
fn default_clearance() -> f64 {
    0.5
}

/// Which generator to run and how it is parameterized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneratorKind {
    /// Ordered stochastic corrective rules over a random fill.
    RulePipeline {
        #[serde(default)]
        thresholds: RuleThresholds,
    },
    /// Windowed constructive generator bound to a parameter vector.
    Windowed {
        #[serde(default)]
        parameters: ParameterVector,
    },
}

impl Default for GeneratorKind {
    fn default() -> Self {
        Self::Windowed {
            parameters: ParameterVector::default(),
        }
    }
}

/// Top-level configuration for standalone level generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Grid dimensions.
    #[serde(default)]
    pub level: LevelConfig,
    /// Generator selection.
    #[serde(default)]
    pub generator: GeneratorKind,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level.validate()?;
        if let GeneratorKind::Windowed { parameters } = &self.generator {
            SearchSpace::default().check(parameters)?;
        }
        Ok(())
    }
}

/// How a single candidate is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Levels generated per evaluation.
    #[serde(default = "default_levels_per_evaluation")]
    pub levels_per_evaluation: usize,
    /// Playthroughs per generated level.
    #[serde(default = "default_plays_per_level")]
    pub plays_per_level: usize,
    /// Time budget handed to the simulator for each playthrough.
    #[serde(default = "default_time_budget")]
    pub time_budget: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            levels_per_evaluation: default_levels_per_evaluation(),
            plays_per_level: default_plays_per_level(),
            time_budget: default_time_budget(),
        }
    }
}

fn default_levels_per_evaluation() -> usize {
    1
}
fn default_plays_per_level() -> usize {
    1
}
fn default_time_budget() -> u32 {
    20
}

/// Configuration for the evolutionary tuner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TunerConfig {
    /// Level dimensions used for every evaluation.
    #[serde(default)]
    pub level: LevelConfig,
    /// Evaluation settings.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Per-index mutation probability. `None` means `1 / PARAMETER_COUNT`.
    #[serde(default)]
    pub mutation_rate: Option<f32>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl TunerConfig {
    /// Effective per-index mutation probability.
    pub fn effective_mutation_rate(&self) -> f32 {
        self.mutation_rate.unwrap_or(1.0 / PARAMETER_COUNT as f32)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level.validate()?;
        if self.evaluation.levels_per_evaluation == 0 || self.evaluation.plays_per_level == 0 {
            return Err(ConfigError::InvalidEvaluation);
        }
        let rate = self.effective_mutation_rate();
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidMutationRate(rate));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Level dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Evaluation must generate at least one level and play it at least once")]
    InvalidEvaluation,
    #[error("Mutation rate {0} must lie in [0, 1]")]
    InvalidMutationRate(f32),
    #[error("Invalid parameters: {0}")]
    Parameters(#[from] ParamError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
        assert!(TunerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let config = GeneratorConfig {
            generator: GeneratorKind::Windowed {
                parameters: ParameterVector::new([0, 0, 9, 0, 0, 0, 0]),
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Parameters(ParamError::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_invalid_mutation_rate() {
        let config = TunerConfig {
            mutation_rate: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMutationRate(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let config = GeneratorConfig {
            generator: GeneratorKind::RulePipeline {
                thresholds: RuleThresholds::default(),
            },
            random_seed: Some(7),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GeneratorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.random_seed, Some(7));
        assert!(matches!(parsed.generator, GeneratorKind::RulePipeline { .. }));
    }

    #[test]
    fn test_thresholds_default_when_omitted() {
        let parsed: GeneratorConfig =
            serde_json::from_str(r#"{"generator": {"type": "RulePipeline"}}"#).unwrap();
        match parsed.generator {
            GeneratorKind::RulePipeline { thresholds } => {
                assert_eq!(thresholds, RuleThresholds::default());
            }
            _ => panic!("expected rule pipeline"),
        }
        assert_eq!(parsed.level, LevelConfig::default());
    }
}
