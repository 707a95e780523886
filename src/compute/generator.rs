//! Common generator interfaces.

use crate::schema::{GeneratorConfig, GeneratorKind, ParamError, ParameterVector, SearchSpace};

use super::{LevelGrid, LevelRng, RulePipelineGenerator, TileGrid, WindowedGenerator};

/// Produces a level by writing into a grid.
pub trait LevelGenerator {
    /// Human-readable generator name.
    fn name(&self) -> &'static str;

    /// Generate a level into `grid` and return its serialized text.
    fn generate<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng)
    -> Result<String, GenerateError>;
}

/// A generator driven by a vector of indices into a [`SearchSpace`].
pub trait ParamLevelGenerator: LevelGenerator {
    /// The read-only table of candidate values.
    fn parameter_search_space(&self) -> &SearchSpace;

    /// Bind a parameter vector. Invalid vectors leave the current binding in place.
    fn set_parameters(&mut self, params: &ParameterVector) -> Result<(), ParamError>;
}

/// Level generation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "Grid {width}x{height} is too small for this generator (needs at least {min_width}x{min_height})"
    )]
    GridTooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },
    #[error("Invalid parameters: {0}")]
    Parameters(#[from] ParamError),
}

/// Build the configured generator and run it on a fresh grid.
pub fn generate_level(
    config: &GeneratorConfig,
    rng: &mut LevelRng,
) -> Result<LevelGrid, GenerateError> {
    let mut grid = LevelGrid::new(config.level.width, config.level.height);
    match &config.generator {
        GeneratorKind::RulePipeline { thresholds } => {
            RulePipelineGenerator::new(thresholds.clone()).generate(&mut grid, rng)?;
        }
        GeneratorKind::Windowed { parameters } => {
            WindowedGenerator::new(parameters)?.generate(&mut grid, rng)?;
        }
    }
    Ok(grid)
}

/// Reject grids smaller than `min_width` by `min_height`.
pub(crate) fn ensure_size<G: TileGrid>(
    grid: &G,
    min_width: usize,
    min_height: usize,
) -> Result<(), GenerateError> {
    if grid.width() < min_width || grid.height() < min_height {
        return Err(GenerateError::GridTooSmall {
            width: grid.width(),
            height: grid.height(),
            min_width,
            min_height,
        });
    }
    Ok(())
}
