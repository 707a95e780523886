//! Rule-pipeline generator.
//!
//! Starts from a sparse random fill and applies fifteen ordered corrective
//! passes in place. Each pass sees the output of the previous ones, and
//! every stochastic decision takes its own standard normal draw.
//! Enemy thinning applies to winged spikies like any other enemy.

use log::debug;

use crate::schema::{RuleThresholds, Tile, TileKind};

use super::generator::ensure_size;
use super::{GenerateError, LevelGenerator, LevelRng, TileGrid};

/// Tiles seeded directly above ground.
const GROUND_SEEDS: &[Tile] = &[
    Tile::Goomba,
    Tile::RedKoopa,
    Tile::GreenKoopa,
    Tile::Spiky,
    Tile::Pipe,
];

/// Smallest grid the pipeline accepts: four cleared spawn columns plus two exit columns,
/// and room for the pit band four rows above the floor.
const MIN_WIDTH: usize = 6;
const MIN_HEIGHT: usize = 5;

/// Generator applying ordered stochastic rules over a random fill.
#[derive(Debug, Clone, Default)]
pub struct RulePipelineGenerator {
    thresholds: RuleThresholds,
}

impl RulePipelineGenerator {
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self { thresholds }
    }

    /// Pass 1: sparse fill of every non-floor cell.
    fn random_fill<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        let alphabet = Tile::fill_alphabet();
        for x in 0..grid.width() as i32 {
            for y in 0..grid.floor_row() {
                let tile = if rng.abs_gaussian() < self.thresholds.fill {
                    rng.pick(alphabet)
                } else {
                    Tile::Empty
                };
                grid.set_tile(x, y, tile);
            }
        }
    }

    /// Pass 2: floor synthesis with spawn/exit footing and bounded pits.
    fn synthesize_floor<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        let w = grid.width() as i32;
        let floor = grid.floor_row();

        grid.set_tile(0, floor, Tile::Ground);
        grid.set_tile(1, floor, Tile::Ground);
        for x in 2..w {
            let tile = if rng.gaussian() < self.thresholds.floor {
                Tile::Ground
            } else {
                Tile::Empty
            };
            grid.set_tile(x, floor, tile);
        }

        // Single-cell holes are filled in.
        for x in 2..w - 2 {
            if grid.tile(x, floor) == Tile::Empty
                && grid.tile(x - 1, floor) == Tile::Ground
                && grid.tile(x + 1, floor) == Tile::Ground
            {
                grid.set_tile(x, floor, Tile::Ground);
            }
        }

        grid.set_tile(w - 1, floor, Tile::Ground);
        grid.set_tile(w - 2, floor, Tile::Ground);

        // No run of four empty floor cells survives the left-to-right scan.
        for x in 0..w - 3 {
            if (x..x + 4).all(|i| grid.tile(i, floor) == Tile::Empty) {
                grid.set_tile(x, floor, Tile::Ground);
            }
        }
    }

    /// Pass 3: clear most of the 3x3 block directly above each ground tile.
    fn clear_above_ground<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        let w = grid.width() as i32;
        let h = grid.height() as i32;
        for x in 0..w {
            for y in 0..h {
                if grid.tile(x, y) != Tile::Ground {
                    continue;
                }
                let (x0, x1) = ((x - 1).max(0), (x + 1).min(w - 1));
                let (y0, y1) = ((y - 3).max(0), (y - 1).max(0));
                for i in x0..=x1 {
                    for j in y0..=y1 {
                        if rng.gaussian() < self.thresholds.clear_above_ground {
                            grid.set_tile(i, j, Tile::Empty);
                        }
                    }
                }
            }
        }
    }

    /// Pass 4: seed walking enemies or pipes on top of ground.
    fn seed_enemies<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        for x in 0..grid.width() as i32 {
            for y in 1..grid.height() as i32 {
                if grid.tile(x, y) == Tile::Ground && rng.gaussian() > self.thresholds.enemy_seed {
                    grid.set_tile(x, y - 1, rng.pick(GROUND_SEEDS));
                }
            }
        }
    }

    /// Pass 5: pipes must rest on something solid.
    fn prune_pipes<G: TileGrid>(&self, grid: &mut G) {
        for x in 0..grid.width() as i32 {
            for y in 0..grid.floor_row() {
                if grid.tile(x, y) == Tile::Pipe && !grid.is(x, y + 1, TileKind::PipeSupport) {
                    grid.set_tile(x, y, Tile::Empty);
                }
            }
        }
    }

    /// Pass 6: flowers only sit on pipes; pipes may grow a flower.
    fn place_pipe_flowers<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        let h = grid.height() as i32;
        for x in 0..grid.width() as i32 {
            for y in 0..h {
                if grid.tile(x, y) == Tile::PipeFlower
                    && y + 1 < h
                    && grid.tile(x, y + 1) != Tile::Pipe
                {
                    grid.set_tile(x, y, Tile::Empty);
                }
                if grid.tile(x, y) == Tile::Pipe
                    && y >= 1
                    && rng.gaussian() < self.thresholds.pipe_flower
                {
                    grid.set_tile(x, y - 1, Tile::PipeFlower);
                }
            }
        }
    }

    /// Pass 7: bricks and question blocks three rows above ground.
    fn place_overhead_bricks<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        let blocks = grid.tile_subset(TileKind::Block);
        for x in 0..grid.width() as i32 {
            for y in 3..grid.height() as i32 {
                if grid.tile(x, y) == Tile::Ground
                    && rng.abs_gaussian() > self.thresholds.overhead_brick
                {
                    grid.set_tile(x, y - 3, rng.pick(blocks));
                }
            }
        }
    }

    /// Pass 8: drop winged enemies, then remove or wing every floating walker.
    fn convert_flying_enemies<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        let w = grid.width() as i32;
        let floor = grid.floor_row();
        for x in 0..w {
            for y in 0..floor {
                if grid.is(x, y, TileKind::WingedEnemy) {
                    grid.set_tile(x, y, Tile::Empty);
                }
            }
        }
        for x in 0..w {
            for y in 0..floor {
                let tile = grid.tile(x, y);
                if tile.is(TileKind::GroundEnemy) && grid.tile(x, y + 1) == Tile::Empty {
                    if rng.abs_gaussian() < self.thresholds.flying_removal {
                        grid.set_tile(x, y, Tile::Empty);
                    } else {
                        grid.set_tile(x, y, tile.winged());
                    }
                }
            }
        }
    }

    /// Pass 9: open movement lanes above the bottom four rows.
    fn thin_upper_region<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        for x in 0..grid.width() as i32 {
            for y in 0..grid.height() as i32 - 4 {
                if grid.tile(x, y) != Tile::Empty
                    && rng.abs_gaussian() > self.thresholds.density_thinning
                {
                    grid.set_tile(x, y, Tile::Empty);
                }
            }
        }
    }

    /// Pass 10: lengthen short platforms by up to three tiles.
    fn extend_platforms<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        let blocks = grid.tile_subset(TileKind::Block);
        let (one, two, three) = self.thresholds.platform_extension;
        for x in 0..grid.width() as i32 - 2 {
            for y in 0..grid.height() as i32 {
                if !grid.is(x, y, TileKind::Block) || grid.tile(x + 1, y) != Tile::Empty {
                    continue;
                }
                if rng.abs_gaussian() < one {
                    grid.set_tile(x + 1, y, rng.pick(blocks));
                }
                if rng.abs_gaussian() > two {
                    grid.set_tile(x + 2, y, rng.pick(blocks));
                }
                if rng.abs_gaussian() > three {
                    grid.set_tile(x + 3, y, rng.pick(blocks));
                }
            }
        }
    }

    /// Pass 11: thin enemies everywhere above the two bottom rows.
    fn thin_enemies<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        for x in 0..grid.width() as i32 {
            for y in 0..grid.height() as i32 - 2 {
                if grid.is(x, y, TileKind::Enemy)
                    && rng.abs_gaussian() > self.thresholds.enemy_thinning
                {
                    grid.set_tile(x, y, Tile::Empty);
                }
            }
        }
    }

    /// Pass 12: keep spawn and exit lanes open.
    fn clear_borders<G: TileGrid>(&self, grid: &mut G) {
        let w = grid.width() as i32;
        for y in 0..grid.floor_row() {
            for x in [0, 1, 2, 3, w - 2, w - 1] {
                grid.set_tile(x, y, Tile::Empty);
            }
        }
    }

    /// Pass 13: every pit gets an empty band two and three rows above it.
    fn clear_pit_bands<G: TileGrid>(&self, grid: &mut G) {
        let w = grid.width() as i32;
        let floor = grid.floor_row();
        for x in 1..w - 1 {
            if grid.tile(x, floor) != Tile::Empty {
                continue;
            }
            for i in x - 1..=x + 1 {
                grid.set_tile(i, floor - 2, Tile::Empty);
                grid.set_tile(i, floor - 3, Tile::Empty);
            }
        }
    }

    /// Pass 14: second reduction on the row just above the floor.
    fn reduce_ground_enemies<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        let row = grid.floor_row() - 1;
        for x in 0..grid.width() as i32 {
            if grid.tile(x, row) != Tile::Empty
                && rng.abs_gaussian() > self.thresholds.ground_enemy_reduction
            {
                grid.set_tile(x, row, Tile::Empty);
            }
        }
    }

    /// Pass 15: headroom above blocks for a tall player.
    fn clear_headroom<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng) {
        for x in 0..grid.width() as i32 {
            for y in 2..grid.height() as i32 {
                if grid.is(x, y, TileKind::Solid)
                    && rng.abs_gaussian() < self.thresholds.clearance
                {
                    grid.set_tile(x, y - 1, Tile::Empty);
                    grid.set_tile(x, y - 2, Tile::Empty);
                }
            }
        }
    }
}

impl LevelGenerator for RulePipelineGenerator {
    fn name(&self) -> &'static str {
        "RulePipelineGenerator"
    }

    fn generate<G: TileGrid>(
        &self,
        grid: &mut G,
        rng: &mut LevelRng,
    ) -> Result<String, GenerateError> {
        ensure_size(grid, MIN_WIDTH, MIN_HEIGHT)?;
        debug!(
            "{}: generating {}x{} level",
            self.name(),
            grid.width(),
            grid.height()
        );

        self.random_fill(grid, rng);
        self.synthesize_floor(grid, rng);
        self.clear_above_ground(grid, rng);
        self.seed_enemies(grid, rng);
        self.prune_pipes(grid);
        self.place_pipe_flowers(grid, rng);
        self.place_overhead_bricks(grid, rng);
        self.convert_flying_enemies(grid, rng);
        self.thin_upper_region(grid, rng);
        self.extend_platforms(grid, rng);
        self.thin_enemies(grid, rng);
        self.clear_borders(grid);
        self.clear_pit_bands(grid);
        self.reduce_ground_enemies(grid, rng);
        self.clear_headroom(grid, rng);

        Ok(grid.serialize())
    }
}
