//! Windowed constructive generator.
//!
//! The level is split into [`WINDOW_COUNT`] equal windows processed left to
//! right. Each window first gets a base floor, expanded toward its borders,
//! and an optional pipe obstacle; the rows above are then decorated bottom
//! to top with enemies, ground steps, coins and short floating floors.
//!
//! Floor expansion edge policy: the leftward walk runs from the left edge of
//! the base floor down to window offset 1, the rightward walk from the right
//! edge to the last column of the window. When an obstacle roll leaves a
//! cell alone the walk skips one further cell. Reads are clamped to the grid,
//! writes never leave the window.

use log::debug;

use crate::schema::{
    GenerationSettings, ParamError, ParameterVector, SearchSpace, Tile, TileKind,
};

use super::generator::ensure_size;
use super::{GenerateError, LevelGenerator, LevelRng, ParamLevelGenerator, TileGrid};

/// Number of equal-width windows.
pub const WINDOW_COUNT: usize = 10;

/// Width of a base floor segment.
const BASE_FLOOR_WIDTH: i32 = 4;

/// Smallest window width the base floor and pipe placement fit in.
const MIN_WINDOW_WIDTH: usize = 5;

/// Rows scanned below the left neighbour when looking for footing.
const FOOTING_DEPTH: i32 = 5;

/// Floor segments seeded per qualifying cell.
const SEEDED_FLOOR_RUN: i32 = 3;

/// One horizontal partition of the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    index: usize,
    offset: i32,
    width: i32,
}

impl Window {
    fn new(index: usize, width: usize) -> Self {
        Self {
            index,
            offset: (index * width) as i32,
            width: width as i32,
        }
    }

    fn columns(&self) -> std::ops::Range<i32> {
        self.offset..self.offset + self.width
    }
}

/// A pipe-family obstacle written into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipePlacement {
    /// Leftmost pipe column.
    pub x: i32,
    /// Pipe width in tiles.
    pub width: i32,
    /// Pipe height in tiles, measured up from the floor row.
    pub length: i32,
    /// Pipe, pipe with flower or bullet bill.
    pub tile: Tile,
}

/// Constructive generator driven by a bound [`ParameterVector`].
#[derive(Debug, Clone)]
pub struct WindowedGenerator {
    space: SearchSpace,
    params: ParameterVector,
    settings: GenerationSettings,
}

impl Default for WindowedGenerator {
    fn default() -> Self {
        let space = SearchSpace::default();
        let params = ParameterVector::default();
        let settings = space
            .resolve(&params)
            .unwrap_or_else(|_| unreachable!("index 0 exists in every row"));
        Self {
            space,
            params,
            settings,
        }
    }
}

impl WindowedGenerator {
    /// Create a generator bound to `params`.
    pub fn new(params: &ParameterVector) -> Result<Self, ParamError> {
        let mut generator = Self::default();
        generator.set_parameters(params)?;
        Ok(generator)
    }

    /// The bound parameter vector.
    pub fn parameters(&self) -> &ParameterVector {
        &self.params
    }

    /// Concrete settings of the bound vector.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Weighted random brick or question block.
    fn random_bumpable(rng: &mut LevelRng) -> Tile {
        let dice = rng.unit();
        let check = rng.unit();
        if dice < 0.8 {
            Tile::NormalBrick
        } else if dice < 0.95 {
            if check < 0.7 {
                Tile::CoinBrick
            } else if check < 0.9 {
                Tile::SpecialBrick
            } else {
                Tile::LifeBrick
            }
        } else if check < 0.7 {
            Tile::CoinQuestionBlock
        } else {
            Tile::SpecialQuestionBlock
        }
    }

    /// Weighted random enemy, one in five winged.
    fn random_enemy(rng: &mut LevelRng) -> Tile {
        let dice = rng.unit();
        let check = rng.unit();
        let walker = if check < 0.5 {
            Tile::Goomba
        } else if check < 0.7 {
            Tile::RedKoopa
        } else if check < 0.9 {
            Tile::GreenKoopa
        } else {
            Tile::Spiky
        };
        if dice < 0.8 { walker } else { walker.winged() }
    }

    /// Drop a 4-wide plateau of ground or a floating brick row into the window.
    fn place_base_floor<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng, window: Window) {
        let h = grid.height() as i32;
        let mut x = window.offset + rng.below((window.width - BASE_FLOOR_WIDTH) as usize) as i32;
        if x == 0 {
            // Column 0 belongs to the player start.
            x = 1;
        }

        let plateau = rng.chance(self.settings.ground_prob);
        let top = rng.between(self.settings.ground_y_length, grid.height() - 1) as i32;
        if plateau {
            grid.set_rectangle(x, top, BASE_FLOOR_WIDTH, h - top, Tile::Ground);
        } else {
            for i in x..x + BASE_FLOOR_WIDTH {
                let tile = if top < h - 1 {
                    Self::random_bumpable(rng)
                } else {
                    Tile::Ground
                };
                grid.set_tile(i, top, tile);
            }
        }
    }

    /// Window-relative left and right edges of the last ground run on the floor row.
    fn floor_edges<G: TileGrid>(&self, grid: &G, window: Window) -> (i32, i32) {
        let floor = grid.floor_row();
        let mut edges = (0, 0);
        let mut run_start = None;
        for j in 0..window.width {
            let ground = grid.tile(window.offset + j, floor) == Tile::Ground;
            match (ground, run_start) {
                (true, None) => run_start = Some(j),
                (false, Some(start)) => {
                    edges = (start, j - 1);
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            edges = (start, window.width - 1);
        }
        edges
    }

    /// Grow the floor from its edges toward the window borders.
    fn expand_floor<G: TileGrid>(
        &self,
        grid: &mut G,
        rng: &mut LevelRng,
        window: Window,
        (left, right): (i32, i32),
    ) {
        let floor = grid.floor_row();
        let obstacles = self.settings.obstacles_prob;

        let mut j = left;
        while j > 0 {
            let x = window.offset + j;
            if rng.chance(obstacles) {
                if grid.tile(x, floor) != Tile::Empty {
                    j -= 1;
                } else if grid.tile(x + 3, floor) == Tile::Empty {
                    grid.set_tile(x, floor, Tile::Ground);
                }
            } else {
                grid.set_tile(x, floor, Tile::Ground);
            }
            j -= 1;
        }

        let mut j = right;
        while j < window.width {
            let x = window.offset + j;
            if rng.chance(obstacles) {
                if grid.tile(x - 3, floor) == Tile::Empty {
                    grid.set_tile(x, floor, Tile::Ground);
                } else {
                    j += 1;
                }
            } else {
                grid.set_tile(x, floor, Tile::Ground);
            }
            j += 1;
        }
    }

    /// Insert a vertical pipe-family obstacle with empty columns on both sides.
    fn place_pipe<G: TileGrid>(
        &self,
        grid: &mut G,
        rng: &mut LevelRng,
        window: Window,
    ) -> PipePlacement {
        let h = grid.height() as i32;

        let (tile, width) = if rng.chance(self.settings.enemy_prob) {
            if rng.unit() < 0.6 {
                (Tile::Pipe, 2)
            } else {
                (Tile::BulletBill, 1)
            }
        } else {
            (Tile::PipeFlower, 2)
        };

        let disparity = h - self.settings.ground_y_length as i32;
        let pipe_length = self.settings.pipe_length as i32;
        let longest = ((pipe_length - disparity).abs() + disparity - 1).clamp(1, h);
        let length = rng.between(1, longest as usize) as i32;

        let x = (window.offset + rng.below((window.width - 3) as usize) as i32).max(2);
        let top = h - length;
        grid.set_rectangle(x, top, width, length, tile);
        grid.set_rectangle(x - 1, top, 1, length, Tile::Empty);
        grid.set_rectangle(x + width, top, 1, length, Tile::Empty);

        PipePlacement {
            x,
            width,
            length,
            tile,
        }
    }

    /// Ground or brick within [`FOOTING_DEPTH`] rows of `y` in the column to the left.
    fn floor_in_front<G: TileGrid>(grid: &G, x: i32, y: i32) -> bool {
        x > 0 && (0..FOOTING_DEPTH).any(|j| grid.tile(x - 1, y + j).is_ground_or_brick())
    }

    /// Whether a new floor tile at `(x, y)` would not crowd existing structures.
    fn neighbour_free<G: TileGrid>(grid: &G, x: i32, y: i32) -> bool {
        !grid.tile(x - 1, y + 1).is_ground_or_brick()
            && !grid.tile(x - 1, y + 2).is_ground_or_brick()
            && !grid.tile(x, y + 2).is_ground_or_brick()
            && !grid.tile(x, y + 1).is_ground_or_brick()
            && !grid.is(x, y + 1, TileKind::Enemy)
            && !grid.is(x, y + 1, TileKind::Pipe)
            && !grid.is(x, y + 2, TileKind::Pipe)
            && !grid.is(x - 1, y, TileKind::Pipe)
            && !grid.is(x - 1, y + 1, TileKind::Pipe)
            && !grid.is(x + 1, y, TileKind::Pipe)
            && !grid.is(x + 1, y + 1, TileKind::Pipe)
    }

    /// Decorate one non-floor cell.
    fn decorate_cell<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng, x: i32, y: i32) {
        if grid.tile(x, y) != Tile::Empty || grid.is(x, y + 1, TileKind::Pipe) {
            return;
        }

        let below = grid.tile(x, y + 1);
        if below != Tile::Empty && below != Tile::Coin && !below.is(TileKind::Enemy) {
            if rng.chance(self.settings.enemy_prob) {
                grid.set_tile(x, y, Self::random_enemy(rng));
            } else if rng.chance(self.settings.obstacles_prob)
                && below == Tile::Ground
                && !grid.is(x - 1, y, TileKind::Enemy)
                && Self::floor_in_front(grid, x, y)
            {
                grid.set_tile(x, y, Tile::Ground);
            } else if rng.chance(self.settings.coin_prob) {
                grid.set_tile(x, y - 1, Tile::Coin);
            }
        }

        if grid.tile(x, y) == Tile::Empty
            && rng.chance(self.settings.obstacles_prob)
            && (y as usize) < self.settings.ground_y_length
        {
            self.seed_floor(grid, rng, x, y);
        }
    }

    /// Seed a short floor run rightward from `(x, y)`.
    fn seed_floor<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng, x: i32, y: i32) {
        let kind = rng.unit_f32();
        for j in 0..SEEDED_FLOOR_RUN {
            let cx = x + j;
            if Self::neighbour_free(grid, cx, y)
                && Self::floor_in_front(grid, cx, y)
                && !grid.is(cx - 1, y, TileKind::Enemy)
            {
                if kind < self.settings.ground_prob {
                    grid.set_tile(cx, y, Tile::Ground);
                } else if y > 1 {
                    // Keep a row free above bricks so their items can be collected.
                    grid.set_tile(cx, y, Self::random_bumpable(rng));
                }
            }
        }
    }

    /// Player start one row above the lowest ground or brick in column 0.
    fn place_start<G: TileGrid>(grid: &mut G) {
        let floor = grid.floor_row();
        let footing = (2..=floor).rev().find(|&y| grid.tile(0, y).is_ground_or_brick());
        match footing {
            Some(y) => grid.set_tile(0, y - 1, Tile::PlayerStart),
            None => {
                grid.set_tile(0, floor, Tile::Ground);
                grid.set_tile(0, floor - 1, Tile::PlayerStart);
            }
        }
    }

    /// Ground, pyramid block and exit stacked in the bottom-right corner.
    fn place_exit<G: TileGrid>(grid: &mut G) {
        let x = grid.width() as i32 - 1;
        let floor = grid.floor_row();
        grid.set_tile(x, floor, Tile::Ground);
        grid.set_tile(x, floor - 1, Tile::PyramidBlock);
        grid.set_tile(x, floor - 2, Tile::Exit);
    }

    /// Remove enemies and pipes from the two spawn and two exit columns.
    fn clear_border_hazards<G: TileGrid>(grid: &mut G) {
        let w = grid.width() as i32;
        for x in [0, 1, w - 2, w - 1] {
            for y in 0..grid.height() as i32 {
                if grid.is(x, y, TileKind::Enemy) || grid.is(x, y, TileKind::Pipe) {
                    grid.set_tile(x, y, Tile::Empty);
                }
            }
        }
    }

    /// Build one window: floor row first, then rows above bottom to top.
    fn build_window<G: TileGrid>(&self, grid: &mut G, rng: &mut LevelRng, window: Window) {
        self.place_base_floor(grid, rng, window);
        let edges = self.floor_edges(grid, window);
        self.expand_floor(grid, rng, window, edges);
        if rng.chance(self.settings.pipe_prob) {
            let pipe = self.place_pipe(grid, rng, window);
            debug!("window {}: {:?}", window.index, pipe);
        }

        for y in (1..grid.floor_row()).rev() {
            for x in window.columns() {
                self.decorate_cell(grid, rng, x, y);
            }
        }
    }
}

impl LevelGenerator for WindowedGenerator {
    fn name(&self) -> &'static str {
        "WindowedGenerator"
    }

    fn generate<G: TileGrid>(
        &self,
        grid: &mut G,
        rng: &mut LevelRng,
    ) -> Result<String, GenerateError> {
        ensure_size(
            grid,
            WINDOW_COUNT * MIN_WINDOW_WIDTH,
            self.settings.ground_y_length + 1,
        )?;
        debug!(
            "{}: generating {}x{} level with {:?}",
            self.name(),
            grid.width(),
            grid.height(),
            self.params.indices()
        );

        grid.clear();
        let window_width = grid.width() / WINDOW_COUNT;
        for index in 0..WINDOW_COUNT {
            self.build_window(grid, rng, Window::new(index, window_width));
            if index == 0 {
                Self::place_start(grid);
            }
        }
        Self::clear_border_hazards(grid);
        Self::place_exit(grid);

        Ok(grid.serialize())
    }
}

impl ParamLevelGenerator for WindowedGenerator {
    fn parameter_search_space(&self) -> &SearchSpace {
        &self.space
    }

    fn set_parameters(&mut self, params: &ParameterVector) -> Result<(), ParamError> {
        self.settings = self.space.resolve(params)?;
        self.params = *params;
        Ok(())
    }
}
