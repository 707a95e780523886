//! Seeded random stream shared by the generators and the tuner.

use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::schema::Tile;

/// Random number generator wrapper for generation and search.
///
/// Every stochastic decision takes a fresh draw from this stream.
pub struct LevelRng {
    rng: StdRng,
}

impl LevelRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, from entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::random, Self::new)
    }

    /// Standard normal draw.
    #[inline]
    pub fn gaussian(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Magnitude of a standard normal draw.
    #[inline]
    pub fn abs_gaussian(&mut self) -> f64 {
        self.gaussian().abs()
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen()
    }

    /// Uniform `f32` draw in `[0, 1)`.
    #[inline]
    pub fn unit_f32(&mut self) -> f32 {
        self.rng.r#gen()
    }

    /// `true` with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p as f64
    }

    /// Uniform integer in `[0, n)`; zero when `n` is zero.
    #[inline]
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 { 0 } else { self.rng.gen_range(0..n) }
    }

    /// Uniform integer in `[low, high]`.
    #[inline]
    pub fn between(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high.max(low))
    }

    /// Uniformly pick a tile; `Empty` for an empty slice.
    pub fn pick(&mut self, tiles: &[Tile]) -> Tile {
        tiles.choose(&mut self.rng).copied().unwrap_or(Tile::Empty)
    }

    /// Uniformly pick one element of a non-empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Generate next u64 for seeding child streams.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
