//! Level grid storage and the accessor trait the generators write through.

use std::fmt;
use std::str::FromStr;

use crate::schema::{Tile, TileKind};

/// Accessor for a fixed-size tile grid.
///
/// Row 0 is the top, row `height - 1` the floor. Coordinates are signed
/// and clamped to the nearest edge cell for both reads and writes, so a
/// neighbourhood probe one column past the border sees the border column.
pub trait TileGrid {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Tile at `(x, y)`, clamped.
    fn tile(&self, x: i32, y: i32) -> Tile;

    /// Write `tile` at `(x, y)`, clamped.
    fn set_tile(&mut self, x: i32, y: i32, tile: Tile);

    /// Fill the `w` by `h` rectangle whose top-left corner is `(x, y)`.
    fn set_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32, tile: Tile) {
        for i in x..x + w {
            for j in y..y + h {
                self.set_tile(i, j, tile);
            }
        }
    }

    /// Reset every cell to [`Tile::Empty`].
    fn clear(&mut self);

    /// Row-major level text, one character per tile, rows joined by `\n`.
    fn serialize(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for y in 0..self.height() as i32 {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.width() as i32 {
                out.push(self.tile(x, y).to_char());
            }
        }
        out
    }

    /// Members of a semantic tile subset.
    fn tile_subset(&self, kind: TileKind) -> &'static [Tile] {
        Tile::subset(kind)
    }

    /// Whether the tile at `(x, y)` belongs to `kind`.
    #[inline]
    fn is(&self, x: i32, y: i32, kind: TileKind) -> bool {
        self.tile_subset(kind).contains(&self.tile(x, y))
    }

    /// Index of the floor row.
    #[inline]
    fn floor_row(&self) -> i32 {
        self.height() as i32 - 1
    }
}

/// Dense row-major tile grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl LevelGrid {
    /// Create an empty grid. Zero dimensions are raised to one.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        y * self.width + x
    }

    /// Number of cells holding `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Positions of every cell holding `tile`, row by row.
    pub fn positions(&self, tile: Tile) -> Vec<(usize, usize)> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t == tile)
            .map(|(i, _)| (i % self.width, i / self.width))
            .collect()
    }

    /// Tiles of row `y`, left to right.
    pub fn row(&self, y: usize) -> &[Tile] {
        let start = y.min(self.height - 1) * self.width;
        &self.tiles[start..start + self.width]
    }
}

impl TileGrid for LevelGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn tile(&self, x: i32, y: i32) -> Tile {
        self.tiles[self.index(x, y)]
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        let i = self.index(x, y);
        self.tiles[i] = tile;
    }

    fn clear(&mut self) {
        self.tiles.fill(Tile::Empty);
    }
}

impl fmt::Display for LevelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Errors parsing level text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseLevelError {
    #[error("Level text is empty")]
    Empty,
    #[error("Unknown tile character {ch:?} at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },
    #[error("Row {row} has {got} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
}

impl FromStr for LevelGrid {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `lines` drops one trailing newline; blank rows inside the text stay ragged.
        let rows: Vec<&str> = s.lines().collect();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(ParseLevelError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let got = row.chars().count();
            if got != width {
                return Err(ParseLevelError::RaggedRow {
                    row: y,
                    expected: width,
                    got,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or(ParseLevelError::UnknownTile { ch, x, y })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            tiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_access() {
        let mut grid = LevelGrid::new(4, 3);
        grid.set_tile(-5, 1, Tile::Ground);
        assert_eq!(grid.tile(0, 1), Tile::Ground);
        assert_eq!(grid.tile(-1, 1), Tile::Ground);

        grid.set_tile(10, 10, Tile::Exit);
        assert_eq!(grid.tile(3, 2), Tile::Exit);
        assert_eq!(grid.count(Tile::Exit), 1);
    }

    #[test]
    fn test_set_rectangle() {
        let mut grid = LevelGrid::new(6, 5);
        grid.set_rectangle(1, 2, 2, 3, Tile::Pipe);
        assert_eq!(grid.count(Tile::Pipe), 6);
        assert_eq!(grid.tile(1, 4), Tile::Pipe);
        assert_eq!(grid.tile(3, 4), Tile::Empty);
        assert_eq!(grid.tile(1, 1), Tile::Empty);
    }

    #[test]
    fn test_serialize_layout() {
        let mut grid = LevelGrid::new(3, 2);
        grid.set_tile(0, 1, Tile::Ground);
        grid.set_tile(2, 0, Tile::Coin);
        assert_eq!(grid.serialize(), "--o\nX--");
    }

    #[test]
    fn test_parse_roundtrip() {
        let text = "--o-\nM-g-\nXXXX";
        let grid: LevelGrid = text.parse().unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.tile(2, 1), Tile::Goomba);
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<LevelGrid>(), Err(ParseLevelError::Empty));
        assert_eq!(
            "--\n-".parse::<LevelGrid>(),
            Err(ParseLevelError::RaggedRow {
                row: 1,
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            "XX\n\nXX".parse::<LevelGrid>(),
            Err(ParseLevelError::RaggedRow {
                row: 1,
                expected: 2,
                got: 0
            })
        );
        assert_eq!("XX\nXX\n".parse::<LevelGrid>().map(|g| g.height()), Ok(2));
        assert_eq!(
            "-?".parse::<LevelGrid>(),
            Err(ParseLevelError::UnknownTile { ch: '?', x: 1, y: 0 })
        );
    }

    #[test]
    fn test_clear() {
        let mut grid = LevelGrid::new(3, 3);
        grid.set_rectangle(0, 0, 3, 3, Tile::Ground);
        grid.clear();
        assert_eq!(grid.count(Tile::Empty), 9);
    }
}
