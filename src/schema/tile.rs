//! Tile alphabet and semantic tile subsets.

use serde::{Deserialize, Serialize};

/// A single cell symbol of a platformer level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Ground,
    PyramidBlock,
    NormalBrick,
    CoinBrick,
    LifeBrick,
    SpecialBrick,
    SpecialQuestionBlock,
    CoinQuestionBlock,
    CoinHiddenBlock,
    LifeHiddenBlock,
    UsedBlock,
    Coin,
    Pipe,
    PipeFlower,
    BulletBill,
    PlatformBackground,
    Platform,
    Goomba,
    GoombaWinged,
    RedKoopa,
    RedKoopaWinged,
    GreenKoopa,
    GreenKoopaWinged,
    Spiky,
    SpikyWinged,
    PlayerStart,
    Exit,
}

/// Semantic subsets of the alphabet queried by the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Plain ground.
    Ground,
    /// Bricks and question blocks that can be bumped from below.
    Bumpable,
    /// Every enemy, walking or winged.
    Enemy,
    /// Winged enemies only.
    WingedEnemy,
    /// Walking enemies only.
    GroundEnemy,
    /// Pipe, pipe with flower and bullet bill emplacement.
    Pipe,
    /// Brick family: bumpable tiles plus platforms.
    Block,
    /// Block family plus hidden and used blocks.
    Solid,
    /// Tiles a pipe may rest on.
    PipeSupport,
}

const GROUND: &[Tile] = &[Tile::Ground];

const BUMPABLE: &[Tile] = &[
    Tile::NormalBrick,
    Tile::CoinBrick,
    Tile::LifeBrick,
    Tile::SpecialBrick,
    Tile::SpecialQuestionBlock,
    Tile::CoinQuestionBlock,
];

const ENEMY: &[Tile] = &[
    Tile::Goomba,
    Tile::GoombaWinged,
    Tile::RedKoopa,
    Tile::RedKoopaWinged,
    Tile::GreenKoopa,
    Tile::GreenKoopaWinged,
    Tile::Spiky,
    Tile::SpikyWinged,
];

const WINGED_ENEMY: &[Tile] = &[
    Tile::GoombaWinged,
    Tile::RedKoopaWinged,
    Tile::GreenKoopaWinged,
    Tile::SpikyWinged,
];

const GROUND_ENEMY: &[Tile] = &[Tile::Goomba, Tile::RedKoopa, Tile::GreenKoopa, Tile::Spiky];

const PIPE: &[Tile] = &[Tile::Pipe, Tile::PipeFlower, Tile::BulletBill];

const BLOCK: &[Tile] = &[
    Tile::NormalBrick,
    Tile::CoinBrick,
    Tile::LifeBrick,
    Tile::SpecialBrick,
    Tile::SpecialQuestionBlock,
    Tile::CoinQuestionBlock,
    Tile::Platform,
];

const SOLID: &[Tile] = &[
    Tile::NormalBrick,
    Tile::CoinBrick,
    Tile::LifeBrick,
    Tile::SpecialBrick,
    Tile::SpecialQuestionBlock,
    Tile::CoinQuestionBlock,
    Tile::Platform,
    Tile::CoinHiddenBlock,
    Tile::LifeHiddenBlock,
    Tile::UsedBlock,
];

const PIPE_SUPPORT: &[Tile] = &[
    Tile::Ground,
    Tile::PyramidBlock,
    Tile::NormalBrick,
    Tile::CoinBrick,
    Tile::LifeBrick,
    Tile::SpecialBrick,
    Tile::Platform,
    Tile::SpecialQuestionBlock,
    Tile::CoinQuestionBlock,
];

impl Tile {
    /// Every tile, in declaration order.
    pub const ALL: [Tile; 28] = [
        Tile::Empty,
        Tile::Ground,
        Tile::PyramidBlock,
        Tile::NormalBrick,
        Tile::CoinBrick,
        Tile::LifeBrick,
        Tile::SpecialBrick,
        Tile::SpecialQuestionBlock,
        Tile::CoinQuestionBlock,
        Tile::CoinHiddenBlock,
        Tile::LifeHiddenBlock,
        Tile::UsedBlock,
        Tile::Coin,
        Tile::Pipe,
        Tile::PipeFlower,
        Tile::BulletBill,
        Tile::PlatformBackground,
        Tile::Platform,
        Tile::Goomba,
        Tile::GoombaWinged,
        Tile::RedKoopa,
        Tile::RedKoopaWinged,
        Tile::GreenKoopa,
        Tile::GreenKoopaWinged,
        Tile::Spiky,
        Tile::SpikyWinged,
        Tile::PlayerStart,
        Tile::Exit,
    ];

    /// Tiles a random fill may draw from: everything except the start and exit markers.
    pub fn fill_alphabet() -> &'static [Tile] {
        &Self::ALL[..26]
    }

    /// Members of a semantic subset.
    pub fn subset(kind: TileKind) -> &'static [Tile] {
        match kind {
            TileKind::Ground => GROUND,
            TileKind::Bumpable => BUMPABLE,
            TileKind::Enemy => ENEMY,
            TileKind::WingedEnemy => WINGED_ENEMY,
            TileKind::GroundEnemy => GROUND_ENEMY,
            TileKind::Pipe => PIPE,
            TileKind::Block => BLOCK,
            TileKind::Solid => SOLID,
            TileKind::PipeSupport => PIPE_SUPPORT,
        }
    }

    /// Check subset membership.
    #[inline]
    pub fn is(self, kind: TileKind) -> bool {
        Self::subset(kind).contains(&self)
    }

    /// Ground or a bumpable block: something the player can stand on.
    #[inline]
    pub fn is_ground_or_brick(self) -> bool {
        self.is(TileKind::Ground) || self.is(TileKind::Bumpable)
    }

    /// Winged counterpart of a walking enemy (identity for anything else).
    pub fn winged(self) -> Tile {
        match self {
            Tile::Goomba => Tile::GoombaWinged,
            Tile::RedKoopa => Tile::RedKoopaWinged,
            Tile::GreenKoopa => Tile::GreenKoopaWinged,
            Tile::Spiky => Tile::SpikyWinged,
            other => other,
        }
    }

    /// Level text character.
    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => '-',
            Tile::Ground => 'X',
            Tile::PyramidBlock => '#',
            Tile::NormalBrick => 'S',
            Tile::CoinBrick => 'C',
            Tile::LifeBrick => 'L',
            Tile::SpecialBrick => 'U',
            Tile::SpecialQuestionBlock => '@',
            Tile::CoinQuestionBlock => '!',
            Tile::CoinHiddenBlock => '2',
            Tile::LifeHiddenBlock => '1',
            Tile::UsedBlock => 'D',
            Tile::Coin => 'o',
            Tile::Pipe => 't',
            Tile::PipeFlower => 'T',
            Tile::BulletBill => '*',
            Tile::PlatformBackground => '|',
            Tile::Platform => '%',
            Tile::Goomba => 'g',
            Tile::GoombaWinged => 'G',
            Tile::RedKoopa => 'r',
            Tile::RedKoopaWinged => 'R',
            Tile::GreenKoopa => 'k',
            Tile::GreenKoopaWinged => 'K',
            Tile::Spiky => 'y',
            Tile::SpikyWinged => 'Y',
            Tile::PlayerStart => 'M',
            Tile::Exit => 'F',
        }
    }

    /// Parse a level text character.
    pub fn from_char(c: char) -> Option<Tile> {
        Self::ALL.iter().copied().find(|t| t.to_char() == c)
    }
}
