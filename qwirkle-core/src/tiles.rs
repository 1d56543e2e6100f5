//! Tile catalog: colors, shapes, faces, hands and the deck

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Physical copies of every face in a game
pub const COPIES_PER_FACE: usize = 3;

/// Total tile instances in a game (36 faces x 3 copies)
pub const TOTAL_TILES: usize = 36 * COPIES_PER_FACE;

/// Maximum tiles a player holds
pub const HAND_SIZE: usize = 6;

/// Tile color
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Color::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Tile shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Cross,
    Diamond,
    Square,
    Star,
    Clover,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Circle,
        Shape::Cross,
        Shape::Diamond,
        Shape::Square,
        Shape::Star,
        Shape::Clover,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Cross => "cross",
            Shape::Diamond => "diamond",
            Shape::Square => "square",
            Shape::Star => "star",
            Shape::Clover => "clover",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Shape::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// A tile face. Copies of the same face are interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile {
    pub color: Color,
    pub shape: Shape,
}

impl Tile {
    pub const fn new(color: Color, shape: Shape) -> Self {
        Self { color, shape }
    }

    /// True when exactly one of color/shape matches.
    /// Identical faces share both and do not qualify.
    pub fn shares_one_attribute(self, other: Tile) -> bool {
        (self.color == other.color) != (self.shape == other.shape)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.color.name(), self.shape.name())
    }
}

/// Error parsing a `color_shape` tile name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tile: {0:?} (expected <color>_<shape>, e.g. red_circle)")]
pub struct ParseTileError(pub String);

impl FromStr for Tile {
    type Err = ParseTileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (color, shape) = s
            .split_once('_')
            .ok_or_else(|| ParseTileError(s.to_string()))?;
        match (Color::from_name(color), Shape::from_name(shape)) {
            (Some(color), Some(shape)) => Ok(Tile::new(color, shape)),
            _ => Err(ParseTileError(s.to_string())),
        }
    }
}

impl Serialize for Tile {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// All 36 faces, color-major
pub static ALL_TILES: [Tile; 36] = {
    let mut faces = [Tile::new(Color::Red, Shape::Circle); 36];
    let mut c = 0;
    while c < 6 {
        let mut s = 0;
        while s < 6 {
            faces[c * 6 + s] = Tile::new(Color::ALL[c], Shape::ALL[s]);
            s += 1;
        }
        c += 1;
    }
    faces
};

// ============================================================================
// HAND
// ============================================================================

/// Tiles held by one player, in the order they were drawn
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    tiles: Vec<Tile>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    pub fn extend(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.tiles.extend(tiles);
    }

    /// Multiset containment: every listed face, with multiplicity
    pub fn contains_all(&self, faces: &[Tile]) -> bool {
        let mut pool = self.tiles.clone();
        faces.iter().all(|face| match pool.iter().position(|t| t == face) {
            Some(idx) => {
                pool.swap_remove(idx);
                true
            }
            None => false,
        })
    }

    /// Remove one instance per listed face. Returns false (and leaves the
    /// hand untouched) if any face is missing.
    pub fn remove_all(&mut self, faces: &[Tile]) -> bool {
        if !self.contains_all(faces) {
            return false;
        }
        for face in faces {
            if let Some(idx) = self.tiles.iter().position(|t| t == face) {
                self.tiles.remove(idx);
            }
        }
        true
    }
}

impl From<Vec<Tile>> for Hand {
    fn from(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }
}

// ============================================================================
// DECK
// ============================================================================

/// Undealt tiles.
///
/// Shuffles are driven by a ChaCha8 stream derived from `seed` and the
/// shuffle counter, so a persisted deck reproduces its future draws.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    tiles: Vec<Tile>,
    seed: u64,
    shuffles: u64,
}

impl Deck {
    /// Full 108-tile deck, shuffled
    pub fn full(seed: u64) -> Self {
        let tiles = ALL_TILES
            .iter()
            .flat_map(|&t| std::iter::repeat(t).take(COPIES_PER_FACE))
            .collect();
        let mut deck = Self {
            tiles,
            seed,
            shuffles: 0,
        };
        deck.shuffle();
        deck
    }

    /// Deck with exactly these tiles in draw order (last drawn first). No shuffle.
    pub fn from_tiles(tiles: Vec<Tile>, seed: u64) -> Self {
        Self {
            tiles,
            seed,
            shuffles: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Draw up to `n` tiles; fewer when the deck runs short
    pub fn draw(&mut self, n: usize) -> Vec<Tile> {
        let keep = self.tiles.len().saturating_sub(n);
        let mut drawn = self.tiles.split_off(keep);
        drawn.reverse();
        drawn
    }

    /// Return tiles to the deck and reshuffle
    pub fn give_back(&mut self, tiles: &[Tile]) {
        self.tiles.extend_from_slice(tiles);
        self.shuffle();
    }

    fn shuffle(&mut self) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(self.shuffles));
        self.tiles.shuffle(&mut rng);
        self.shuffles += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_36_distinct_faces() {
        let mut faces = ALL_TILES.to_vec();
        faces.sort();
        faces.dedup();
        assert_eq!(faces.len(), 36);
        assert_eq!(TOTAL_TILES, 108);
    }

    #[test]
    fn test_parse_and_display() {
        let tile: Tile = "red_circle".parse().unwrap();
        assert_eq!(tile, Tile::new(Color::Red, Shape::Circle));
        assert_eq!(tile.to_string(), "red_circle");
        assert!("red".parse::<Tile>().is_err());
        assert!("pink_circle".parse::<Tile>().is_err());
        assert!("red_hexagon".parse::<Tile>().is_err());
    }

    #[test]
    fn test_serde_uses_tile_name() {
        let tile = Tile::new(Color::Purple, Shape::Clover);
        let json = serde_json::to_string(&tile).unwrap();
        assert_eq!(json, "\"purple_clover\"");
        let back: Tile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tile);
    }

    #[test]
    fn test_shares_one_attribute() {
        let red_circle = Tile::new(Color::Red, Shape::Circle);
        assert!(red_circle.shares_one_attribute(Tile::new(Color::Red, Shape::Star)));
        assert!(red_circle.shares_one_attribute(Tile::new(Color::Blue, Shape::Circle)));
        assert!(!red_circle.shares_one_attribute(red_circle));
        assert!(!red_circle.shares_one_attribute(Tile::new(Color::Blue, Shape::Star)));
    }

    #[test]
    fn test_full_deck_counts() {
        let deck = Deck::full(7);
        assert_eq!(deck.len(), TOTAL_TILES);
        for face in ALL_TILES.iter() {
            let n = deck.tiles().iter().filter(|t| *t == face).count();
            assert_eq!(n, COPIES_PER_FACE, "{face}");
        }
    }

    #[test]
    fn test_deck_is_deterministic_per_seed() {
        assert_eq!(Deck::full(1), Deck::full(1));
        assert_ne!(Deck::full(1).tiles(), Deck::full(2).tiles());
    }

    #[test]
    fn test_draw_short_deck() {
        let mut deck = Deck::from_tiles(vec![ALL_TILES[0], ALL_TILES[1]], 0);
        let drawn = deck.draw(6);
        assert_eq!(drawn, vec![ALL_TILES[1], ALL_TILES[0]]);
        assert!(deck.is_empty());
        assert!(deck.draw(3).is_empty());
    }

    #[test]
    fn test_hand_multiset_ops() {
        let rc = Tile::new(Color::Red, Shape::Circle);
        let bs = Tile::new(Color::Blue, Shape::Square);
        let mut hand = Hand::from(vec![rc, bs, rc]);

        assert!(hand.contains_all(&[rc, rc]));
        assert!(!hand.contains_all(&[bs, bs]));
        assert!(!hand.remove_all(&[bs, bs]));
        assert_eq!(hand.len(), 3);

        assert!(hand.remove_all(&[rc, bs]));
        assert_eq!(hand.tiles(), &[rc]);
    }
}
