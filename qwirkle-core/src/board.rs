//! Sparse board geometry on an unbounded square grid

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::tiles::Tile;

/// Grid coordinates. (0, 0) is where the first tile goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move `n` steps along a direction vector. None past the edge of the
    /// `i32` grid.
    pub fn offset(&self, (dx, dy): (i32, i32), n: i32) -> Option<Position> {
        let x = self.x.checked_add(dx.checked_mul(n)?)?;
        let y = self.y.checked_add(dy.checked_mul(n)?)?;
        Some(Position::new(x, y))
    }

    /// The orthogonal neighbors that exist on the grid
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        DIRECTIONS.into_iter().filter_map(move |dir| self.offset(dir, 1))
    }

    /// Row-major ordering key (y, then x)
    fn row_major(&self) -> (i32, i32) {
        (self.y, self.x)
    }
}

/// Direction vectors (dx, dy): +x, -x, +y, -y
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Line axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// Unit step toward the positive end of the axis
    pub fn unit(self) -> (i32, i32) {
        match self {
            Axis::Horizontal => (1, 0),
            Axis::Vertical => (0, 1),
        }
    }
}

/// Occupied bounding box, inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    fn around(pos: Position) -> Self {
        Self {
            min_x: pos.x,
            max_x: pos.x,
            min_y: pos.y,
            max_y: pos.y,
        }
    }

    fn include(&mut self, pos: Position) {
        self.min_x = self.min_x.min(pos.x);
        self.max_x = self.max_x.max(pos.x);
        self.min_y = self.min_y.min(pos.y);
        self.max_y = self.max_y.max(pos.y);
    }

    /// Contains `pos` once the box is grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Position, margin: i32) -> bool {
        pos.x >= self.min_x.saturating_sub(margin)
            && pos.x <= self.max_x.saturating_add(margin)
            && pos.y >= self.min_y.saturating_sub(margin)
            && pos.y <= self.max_y.saturating_add(margin)
    }
}

/// A tile at a position: one entry of a move set or of the board listing.
/// Serialized flat as `{"x": .., "y": .., "tile": ".."}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    #[serde(flatten)]
    pub pos: Position,
    pub tile: Tile,
}

impl Placement {
    pub const fn new(pos: Position, tile: Tile) -> Self {
        Self { pos, tile }
    }
}

/// Placed tiles (clone for a scratch copy)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Placement>", try_from = "Vec<Placement>")]
pub struct Board {
    tiles: FxHashMap<Position, Tile>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from placements, rejecting double occupancy
    pub fn from_placements(
        placements: impl IntoIterator<Item = (Position, Tile)>,
    ) -> Result<Self, GameError> {
        let mut board = Board::new();
        for (pos, tile) in placements {
            board.place(pos, tile)?;
        }
        Ok(board)
    }

    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        self.tiles.get(&pos).copied()
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.tiles.contains_key(&pos)
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Put a tile down. Only called once the move has been validated.
    pub fn place(&mut self, pos: Position, tile: Tile) -> Result<(), GameError> {
        if self.tiles.contains_key(&pos) {
            return Err(GameError::CellOccupied);
        }
        self.tiles.insert(pos, tile);
        Ok(())
    }

    /// All placed tiles in row-major order
    pub fn placements(&self) -> Vec<Placement> {
        let mut out: Vec<_> = self
            .tiles
            .iter()
            .map(|(&pos, &tile)| Placement::new(pos, tile))
            .collect();
        out.sort_by_key(|p| p.pos.row_major());
        out
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.tiles.values().copied()
    }

    pub fn has_occupied_neighbor(&self, pos: Position) -> bool {
        pos.neighbors().any(|n| self.is_occupied(n))
    }

    /// Tiles contiguous to `pos` along `axis`, end to end, not counting
    /// whatever sits at `pos` itself.
    pub fn line(&self, pos: Position, axis: Axis) -> Vec<Tile> {
        let unit = axis.unit();
        let mut line = Vec::new();

        let at = |step: i32| pos.offset(unit, step).and_then(|p| self.tile_at(p));

        let mut step = 1;
        while let Some(tile) = at(-step) {
            line.push(tile);
            step += 1;
        }
        line.reverse();

        step = 1;
        while let Some(tile) = at(step) {
            line.push(tile);
            step += 1;
        }

        line
    }

    /// Length of the line through `pos`, counting `pos`
    pub fn line_len(&self, pos: Position, axis: Axis) -> usize {
        self.line(pos, axis).len() + 1
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.tiles.keys();
        let mut bounds = Bounds::around(*iter.next()?);
        for &pos in iter {
            bounds.include(pos);
        }
        Some(bounds)
    }

    /// Empty cells next to at least one tile, limited to the bounding box
    /// grown by one. An empty board offers only the origin.
    pub fn possible_positions(&self) -> Vec<Position> {
        let bounds = match self.bounds() {
            Some(b) => b,
            None => return vec![Position::ORIGIN],
        };

        let mut out: Vec<Position> = self
            .tiles
            .keys()
            .flat_map(|&p| p.neighbors())
            .filter(|p| bounds.contains_with_margin(*p, 1) && !self.is_occupied(*p))
            .collect();
        out.sort_by_key(|p| p.row_major());
        out.dedup();
        out
    }
}

impl From<Board> for Vec<Placement> {
    fn from(board: Board) -> Self {
        board.placements()
    }
}

impl TryFrom<Vec<Placement>> for Board {
    type Error = GameError;

    fn try_from(cells: Vec<Placement>) -> Result<Self, Self::Error> {
        Board::from_placements(cells.into_iter().map(|c| (c.pos, c.tile)))
    }
}
