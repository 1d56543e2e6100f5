//! Move scoring

use serde::{Deserialize, Serialize};

use crate::board::{Axis, Board, Placement};
use crate::tiles::Tile;

/// Longest legal line
pub const MAX_LINE_LEN: usize = 6;

/// Bonus for completing a six-tile line
pub const QWIRKLE_BONUS: u32 = 6;

/// Faces touched along each axis, for display only
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedLines {
    pub horizontal: Vec<Tile>,
    pub vertical: Vec<Tile>,
}

/// Points for a move plus the lines it touched
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub points: u32,
    pub affected_lines: AffectedLines,
}

/// Score a move as if it were on the board.
///
/// Each placed tile scores its own horizontal and vertical lines, so a line
/// shared by several tiles of the same move is counted once per tile. A tile
/// with no line on either axis scores 1.
pub fn score_move(board: &Board, placements: &[Placement]) -> ScoreBreakdown {
    let mut scratch = board.clone();
    for p in placements {
        // Validation has already ruled out occupied cells
        let _ = scratch.place(p.pos, p.tile);
    }

    let mut breakdown = ScoreBreakdown::default();
    for p in placements {
        let mut isolated = true;

        for axis in Axis::BOTH {
            let line = scratch.line(p.pos, axis);
            if line.is_empty() {
                continue;
            }
            isolated = false;
            breakdown.points += line_points(line.len() + 1);

            let touched = match axis {
                Axis::Horizontal => &mut breakdown.affected_lines.horizontal,
                Axis::Vertical => &mut breakdown.affected_lines.vertical,
            };
            for tile in line {
                if !touched.contains(&tile) {
                    touched.push(tile);
                }
            }
        }

        if isolated {
            breakdown.points += 1;
        }
    }
    breakdown
}

/// Points for one line of `len` tiles (len > 1)
fn line_points(len: usize) -> u32 {
    let base = len as u32;
    if len == MAX_LINE_LEN {
        base + QWIRKLE_BONUS
    } else {
        base
    }
}
