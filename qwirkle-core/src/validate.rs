//! Placement legality
//!
//! Every check reads a board snapshot. Multi-tile checks work on a scratch
//! copy; the caller's board is never touched.

use rustc_hash::FxHashSet;

use crate::board::{Axis, Board, Placement, Position};
use crate::error::GameError;
use crate::scoring::MAX_LINE_LEN;
use crate::tiles::{Tile, HAND_SIZE};

/// Check a single tile against the board as it stands
pub fn validate_single(board: &Board, pos: Position, tile: Tile) -> Result<(), GameError> {
    let result = check_single(board, pos, tile);
    if let Err(reason) = result {
        tracing::trace!(%tile, x = pos.x, y = pos.y, ?reason, "single placement rejected");
    }
    result
}

/// Check a whole move set. Either every tile is legal together or the move
/// is rejected.
pub fn validate_set(board: &Board, placements: &[Placement]) -> Result<(), GameError> {
    let result = check_set(board, placements);
    if let Err(reason) = result {
        tracing::trace!(tiles = placements.len(), ?reason, "move set rejected");
    }
    result
}

/// The line rule shared by both entry points. `line` is the run of tiles
/// the new tile joins, not including the new tile.
pub fn check_line(tile: Tile, line: &[Tile]) -> Result<(), GameError> {
    match line {
        [] => Ok(()),
        _ if line.len() >= MAX_LINE_LEN => Err(GameError::LineTooLong),
        [only] => {
            if *only == tile {
                Err(GameError::DuplicateTile)
            } else if only.color != tile.color && only.shape != tile.shape {
                Err(GameError::AttributeMismatch)
            } else {
                Ok(())
            }
        }
        [first, rest @ ..] => {
            if rest.iter().all(|t| t.color == first.color) {
                // Color line: same color, new shape
                if tile.color != first.color {
                    Err(GameError::AttributeMismatch)
                } else if line.iter().any(|t| t.shape == tile.shape) || has_repeated_face(line) {
                    Err(GameError::DuplicateTile)
                } else {
                    Ok(())
                }
            } else if rest.iter().all(|t| t.shape == first.shape) {
                // Shape line: same shape, new color
                if tile.shape != first.shape {
                    Err(GameError::AttributeMismatch)
                } else if line.iter().any(|t| t.color == tile.color) || has_repeated_face(line) {
                    Err(GameError::DuplicateTile)
                } else {
                    Ok(())
                }
            } else {
                Err(GameError::AttributeMismatch)
            }
        }
    }
}

/// A tile bridging two segments can join lines that already repeat a face
fn has_repeated_face(line: &[Tile]) -> bool {
    let mut seen = FxHashSet::default();
    !line.iter().all(|t| seen.insert(*t))
}

/// Faces of a move set: no repeats, and one attribute shared by all
pub fn check_shared_attribute(tiles: &[Tile]) -> Result<(), GameError> {
    let Some(first) = tiles.first() else {
        return Ok(());
    };

    let mut seen = FxHashSet::default();
    if !tiles.iter().all(|t| seen.insert(*t)) {
        return Err(GameError::DuplicateTile);
    }

    let same_color = tiles.iter().all(|t| t.color == first.color);
    let same_shape = tiles.iter().all(|t| t.shape == first.shape);
    if same_color || same_shape {
        Ok(())
    } else {
        Err(GameError::AttributeMismatch)
    }
}

// ============================================================================
// CHECKS
// ============================================================================

fn check_single(board: &Board, pos: Position, tile: Tile) -> Result<(), GameError> {
    if board.is_empty() {
        return if pos == Position::ORIGIN {
            Ok(())
        } else {
            Err(GameError::NotAdjacent)
        };
    }

    if board.is_occupied(pos) {
        return Err(GameError::CellOccupied);
    }
    if !board.has_occupied_neighbor(pos) {
        return Err(GameError::NotAdjacent);
    }

    for axis in Axis::BOTH {
        check_line(tile, &board.line(pos, axis))?;
    }
    Ok(())
}

fn check_set(board: &Board, placements: &[Placement]) -> Result<(), GameError> {
    if placements.is_empty() || placements.len() > HAND_SIZE {
        return Err(GameError::InvalidMove);
    }
    let mut positions = FxHashSet::default();
    if !placements.iter().all(|p| positions.insert(p.pos)) {
        return Err(GameError::CellOccupied);
    }

    // First move: every tile must sit on the origin, so only a lone tile passes
    if board.is_empty() {
        return if placements.iter().all(|p| p.pos == Position::ORIGIN) {
            Ok(())
        } else {
            Err(GameError::NotAdjacent)
        };
    }

    if !is_contiguous_run(placements) {
        return Err(GameError::NotColinear);
    }

    let tiles: Vec<Tile> = placements.iter().map(|p| p.tile).collect();
    check_shared_attribute(&tiles)?;

    if !placements.iter().any(|p| board.has_occupied_neighbor(p.pos)) {
        return Err(GameError::NotAdjacent);
    }

    let mut scratch = board.clone();
    for p in placements {
        scratch.place(p.pos, p.tile)?;
    }
    for p in placements {
        for axis in Axis::BOTH {
            check_line(p.tile, &scratch.line(p.pos, axis))?;
        }
    }
    Ok(())
}

/// All on one row or one column, with no gaps once sorted
fn is_contiguous_run(placements: &[Placement]) -> bool {
    let first = placements[0].pos;
    let mut coords: Vec<i64> = if placements.iter().all(|p| p.pos.y == first.y) {
        placements.iter().map(|p| i64::from(p.pos.x)).collect()
    } else if placements.iter().all(|p| p.pos.x == first.x) {
        placements.iter().map(|p| i64::from(p.pos.y)).collect()
    } else {
        return false;
    };
    coords.sort_unstable();
    coords.windows(2).all(|w| w[1] - w[0] == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{Color, Shape};

    fn t(name: &str) -> Tile {
        name.parse().unwrap()
    }

    fn at(x: i32, y: i32, name: &str) -> Placement {
        Placement::new(Position::new(x, y), t(name))
    }

    fn board(cells: &[Placement]) -> Board {
        Board::from_placements(cells.iter().map(|c| (c.pos, c.tile))).unwrap()
    }

    /// red_circle red_square red_star on y = 0
    fn red_row() -> Board {
        board(&[
            at(0, 0, "red_circle"),
            at(1, 0, "red_square"),
            at(2, 0, "red_star"),
        ])
    }

    #[test]
    fn test_first_move_must_be_origin() {
        let empty = Board::new();
        assert_eq!(validate_single(&empty, Position::ORIGIN, t("red_circle")), Ok(()));
        assert_eq!(
            validate_single(&empty, Position::new(1, 0), t("red_circle")),
            Err(GameError::NotAdjacent)
        );
        assert_eq!(validate_set(&empty, &[at(0, 0, "red_circle")]), Ok(()));
        assert_eq!(
            validate_set(&empty, &[at(0, 0, "red_circle"), at(1, 0, "red_square")]),
            Err(GameError::NotAdjacent)
        );
    }

    #[test]
    fn test_single_occupied_and_detached() {
        let b = red_row();
        assert_eq!(
            validate_single(&b, Position::new(1, 0), t("red_cross")),
            Err(GameError::CellOccupied)
        );
        assert_eq!(
            validate_single(&b, Position::new(5, 5), t("red_cross")),
            Err(GameError::NotAdjacent)
        );
    }

    #[test]
    fn test_single_against_length_one_line() {
        let b = board(&[at(0, 0, "red_circle")]);
        assert_eq!(validate_single(&b, Position::new(1, 0), t("red_square")), Ok(()));
        assert_eq!(validate_single(&b, Position::new(0, 1), t("blue_circle")), Ok(()));
        assert_eq!(
            validate_single(&b, Position::new(1, 0), t("blue_square")),
            Err(GameError::AttributeMismatch)
        );
        assert_eq!(
            validate_single(&b, Position::new(1, 0), t("red_circle")),
            Err(GameError::DuplicateTile)
        );
    }

    #[test]
    fn test_single_against_color_line() {
        let b = red_row();
        assert_eq!(validate_single(&b, Position::new(3, 0), t("red_cross")), Ok(()));
        assert_eq!(validate_single(&b, Position::new(-1, 0), t("red_clover")), Ok(()));
        // Third color next to a red line
        assert_eq!(
            validate_single(&b, Position::new(3, 0), t("blue_cross")),
            Err(GameError::AttributeMismatch)
        );
        // Shape already in the line
        assert_eq!(
            validate_single(&b, Position::new(3, 0), t("red_square")),
            Err(GameError::DuplicateTile)
        );
    }

    #[test]
    fn test_single_against_shape_line() {
        let b = board(&[at(0, 0, "red_circle"), at(0, 1, "blue_circle")]);
        assert_eq!(validate_single(&b, Position::new(0, 2), t("green_circle")), Ok(()));
        assert_eq!(
            validate_single(&b, Position::new(0, 2), t("green_star")),
            Err(GameError::AttributeMismatch)
        );
        assert_eq!(
            validate_single(&b, Position::new(0, -1), t("blue_circle")),
            Err(GameError::DuplicateTile)
        );
    }

    #[test]
    fn test_line_too_long() {
        let full: Vec<Tile> = Shape::ALL.iter().map(|&s| Tile::new(Color::Green, s)).collect();
        assert_eq!(check_line(t("green_circle"), &full), Err(GameError::LineTooLong));
        assert_eq!(check_line(t("green_circle"), &full[1..]), Ok(()));
    }

    #[test]
    fn test_bridge_between_segments_with_shared_face() {
        // red_circle red_square _ red_circle red_star
        let line = [t("red_circle"), t("red_square"), t("red_circle"), t("red_star")];
        assert_eq!(check_line(t("red_cross"), &line), Err(GameError::DuplicateTile));
        let shapes = [t("red_circle"), t("blue_circle"), t("red_circle")];
        assert_eq!(check_line(t("green_circle"), &shapes), Err(GameError::DuplicateTile));
    }

    #[test]
    fn test_both_axes_checked() {
        // Vertical neighbor is fine, horizontal one is not
        let b = board(&[at(0, 0, "red_circle"), at(1, 1, "blue_star")]);
        assert_eq!(
            validate_single(&b, Position::new(0, 1), t("red_square")),
            Err(GameError::AttributeMismatch)
        );
        assert_eq!(validate_single(&b, Position::new(0, 1), t("red_star")), Ok(()));
    }

    #[test]
    fn test_set_must_be_contiguous_run() {
        let b = red_row();
        assert_eq!(
            validate_set(&b, &[at(3, 0, "red_cross"), at(5, 0, "red_clover")]),
            Err(GameError::NotColinear)
        );
        assert_eq!(
            validate_set(&b, &[at(3, 0, "red_cross"), at(4, 1, "red_clover")]),
            Err(GameError::NotColinear)
        );
        // Submitted order does not matter
        assert_eq!(
            validate_set(&b, &[at(4, 0, "red_clover"), at(3, 0, "red_cross")]),
            Ok(())
        );
    }

    #[test]
    fn test_set_gap_filled_by_board_is_rejected() {
        // The run check looks at the submitted tiles only
        let b = board(&[at(0, 0, "red_circle"), at(1, 0, "red_square")]);
        assert_eq!(
            validate_set(&b, &[at(-1, 0, "red_star"), at(2, 0, "red_cross")]),
            Err(GameError::NotColinear)
        );
    }

    #[test]
    fn test_set_shared_attribute() {
        let b = red_row();
        assert_eq!(
            validate_set(&b, &[at(0, 1, "blue_circle"), at(0, 2, "green_square")]),
            Err(GameError::AttributeMismatch)
        );
        assert_eq!(
            validate_set(&b, &[at(3, 0, "red_cross"), at(4, 0, "red_cross")]),
            Err(GameError::DuplicateTile)
        );
    }

    #[test]
    fn test_set_needs_contact() {
        let b = red_row();
        assert_eq!(
            validate_set(&b, &[at(0, 5, "blue_circle"), at(1, 5, "blue_square")]),
            Err(GameError::NotAdjacent)
        );
    }

    #[test]
    fn test_set_shape_and_duplicate_positions() {
        let b = red_row();
        assert_eq!(validate_set(&b, &[]), Err(GameError::InvalidMove));
        assert_eq!(
            validate_set(&b, &[at(3, 0, "red_cross"), at(3, 0, "red_clover")]),
            Err(GameError::CellOccupied)
        );
        assert_eq!(
            validate_set(&b, &[at(2, 0, "red_cross")]),
            Err(GameError::CellOccupied)
        );
    }

    #[test]
    fn test_set_checks_resulting_lines() {
        // Column through origin: red_circle, then the move adds two circles below
        let b = red_row();
        assert_eq!(
            validate_set(&b, &[at(0, 1, "blue_circle"), at(0, 2, "green_circle")]),
            Ok(())
        );
        // The column would hold red_circle twice; with blue_circle between
        // them it reads as a red line that blue_circle does not fit
        assert_eq!(
            validate_set(&b, &[at(0, 1, "blue_circle"), at(0, 2, "red_circle")]),
            Err(GameError::AttributeMismatch)
        );
        // Appending a repeated shape to an existing color line
        assert_eq!(
            validate_set(&b, &[at(3, 0, "red_cross"), at(4, 0, "red_square")]),
            Err(GameError::DuplicateTile)
        );
        // Cross-line failure: tile below red_square must match it
        assert_eq!(
            validate_set(&b, &[at(0, 1, "blue_circle"), at(1, 1, "blue_star")]),
            Err(GameError::AttributeMismatch)
        );
        // Extending the row past six
        let five = board(&[
            at(0, 0, "red_circle"),
            at(1, 0, "red_square"),
            at(2, 0, "red_star"),
            at(3, 0, "red_cross"),
            at(4, 0, "red_diamond"),
        ]);
        assert_eq!(validate_set(&five, &[at(5, 0, "red_clover")]), Ok(()));
        let six = board(&[
            at(0, 0, "red_circle"),
            at(1, 0, "red_square"),
            at(2, 0, "red_star"),
            at(3, 0, "red_cross"),
            at(4, 0, "red_diamond"),
            at(5, 0, "red_clover"),
        ]);
        assert_eq!(
            validate_set(&six, &[at(6, 0, "blue_clover")]),
            Err(GameError::LineTooLong)
        );
    }

    #[test]
    fn test_extreme_coordinates_are_detached() {
        let b = red_row();
        assert_eq!(
            validate_single(&b, Position::new(i32::MAX, 0), t("red_cross")),
            Err(GameError::NotAdjacent)
        );
        assert_eq!(
            validate_set(&b, &[at(i32::MAX, 0, "red_cross")]),
            Err(GameError::NotAdjacent)
        );
        assert_eq!(
            validate_set(&b, &[at(0, i32::MIN, "red_cross"), at(0, i32::MIN + 1, "red_clover")]),
            Err(GameError::NotAdjacent)
        );
        // Ends of the axis are as far apart as coordinates get
        assert_eq!(
            validate_set(&b, &[at(i32::MIN, 0, "red_cross"), at(i32::MAX, 0, "red_clover")]),
            Err(GameError::NotColinear)
        );
    }

    #[test]
    fn test_validate_does_not_touch_board() {
        let b = red_row();
        let before = b.clone();
        let _ = validate_set(&b, &[at(3, 0, "red_cross"), at(4, 0, "red_clover")]);
        let _ = validate_set(&b, &[at(3, 0, "blue_cross")]);
        assert_eq!(b, before);
    }

    #[test]
    fn test_single_matches_set_of_one() {
        let b = red_row();
        for pos in b.possible_positions() {
            for face in crate::tiles::ALL_TILES.iter() {
                assert_eq!(
                    validate_single(&b, pos, *face),
                    validate_set(&b, &[Placement::new(pos, *face)]),
                    "{face} at {pos:?}"
                );
            }
        }
    }
}
