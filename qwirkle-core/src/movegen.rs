//! Legal move enumeration
//!
//! Candidates come from two sources:
//! - every hand tile at every open position
//! - every compatible subset of the hand (2..=6 tiles, no repeated face, one
//!   shared attribute) laid as a straight run from every open position in
//!   each of the four directions
//!
//! Each candidate goes through the same validator used for submitted moves,
//! then gets scored, deduplicated and ranked.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Placement, Position, DIRECTIONS};
use crate::scoring::{score_move, AffectedLines};
use crate::tiles::{Tile, HAND_SIZE};
use crate::validate::{check_shared_attribute, validate_set, validate_single};

/// A move the player could make
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "move_type", rename_all = "lowercase")]
pub enum Suggestion {
    Place {
        tiles: Vec<Placement>,
        expected_points: u32,
        affected_lines: AffectedLines,
    },
    Exchange,
    Pass,
}

impl Suggestion {
    pub fn expected_points(&self) -> u32 {
        match self {
            Suggestion::Place { expected_points, .. } => *expected_points,
            Suggestion::Exchange | Suggestion::Pass => 0,
        }
    }
}

/// Result of a move search, best placement first
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableMoves {
    pub has_moves: bool,
    pub moves: Vec<Suggestion>,
}

impl AvailableMoves {
    /// Nothing but a pass
    pub fn pass_only() -> Self {
        Self {
            has_moves: false,
            moves: vec![Suggestion::Pass],
        }
    }

    fn no_placement() -> Self {
        Self {
            has_moves: false,
            moves: vec![Suggestion::Exchange, Suggestion::Pass],
        }
    }

    /// Highest scoring placement, if any
    pub fn best(&self) -> Option<&Suggestion> {
        self.moves
            .iter()
            .find(|m| matches!(m, Suggestion::Place { .. }))
    }
}

/// Move search failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveGenError {
    #[error("hand holds {0} tiles, more than six")]
    HandTooLarge(usize),
}

/// Every legal placement for `hand` on `board`, ranked by score
pub fn find_available_moves(hand: &[Tile], board: &Board) -> Result<AvailableMoves, MoveGenError> {
    if hand.len() > HAND_SIZE {
        return Err(MoveGenError::HandTooLarge(hand.len()));
    }
    if hand.is_empty() {
        return Ok(AvailableMoves::pass_only());
    }

    let positions = board.possible_positions();

    let mut candidates: Vec<Vec<Placement>> = Vec::new();
    for &tile in hand {
        for &pos in &positions {
            if validate_single(board, pos, tile).is_ok() {
                candidates.push(vec![Placement::new(pos, tile)]);
            }
        }
    }

    let combos = tile_combinations(hand);
    candidates.extend(lay_runs(board, &combos, &positions));

    let mut seen = FxHashSet::default();
    let mut moves: Vec<Suggestion> = candidates
        .into_iter()
        .filter(|tiles| seen.insert(signature(tiles)))
        .map(|tiles| {
            let score = score_move(board, &tiles);
            Suggestion::Place {
                tiles,
                expected_points: score.points,
                affected_lines: score.affected_lines,
            }
        })
        .collect();

    if moves.is_empty() {
        return Ok(AvailableMoves::no_placement());
    }

    // Stable: equal scores keep discovery order
    moves.sort_by(|a, b| b.expected_points().cmp(&a.expected_points()));

    tracing::debug!(
        hand = hand.len(),
        positions = positions.len(),
        combos = combos.len(),
        moves = moves.len(),
        "move search finished"
    );

    Ok(AvailableMoves {
        has_moves: true,
        moves,
    })
}

/// Compatible hand subsets of size 2..=6, smallest first, each size in
/// lexicographic index order
pub fn tile_combinations(hand: &[Tile]) -> Vec<Vec<Tile>> {
    let max = hand.len().min(HAND_SIZE);
    (2..=max)
        .flat_map(|k| Combinations::new(hand.len(), k))
        .map(|idx| idx.iter().map(|&i| hand[i]).collect::<Vec<_>>())
        .filter(|tiles| check_shared_attribute(tiles).is_ok())
        .collect()
}

/// Order-independent identity of a placement set
fn signature(tiles: &[Placement]) -> Vec<(Position, Tile)> {
    let mut sig: Vec<_> = tiles.iter().map(|p| (p.pos, p.tile)).collect();
    sig.sort();
    sig
}

// ============================================================================
// RUN LAYING
// ============================================================================

type RunTask<'a> = (&'a [Tile], Position, (i32, i32));

/// Lay each combination from each start position in each direction and keep
/// the runs that validate
fn lay_runs(board: &Board, combos: &[Vec<Tile>], positions: &[Position]) -> Vec<Vec<Placement>> {
    let tasks: Vec<RunTask<'_>> = combos
        .iter()
        .flat_map(|combo| {
            positions.iter().flat_map(move |&pos| {
                DIRECTIONS.iter().map(move |&dir| (combo.as_slice(), pos, dir))
            })
        })
        .collect();

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        tasks
            .par_iter()
            .filter_map(|task| try_run(board, task))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        tasks.iter().filter_map(|task| try_run(board, task)).collect()
    }
}

fn try_run(board: &Board, &(combo, start, dir): &RunTask<'_>) -> Option<Vec<Placement>> {
    let run: Vec<Placement> = combo
        .iter()
        .enumerate()
        .map(|(i, &tile)| Some(Placement::new(start.offset(dir, i as i32)?, tile)))
        .collect::<Option<_>>()?;

    // Runs through occupied cells can never validate
    if run.iter().any(|p| board.is_occupied(p.pos)) {
        return None;
    }

    validate_set(board, &run).ok().map(|_| run)
}

// ============================================================================
// COMBINATIONS
// ============================================================================

/// Iterative k-of-n index combinations in lexicographic order
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        // Rightmost index that can still move forward
        let k = self.indices.len();
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) else {
            self.done = true;
            return None;
        };

        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}
