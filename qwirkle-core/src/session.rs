//! Game session: turn order, hands, deck, scores and termination
//!
//! A session is plain data. `submit_move` works on a copy and swaps it in only
//! once every check has passed, so a rejected move leaves the session exactly
//! as it was.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Placement};
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::movegen::{find_available_moves, AvailableMoves};
use crate::scoring::score_move;
use crate::tiles::{Deck, Hand, Tile, ALL_TILES, HAND_SIZE};
use crate::validate::validate_set;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Awarded once, to the last player who did something other than pass
pub const END_BONUS: u32 = 6;

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Initialized,
    Active,
    Completed,
}

/// A submitted move
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "move_type", rename_all = "lowercase")]
pub enum Move {
    Place { tiles: Vec<Placement> },
    Exchange { tiles: Vec<Tile> },
    Pass,
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Place { .. } => MoveKind::Place,
            Move::Exchange { .. } => MoveKind::Exchange,
            Move::Pass => MoveKind::Pass,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Place,
    Exchange,
    Pass,
}

/// One committed move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: PlayerId,
    pub kind: MoveKind,
    pub points: u32,
}

/// Why a game finished
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Deck empty and one hand played out
    TilesExhausted,
    /// Two passes in a row
    ConsecutivePasses,
}

/// What one player sees of a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: GameId,
    pub status: GameStatus,
    pub current_player: PlayerId,
    pub player1: PlayerId,
    pub player2: Option<PlayerId>,
    pub your_hand: Vec<Tile>,
    pub board: Vec<Placement>,
    pub scores: BTreeMap<PlayerId, u32>,
    pub remaining_deck: usize,
    pub is_your_turn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_moves: Option<AvailableMoves>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<EndReason>,
}

// ============================================================================
// SESSION
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    id: GameId,
    status: GameStatus,
    player1: PlayerId,
    player2: Option<PlayerId>,
    current_player: PlayerId,
    board: Board,
    deck: Deck,
    /// Indexed by seat: 0 = player1, 1 = player2
    hands: [Hand; 2],
    scores: [u32; 2],
    history: Vec<MoveRecord>,
    end_reason: Option<EndReason>,
}

impl GameSession {
    /// New game with a freshly shuffled deck and player1's opening hand
    pub fn new(id: GameId, player1: PlayerId, seed: u64) -> Self {
        Self::with_deck(id, player1, Deck::full(seed))
    }

    /// New game over a prepared deck. Player1 draws first.
    pub fn with_deck(id: GameId, player1: PlayerId, mut deck: Deck) -> Self {
        let hand = Hand::from(deck.draw(HAND_SIZE));
        Self {
            id,
            status: GameStatus::Initialized,
            player1,
            player2: None,
            current_player: player1,
            board: Board::new(),
            deck,
            hands: [hand, Hand::new()],
            scores: [0, 0],
            history: Vec::new(),
            end_reason: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn player1(&self) -> PlayerId {
        self.player1
    }

    pub fn player2(&self) -> Option<PlayerId> {
        self.player2
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn hand(&self, player: PlayerId) -> Option<&Hand> {
        self.seat(player).map(|s| &self.hands[s])
    }

    pub fn score(&self, player: PlayerId) -> Option<u32> {
        self.seat(player).map(|s| self.scores[s])
    }

    fn seat(&self, player: PlayerId) -> Option<usize> {
        if player == self.player1 {
            Some(0)
        } else if Some(player) == self.player2 {
            Some(1)
        } else {
            None
        }
    }

    fn opponent(&self, player: PlayerId) -> PlayerId {
        if player == self.player1 {
            self.player2.unwrap_or(self.player1)
        } else {
            self.player1
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Seat the second player and start the game
    pub fn join(&mut self, player: PlayerId) -> Result<(), GameError> {
        if self.status != GameStatus::Initialized
            || self.player2.is_some()
            || player == self.player1
        {
            return Err(GameError::AlreadyFull);
        }
        if self.deck.len() < HAND_SIZE {
            return Err(GameError::InsufficientDeck);
        }

        self.hands[1] = Hand::from(self.deck.draw(HAND_SIZE));
        self.player2 = Some(player);
        self.status = GameStatus::Active;
        tracing::info!(game = %self.id, %player, "player joined, game active");
        Ok(())
    }

    /// Apply a move for `player`. Returns the points scored; on error the
    /// session is unchanged.
    pub fn submit_move(&mut self, player: PlayerId, mv: &Move) -> Result<u32, GameError> {
        let mut next = self.clone();
        let points = next.apply(player, mv)?;
        *self = next;
        Ok(points)
    }

    fn apply(&mut self, player: PlayerId, mv: &Move) -> Result<u32, GameError> {
        if self.status != GameStatus::Active {
            return Err(GameError::GameNotActive);
        }
        let seat = match self.seat(player) {
            Some(seat) if player == self.current_player => seat,
            _ => return Err(GameError::NotYourTurn),
        };

        let points = match mv {
            Move::Place { tiles } => self.apply_place(seat, tiles)?,
            Move::Exchange { tiles } => self.apply_exchange(seat, tiles)?,
            Move::Pass => 0,
        };

        self.history.push(MoveRecord {
            player,
            kind: mv.kind(),
            points,
        });
        self.current_player = self.opponent(player);
        tracing::debug!(game = %self.id, %player, kind = ?mv.kind(), points, "move committed");

        self.check_termination();
        Ok(points)
    }

    fn apply_place(&mut self, seat: usize, tiles: &[Placement]) -> Result<u32, GameError> {
        if tiles.is_empty() || tiles.len() > HAND_SIZE {
            return Err(GameError::InvalidMove);
        }
        let faces: Vec<Tile> = tiles.iter().map(|p| p.tile).collect();
        if !self.hands[seat].contains_all(&faces) {
            return Err(GameError::TileNotInHand);
        }
        validate_set(&self.board, tiles)?;

        let points = score_move(&self.board, tiles).points;
        for p in tiles {
            self.board.place(p.pos, p.tile)?;
        }
        if !self.hands[seat].remove_all(&faces) {
            return Err(GameError::TileNotInHand);
        }
        let drawn = self.deck.draw(tiles.len());
        self.hands[seat].extend(drawn);
        self.scores[seat] += points;
        Ok(points)
    }

    fn apply_exchange(&mut self, seat: usize, faces: &[Tile]) -> Result<u32, GameError> {
        if faces.is_empty() || faces.len() > HAND_SIZE {
            return Err(GameError::InvalidMove);
        }
        if !self.hands[seat].contains_all(faces) {
            return Err(GameError::TileNotInHand);
        }
        if self.deck.len() < faces.len() {
            return Err(GameError::InsufficientDeck);
        }

        if !self.hands[seat].remove_all(faces) {
            return Err(GameError::TileNotInHand);
        }
        self.deck.give_back(faces);
        let drawn = self.deck.draw(faces.len());
        self.hands[seat].extend(drawn);
        Ok(0)
    }

    // ========================================================================
    // TERMINATION
    // ========================================================================

    /// Whether the game is over or an end condition now holds
    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::Completed || self.pending_end().is_some()
    }

    fn pending_end(&self) -> Option<EndReason> {
        if self.status != GameStatus::Active {
            return None;
        }
        if self.deck.is_empty() && self.hands.iter().any(Hand::is_empty) {
            return Some(EndReason::TilesExhausted);
        }
        match self.history.as_slice() {
            [.., a, b] if a.kind == MoveKind::Pass && b.kind == MoveKind::Pass => {
                Some(EndReason::ConsecutivePasses)
            }
            _ => None,
        }
    }

    /// Move to Completed if an end condition holds, applying the end bonus
    /// once. Returns whether the game is over.
    pub fn check_termination(&mut self) -> bool {
        if self.status == GameStatus::Completed {
            return true;
        }
        let Some(reason) = self.pending_end() else {
            return false;
        };

        let last_mover = self
            .history
            .iter()
            .rev()
            .find(|r| r.kind != MoveKind::Pass)
            .map(|r| r.player);
        if let Some(seat) = last_mover.and_then(|p| self.seat(p)) {
            self.scores[seat] += END_BONUS;
        }

        self.status = GameStatus::Completed;
        self.end_reason = Some(reason);
        tracing::info!(
            game = %self.id,
            ?reason,
            bonus_to = ?last_mover,
            scores = ?self.scores,
            "game completed"
        );
        true
    }

    /// Higher score wins; player1 takes ties. None until the game is over.
    pub fn winner(&self) -> Option<PlayerId> {
        if self.status != GameStatus::Completed {
            return None;
        }
        match self.player2 {
            Some(p2) if self.scores[1] > self.scores[0] => Some(p2),
            _ => Some(self.player1),
        }
    }

    /// Copies of every face across deck, both hands and the board
    pub fn face_census(&self) -> FxHashMap<Tile, usize> {
        let mut census: FxHashMap<Tile, usize> = ALL_TILES.iter().map(|&t| (t, 0)).collect();
        let all = self
            .deck
            .tiles()
            .iter()
            .copied()
            .chain(self.hands.iter().flat_map(|h| h.tiles().iter().copied()))
            .chain(self.board.tiles());
        for tile in all {
            *census.entry(tile).or_insert(0) += 1;
        }
        census
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    /// Snapshot as seen by `viewer`. Move suggestions are best-effort and
    /// fall back to a pass if the search fails.
    pub fn view(&self, viewer: PlayerId, config: &EngineConfig) -> GameState {
        let hand = self.hand(viewer).map(|h| h.tiles().to_vec()).unwrap_or_default();

        let mut scores = BTreeMap::new();
        scores.insert(self.player1, self.scores[0]);
        if let Some(p2) = self.player2 {
            scores.insert(p2, self.scores[1]);
        }

        let available_moves = if config.suggest_moves
            && self.status == GameStatus::Active
            && self.seat(viewer).is_some()
        {
            Some(match find_available_moves(&hand, &self.board) {
                Ok(moves) => moves,
                Err(err) => {
                    tracing::warn!(game = %self.id, %err, "move search failed, offering pass");
                    AvailableMoves::pass_only()
                }
            })
        } else {
            None
        };

        GameState {
            game_id: self.id,
            status: self.status,
            current_player: self.current_player,
            player1: self.player1,
            player2: self.player2,
            your_hand: hand,
            board: self.board.placements(),
            scores,
            remaining_deck: self.deck.len(),
            is_your_turn: self.status == GameStatus::Active && viewer == self.current_player,
            available_moves,
            winner: self.winner(),
            end_reason: self.end_reason,
        }
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Load a session from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading session file {}", path.display()))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("parsing session file {}", path.display()))?;
        Ok(session)
    }

    /// Save a session to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing session file {}", path.display()))?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
