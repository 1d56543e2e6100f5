//! Engine: the operations a session/API layer calls
//!
//! Every operation runs inside a store transaction for its game, so two
//! requests against the same game never interleave.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, GameError};
use crate::session::{GameId, GameSession, GameState, GameStatus, Move, PlayerId};
use crate::store::{Commit, GameStore, InMemoryStore};

/// Outcome of a submitted move. Rule violations are results, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum MoveResult {
    Accepted { points: u32, game_over: bool },
    Rejected { reason: GameError },
}

impl MoveResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveResult::Accepted { .. })
    }
}

pub struct Engine {
    store: Arc<dyn GameStore>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(store: Arc<dyn GameStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Engine over a fresh [`InMemoryStore`]
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Open a game with `player` in the first seat
    pub fn create_game(&self, player: PlayerId) -> Result<GameState, EngineError> {
        let config = &self.config;
        let id = self
            .store
            .create(&mut |id| GameSession::new(id, player, config.game_seed(id)))?;
        tracing::info!(game = %id, %player, "game created");
        self.get_game_state(id, player)
    }

    /// Take the second seat
    pub fn join_game(&self, game: GameId, player: PlayerId) -> Result<GameState, EngineError> {
        let mut outcome = Ok(());
        let found = self.store.transact(game, &mut |session| match session.join(player) {
            Ok(()) => Commit::Write,
            Err(reason) => {
                outcome = Err(reason);
                Commit::Discard
            }
        })?;
        if !found {
            return Err(EngineError::NotFound(game));
        }
        if let Err(reason) = outcome {
            tracing::debug!(game = %game, %player, ?reason, "join rejected");
            return Err(EngineError::Rejected(reason));
        }
        self.get_game_state(game, player)
    }

    /// Validate and commit a move
    pub fn submit_move(
        &self,
        game: GameId,
        player: PlayerId,
        mv: &Move,
    ) -> Result<MoveResult, EngineError> {
        let mut result = None;
        let found = self.store.transact(game, &mut |session| {
            match session.submit_move(player, mv) {
                Ok(points) => {
                    result = Some(MoveResult::Accepted {
                        points,
                        game_over: session.is_game_over(),
                    });
                    Commit::Write
                }
                Err(reason) => {
                    result = Some(MoveResult::Rejected { reason });
                    Commit::Discard
                }
            }
        })?;
        if !found {
            return Err(EngineError::NotFound(game));
        }

        let result = result.ok_or(EngineError::NotFound(game))?;
        if let MoveResult::Rejected { reason } = result {
            tracing::debug!(game = %game, %player, ?reason, "move rejected");
        }
        Ok(result)
    }

    /// Snapshot for `player`. Settles the game first if an end condition
    /// now holds.
    pub fn get_game_state(&self, game: GameId, player: PlayerId) -> Result<GameState, EngineError> {
        let config = &self.config;
        let mut state = None;
        let found = self.store.transact(game, &mut |session| {
            let was_over = session.status() == GameStatus::Completed;
            let now_over = session.check_termination();
            state = Some(session.view(player, config));
            if now_over && !was_over {
                Commit::Write
            } else {
                Commit::Discard
            }
        })?;
        if !found {
            return Err(EngineError::NotFound(game));
        }
        state.ok_or(EngineError::NotFound(game))
    }

    /// Full session, including both hands and the deck
    pub fn session(&self, game: GameId) -> Result<GameSession, EngineError> {
        self.store.load(game)?.ok_or(EngineError::NotFound(game))
    }
}
