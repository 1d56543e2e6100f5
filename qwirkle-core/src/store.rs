//! Session storage
//!
//! The engine only talks to a [`GameStore`]. Stores hand out working copies
//! and persist them on [`Commit::Write`], so a move that fails halfway never
//! reaches stored state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use rustc_hash::FxHashMap;

use crate::error::StoreError;
use crate::session::{GameId, GameSession};

/// What to do with the working copy when a transaction closure returns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commit {
    Write,
    Discard,
}

/// Atomic persistence of game sessions keyed by id
pub trait GameStore: Send + Sync {
    /// Store a new session built from a freshly allocated id
    fn create(&self, build: &mut dyn FnMut(GameId) -> GameSession) -> Result<GameId, StoreError>;

    /// Current copy of a session
    fn load(&self, id: GameId) -> Result<Option<GameSession>, StoreError>;

    /// Run `f` on a working copy of the session, holding the game's lock for
    /// the duration. Returns false if the game does not exist.
    fn transact(
        &self,
        id: GameId,
        f: &mut dyn FnMut(&mut GameSession) -> Commit,
    ) -> Result<bool, StoreError>;
}

/// Process-local store with one lock per game
#[derive(Default)]
pub struct InMemoryStore {
    games: RwLock<FxHashMap<GameId, Arc<Mutex<GameSession>>>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games
    pub fn len(&self) -> Result<usize, StoreError> {
        let games = self.games.read().map_err(|_| StoreError::Poisoned)?;
        Ok(games.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn slot(&self, id: GameId) -> Result<Option<Arc<Mutex<GameSession>>>, StoreError> {
        let games = self.games.read().map_err(|_| StoreError::Poisoned)?;
        Ok(games.get(&id).cloned())
    }
}

impl GameStore for InMemoryStore {
    fn create(&self, build: &mut dyn FnMut(GameId) -> GameSession) -> Result<GameId, StoreError> {
        let id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let session = build(id);
        let mut games = self.games.write().map_err(|_| StoreError::Poisoned)?;
        games.insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    fn load(&self, id: GameId) -> Result<Option<GameSession>, StoreError> {
        let Some(slot) = self.slot(id)? else {
            return Ok(None);
        };
        let session = slot.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(Some(session.clone()))
    }

    fn transact(
        &self,
        id: GameId,
        f: &mut dyn FnMut(&mut GameSession) -> Commit,
    ) -> Result<bool, StoreError> {
        // The map lock is released before the game lock is taken
        let Some(slot) = self.slot(id)? else {
            return Ok(false);
        };
        let mut stored = slot.lock().map_err(|_| StoreError::Poisoned)?;

        let mut working = stored.clone();
        if f(&mut working) == Commit::Write {
            *stored = working;
        }
        Ok(true)
    }
}
