//! Qwirkle Core - Rules engine for a two-player tile-placement game
//!
//! This crate provides the core game logic:
//! - Tile catalog, hands and a seeded deck
//! - Sparse board geometry with line queries
//! - Placement validation and scoring
//! - Ranked legal-move enumeration
//! - Game sessions with turn order and termination
//! - A store seam and the engine operations over it

pub mod tiles;
pub mod board;
pub mod error;
pub mod validate;
pub mod scoring;
pub mod movegen;
pub mod session;
pub mod config;
pub mod store;
pub mod engine;

// Re-exports for convenient access
pub use tiles::{Color, Shape, Tile, Hand, Deck, ALL_TILES, COPIES_PER_FACE, HAND_SIZE, TOTAL_TILES};
pub use board::{Axis, Board, Placement, Position};
pub use error::{EngineError, GameError, StoreError};
pub use validate::{validate_set, validate_single};
pub use scoring::{score_move, ScoreBreakdown, MAX_LINE_LEN, QWIRKLE_BONUS};
pub use movegen::{find_available_moves, AvailableMoves, Suggestion};
pub use session::{GameId, GameSession, GameState, GameStatus, EndReason, Move, MoveKind, PlayerId};
pub use config::EngineConfig;
pub use store::{Commit, GameStore, InMemoryStore};
pub use engine::{Engine, MoveResult};
