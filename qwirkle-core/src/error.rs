//! Error types
//!
//! Two tiers: [`GameError`] is a rule violation reported back to the player and
//! never corrupts a session; [`StoreError`] and [`EngineError`] cover
//! failures of the session store and lookups.

use serde::{Deserialize, Serialize};

use crate::session::GameId;

/// Rule violation reason codes.
///
/// Serialized as the bare variant name (`"NotYourTurn"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum GameError {
    #[error("it is not your turn")]
    NotYourTurn,

    #[error("game is not active")]
    GameNotActive,

    #[error("cell is already occupied")]
    CellOccupied,

    #[error("tile must touch an existing tile")]
    NotAdjacent,

    #[error("line would exceed six tiles")]
    LineTooLong,

    #[error("tile shares neither the line's color nor its shape")]
    AttributeMismatch,

    #[error("tile repeats a face already in the line")]
    DuplicateTile,

    #[error("tiles must form one contiguous row or column")]
    NotColinear,

    #[error("tile is not in your hand")]
    TileNotInHand,

    #[error("not enough tiles left in the deck")]
    InsufficientDeck,

    #[error("game already has two players")]
    AlreadyFull,

    #[error("move must name between one and six tiles")]
    InvalidMove,
}

impl GameError {
    /// Stable reason code, matches the serialized form
    pub fn code(self) -> &'static str {
        match self {
            GameError::NotYourTurn => "NotYourTurn",
            GameError::GameNotActive => "GameNotActive",
            GameError::CellOccupied => "CellOccupied",
            GameError::NotAdjacent => "NotAdjacent",
            GameError::LineTooLong => "LineTooLong",
            GameError::AttributeMismatch => "AttributeMismatch",
            GameError::DuplicateTile => "DuplicateTile",
            GameError::NotColinear => "NotColinear",
            GameError::TileNotInHand => "TileNotInHand",
            GameError::InsufficientDeck => "InsufficientDeck",
            GameError::AlreadyFull => "AlreadyFull",
            GameError::InvalidMove => "InvalidMove",
        }
    }
}

/// Session store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error("store backend failed: {0}")]
    Backend(String),
}

/// Engine-level failure: anything that is not a move result
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("game {0} not found")]
    NotFound(GameId),

    #[error("request rejected: {0}")]
    Rejected(#[from] GameError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
