//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::session::GameId;

/// Knobs shared by every game an engine hosts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base seed for deck shuffles (None = fresh entropy per game)
    pub seed: Option<u64>,
    /// Whether state snapshots carry ranked move suggestions
    pub suggest_moves: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            suggest_moves: true,
        }
    }
}

impl EngineConfig {
    /// Set base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Toggle move suggestions in snapshots
    pub fn with_suggest_moves(mut self, suggest: bool) -> Self {
        self.suggest_moves = suggest;
        self
    }

    /// Deck seed for one game. Fixed base seeds give every game its own
    /// reproducible stream.
    pub fn game_seed(&self, id: GameId) -> u64 {
        match self.seed {
            Some(base) => base ^ id.0.wrapping_mul(0x9E37_79B9_7F4A_7C15),
            None => rand::random(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.seed.is_none());
        assert!(config.suggest_moves);
    }

    #[test]
    fn test_game_seed_is_per_game_and_stable() {
        let config = EngineConfig::default().with_seed(42);
        assert_eq!(config.game_seed(GameId(1)), config.game_seed(GameId(1)));
        assert_ne!(config.game_seed(GameId(1)), config.game_seed(GameId(2)));
    }
}
