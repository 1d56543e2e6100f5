//! Shared server state

use qwirkle_core::{Engine, EngineConfig};

/// Server-wide shared state
pub struct ServerState {
    pub engine: Engine,
}

impl ServerState {
    /// State backed by an in-memory game store
    pub fn new(config: EngineConfig) -> Self {
        Self::with_engine(Engine::in_memory(config))
    }

    pub fn with_engine(engine: Engine) -> Self {
        Self { engine }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
