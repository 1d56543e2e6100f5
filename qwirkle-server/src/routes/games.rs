//! Game API endpoints
//!
//! Create, join, move and snapshot. The caller names its own player id;
//! there is no authentication at this layer.

use crate::state::ServerState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use qwirkle_core::{EngineError, GameError, GameId, GameState, Move, MoveResult, PlayerId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Body for create and join
#[derive(Deserialize)]
pub struct PlayerRequest {
    pub player_id: PlayerId,
}

/// Body for a move submission
#[derive(Deserialize)]
pub struct MoveRequest {
    pub player_id: PlayerId,
    #[serde(rename = "move")]
    pub mv: Move,
}

/// Query for a state snapshot
#[derive(Deserialize)]
pub struct StateQuery {
    pub player_id: PlayerId,
}

#[derive(Serialize)]
pub struct CreateGameResponse {
    pub game_id: GameId,
    pub game_state: GameState,
}

#[derive(Serialize)]
pub struct JoinGameResponse {
    pub game_state: GameState,
}

/// Engine failure mapped onto an HTTP status
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            EngineError::Rejected(GameError::AlreadyFull) => (StatusCode::CONFLICT, "AlreadyFull"),
            EngineError::Rejected(reason) => (StatusCode::BAD_REQUEST, reason.code()),
            EngineError::Store(err) => {
                tracing::error!(%err, "game store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "StoreError")
            }
        };
        let body = Json(json!({
            "error": code,
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Create a game for the requesting player
pub async fn create_game(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let game_state = state.engine.create_game(req.player_id)?;
    Ok(Json(CreateGameResponse {
        game_id: game_state.game_id,
        game_state,
    }))
}

/// Join an open game as the second player
pub async fn join_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<JoinGameResponse>, ApiError> {
    let game_state = state.engine.join_game(GameId(id), req.player_id)?;
    Ok(Json(JoinGameResponse { game_state }))
}

/// Submit a move. Rule violations come back as 400 with the reason code.
pub async fn submit_move(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
    Json(req): Json<MoveRequest>,
) -> Result<(StatusCode, Json<MoveResult>), ApiError> {
    let result = state.engine.submit_move(GameId(id), req.player_id, &req.mv)?;
    let status = match result {
        MoveResult::Accepted { .. } => StatusCode::OK,
        MoveResult::Rejected { .. } => StatusCode::BAD_REQUEST,
    };
    Ok((status, Json(result)))
}

/// Snapshot of a game as seen by one player
pub async fn get_game_state(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
    Query(query): Query<StateQuery>,
) -> Result<Json<GameState>, ApiError> {
    let game_state = state.engine.get_game_state(GameId(id), query.player_id)?;
    Ok(Json(game_state))
}
