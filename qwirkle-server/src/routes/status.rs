//! Health check plus the rule constants clients lay out their UI with

use std::sync::Arc;

use axum::{extract::State, Json};
use qwirkle_core::{HAND_SIZE, MAX_LINE_LEN, QWIRKLE_BONUS};
use serde::Serialize;

use crate::state::ServerState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine: &'static str,
    pub suggest_moves: bool,
    pub rules: RuleSummary,
}

#[derive(Serialize)]
pub struct RuleSummary {
    pub hand_size: usize,
    pub max_line_len: usize,
    pub qwirkle_bonus: u32,
}

pub async fn status_handler(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine: "qwirkle",
        suggest_moves: state.engine.config().suggest_moves,
        rules: RuleSummary {
            hand_size: HAND_SIZE,
            max_line_len: MAX_LINE_LEN,
            qwirkle_bonus: QWIRKLE_BONUS,
        },
    })
}
