//! Tile catalog endpoint
//!
//! Returns the colors, shapes and deck make-up for the UI.

use axum::Json;
use qwirkle_core::{Color, Shape, Tile, ALL_TILES, COPIES_PER_FACE, HAND_SIZE, TOTAL_TILES};
use serde::Serialize;

/// Tile catalog for the UI
#[derive(Serialize)]
pub struct TileCatalog {
    pub colors: Vec<&'static str>,
    pub shapes: Vec<&'static str>,
    pub faces: Vec<Tile>,
    pub copies_per_face: usize,
    pub total_tiles: usize,
    pub hand_size: usize,
}

/// Get the tile catalog
pub async fn get_tiles() -> Json<TileCatalog> {
    Json(TileCatalog {
        colors: Color::ALL.iter().map(|c| c.name()).collect(),
        shapes: Shape::ALL.iter().map(|s| s.name()).collect(),
        faces: ALL_TILES.to_vec(),
        copies_per_face: COPIES_PER_FACE,
        total_tiles: TOTAL_TILES,
        hand_size: HAND_SIZE,
    })
}
