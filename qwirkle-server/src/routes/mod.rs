//! HTTP route handlers

pub mod games;
pub mod status;
pub mod tiles;
