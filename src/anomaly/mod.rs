pub mod classify;
pub mod detectors;
pub mod engine;
pub mod score;
pub mod types;
