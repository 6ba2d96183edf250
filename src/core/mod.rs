//! Core game logic - pure, deterministic, and testable
//!
//! Everything the simulation needs lives here: the shared split grid, the
//! piece geometry, the per-player agents, the merge engine and the match
//! controller. No UI, timing or I/O dependencies; the embedding loop delivers
//! ticks and input and drains observable events.

pub mod game;
pub mod grid;
pub mod merge;
pub mod piece;
pub mod pieces;
pub mod player;
pub mod rng;
pub mod scoring;

// Re-export commonly used types for convenience
pub use game::{Game, GameConfig};
pub use grid::Grid;
pub use merge::{MergeOutcome, PendingDetonation};
pub use piece::{Piece, TileSet, MAX_PIECE_TILES};
pub use player::{DropOutcome, HoldOutcome, Player};
pub use rng::{BagQueue, SimpleRng};
pub use scoring::line_clear_score;
