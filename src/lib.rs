//! Two-player split-board TUI Tetris with mid-air piece merging.
//!
//! The `core` module is the simulation: grid, pieces, agents, merge engine
//! and match controller. `input` and `term` are the terminal collaborators
//! that feed it key events and render its state.

pub mod core;
pub mod input;
pub mod term;
pub mod types;
