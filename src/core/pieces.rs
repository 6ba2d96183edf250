//! Shape and wall-kick tables
//!
//! The seven shapes are a closed set, so they live in constant lookup tables
//! rather than a trait hierarchy. Offsets are spawn-orientation tile positions
//! relative to the spawn point; all pivots coincide with the spawn point.
//! Kick candidates follow the Super Rotation System family: five candidates
//! per pre-rotation orientation for the line piece, five shared candidates for
//! T/J/L/S/Z, and a single no-op candidate for the square.

use crate::types::{PieceKind, Tile};

/// Spawn-orientation tile offsets, indexed by `PieceKind::index()`
pub const SPAWN_OFFSETS: [[Tile; 4]; 7] = [
    // I
    [(0, -2), (0, -1), (0, 0), (0, 1)],
    // O
    [(0, 0), (1, 0), (0, 1), (1, 1)],
    // T
    [(0, -1), (-1, 0), (0, 0), (1, 0)],
    // J
    [(-1, -1), (-1, 0), (0, 0), (1, 0)],
    // L
    [(1, -1), (-1, 0), (0, 0), (1, 0)],
    // S
    [(0, -1), (1, -1), (-1, 0), (0, 0)],
    // Z
    [(-1, -1), (0, -1), (0, 0), (1, 0)],
];

/// Line-piece kick candidates, indexed by the orientation before the rotation
pub const I_KICKS: [[Tile; 5]; 4] = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Shared kick candidates for T, J, L, S and Z
pub const JLSTZ_KICKS: [[Tile; 5]; 4] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// The square never needs a kick
pub const O_KICKS: [Tile; 1] = [(0, 0)];

/// Kick candidates for an ordinary (non-composite) piece
pub fn kick_candidates(kind: PieceKind, orientation: u8) -> &'static [Tile] {
    let o = (orientation & 3) as usize;
    match kind {
        PieceKind::I => &I_KICKS[o],
        PieceKind::O => &O_KICKS,
        _ => &JLSTZ_KICKS[o],
    }
}

/// Kick candidates for a composite piece: its tile set is irregular, so the
/// shared five-candidate list applies regardless of the controlling kind.
pub fn composite_kick_candidates(orientation: u8) -> &'static [Tile] {
    &JLSTZ_KICKS[(orientation & 3) as usize]
}
