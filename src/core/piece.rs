//! Piece module - a falling piece as absolute tiles around a pivot
//!
//! Tiles are stored as absolute board coordinates instead of kind+rotation
//! lookups because a merged composite piece has an arbitrary tile union that
//! no shape table can describe. Rotation is geometric, 90 degrees about the
//! pivot, which works identically for ordinary and composite pieces.

use arrayvec::ArrayVec;

use crate::core::pieces::SPAWN_OFFSETS;
use crate::types::{PieceKind, Tile, MAX_MERGES};

/// Upper bound on a piece's tile count.
///
/// Only one composite can exist at a time (the merge loser always respawns a
/// fresh 4-tile piece), so a level-L composite holds at most 4*(L+1) tiles.
pub const MAX_PIECE_TILES: usize = 4 * (MAX_MERGES as usize + 1);

pub type TileSet = ArrayVec<Tile, MAX_PIECE_TILES>;

/// A falling piece: immutable shape identity, mutable position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    orientation: u8,
    tiles: TileSet,
    pivot: Tile,
    merge_level: u8,
}

/// Horizontal correction keeping the line piece inside its asymmetric
/// bounding box, per orientation. Applied as a difference between the old
/// and new orientation so that a rotation and its inverse cancel exactly.
const I_ORIENTATION_FIX: [i32; 4] = [0, 0, 1, 1];

impl Piece {
    /// Place a new piece of the given kind at the spawn point, orientation 0.
    pub fn spawn(kind: PieceKind, spawn: Tile) -> Self {
        let mut tiles = TileSet::new();
        for &(dx, dy) in SPAWN_OFFSETS[kind.index()].iter() {
            tiles.push((spawn.0 + dx, spawn.1 + dy));
        }
        Self {
            kind,
            orientation: 0,
            tiles,
            pivot: spawn,
            merge_level: 0,
        }
    }

    /// Build a composite piece from a merged tile union.
    ///
    /// The pivot is the integer center of the union's bounding box; the kind
    /// is carried over from the controlling piece (it only selects the
    /// palette, the tile set is authoritative).
    pub fn from_union(tiles: TileSet, pivot: Tile, kind: PieceKind, merge_level: u8) -> Self {
        Self {
            kind,
            orientation: 0,
            tiles,
            pivot,
            merge_level,
        }
    }

    /// Shift all tiles and the pivot by the same vector.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for t in self.tiles.iter_mut() {
            t.0 += dx;
            t.1 += dy;
        }
        self.pivot.0 += dx;
        self.pivot.1 += dy;
    }

    /// Rotate one step about the pivot: `delta > 0` clockwise, otherwise
    /// counter-clockwise. No-op for an ordinary square piece.
    pub fn rotate(&mut self, delta: i32) {
        if self.kind == PieceKind::O && self.merge_level == 0 {
            return;
        }
        let cw = delta > 0;

        for t in self.tiles.iter_mut() {
            let rx = t.0 - self.pivot.0;
            let ry = t.1 - self.pivot.1;
            let (nx, ny) = if cw { (-ry, rx) } else { (ry, -rx) };
            *t = (self.pivot.0 + nx, self.pivot.1 + ny);
        }

        let old = self.orientation as usize;
        self.orientation = (self.orientation as i32 + delta).rem_euclid(4) as u8;

        // Line-piece bounding-box correction; composites skip it.
        if self.kind == PieceKind::I && self.merge_level == 0 {
            let new = self.orientation as usize;
            let dx = I_ORIENTATION_FIX[new] - I_ORIENTATION_FIX[old];
            if dx != 0 {
                self.translate(dx, 0);
            }
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn pivot(&self) -> Tile {
        self.pivot
    }

    pub fn merge_level(&self) -> u8 {
        self.merge_level
    }

    /// True for the product of a mid-air merge.
    pub fn is_composite(&self) -> bool {
        self.merge_level > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn sorted(tiles: &[Tile]) -> Vec<Tile> {
        let mut v = tiles.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn spawn_places_four_tiles_at_offsets() {
        let piece = Piece::spawn(PieceKind::T, (5, 4));
        assert_eq!(
            sorted(piece.tiles()),
            sorted(&[(5, 3), (4, 4), (5, 4), (6, 4)])
        );
        assert_eq!(piece.pivot(), (5, 4));
        assert_eq!(piece.orientation(), 0);
        assert_eq!(piece.merge_level(), 0);
    }

    #[test]
    fn translate_moves_tiles_and_pivot_together() {
        let mut piece = Piece::spawn(PieceKind::J, (5, 4));
        let before = sorted(piece.tiles());
        piece.translate(2, -1);
        assert_eq!(piece.pivot(), (7, 3));
        let moved: Vec<Tile> = before.iter().map(|&(x, y)| (x + 2, y - 1)).collect();
        assert_eq!(sorted(piece.tiles()), moved);
    }

    #[test]
    fn square_does_not_rotate() {
        let mut piece = Piece::spawn(PieceKind::O, (5, 4));
        let before = sorted(piece.tiles());
        piece.rotate(1);
        assert_eq!(sorted(piece.tiles()), before);
        assert_eq!(piece.orientation(), 0);
    }

    #[test]
    fn rotation_round_trip_restores_every_shape_and_orientation() {
        for kind in PieceKind::ALL {
            for start in 0..4 {
                let mut piece = Piece::spawn(kind, (10, 10));
                for _ in 0..start {
                    piece.rotate(1);
                }
                let tiles = sorted(piece.tiles());
                let orientation = piece.orientation();

                piece.rotate(1);
                piece.rotate(-1);
                assert_eq!(sorted(piece.tiles()), tiles, "{kind:?} from {start}");
                assert_eq!(piece.orientation(), orientation);

                piece.rotate(-1);
                piece.rotate(1);
                assert_eq!(sorted(piece.tiles()), tiles, "{kind:?} from {start}");
                assert_eq!(piece.orientation(), orientation);
            }
        }
    }

    #[test]
    fn four_clockwise_rotations_restore_the_piece() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::spawn(kind, (10, 10));
            let tiles = sorted(piece.tiles());
            for _ in 0..4 {
                piece.rotate(1);
            }
            assert_eq!(sorted(piece.tiles()), tiles, "{kind:?}");
            assert_eq!(piece.orientation(), 0);
        }
    }

    #[test]
    fn composite_rotates_even_with_square_kind() {
        let mut tiles = TileSet::new();
        for t in [(4, 4), (5, 4), (4, 5), (5, 5), (6, 5)] {
            tiles.push(t);
        }
        let mut piece = Piece::from_union(tiles, (5, 4), PieceKind::O, 1);
        let before = sorted(piece.tiles());
        piece.rotate(1);
        assert_ne!(sorted(piece.tiles()), before);
        piece.rotate(-1);
        assert_eq!(sorted(piece.tiles()), before);
    }
}
