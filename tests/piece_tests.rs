//! Piece tests - spawn geometry, rotation and translation

use tui_battletris::core::{Piece, TileSet};
use tui_battletris::types::{PieceKind, Tile};

fn sorted(tiles: &[Tile]) -> Vec<Tile> {
    let mut v = tiles.to_vec();
    v.sort_unstable();
    v
}

#[test]
fn every_kind_spawns_four_tiles_around_the_spawn_point() {
    for kind in PieceKind::ALL {
        let piece = Piece::spawn(kind, (10, 10));
        assert_eq!(piece.tiles().len(), 4, "{kind:?}");
        assert_eq!(piece.pivot(), (10, 10), "{kind:?}");
        assert_eq!(piece.orientation(), 0);
        // Spawn offsets stay within a 4x4 neighborhood of the spawn point.
        for &(x, y) in piece.tiles() {
            assert!((x - 10).abs() <= 2 && (y - 10).abs() <= 2, "{kind:?}");
        }
    }
}

#[test]
fn line_piece_spawns_vertically() {
    let piece = Piece::spawn(PieceKind::I, (5, 5));
    assert_eq!(sorted(piece.tiles()), vec![(5, 3), (5, 4), (5, 5), (5, 6)]);
}

#[test]
fn rotate_then_unrotate_is_identity_for_all_shapes_and_orientations() {
    for kind in PieceKind::ALL {
        for start in 0..4 {
            for delta in [1, -1] {
                let mut piece = Piece::spawn(kind, (20, 20));
                for _ in 0..start {
                    piece.rotate(1);
                }
                let tiles = sorted(piece.tiles());
                let orientation = piece.orientation();

                piece.rotate(delta);
                piece.rotate(-delta);

                assert_eq!(
                    sorted(piece.tiles()),
                    tiles,
                    "{kind:?} start {start} delta {delta}"
                );
                assert_eq!(piece.orientation(), orientation);
            }
        }
    }
}

#[test]
fn clockwise_rotation_maps_relative_coordinates() {
    // T spawns as (0,-1),(-1,0),(0,0),(1,0) around the pivot; one clockwise
    // step maps (x,y) -> (-y,x): (1,0),(0,-1),(0,0),(0,1).
    let mut piece = Piece::spawn(PieceKind::T, (5, 5));
    piece.rotate(1);
    assert_eq!(sorted(piece.tiles()), vec![(5, 4), (5, 5), (5, 6), (6, 5)]);
    assert_eq!(piece.orientation(), 1);
}

#[test]
fn translation_composes_with_rotation() {
    let mut a = Piece::spawn(PieceKind::S, (8, 8));
    let mut b = Piece::spawn(PieceKind::S, (8, 8));

    // Translate then rotate vs rotate then translate: same result, because
    // rotation is about the (translated) pivot.
    a.translate(3, 2);
    a.rotate(1);
    b.rotate(1);
    b.translate(3, 2);
    assert_eq!(sorted(a.tiles()), sorted(b.tiles()));
}

#[test]
fn square_ignores_rotation_entirely() {
    let mut piece = Piece::spawn(PieceKind::O, (6, 6));
    let tiles = sorted(piece.tiles());
    for delta in [1, 1, -1, 1] {
        piece.rotate(delta);
        assert_eq!(sorted(piece.tiles()), tiles);
        assert_eq!(piece.orientation(), 0);
    }
}

#[test]
fn composite_preserves_its_union_under_round_trip() {
    let tiles: TileSet = [(3, 3), (4, 3), (5, 3), (4, 4), (4, 5), (5, 5)]
        .into_iter()
        .collect();
    let mut piece = Piece::from_union(tiles, (4, 4), PieceKind::I, 2);
    assert!(piece.is_composite());
    assert_eq!(piece.merge_level(), 2);

    let before = sorted(piece.tiles());
    piece.rotate(1);
    piece.rotate(-1);
    assert_eq!(sorted(piece.tiles()), before);
}

#[test]
fn cloned_piece_is_independent() {
    let mut piece = Piece::spawn(PieceKind::Z, (7, 7));
    let copy = piece.clone();
    piece.translate(0, 5);
    piece.rotate(1);
    assert_ne!(sorted(piece.tiles()), sorted(copy.tiles()));
    assert_eq!(copy.pivot(), (7, 7));
}
