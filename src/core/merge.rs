//! Merge engine - mid-air fusion of the two falling pieces
//!
//! Runs once per simulation tick after both players were offered their drop.
//! Contact is exact tile overlap first, orthogonal adjacency second; the
//! contact cell decides the winner by which half it lies in (contact in your
//! half hands the composite to the opponent). The loser respawns immediately.
//! When the escalating merge counter saturates, a detonation is armed and
//! consumed on the following tick.

use crate::core::piece::{Piece, TileSet};
use crate::core::player::Player;
use crate::types::{PlayerId, Tile, MAX_MERGES};

/// Armed detonation, consumed on the tick after the merge saturates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDetonation {
    pub contact: Tile,
    pub winner: PlayerId,
}

/// Result of a successful merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub winner: PlayerId,
    pub level: u8,
    pub contact: Tile,
    /// The counter saturated; the caller must arm a detonation.
    pub saturated: bool,
}

/// Contact point between the two tile sets: any exactly-overlapping cell, or
/// failing that the Player-1-side cell of an orthogonally adjacent pair.
pub fn find_contact(t1: &[Tile], t2: &[Tile]) -> Option<Tile> {
    for a in t1 {
        if t2.contains(a) {
            return Some(*a);
        }
    }
    for &a in t1 {
        for &b in t2 {
            if (a.0 - b.0).abs() + (a.1 - b.1).abs() == 1 {
                return Some(a);
            }
        }
    }
    None
}

/// Deduplicated union of both tile sets
pub fn union_tiles(t1: &[Tile], t2: &[Tile]) -> TileSet {
    let mut union: TileSet = t1.iter().copied().collect();
    for t in t2 {
        if !union.contains(t) {
            union.push(*t);
        }
    }
    union
}

/// Integer center of the tile set's bounding box (not its centroid)
pub fn bounding_box_center(tiles: &[Tile]) -> Tile {
    let mut min_x = i32::MAX;
    let mut max_x = i32::MIN;
    let mut min_y = i32::MAX;
    let mut max_y = i32::MIN;
    for &(x, y) in tiles {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    ((min_x + max_x) / 2, (min_y + max_y) / 2)
}

/// Detect contact between the two active pieces and perform the merge: the
/// winner's active piece becomes the composite union at level `max + 1`, the
/// loser respawns. Returns `None` when the pieces are not touching.
///
/// `mid` is the grid's centerline row: contact at `y >= mid` (Player 1's
/// half) hands control to Player 2, and vice versa.
pub fn try_merge(p1: &mut Player, p2: &mut Player, mid: i32) -> Option<MergeOutcome> {
    let contact = find_contact(p1.active_tiles(), p2.active_tiles())?;

    let tiles = union_tiles(p1.active_tiles(), p2.active_tiles());
    let pivot = bounding_box_center(&tiles);
    let level = p1
        .active()
        .merge_level()
        .max(p2.active().merge_level())
        .saturating_add(1);

    let (winner, loser) = if contact.1 >= mid {
        (&mut *p2, &mut *p1)
    } else {
        (&mut *p1, &mut *p2)
    };

    let composite = Piece::from_union(tiles, pivot, winner.active().kind(), level);
    winner.set_active(composite);
    loser.spawn_next();

    Some(MergeOutcome {
        winner: winner.id(),
        level,
        contact,
        saturated: level >= MAX_MERGES,
    })
}
