//! Player module - one agent's queue, active piece, hold, score and loss state
//!
//! Every legality check is speculative: clone the active piece, apply the
//! candidate transform, test it against the grid, then commit or throw the
//! clone away. The grid is borrowed per operation; a player never touches
//! the other player's state (the merge engine is the only cross-player step).

use arrayvec::ArrayVec;

use crate::core::grid::Grid;
use crate::core::piece::{Piece, TileSet, MAX_PIECE_TILES};
use crate::core::pieces::{composite_kick_candidates, kick_candidates};
use crate::core::rng::BagQueue;
use crate::core::scoring::line_clear_score;
use crate::types::{DropDirection, PieceKind, PlayerId, Tile};

/// Result of a drop step (gravity, soft drop or hard drop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropOutcome {
    /// The piece locked this step (false: it just moved one cell).
    pub locked: bool,
    /// Rows cleared by the lock.
    pub lines: u32,
    /// Score awarded for the clear.
    pub score_delta: i64,
    /// The lock reached the centerline; this player has lost.
    pub lost: bool,
}

/// Result of a hold request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The active piece was stored or swapped.
    Swapped,
    /// Ineligible piece; fire the one-shot user cue.
    Rejected,
    /// Ineligible piece; the cue already fired for this piece.
    RejectedQuiet,
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    drop_dir: DropDirection,
    spawn: Tile,
    active: Piece,
    hold: Option<Piece>,
    hold_used: bool,
    hold_cue_fired: bool,
    queue: BagQueue,
    score: i64,
    lost: bool,
}

impl Player {
    /// Create a player and spawn its first piece
    pub fn new(id: PlayerId, drop_dir: DropDirection, spawn: Tile, seed: u32) -> Self {
        let mut queue = BagQueue::new(seed);
        let active = Piece::spawn(queue.draw(), spawn);
        Self {
            id,
            drop_dir,
            spawn,
            active,
            hold: None,
            hold_used: false,
            hold_cue_fired: false,
            queue,
            score: 0,
            lost: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn drop_dir(&self) -> DropDirection {
        self.drop_dir
    }

    pub fn spawn_point(&self) -> Tile {
        self.spawn
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn add_score(&mut self, delta: i64) {
        self.score += delta;
    }

    pub fn lost(&self) -> bool {
        self.lost
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn active_tiles(&self) -> &[Tile] {
        self.active.tiles()
    }

    pub fn hold_piece(&self) -> Option<&Piece> {
        self.hold.as_ref()
    }

    /// Read-only peek at the next `n` queued shapes
    pub fn upcoming(&self, n: usize) -> Vec<PieceKind> {
        self.queue.peek(n)
    }

    /// Replace the active piece (merge hand-off and tests).
    pub fn set_active(&mut self, piece: Piece) {
        self.active = piece;
    }

    /// Draw the next shape as the new active piece at the spawn point.
    /// Refilling happens inside the queue (double 7-bag).
    pub fn spawn_next(&mut self) {
        self.hold_used = false;
        self.hold_cue_fired = false;
        self.active = Piece::spawn(self.queue.draw(), self.spawn);
    }

    /// Horizontal move; reverted when blocked.
    pub fn move_by(&mut self, grid: &Grid, dx: i32) -> bool {
        if self.lost {
            return false;
        }
        self.active.translate(dx, 0);
        if grid.is_blocked(self.active.tiles(), self.id) {
            self.active.translate(-dx, 0);
            return false;
        }
        true
    }

    /// Rotate with wall kicks: try each candidate offset in order and commit
    /// the first unblocked position; leave the piece unrotated if all fail.
    pub fn rotate(&mut self, grid: &Grid, delta: i32) -> bool {
        if self.lost {
            return false;
        }
        let orientation = self.active.orientation();
        let mut test = self.active.clone();
        test.rotate(delta);

        let kicks = if self.active.is_composite() {
            composite_kick_candidates(orientation)
        } else {
            kick_candidates(self.active.kind(), orientation)
        };

        for &(kx, ky) in kicks {
            test.translate(kx, ky);
            if !grid.is_blocked(test.tiles(), self.id) {
                self.active = test;
                return true;
            }
            test.translate(-kx, -ky);
        }
        false
    }

    /// One gravity step toward the centerline. When the step is blocked the
    /// piece locks in place, rows clear, score and loss update, and the next
    /// piece spawns.
    pub fn soft_drop(&mut self, grid: &mut Grid) -> DropOutcome {
        if self.lost {
            return DropOutcome::default();
        }
        let mut test = self.active.clone();
        test.translate(0, self.drop_dir.dy());

        if grid.is_blocked(test.tiles(), self.id) {
            let landing: TileSet = self.active.tiles().iter().copied().collect();
            self.lock_at(grid, &landing)
        } else {
            self.active = test;
            DropOutcome::default()
        }
    }

    /// Drop straight to the ghost position and lock there.
    pub fn hard_drop(&mut self, grid: &mut Grid) -> DropOutcome {
        if self.lost {
            return DropOutcome::default();
        }
        let landing = self.ghost_tiles(grid);
        self.lock_at(grid, &landing)
    }

    /// Projected resting tiles of the active piece: translate a copy toward
    /// the drop direction until blocked and keep the last legal position.
    pub fn ghost_tiles(&self, grid: &Grid) -> ArrayVec<Tile, MAX_PIECE_TILES> {
        let dy = self.drop_dir.dy();
        let mut ghost = self.active.clone();
        loop {
            let mut next = ghost.clone();
            next.translate(0, dy);
            if grid.is_blocked(next.tiles(), self.id) {
                break;
            }
            ghost = next;
        }
        ghost.tiles().iter().copied().collect()
    }

    /// Lock `landing` into the grid, clear rows, score, check the centerline
    /// loss condition, then spawn the next piece.
    fn lock_at(&mut self, grid: &mut Grid, landing: &[Tile]) -> DropOutcome {
        grid.lock(
            landing,
            self.id,
            self.active.kind(),
            self.active.merge_level(),
        );

        let lines = grid.clear_full_rows(self.id);
        let score_delta = line_clear_score(lines);
        self.score += score_delta;

        let mid = grid.mid();
        if landing.iter().any(|&(_, y)| y == mid) {
            self.lost = true;
        }

        self.spawn_next();

        DropOutcome {
            locked: true,
            lines,
            score_delta,
            lost: self.lost,
        }
    }

    /// Store the active piece and swap in the held one (or the next queued
    /// piece on first use). Composite pieces and a second hold for the same
    /// piece are rejected; the rejection cue fires once per piece.
    pub fn hold(&mut self) -> HoldOutcome {
        if self.lost {
            return HoldOutcome::RejectedQuiet;
        }
        if self.active.is_composite() || self.hold_used {
            if self.hold_cue_fired {
                return HoldOutcome::RejectedQuiet;
            }
            self.hold_cue_fired = true;
            return HoldOutcome::Rejected;
        }

        // Re-normalize to spawn orientation and position for later reuse.
        let stored = Piece::spawn(self.active.kind(), self.spawn);
        match self.hold.replace(stored) {
            None => self.spawn_next(),
            Some(prev) => self.active = Piece::spawn(prev.kind(), self.spawn),
        }
        self.hold_used = true;
        HoldOutcome::Swapped
    }

    /// Clear score, loss, hold and queue, then respawn (match restart).
    pub fn reset(&mut self) {
        self.score = 0;
        self.lost = false;
        self.hold = None;
        self.hold_used = false;
        self.hold_cue_fired = false;
        self.queue.reset();
        self.active = Piece::spawn(self.queue.draw(), self.spawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid() -> Grid {
        Grid::new(10, 22)
    }

    fn p1(grid: &Grid) -> Player {
        Player::new(PlayerId::One, DropDirection::Down, (grid.cols() / 2, 4), 7)
    }

    #[test]
    fn move_reverts_at_the_wall() {
        let grid = open_grid();
        let mut player = p1(&grid);
        let before = player.active_tiles().to_vec();

        // Walk left until blocked, then one more.
        while player.move_by(&grid, -1) {}
        assert!(!player.move_by(&grid, -1));
        assert!(player.active_tiles().iter().all(|&(x, _)| x >= 0));

        // Piece identity is unchanged, only the position moved.
        assert_eq!(player.active_tiles().len(), before.len());
    }

    #[test]
    fn soft_drop_advances_one_row() {
        let mut grid = open_grid();
        let mut player = p1(&grid);
        let before = player.active_tiles().to_vec();

        let outcome = player.soft_drop(&mut grid);
        assert!(!outcome.locked);
        let expected: Vec<Tile> = before.iter().map(|&(x, y)| (x, y + 1)).collect();
        let mut got = player.active_tiles().to_vec();
        let mut want = expected;
        got.sort_unstable();
        want.sort_unstable();
        assert_eq!(got, want);
    }

    #[test]
    fn rotation_falls_back_to_kicks_at_the_wall() {
        let grid = open_grid();
        let mut player = p1(&grid);
        // Flush against the left wall.
        while player.move_by(&grid, -1) {}
        // Whatever the shape, rotation either succeeds via a kick or leaves
        // the piece exactly where it was.
        let before = player.active_tiles().to_vec();
        let rotated = player.rotate(&grid, 1);
        if !rotated {
            assert_eq!(player.active_tiles(), &before[..]);
        } else {
            assert!(!grid.is_blocked(player.active_tiles(), player.id()));
        }
    }

    #[test]
    fn hold_then_hold_again_is_rejected_once_loudly() {
        let grid = open_grid();
        let mut player = p1(&grid);
        let first_kind = player.active().kind();

        assert_eq!(player.hold(), HoldOutcome::Swapped);
        assert_eq!(player.hold_piece().map(|p| p.kind()), Some(first_kind));

        assert_eq!(player.hold(), HoldOutcome::Rejected);
        assert_eq!(player.hold(), HoldOutcome::RejectedQuiet);

        // A fresh piece re-arms both hold and the cue.
        let mut grid = grid;
        while !player.soft_drop(&mut grid).locked {}
        assert_eq!(player.hold(), HoldOutcome::Swapped);
    }

    #[test]
    fn hold_swaps_previous_piece_back_at_spawn() {
        let grid = open_grid();
        let mut player = p1(&grid);
        let first = player.active().kind();

        player.hold();
        let second = player.active().kind();
        let mut grid = grid;
        while !player.soft_drop(&mut grid).locked {}

        // Swap the stored piece back in.
        let third = player.active().kind();
        player.hold();
        assert_eq!(player.active().kind(), first);
        assert_eq!(player.hold_piece().map(|p| p.kind()), Some(third));
        assert_eq!(player.active().orientation(), 0);
        let _ = second;
    }

    #[test]
    fn composite_piece_cannot_be_held() {
        let grid = open_grid();
        let mut player = p1(&grid);
        let mut tiles = TileSet::new();
        for t in [(4, 6), (5, 6), (4, 7), (5, 7), (6, 7)] {
            tiles.push(t);
        }
        player.set_active(Piece::from_union(tiles, (5, 6), PieceKind::T, 1));
        assert_eq!(player.hold(), HoldOutcome::Rejected);
        assert!(player.hold_piece().is_none());
    }

    #[test]
    fn upcoming_is_a_read_only_peek() {
        let grid = open_grid();
        let mut player = p1(&grid);
        let preview = player.upcoming(5);
        assert_eq!(preview.len(), 5);
        assert_eq!(player.upcoming(5), preview);

        let mut grid = grid;
        while !player.soft_drop(&mut grid).locked {}
        assert_eq!(player.active().kind(), preview[0]);
    }

    #[test]
    fn reset_clears_score_loss_and_hold() {
        let mut grid = Grid::new(6, 10);
        let mut player = Player::new(PlayerId::One, DropDirection::Down, (3, 4), 3);
        player.hold();
        player.add_score(700);

        // Stack the half up to the row below the centerline, leaving the last
        // column open so no row ever completes. The next lock rests on top of
        // the stack with its lowest tile on the centerline row.
        for y in (grid.mid() + 1)..grid.rows() {
            let row: Vec<Tile> = (0..grid.cols() - 1).map(|x| (x, y)).collect();
            grid.lock(&row, PlayerId::One, PieceKind::I, 0);
        }
        while !player.soft_drop(&mut grid).locked {}
        assert!(player.lost());

        grid.clear();
        player.reset();
        assert_eq!(player.score(), 0);
        assert!(!player.lost());
        assert!(player.hold_piece().is_none());
        assert!(!player.soft_drop(&mut grid).locked);
    }
}
