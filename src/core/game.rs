//! Game module - the match controller
//!
//! Owns the grid and both players and is the sole writer of their state.
//! A fixed-interval tick drives gravity for both sides, runs the merge check
//! in merge mode, and consumes a pending detonation on the tick after a merge
//! saturates. User input is routed through `apply` on the same logical thread
//! as the tick, so every mutation is serialized per tick.

use anyhow::{ensure, Result};

use crate::core::grid::Grid;
use crate::core::merge::{self, PendingDetonation};
use crate::core::player::{DropOutcome, HoldOutcome, Player};
use crate::types::{
    DropDirection, MatchEvent, PlayerAction, PlayerId, DETONATION_PENALTY, MAX_BOARD_COLS,
    MAX_BOARD_ROWS, MIN_BOARD_COLS, MIN_BOARD_ROWS,
};

/// Match parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub cols: i32,
    pub rows: i32,
    /// Extended mode: falling pieces merge on contact.
    pub merge_mode: bool,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: crate::types::DEFAULT_BOARD_COLS,
            rows: crate::types::DEFAULT_BOARD_ROWS,
            merge_mode: false,
            seed: 1,
        }
    }
}

/// Offset mixed into Player 2's seed so the two queues differ
const SEED_STREAM_OFFSET: u32 = 0x9E37_79B9;

pub struct Game {
    grid: Grid,
    players: [Player; 2],
    merge_mode: bool,
    paused: bool,
    pending_detonation: Option<PendingDetonation>,
    events: Vec<MatchEvent>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        ensure!(
            (MIN_BOARD_COLS..=MAX_BOARD_COLS).contains(&config.cols),
            "board width {} outside {}..={}",
            config.cols,
            MIN_BOARD_COLS,
            MAX_BOARD_COLS
        );
        ensure!(
            (MIN_BOARD_ROWS..=MAX_BOARD_ROWS).contains(&config.rows),
            "board height {} outside {}..={}",
            config.rows,
            MIN_BOARD_ROWS,
            MAX_BOARD_ROWS
        );

        let spawn_x = config.cols / 2;
        let p1 = Player::new(PlayerId::One, DropDirection::Down, (spawn_x, 4), config.seed);
        let p2 = Player::new(
            PlayerId::Two,
            DropDirection::Up,
            (spawn_x, config.rows - 4),
            config.seed.wrapping_add(SEED_STREAM_OFFSET),
        );

        Ok(Self {
            grid: Grid::new(config.cols, config.rows),
            players: [p1, p2],
            merge_mode: config.merge_mode,
            paused: false,
            pending_detonation: None,
            events: Vec::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn merge_mode(&self) -> bool {
        self.merge_mode
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// The match ends as soon as either player loses.
    pub fn over(&self) -> bool {
        self.players.iter().any(|p| p.lost())
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match (self.players[0].lost(), self.players[1].lost()) {
            (true, _) => Some(PlayerId::Two),
            (_, true) => Some(PlayerId::One),
            _ => None,
        }
    }

    /// Drain the buffered observable events.
    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// One fixed-interval simulation step. Pause withholds everything; a
    /// pending detonation consumes the tick instead of the normal drops.
    pub fn tick(&mut self) {
        if self.paused || self.over() {
            return;
        }

        if let Some(pending) = self.pending_detonation.take() {
            self.detonate(pending);
            return;
        }

        let outcome = self.players[0].soft_drop(&mut self.grid);
        self.record_drop(PlayerId::One, outcome);
        let outcome = self.players[1].soft_drop(&mut self.grid);
        self.record_drop(PlayerId::Two, outcome);

        if self.merge_mode && !self.over() {
            self.check_merge();
        }
    }

    /// Apply a user action immediately. Returns whether anything changed.
    pub fn apply(&mut self, id: PlayerId, action: PlayerAction) -> bool {
        if self.paused || self.over() {
            return false;
        }

        match action {
            PlayerAction::MoveLeft => self.players[id.index()].move_by(&self.grid, -1),
            PlayerAction::MoveRight => self.players[id.index()].move_by(&self.grid, 1),
            PlayerAction::RotateCw => self.players[id.index()].rotate(&self.grid, 1),
            PlayerAction::RotateCcw => self.players[id.index()].rotate(&self.grid, -1),
            PlayerAction::SoftDrop => {
                let outcome = self.players[id.index()].soft_drop(&mut self.grid);
                self.record_drop(id, outcome);
                true
            }
            PlayerAction::HardDrop => {
                let outcome = self.players[id.index()].hard_drop(&mut self.grid);
                if outcome.locked {
                    self.events.push(MatchEvent::Slam { player: id });
                }
                self.record_drop(id, outcome);
                true
            }
            PlayerAction::Hold => match self.players[id.index()].hold() {
                HoldOutcome::Swapped => true,
                HoldOutcome::Rejected => {
                    self.events.push(MatchEvent::HoldRejected { player: id });
                    false
                }
                HoldOutcome::RejectedQuiet => false,
            },
        }
    }

    /// Clear the board and both players and start over.
    pub fn restart(&mut self) {
        self.grid.clear();
        for player in self.players.iter_mut() {
            player.reset();
        }
        self.pending_detonation = None;
        self.paused = false;
        self.events.clear();
    }

    fn record_drop(&mut self, id: PlayerId, outcome: DropOutcome) {
        if outcome.locked {
            self.events.push(MatchEvent::Locked {
                player: id,
                lines: outcome.lines,
                score_delta: outcome.score_delta,
            });
        }
        if outcome.lost {
            self.events.push(MatchEvent::Lost { player: id });
        }
    }

    /// Detect contact between the two active pieces and hand the union to the
    /// winning side; a saturated merge arms the detonation instead.
    fn check_merge(&mut self) {
        let mid = self.grid.mid();
        let [p1, p2] = &mut self.players;
        let Some(outcome) = merge::try_merge(p1, p2, mid) else {
            return;
        };

        if outcome.saturated {
            self.pending_detonation = Some(PendingDetonation {
                contact: outcome.contact,
                winner: outcome.winner,
            });
            self.events.push(MatchEvent::DetonationArmed {
                winner: outcome.winner,
                contact: outcome.contact,
            });
        } else {
            self.events.push(MatchEvent::Merged {
                winner: outcome.winner,
                level: outcome.level,
            });
        }
    }

    /// Consume the armed detonation: empty the contact cell, charge the
    /// winner the fixed penalty and respawn them; the other player still
    /// receives its normal drop this tick.
    fn detonate(&mut self, pending: PendingDetonation) {
        self.grid.clear_cell(pending.contact.0, pending.contact.1);

        let winner = self.player_mut(pending.winner);
        winner.add_score(-DETONATION_PENALTY);
        winner.spawn_next();

        self.events.push(MatchEvent::Detonated {
            winner: pending.winner,
            contact: pending.contact,
        });

        let other = pending.winner.opponent();
        let outcome = self.players[other.index()].soft_drop(&mut self.grid);
        self.record_drop(other, outcome);
    }
}
