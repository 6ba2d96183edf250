//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Board dimension limits and defaults (columns x rows)
pub const DEFAULT_BOARD_COLS: i32 = 10;
pub const DEFAULT_BOARD_ROWS: i32 = 23;
pub const MIN_BOARD_COLS: i32 = 5;
pub const MAX_BOARD_COLS: i32 = 50;
pub const MIN_BOARD_ROWS: i32 = 10;
pub const MAX_BOARD_ROWS: i32 = 50;

/// Game timing constants (in milliseconds)
pub const TICK_MS: u32 = 16;
pub const DROP_INTERVAL_MS: u32 = 1000;

/// DAS/ARR timing (milliseconds)
pub const DEFAULT_DAS_MS: u32 = 200;
pub const DEFAULT_ARR_MS: u32 = 50;

/// Merge mode limits
pub const MAX_MERGES: u8 = 4;
pub const DETONATION_PENALTY: i64 = 500;

/// Line clear scoring, indexed by simultaneously cleared rows (0..=4)
pub const LINE_SCORES: [i64; 5] = [0, 100, 300, 500, 800];

/// Absolute board coordinate (x, y); y grows downward.
pub type Tile = (i32, i32);

/// Tetromino piece kinds, in shape-table order (ids 0..=6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Shape table index (0..=6)
    pub fn index(&self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::J => 3,
            PieceKind::L => 4,
            PieceKind::S => 5,
            PieceKind::Z => 6,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }
}

/// One of the two players sharing the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn opponent(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Array index (0 or 1)
    pub fn index(&self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// Display number (1 or 2)
    pub fn number(&self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }
}

/// Gravity direction; each player falls toward the opposite border, so the
/// stack grows from that border back toward the shared centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropDirection {
    Down,
    Up,
}

impl DropDirection {
    /// One-step y delta
    pub fn dy(&self) -> i32 {
        match self {
            DropDirection::Down => 1,
            DropDirection::Up => -1,
        }
    }
}

/// Occupancy state of one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    Fixed,
    Wall,
}

/// One board cell.
///
/// Invariant: `state == Fixed` implies `owner` and `shape` are present;
/// any other state implies `owner` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub state: CellState,
    pub owner: Option<PlayerId>,
    pub shape: Option<PieceKind>,
    pub merge_level: u8,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        state: CellState::Empty,
        owner: None,
        shape: None,
        merge_level: 0,
    };

    pub fn fixed(owner: PlayerId, shape: PieceKind, merge_level: u8) -> Self {
        Self {
            state: CellState::Fixed,
            owner: Some(owner),
            shape: Some(shape),
            merge_level,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.state == CellState::Fixed
    }

    pub fn is_empty(&self) -> bool {
        self.state == CellState::Empty
    }
}

/// Per-player input operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDrop,
    HardDrop,
    Hold,
}

/// Observable match events, drained by rendering/audio collaborators.
///
/// The simulation never depends on these being consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// A piece locked; `lines` rows cleared for `score_delta` points.
    Locked {
        player: PlayerId,
        lines: u32,
        score_delta: i64,
    },
    /// A hard drop landed.
    Slam { player: PlayerId },
    /// Two falling pieces merged; `winner` now controls a level-`level` piece.
    Merged { winner: PlayerId, level: u8 },
    /// The merge counter saturated; detonation fires on the next tick.
    DetonationArmed { winner: PlayerId, contact: Tile },
    /// The armed detonation fired at `contact`.
    Detonated { winner: PlayerId, contact: Tile },
    /// Hold was rejected (already used, or the piece is a composite).
    HoldRejected { player: PlayerId },
    /// A locked tile reached the centerline; the match is over.
    Lost { player: PlayerId },
}
