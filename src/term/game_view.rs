//! GameView: maps a `core::Game` into a terminal framebuffer.
//!
//! Pure (no I/O), so it can be unit-tested. Each board cell is two terminal
//! columns wide to compensate for glyph aspect ratio.

use crate::core::{Game, Player};
use crate::types::{PieceKind, PlayerId, MAX_MERGES};

use crate::term::fb::{FrameBuffer, Glyph, GlyphStyle, Rgb};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Player 1 palette, indexed by shape id
const P1_COLORS: [Rgb; 7] = [
    Rgb::new(255, 0, 0),    // I
    Rgb::new(255, 127, 0),  // O
    Rgb::new(255, 255, 0),  // T
    Rgb::new(0, 255, 0),    // J
    Rgb::new(0, 255, 255),  // L
    Rgb::new(0, 0, 255),    // S
    Rgb::new(139, 0, 255),  // Z
];

/// Player 2 palette: the same hues desaturated so the sides read apart
const P2_COLORS: [Rgb; 7] = [
    Rgb::new(255, 102, 102),
    Rgb::new(255, 178, 102),
    Rgb::new(255, 255, 128),
    Rgb::new(128, 255, 128),
    Rgb::new(128, 255, 255),
    Rgb::new(120, 120, 255),
    Rgb::new(190, 102, 255),
];

const BOARD_BG: Rgb = Rgb::new(16, 16, 24);

fn palette(player: PlayerId, kind: PieceKind) -> Rgb {
    match player {
        PlayerId::One => P1_COLORS[kind.index()],
        PlayerId::Two => P2_COLORS[kind.index()],
    }
}

/// Composite pieces and cells are colored by merge level, not by shape.
fn merge_color(level: u8) -> Option<Rgb> {
    match level {
        0 => None,
        1 => Some(Rgb::new(170, 0, 170)),
        2 => Some(Rgb::new(255, 255, 0)),
        3 => Some(Rgb::new(255, 0, 0)),
        _ => Some(Rgb::new(255, 255, 255)), // saturated, about to detonate
    }
}

pub struct GameView {
    cell_w: u16,
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        Self { cell_w: 2, cell_h: 1 }
    }
}

impl GameView {
    /// Render the match into a framebuffer. `flash` inverts the board
    /// backdrop for one frame (slam / detonation feedback).
    pub fn render(&self, game: &Game, viewport: Viewport, flash: bool) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let grid = game.grid();
        let board_w = (grid.cols() as u16) * self.cell_w;
        let board_h = (grid.rows() as u16) * self.cell_h;
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let bg = if flash {
            GlyphStyle {
                fg: Rgb::new(230, 230, 230),
                bg: Rgb::new(60, 60, 70),
                bold: false,
            }
        } else {
            GlyphStyle {
                fg: Rgb::new(70, 70, 85),
                bg: BOARD_BG,
                bold: false,
            }
        };
        let border = GlyphStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
        };

        fb.fill_rect(start_x + 1, start_y + 1, board_w, board_h, ' ', bg);
        self.draw_border(&mut fb, start_x, start_y, frame_w, frame_h, border);

        // Centerline: the loss row, dashed where empty.
        let mid = grid.mid();
        for x in 0..grid.cols() {
            self.fill_cell(&mut fb, start_x, start_y, x, mid, '╌', bg);
        }

        // Fixed cells.
        for y in 0..grid.rows() {
            for x in 0..grid.cols() {
                let Some(cell) = grid.cell_at(x, y) else {
                    continue;
                };
                if !cell.is_fixed() {
                    continue;
                }
                let color = merge_color(cell.merge_level).unwrap_or_else(|| {
                    match (cell.owner, cell.shape) {
                        (Some(owner), Some(shape)) => palette(owner, shape),
                        _ => Rgb::new(128, 128, 128),
                    }
                });
                let style = GlyphStyle {
                    fg: color,
                    bg: BOARD_BG,
                    bold: false,
                };
                self.fill_cell(&mut fb, start_x, start_y, x, y, '█', style);
            }
        }

        // Ghosts under the active pieces.
        for id in [PlayerId::One, PlayerId::Two] {
            let player = game.player(id);
            let color = self.piece_color(player).dimmed();
            let style = GlyphStyle {
                fg: color,
                bg: BOARD_BG,
                bold: false,
            };
            for &(x, y) in player.ghost_tiles(grid).iter() {
                self.fill_cell(&mut fb, start_x, start_y, x, y, '░', style);
            }
        }

        // Active pieces, dimmed while passing over the opponent's half.
        for id in [PlayerId::One, PlayerId::Two] {
            let player = game.player(id);
            let color = self.piece_color(player);
            for &(x, y) in player.active_tiles() {
                let far = match id {
                    PlayerId::One => y < mid,
                    PlayerId::Two => y > mid,
                };
                let style = GlyphStyle {
                    fg: if far { color.dimmed() } else { color },
                    bg: BOARD_BG,
                    bold: !far,
                };
                self.fill_cell(&mut fb, start_x, start_y, x, y, '█', style);
            }
        }

        // Side panels: Player 1 left of the board, Player 2 right.
        self.draw_panel(&mut fb, game, PlayerId::One, start_x, start_y, frame_w, true);
        self.draw_panel(&mut fb, game, PlayerId::Two, start_x, start_y, frame_w, false);

        // Overlays.
        if let Some(winner) = game.winner() {
            let msg = format!("PLAYER {} WINS - R TO RESTART", winner.number());
            self.draw_overlay(&mut fb, start_x, start_y, frame_w, frame_h, &msg);
        } else if game.paused() {
            self.draw_overlay(&mut fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        }

        fb
    }

    fn piece_color(&self, player: &Player) -> Rgb {
        let piece = player.active();
        merge_color(piece.merge_level())
            .unwrap_or_else(|| palette(player.id(), piece.kind()))
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: GlyphStyle) {
        if w < 2 || h < 2 {
            return;
        }
        fb.put(x, y, '┌', style);
        fb.put(x + w - 1, y, '┐', style);
        fb.put(x, y + h - 1, '└', style);
        fb.put(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put(x + dx, y, '─', style);
            fb.put(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put(x, y + dy, '│', style);
            fb.put(x + w - 1, y + dy, '│', style);
        }
    }

    /// Paint one board cell; silently skips tiles outside the board.
    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: i32,
        cell_y: i32,
        ch: char,
        style: GlyphStyle,
    ) {
        if cell_x < 0 || cell_y < 0 {
            return;
        }
        let px = start_x + 1 + (cell_x as u16) * self.cell_w;
        let py = start_y + 1 + (cell_y as u16) * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_panel(
        &self,
        fb: &mut FrameBuffer,
        game: &Game,
        id: PlayerId,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        left_side: bool,
    ) {
        const PANEL_W: u16 = 12;
        let panel_x = if left_side {
            match start_x.checked_sub(PANEL_W + 2) {
                Some(x) => x,
                None => return,
            }
        } else {
            let x = start_x + frame_w + 2;
            if x + PANEL_W > fb.width() {
                return;
            }
            x
        };

        let label = GlyphStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: true,
        };
        let value = GlyphStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
        };

        let player = game.player(id);
        let mut y = start_y;

        fb.put_str(panel_x, y, &format!("PLAYER {}", id.number()), label);
        y += 2;

        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        // Scores can go negative after a detonation; displayed floor is 0.
        fb.put_str(panel_x, y, &format!("{}", player.score().max(0)), value);
        y += 2;

        fb.put_str(panel_x, y, "HOLD", label);
        y += 1;
        let hold = player
            .hold_piece()
            .map(|p| p.kind().letter())
            .unwrap_or("-");
        fb.put_str(panel_x, y, hold, value);
        y += 2;

        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        for kind in player.upcoming(5) {
            if y >= fb.height() {
                break;
            }
            fb.put_str(panel_x, y, kind.letter(), value);
            y += 1;
        }

        let level = player.active().merge_level();
        if level > 0 && y + 1 < fb.height() {
            y += 1;
            let style = GlyphStyle {
                fg: merge_color(level).unwrap_or(Rgb::new(255, 255, 255)),
                bg: Rgb::new(0, 0, 0),
                bold: true,
            };
            let text = if level >= MAX_MERGES {
                "MERGE MAX".to_string()
            } else {
                format!("MERGE x{level}")
            };
            fb.put_str(panel_x, y, &text, style);
        }
    }

    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = GlyphStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
        };
        fb.put_str(x, mid_y, text, style);
    }
}
