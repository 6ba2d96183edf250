//! TerminalRenderer: flushes a framebuffer to the terminal.
//!
//! Keeps the previous frame and rewrites only runs of changed glyphs, moving
//! the cursor once per run and re-applying styles only when they change.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::term::fb::{FrameBuffer, Glyph, GlyphStyle, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to repaint everything (terminal resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a frame, swapping it into internal state so the caller can reuse
    /// its buffer without cloning.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => prev,
            _ => {
                // Size changed or first frame: clear, then diff against a
                // buffer that matches nothing so every glyph is painted.
                self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
                let mut blank = FrameBuffer::new(fb.width(), fb.height());
                blank.clear(Glyph::new('\0', GlyphStyle::default()));
                blank
            }
        };

        let mut style_in_effect: Option<GlyphStyle> = None;
        for y in 0..fb.height() {
            let mut x = 0;
            while x < fb.width() {
                if prev.get(x, y) == fb.get(x, y) {
                    x += 1;
                    continue;
                }
                self.stdout.queue(cursor::MoveTo(x, y))?;
                while x < fb.width() && prev.get(x, y) != fb.get(x, y) {
                    let glyph = fb.get(x, y).unwrap_or_default();
                    if style_in_effect != Some(glyph.style) {
                        self.apply_style(glyph.style)?;
                        style_in_effect = Some(glyph.style);
                    }
                    self.stdout.queue(Print(glyph.ch))?;
                    x += 1;
                }
            }
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.flush()?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn apply_style(&mut self, style: GlyphStyle) -> Result<()> {
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(SetForegroundColor(to_color(style.fg)))?;
        self.stdout.queue(SetBackgroundColor(to_color(style.bg)))?;
        if style.bold {
            self.stdout.queue(SetAttribute(Attribute::Bold))?;
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
