//! Terminal rendering: framebuffer, diff renderer and the split-board view.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use fb::{FrameBuffer, Glyph, GlyphStyle, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::TerminalRenderer;
