//! Input handling for two players sharing one keyboard.

pub mod handler;

pub use handler::{action_for_key, InputHandler};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Quit on `q`, Esc, or Ctrl-C.
pub fn should_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
