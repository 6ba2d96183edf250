//! Two-player DAS/ARR input handling
//!
//! Works on terminals with or without key release events:
//! 1. Each key press generates exactly one immediate action.
//! 2. A held key repeats after the DAS delay at the ARR rate, driven by
//!    `update` once per frame.
//! 3. Release is taken from the terminal when reported, and otherwise
//!    inferred from a timeout since the last press of that player's keys.
//!
//! Bindings: P1 WASD + `v` hard drop + `c` hold; P2 arrows + `.` hard drop
//! + `,` hold.

use crossterm::event::KeyCode;

use crate::types::{PlayerAction, PlayerId, DEFAULT_ARR_MS, DEFAULT_DAS_MS};

/// Current horizontal repeat direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Horizontal {
    None,
    Left,
    Right,
}

impl Horizontal {
    fn action(&self) -> Option<PlayerAction> {
        match self {
            Horizontal::None => None,
            Horizontal::Left => Some(PlayerAction::MoveLeft),
            Horizontal::Right => Some(PlayerAction::MoveRight),
        }
    }
}

/// Map a key to its player and action, ignoring repeat state.
pub fn action_for_key(code: KeyCode) -> Option<(PlayerId, PlayerAction)> {
    match code {
        KeyCode::Char('a') | KeyCode::Char('A') => Some((PlayerId::One, PlayerAction::MoveLeft)),
        KeyCode::Char('d') | KeyCode::Char('D') => Some((PlayerId::One, PlayerAction::MoveRight)),
        KeyCode::Char('w') | KeyCode::Char('W') => Some((PlayerId::One, PlayerAction::RotateCw)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some((PlayerId::One, PlayerAction::SoftDrop)),
        KeyCode::Char('v') | KeyCode::Char('V') => Some((PlayerId::One, PlayerAction::HardDrop)),
        KeyCode::Char('c') | KeyCode::Char('C') => Some((PlayerId::One, PlayerAction::Hold)),
        KeyCode::Left => Some((PlayerId::Two, PlayerAction::MoveLeft)),
        KeyCode::Right => Some((PlayerId::Two, PlayerAction::MoveRight)),
        KeyCode::Up => Some((PlayerId::Two, PlayerAction::RotateCw)),
        KeyCode::Down => Some((PlayerId::Two, PlayerAction::SoftDrop)),
        KeyCode::Char('.') => Some((PlayerId::Two, PlayerAction::HardDrop)),
        KeyCode::Char(',') => Some((PlayerId::Two, PlayerAction::Hold)),
        _ => None,
    }
}

/// Repeat state for one player's held keys
#[derive(Debug, Clone)]
struct PlayerRepeat {
    horizontal: Horizontal,
    down_held: bool,
    last_key_time: std::time::Instant,
    horizontal_das_ms: u32,
    horizontal_arr_ms: u32,
    down_das_ms: u32,
    down_arr_ms: u32,
}

impl PlayerRepeat {
    fn new() -> Self {
        Self {
            horizontal: Horizontal::None,
            down_held: false,
            last_key_time: std::time::Instant::now(),
            horizontal_das_ms: 0,
            horizontal_arr_ms: 0,
            down_das_ms: 0,
            down_arr_ms: 0,
        }
    }

    fn release_all(&mut self) {
        self.horizontal = Horizontal::None;
        self.down_held = false;
        self.horizontal_das_ms = 0;
        self.horizontal_arr_ms = 0;
        self.down_das_ms = 0;
        self.down_arr_ms = 0;
    }
}

/// Tracks DAS/ARR repeat state for both players
#[derive(Debug, Clone)]
pub struct InputHandler {
    repeats: [PlayerRepeat; 2],
    das_delay: u32,
    arr_rate: u32,
    /// If no press arrives within this window, the key counts as released
    /// (for terminals that never report releases).
    release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            repeats: [PlayerRepeat::new(), PlayerRepeat::new()],
            das_delay,
            arr_rate,
            release_timeout_ms: 150,
        }
    }

    /// Handle a key press: returns the action to apply immediately and arms
    /// the repeat state for movement keys.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<(PlayerId, PlayerAction)> {
        let (player, action) = action_for_key(code)?;
        let repeat = &mut self.repeats[player.index()];
        repeat.last_key_time = std::time::Instant::now();

        match action {
            PlayerAction::MoveLeft | PlayerAction::MoveRight => {
                let dir = if action == PlayerAction::MoveLeft {
                    Horizontal::Left
                } else {
                    Horizontal::Right
                };
                if repeat.horizontal == dir {
                    // Terminal auto-repeat of the same key; DAS owns repeats.
                    return None;
                }
                repeat.horizontal = dir;
                repeat.horizontal_das_ms = 0;
                repeat.horizontal_arr_ms = 0;
                Some((player, action))
            }
            PlayerAction::SoftDrop => {
                if repeat.down_held {
                    return None;
                }
                repeat.down_held = true;
                repeat.down_das_ms = 0;
                repeat.down_arr_ms = 0;
                Some((player, action))
            }
            // One-shot actions never repeat.
            _ => Some((player, action)),
        }
    }

    /// Handle a key release where the terminal reports one.
    pub fn handle_key_release(&mut self, code: KeyCode) {
        let Some((player, action)) = action_for_key(code) else {
            return;
        };
        let repeat = &mut self.repeats[player.index()];
        match action {
            PlayerAction::MoveLeft => {
                if repeat.horizontal == Horizontal::Left {
                    repeat.horizontal = Horizontal::None;
                    repeat.horizontal_das_ms = 0;
                    repeat.horizontal_arr_ms = 0;
                }
            }
            PlayerAction::MoveRight => {
                if repeat.horizontal == Horizontal::Right {
                    repeat.horizontal = Horizontal::None;
                    repeat.horizontal_das_ms = 0;
                    repeat.horizontal_arr_ms = 0;
                }
            }
            PlayerAction::SoftDrop => {
                repeat.down_held = false;
                repeat.down_das_ms = 0;
                repeat.down_arr_ms = 0;
            }
            _ => {}
        }
    }

    /// Advance repeat timers by `elapsed_ms` and emit auto-repeat actions.
    pub fn update(&mut self, elapsed_ms: u32) -> Vec<(PlayerId, PlayerAction)> {
        let mut actions = Vec::new();
        let das = self.das_delay;
        let arr = self.arr_rate;
        let timeout = self.release_timeout_ms;

        for (index, repeat) in self.repeats.iter_mut().enumerate() {
            let player = if index == 0 {
                PlayerId::One
            } else {
                PlayerId::Two
            };

            // Infer release when the terminal reports none.
            if repeat.last_key_time.elapsed().as_millis() as u32 > timeout {
                repeat.release_all();
            }

            if let Some(action) = repeat.horizontal.action() {
                let prev = repeat.horizontal_das_ms;
                repeat.horizontal_das_ms += elapsed_ms;
                if repeat.horizontal_das_ms >= das {
                    let excess = if prev < das {
                        repeat.horizontal_das_ms - das
                    } else {
                        elapsed_ms
                    };
                    repeat.horizontal_arr_ms += excess;
                    while repeat.horizontal_arr_ms >= arr {
                        actions.push((player, action));
                        repeat.horizontal_arr_ms -= arr;
                    }
                }
            } else {
                repeat.horizontal_das_ms = 0;
                repeat.horizontal_arr_ms = 0;
            }

            if repeat.down_held {
                let prev = repeat.down_das_ms;
                repeat.down_das_ms += elapsed_ms;
                if repeat.down_das_ms >= das {
                    let excess = if prev < das {
                        repeat.down_das_ms - das
                    } else {
                        elapsed_ms
                    };
                    repeat.down_arr_ms += excess;
                    while repeat.down_arr_ms >= arr {
                        actions.push((player, PlayerAction::SoftDrop));
                        repeat.down_arr_ms -= arr;
                    }
                }
            } else {
                repeat.down_das_ms = 0;
                repeat.down_arr_ms = 0;
            }
        }

        actions
    }

    /// Drop all held state (pause, restart, match end).
    pub fn reset(&mut self) {
        for repeat in self.repeats.iter_mut() {
            repeat.release_all();
            repeat.last_key_time = std::time::Instant::now();
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(handler: &mut InputHandler) {
        // Keep the inferred-release timeout from firing during a test.
        for repeat in handler.repeats.iter_mut() {
            repeat.last_key_time = std::time::Instant::now();
        }
    }

    #[test]
    fn keys_route_to_the_right_player() {
        assert_eq!(
            action_for_key(KeyCode::Char('a')),
            Some((PlayerId::One, PlayerAction::MoveLeft))
        );
        assert_eq!(
            action_for_key(KeyCode::Left),
            Some((PlayerId::Two, PlayerAction::MoveLeft))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('v')),
            Some((PlayerId::One, PlayerAction::HardDrop))
        );
        assert_eq!(
            action_for_key(KeyCode::Char(',')),
            Some((PlayerId::Two, PlayerAction::Hold))
        );
        assert_eq!(action_for_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn first_press_acts_immediately_repeat_press_does_not() {
        let mut handler = InputHandler::new();
        assert_eq!(
            handler.handle_key_press(KeyCode::Char('a')),
            Some((PlayerId::One, PlayerAction::MoveLeft))
        );
        assert_eq!(handler.handle_key_press(KeyCode::Char('a')), None);
    }

    #[test]
    fn das_then_arr_generates_repeats() {
        let mut handler = InputHandler::with_config(100, 50);
        handler.handle_key_press(KeyCode::Left);
        fresh(&mut handler);

        // 100ms DAS + 100ms worth of ARR at 50ms = 2 repeats.
        let actions = handler.update(200);
        assert_eq!(actions.len(), 2);
        assert!(actions
            .iter()
            .all(|&a| a == (PlayerId::Two, PlayerAction::MoveLeft)));
    }

    #[test]
    fn no_repeats_before_das_delay() {
        let mut handler = InputHandler::with_config(167, 33);
        handler.handle_key_press(KeyCode::Char('d'));
        fresh(&mut handler);
        assert!(handler.update(100).is_empty());
    }

    #[test]
    fn both_players_repeat_independently() {
        let mut handler = InputHandler::with_config(50, 50);
        handler.handle_key_press(KeyCode::Char('a'));
        handler.handle_key_press(KeyCode::Right);
        fresh(&mut handler);

        let actions = handler.update(100);
        assert!(actions.contains(&(PlayerId::One, PlayerAction::MoveLeft)));
        assert!(actions.contains(&(PlayerId::Two, PlayerAction::MoveRight)));
    }

    #[test]
    fn release_stops_repeats() {
        let mut handler = InputHandler::with_config(50, 50);
        handler.handle_key_press(KeyCode::Char('a'));
        handler.handle_key_release(KeyCode::Char('a'));
        fresh(&mut handler);
        assert!(handler.update(200).is_empty());
    }

    #[test]
    fn inferred_release_after_timeout() {
        let mut handler = InputHandler::with_config(50, 50);
        handler.handle_key_press(KeyCode::Down);
        handler.repeats[1].last_key_time =
            std::time::Instant::now() - std::time::Duration::from_millis(500);
        assert!(handler.update(16).is_empty());
        assert!(!handler.repeats[1].down_held);
    }

    #[test]
    fn one_shot_actions_do_not_repeat() {
        let mut handler = InputHandler::with_config(50, 50);
        assert_eq!(
            handler.handle_key_press(KeyCode::Char('w')),
            Some((PlayerId::One, PlayerAction::RotateCw))
        );
        fresh(&mut handler);
        assert!(handler.update(500).is_empty());
    }

    #[test]
    fn direction_switch_resets_das() {
        let mut handler = InputHandler::with_config(100, 50);
        handler.handle_key_press(KeyCode::Char('a'));
        fresh(&mut handler);
        handler.update(80);

        // Switching direction acts immediately and restarts DAS.
        assert_eq!(
            handler.handle_key_press(KeyCode::Char('d')),
            Some((PlayerId::One, PlayerAction::MoveRight))
        );
        fresh(&mut handler);
        assert!(handler.update(80).is_empty());
    }
}
