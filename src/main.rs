//! Terminal runner for the two-player split-board match.
//!
//! Usage: tui-battletris [--merge] [--seed N] [COLS ROWS]
//!
//! Player 1: W rotate, A/D move, S soft drop, V hard drop, C hold.
//! Player 2: arrows, `.` hard drop, `,` hold.
//! Global: P pause, R restart after the match ends, Q / Esc quit.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use tui_battletris::core::{Game, GameConfig};
use tui_battletris::input::{should_quit, InputHandler};
use tui_battletris::term::{GameView, TerminalRenderer, Viewport};
use tui_battletris::types::{
    MatchEvent, DEFAULT_BOARD_COLS, DEFAULT_BOARD_ROWS, DROP_INTERVAL_MS, MAX_BOARD_COLS,
    MAX_BOARD_ROWS, MIN_BOARD_COLS, MIN_BOARD_ROWS, TICK_MS,
};

/// Board flash duration after a slam or detonation.
const FLASH_MS: i32 = 100;

fn main() -> Result<()> {
    let config = parse_args()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn parse_args() -> Result<GameConfig> {
    let mut config = GameConfig {
        cols: DEFAULT_BOARD_COLS,
        rows: DEFAULT_BOARD_ROWS,
        merge_mode: false,
        seed: clock_seed(),
    };

    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--merge" => config.merge_mode = true,
            "--seed" => {
                let value = args.next().context("--seed requires a value")?;
                config.seed = value
                    .parse()
                    .with_context(|| format!("invalid seed '{value}'"))?;
            }
            "--help" | "-h" => {
                println!("usage: tui-battletris [--merge] [--seed N] [COLS ROWS]");
                std::process::exit(0);
            }
            other => positional.push(other.to_string()),
        }
    }

    match positional.len() {
        0 => {}
        2 => {
            config.cols = positional[0]
                .parse()
                .with_context(|| format!("invalid column count '{}'", positional[0]))?;
            config.rows = positional[1]
                .parse()
                .with_context(|| format!("invalid row count '{}'", positional[1]))?;
        }
        _ => bail!("expected either no board size or COLS ROWS"),
    }

    // Same clamps the original menu applied to its inputs.
    config.cols = config.cols.clamp(MIN_BOARD_COLS, MAX_BOARD_COLS);
    config.rows = config.rows.clamp(MIN_BOARD_ROWS, MAX_BOARD_ROWS);
    Ok(config)
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: GameConfig) -> Result<()> {
    let mut game = Game::new(config)?;
    let view = GameView::default();
    let mut input = InputHandler::new();

    let mut last_frame = Instant::now();
    let frame = Duration::from_millis(TICK_MS as u64);
    let mut gravity_ms: u32 = 0;
    let mut flash_ms: i32 = 0;

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let mut fb = view.render(&game, Viewport::new(w, h), flash_ms > 0);
        term.draw_swap(&mut fb)?;

        // Input with timeout until the next frame.
        let timeout = frame
            .checked_sub(last_frame.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        match key.code {
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                game.toggle_pause();
                                input.reset();
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                if game.over() {
                                    game.restart();
                                    input.reset();
                                    gravity_ms = 0;
                                }
                            }
                            _ => {
                                if let Some((player, action)) = input.handle_key_press(key.code) {
                                    game.apply(player, action);
                                }
                            }
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Terminal auto-repeat is ignored; DAS/ARR repeats.
                    }
                    KeyEventKind::Release => {
                        input.handle_key_release(key.code);
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Fixed-interval frame: held-key repeats, then gravity.
        if last_frame.elapsed() >= frame {
            last_frame = Instant::now();

            for (player, action) in input.update(TICK_MS) {
                game.apply(player, action);
            }

            gravity_ms += TICK_MS;
            if gravity_ms >= DROP_INTERVAL_MS {
                gravity_ms = 0;
                game.tick();
            }

            if flash_ms > 0 {
                flash_ms -= TICK_MS as i32;
            }
            for event in game.take_events() {
                match event {
                    MatchEvent::Slam { .. } | MatchEvent::Detonated { .. } => {
                        flash_ms = FLASH_MS;
                    }
                    _ => {}
                }
            }
        }
    }
}
