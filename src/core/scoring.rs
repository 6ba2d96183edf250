//! Scoring module - line clear score table
//!
//! Simultaneous clears pay a flat table amount, not a per-line sum: two rows
//! at once are worth 300, not 200. Clears beyond four rows (possible only
//! when a large composite locks) pay nothing, matching the table bounds.

use crate::types::LINE_SCORES;

/// Points for clearing `lines` rows at once
pub fn line_clear_score(lines: u32) -> i64 {
    match lines {
        1..=4 => LINE_SCORES[lines as usize],
        _ => 0,
    }
}
