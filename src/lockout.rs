//! Streak-of-losses guard.
//!
//! Trips when the resolved win rate drops below `lockout_win_rate` once at
//! least `lockout_min_entries` predictions have resolved. With no
//! `lockout_window` configured the whole ToolLog counts, so an early losing
//! run keeps the guard tripped until wins dilute it.

use crate::engine::EngineConfig;
use crate::tool_log::{count_wins, ToolLog};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockoutCheck {
    pub locked: bool,
    /// Entries considered.
    pub sample: usize,
    pub wins: usize,
}

impl LockoutCheck {
    pub fn win_rate(&self) -> Option<f64> {
        if self.sample == 0 {
            return None;
        }
        Some(self.wins as f64 / self.sample as f64)
    }
}

pub fn check(tool: &ToolLog, cfg: &EngineConfig) -> LockoutCheck {
    let entries = tool.recent(cfg.lockout_window);
    let sample = entries.len();
    let wins = count_wins(entries);
    let locked = sample >= cfg.lockout_min_entries
        && sample > 0
        && (wins as f64 / sample as f64) < cfg.lockout_win_rate;
    LockoutCheck { locked, sample, wins }
}

pub fn is_locked(tool: &ToolLog, cfg: &EngineConfig) -> bool {
    check(tool, cfg).locked
}
