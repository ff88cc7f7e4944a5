//! Record of resolved predictions.

use serde::{Deserialize, Serialize};

use crate::methods::Method;
use crate::phase::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ToolResult {
    Win,
    Lose,
}

impl ToolResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolResult::Win => "WIN",
            ToolResult::Lose => "LOSE",
        }
    }
}

/// One resolved PLAY decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolLogEntry {
    pub result: ToolResult,
    pub method: Method,
    pub phase: Phase,
    /// Index in the outcome log of the outcome that resolved this entry.
    pub outcome_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolLog {
    entries: Vec<ToolLogEntry>,
}

impl ToolLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ToolLogEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<ToolLogEntry> {
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&ToolLogEntry> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ToolLogEntry] {
        &self.entries
    }

    /// The last `n` entries, or all of them when `n` is `None`.
    pub fn recent(&self, n: Option<usize>) -> &[ToolLogEntry] {
        match n {
            Some(n) if n < self.entries.len() => &self.entries[self.entries.len() - n..],
            _ => &self.entries,
        }
    }

    pub fn wins(&self) -> usize {
        count_wins(&self.entries)
    }

    pub fn win_rate(&self) -> Option<f64> {
        win_rate(&self.entries)
    }
}

pub fn count_wins(entries: &[ToolLogEntry]) -> usize {
    entries.iter().filter(|e| e.result == ToolResult::Win).count()
}

pub fn win_rate(entries: &[ToolLogEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    Some(count_wins(entries) as f64 / entries.len() as f64)
}

#[cfg(test)]
pub(crate) fn tool_log_of(results: &[ToolResult]) -> ToolLog {
    let mut log = ToolLog::new();
    for (i, r) in results.iter().enumerate() {
        log.push(ToolLogEntry {
            result: *r,
            method: Method::Trend,
            phase: Phase::Unknown,
            outcome_index: i,
        });
    }
    log
}
