//! Ordered history of observed outcomes. Index 0 is the oldest entry.

use serde::{Deserialize, Serialize};

use crate::symbol::Symbol;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeLog {
    entries: Vec<Symbol>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, symbol: Symbol) {
        self.entries.push(symbol);
    }

    /// Remove the most recent entry. Empty log is a no-op.
    pub fn pop(&mut self) -> Option<Symbol> {
        self.entries.pop()
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

    pub fn last(&self) -> Option<Symbol> {
        self.entries.last().copied()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.entries
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        self.entries.iter().filter(|s| **s == symbol).count()
    }

    /// Consecutive trailing entries equal to the last one (0 only when empty).
    pub fn streak(&self) -> usize {
        match self.last() {
            Some(last) => self.entries.iter().rev().take_while(|s| **s == last).count(),
            None => 0,
        }
    }

    /// Fraction of adjacent positions where the symbol changes.
    pub fn alternation_rate(&self) -> f64 {
        if self.entries.len() < 2 {
            return 0.0;
        }
        let changes = self.entries.windows(2).filter(|w| w[0] != w[1]).count();
        changes as f64 / (self.entries.len() - 1) as f64
    }
}

impl From<Vec<Symbol>> for OutcomeLog {
    fn from(entries: Vec<Symbol>) -> Self {
        Self { entries }
    }
}

impl FromIterator<Symbol> for OutcomeLog {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
pub(crate) fn log_of(s: &str) -> OutcomeLog {
    s.chars()
        .map(|c| match c {
            'B' => Symbol::B,
            'P' => Symbol::P,
            other => panic!("bad test symbol {}", other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_counts_trailing_run() {
        assert_eq!(log_of("").streak(), 0);
        assert_eq!(log_of("B").streak(), 1);
        assert_eq!(log_of("PBBB").streak(), 3);
        assert_eq!(log_of("BBBP").streak(), 1);
    }

    #[test]
    fn test_alternation_rate() {
        assert_eq!(log_of("B").alternation_rate(), 0.0);
        assert_eq!(log_of("BBBB").alternation_rate(), 0.0);
        assert_eq!(log_of("BPBP").alternation_rate(), 1.0);
        // BBPP: one change over three pairs
        assert!((log_of("BBPP").alternation_rate() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let mut log = OutcomeLog::new();
        assert_eq!(log.pop(), None);
        assert!(log.is_empty());
        log.push(Symbol::P);
        assert_eq!(log.pop(), Some(Symbol::P));
        assert_eq!(log.len(), 0);
    }
}
