//! Phase classification of the outcome stream.
//!
//! Classifies the log into a coarse regime from two statistics: the
//! alternation rate over the whole log and the length of the current
//! trailing streak. Rules are evaluated in order, first match wins:
//!
//! | Phase        | Rule                                   |
//! |--------------|----------------------------------------|
//! | `Trend`      | streak >= 4 and alternation < 0.3      |
//! | `Noise`      | alternation > 0.6                      |
//! | `Transition` | streak >= 3 and alternation > 0.4      |
//! | `Unknown`    | otherwise, or fewer than `min_len` obs |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::outcome_log::OutcomeLog;

pub const TREND_MIN_STREAK: usize = 4;
pub const TREND_MAX_ALTERNATION: f64 = 0.3;
pub const NOISE_MIN_ALTERNATION: f64 = 0.6;
pub const TRANSITION_MIN_STREAK: usize = 3;
pub const TRANSITION_MIN_ALTERNATION: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Trend,
    Transition,
    Noise,
    Unknown,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Trend, Phase::Transition, Phase::Noise, Phase::Unknown];

    /// Row index in the heatmap table.
    pub fn index(&self) -> usize {
        match self {
            Phase::Trend => 0,
            Phase::Transition => 1,
            Phase::Noise => 2,
            Phase::Unknown => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Trend => "TREND",
            Phase::Transition => "TRANSITION",
            Phase::Noise => "NOISE",
            Phase::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the current log. Pure, O(len).
pub fn detect_phase(log: &OutcomeLog, min_len: usize) -> Phase {
    if log.len() < min_len {
        return Phase::Unknown;
    }

    let alternation = log.alternation_rate();
    let streak = log.streak();

    if streak >= TREND_MIN_STREAK && alternation < TREND_MAX_ALTERNATION {
        Phase::Trend
    } else if alternation > NOISE_MIN_ALTERNATION {
        Phase::Noise
    } else if streak >= TRANSITION_MIN_STREAK && alternation > TRANSITION_MIN_ALTERNATION {
        Phase::Transition
    } else {
        Phase::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome_log::log_of;

    #[test]
    fn test_short_logs_are_unknown() {
        for s in ["", "B", "BBBBB", "BPBPB"] {
            assert_eq!(detect_phase(&log_of(s), 6), Phase::Unknown, "log {}", s);
        }
    }

    #[test]
    fn test_long_streak_is_trend() {
        // 1 change over 7 pairs, streak 7
        assert_eq!(detect_phase(&log_of("PBBBBBBB"), 6), Phase::Trend);
    }

    #[test]
    fn test_alternation_is_noise() {
        assert_eq!(detect_phase(&log_of("BPBPBPBP"), 6), Phase::Noise);
    }

    #[test]
    fn test_streak_after_choppy_run_is_transition() {
        // BPBPBBB: changes 4 of 6 pairs = 0.667 -> noise wins first
        assert_eq!(detect_phase(&log_of("BPBPBBB"), 6), Phase::Noise);
        // BPBPPBBB: changes 4 of 7 = 0.571, streak 3 -> transition
        assert_eq!(detect_phase(&log_of("BPBPPBBB"), 6), Phase::Transition);
    }

    #[test]
    fn test_trend_requires_low_alternation() {
        // BPBPBBBB: changes 4 of 7 = 0.571, streak 4 -> not trend, transition
        assert_eq!(detect_phase(&log_of("BPBPBBBB"), 6), Phase::Transition);
    }

    #[test]
    fn test_flat_without_streak_is_unknown() {
        // BBPPBBPP: changes 3 of 7 = 0.43, streak 2
        assert_eq!(detect_phase(&log_of("BBPPBBPP"), 6), Phase::Unknown);
    }

    #[test]
    fn test_heatmap_indices_are_distinct() {
        let mut seen: Vec<usize> = Phase::ALL.iter().map(|p| p.index()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
