//! Prediction methods.
//!
//! Each method is a pure function: OutcomeLog -> Option<Candidate>.
//! Methods are independent; both may fire in the same cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::outcome_log::OutcomeLog;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Trend,
    Pattern,
}

impl Method {
    /// Evaluation order. Also the tie-break order when sorting candidates.
    pub const ALL: [Method; 2] = [Method::Trend, Method::Pattern];

    /// Column index in the heatmap table.
    pub fn index(&self) -> usize {
        match self {
            Method::Trend => 0,
            Method::Pattern => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Trend => "TREND",
            Method::Pattern => "PATTERN",
        }
    }

    pub fn evaluate(&self, log: &OutcomeLog, cfg: &EngineConfig) -> Option<Candidate> {
        match self {
            Method::Trend => trend_candidate(log, cfg),
            Method::Pattern => pattern_candidate(log, cfg),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method's proposal for the next outcome. Lives for one decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub method: Method,
    pub prediction: Symbol,
    pub confidence: f64,
}

/// Follow the current streak.
///
/// Confidence is `base + step * streak` and is deliberately left unclamped:
/// long streaks keep raising it.
pub fn trend_candidate(log: &OutcomeLog, cfg: &EngineConfig) -> Option<Candidate> {
    if log.len() < cfg.trend_min_len {
        return None;
    }
    let last = log.last()?;
    let streak = log.streak();
    if streak < cfg.trend_min_streak {
        return None;
    }
    Some(Candidate {
        method: Method::Trend,
        prediction: last,
        confidence: cfg.trend_base_conf + cfg.trend_streak_step * streak as f64,
    })
}

/// Finite-memory lookahead over recurring tails.
///
/// For each window length from shortest to longest, tally what followed
/// every earlier occurrence of the trailing window. The first length with
/// enough matches decides; majority wins with ties going to `B`.
pub fn pattern_candidate(log: &OutcomeLog, cfg: &EngineConfig) -> Option<Candidate> {
    let hist = log.as_slice();
    if hist.len() < cfg.pattern_min_len {
        return None;
    }

    for l in cfg.pattern_min_window..=cfg.pattern_max_window {
        if l == 0 || l >= hist.len() {
            break;
        }
        let query = &hist[hist.len() - l..];
        let (mut b, mut p) = (0usize, 0usize);
        for i in 0..hist.len() - l {
            if &hist[i..i + l] == query {
                match hist[i + l] {
                    Symbol::B => b += 1,
                    Symbol::P => p += 1,
                }
            }
        }
        if b + p >= cfg.pattern_min_matches {
            let prediction = if b >= p { Symbol::B } else { Symbol::P };
            return Some(Candidate {
                method: Method::Pattern,
                prediction,
                confidence: cfg.pattern_conf,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome_log::log_of;

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_trend_needs_four_entries() {
        assert!(trend_candidate(&log_of("BBB"), &cfg()).is_none());
        assert!(trend_candidate(&log_of("PBBB"), &cfg()).is_some());
    }

    #[test]
    fn test_trend_confidence_grows_with_streak() {
        let c = trend_candidate(&log_of("BBBB"), &cfg()).unwrap();
        assert_eq!(c.method, Method::Trend);
        assert_eq!(c.prediction, Symbol::B);
        assert!((c.confidence - 0.8).abs() < 1e-12);

        // No cap: streak 12 -> 1.2
        let long = trend_candidate(&log_of("PPPPPPPPPPPP"), &cfg()).unwrap();
        assert_eq!(long.prediction, Symbol::P);
        assert!((long.confidence - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_trend_silent_on_short_streak() {
        assert!(trend_candidate(&log_of("BBBBPP"), &cfg()).is_none());
    }

    #[test]
    fn test_pattern_needs_eight_entries() {
        assert!(pattern_candidate(&log_of("BPBPBPB"), &cfg()).is_none());
    }

    #[test]
    fn test_pattern_alternation_predicts_b() {
        // Tail BP occurs at 0, 2, 4; each followed by B.
        let c = pattern_candidate(&log_of("BPBPBPBP"), &cfg()).unwrap();
        assert_eq!(c.method, Method::Pattern);
        assert_eq!(c.prediction, Symbol::B);
        assert!((c.confidence - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_pattern_tie_goes_to_b() {
        // tail PB occurs at 0 (next P) and 3 (next B) -> 1:1
        let tie = pattern_candidate(&log_of("PBPPBBPB"), &cfg()).unwrap();
        assert_eq!(tie.prediction, Symbol::B);
    }

    #[test]
    fn test_pattern_majority_p() {
        // tail BB occurs at 0 (next P), 3 (next P)
        let c = pattern_candidate(&log_of("BBPBBPBB"), &cfg()).unwrap();
        assert_eq!(c.prediction, Symbol::P);
    }

    #[test]
    fn test_pattern_falls_through_to_longer_window() {
        // Every window length 2..=5 has at most one earlier occurrence.
        assert!(pattern_candidate(&log_of("BBPPBBPP"), &cfg()).is_none());
    }

    #[test]
    fn test_method_order_is_trend_then_pattern() {
        assert_eq!(Method::ALL, [Method::Trend, Method::Pattern]);
        assert_eq!(Method::Trend.index(), 0);
        assert_eq!(Method::Pattern.index(), 1);
    }
}
