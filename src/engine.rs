//! Decision engine: one pure evaluation per log mutation.
//!
//! ```text
//! OutcomeLog ──► Phase ──────────────────────────────┐
//!     │                                              ▼
//!     ├──► Trend ───┐                         ┌─────────────┐
//!     │             ├─► × heatmap bonus ─────►│  combine    │──► Decision
//!     └──► Pattern ─┘                         └─────────────┘
//! ToolLog ──► Lockout guard ───────────────────────────▲
//! ```
//!
//! The engine owns no state. Everything it reads is passed in by the
//! session that owns the logs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::heatmap::Heatmap;
use crate::lockout;
use crate::logging::{log_decision, log_lockout};
use crate::methods::{Candidate, Method};
use crate::outcome_log::OutcomeLog;
use crate::phase::{detect_phase, Phase};
use crate::symbol::Symbol;
use crate::tool_log::ToolLog;

/// Thresholds for every stage of the engine.
///
/// Defaults reproduce the reference heuristics; `from_env` lets a run
/// override any of them.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    // === Phase detector ===
    pub phase_min_len: usize,

    // === Trend method ===
    pub trend_min_len: usize,
    pub trend_min_streak: usize,
    pub trend_base_conf: f64,
    pub trend_streak_step: f64,

    // === Pattern method ===
    pub pattern_min_len: usize,
    pub pattern_min_window: usize,
    pub pattern_max_window: usize,
    pub pattern_min_matches: usize,
    pub pattern_conf: f64,

    // === Heatmap ===
    /// Observations a cell needs before it biases confidence
    pub heat_min_samples: u32,

    // === Combination ===
    /// Minimum adjusted confidence to PLAY
    pub play_threshold: f64,

    // === Lockout guard ===
    pub lockout_min_entries: usize,
    pub lockout_win_rate: f64,
    /// Only the most recent N resolutions count; `None` = whole history
    pub lockout_window: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            phase_min_len: 6,

            trend_min_len: 4,
            trend_min_streak: 3,
            trend_base_conf: 0.6,
            trend_streak_step: 0.05,

            pattern_min_len: 8,
            pattern_min_window: 2,
            pattern_max_window: 5,
            pattern_min_matches: 2,
            pattern_conf: 0.6,

            heat_min_samples: 5,

            play_threshold: 0.55,

            lockout_min_entries: 6,
            lockout_win_rate: 0.45,
            lockout_window: None,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            phase_min_len: env_or("PHASE_MIN_LEN", d.phase_min_len),
            trend_min_len: env_or("TREND_MIN_LEN", d.trend_min_len),
            trend_min_streak: env_or("TREND_MIN_STREAK", d.trend_min_streak),
            trend_base_conf: env_or("TREND_BASE_CONF", d.trend_base_conf),
            trend_streak_step: env_or("TREND_STREAK_STEP", d.trend_streak_step),
            pattern_min_len: env_or("PATTERN_MIN_LEN", d.pattern_min_len),
            pattern_min_window: env_or("PATTERN_MIN_WINDOW", d.pattern_min_window),
            pattern_max_window: env_or("PATTERN_MAX_WINDOW", d.pattern_max_window),
            pattern_min_matches: env_or("PATTERN_MIN_MATCHES", d.pattern_min_matches),
            pattern_conf: env_or("PATTERN_CONF", d.pattern_conf),
            heat_min_samples: env_or("HEAT_MIN_SAMPLES", d.heat_min_samples),
            play_threshold: env_or("PLAY_TH", d.play_threshold),
            lockout_min_entries: env_or("LOCKOUT_MIN_ENTRIES", d.lockout_min_entries),
            lockout_win_rate: env_or("LOCKOUT_WIN_RATE", d.lockout_win_rate),
            lockout_window: std::env::var("LOCKOUT_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Play,
    Wait,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Play => "PLAY",
            Action::Wait => "WAIT",
        }
    }
}

/// Output of one decision cycle. `prediction` and `method` are set iff PLAY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prediction: Option<Symbol>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub method: Option<Method>,
    pub phase: Phase,
    pub locked: bool,
}

impl Decision {
    /// Neutral decision shown before any evaluation.
    pub fn idle() -> Self {
        Self::wait(Phase::Unknown, false)
    }

    pub fn wait(phase: Phase, locked: bool) -> Self {
        Self {
            action: Action::Wait,
            prediction: None,
            method: None,
            phase,
            locked,
        }
    }

    pub fn play(prediction: Symbol, method: Method, phase: Phase) -> Self {
        Self {
            action: Action::Play,
            prediction: Some(prediction),
            method: Some(method),
            phase,
            locked: false,
        }
    }

    pub fn is_play(&self) -> bool {
        self.action == Action::Play
    }

    /// Display text: `BANKER`, `PLAYER` or `WAIT`.
    pub fn label(&self) -> &'static str {
        match (self.action, self.prediction) {
            (Action::Play, Some(p)) => p.label(),
            _ => "WAIT",
        }
    }
}

impl Default for Decision {
    fn default() -> Self {
        Self::idle()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.prediction, self.method) {
            (Some(p), Some(m)) => write!(f, "PLAY {} via {} [{}]", p, m, self.phase),
            _ if self.locked => write!(f, "WAIT (locked) [{}]", self.phase),
            _ => write!(f, "WAIT [{}]", self.phase),
        }
    }
}

/// Full result of a cycle: the decision plus the candidates it weighed,
/// each paired with its heatmap-adjusted confidence in ranked order.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub decision: Decision,
    pub ranked: Vec<(Candidate, f64)>,
}

/// Run one decision cycle.
pub fn evaluate(
    log: &OutcomeLog,
    tool: &ToolLog,
    heat: &Heatmap,
    cfg: &EngineConfig,
) -> Evaluation {
    let phase = detect_phase(log, cfg.phase_min_len);

    let guard = lockout::check(tool, cfg);
    if guard.locked {
        log_lockout(guard.sample, guard.wins, cfg.lockout_win_rate);
        return Evaluation {
            decision: Decision::wait(phase, true),
            ranked: Vec::new(),
        };
    }

    let mut ranked: Vec<(Candidate, f64)> = Method::ALL
        .iter()
        .filter_map(|m| m.evaluate(log, cfg))
        .map(|c| {
            let adjusted = c.confidence * heat.bonus(phase, c.method, cfg.heat_min_samples);
            (c, adjusted)
        })
        .collect();

    // Stable: equal scores keep evaluation order (Trend before Pattern).
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let decision = match ranked.first() {
        Some((top, adjusted)) if *adjusted >= cfg.play_threshold => {
            Decision::play(top.prediction, top.method, phase)
        }
        _ => Decision::wait(phase, false),
    };

    log_decision(&decision, &ranked);
    Evaluation { decision, ranked }
}

pub fn decide(log: &OutcomeLog, tool: &ToolLog, heat: &Heatmap, cfg: &EngineConfig) -> Decision {
    evaluate(log, tool, heat, cfg).decision
}
