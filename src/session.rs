//! Session: owner of all mutable engine state.
//!
//! Holds the outcome log, the tool log, the heatmap and the single pending
//! decision slot, and keeps them consistent across the four operations a
//! collaborator may call: `report_outcome`, `undo`, `reset` and
//! `current_decision`. Single-threaded; wrap in a mutex or confine to one
//! task if shared.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::engine::{evaluate, Decision, EngineConfig};
use crate::error::{EngineError, Result};
use crate::heatmap::Heatmap;
use crate::logging::{log_invariant, log_resolution, log_session_event};
use crate::outcome_log::OutcomeLog;
use crate::symbol::Symbol;
use crate::tool_log::{ToolLog, ToolLogEntry, ToolResult};

#[derive(Debug, Clone, Default)]
pub struct Session {
    cfg: EngineConfig,
    outcomes: OutcomeLog,
    tool: ToolLog,
    heat: Heatmap,
    pending: Option<Decision>,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    outcomes: &'a OutcomeLog,
    tool: &'a ToolLog,
    heat: &'a Heatmap,
    pending: &'a Option<Decision>,
}

impl Session {
    pub fn new(cfg: EngineConfig) -> Self {
        Self {
            cfg,
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        Self::new(EngineConfig::from_env())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn outcomes(&self) -> &OutcomeLog {
        &self.outcomes
    }

    pub fn tool_log(&self) -> &ToolLog {
        &self.tool
    }

    pub fn heatmap(&self) -> &Heatmap {
        &self.heat
    }

    pub fn pending(&self) -> Option<&Decision> {
        self.pending.as_ref()
    }

    /// Record a new real-world outcome and return the next decision.
    ///
    /// A pending PLAY is resolved against `symbol` first, then the outcome
    /// is appended and a fresh decision becomes pending.
    pub fn report_outcome(&mut self, symbol: Symbol) -> Decision {
        if let Some(prev) = self.pending.take() {
            self.resolve(&prev, symbol);
        }
        self.outcomes.push(symbol);
        self.check_invariants();
        self.recompute()
    }

    /// Parse and report a raw token. Rejected input leaves the session untouched.
    pub fn report_input(&mut self, raw: &str) -> Result<Decision> {
        let symbol: Symbol = raw.parse()?;
        Ok(self.report_outcome(symbol))
    }

    fn resolve(&mut self, decision: &Decision, actual: Symbol) {
        let (prediction, method) = match (decision.prediction, decision.method) {
            (Some(p), Some(m)) if decision.is_play() => (p, m),
            _ => return,
        };
        let result = if prediction == actual {
            ToolResult::Win
        } else {
            ToolResult::Lose
        };
        let entry = ToolLogEntry {
            result,
            method,
            phase: decision.phase,
            outcome_index: self.outcomes.len(),
        };
        self.tool.push(entry);
        self.heat.record(entry.phase, entry.method, result);
        log_resolution(&entry);
    }

    /// Remove the latest outcome and the resolution it produced, if any.
    /// The pending decision is cleared, not recomputed. No-op when empty.
    pub fn undo(&mut self) {
        if self.outcomes.pop().is_none() {
            return;
        }
        let removed_index = self.outcomes.len();
        if self.tool.last().map(|e| e.outcome_index) == Some(removed_index) {
            self.tool.pop();
        }
        self.pending = None;
        self.check_invariants();
        log_session_event("undo", self.outcomes.len(), self.tool.len());
    }

    /// Empty both logs, zero the heatmap and clear the pending decision.
    pub fn reset(&mut self) {
        self.outcomes.clear();
        self.tool.clear();
        self.heat.reset();
        self.pending = None;
        log_session_event("reset", 0, 0);
    }

    /// Last computed decision, or the idle WAIT/UNKNOWN decision when none is pending.
    pub fn current_decision(&self) -> Decision {
        self.pending.unwrap_or_default()
    }

    /// Re-evaluate from current state without appending.
    pub fn recompute(&mut self) -> Decision {
        let decision = evaluate(&self.outcomes, &self.tool, &self.heat, &self.cfg).decision;
        self.pending = Some(decision);
        decision
    }

    /// Check the cross-log invariants.
    pub fn validate(&self) -> Result<()> {
        if self.tool.len() > self.outcomes.len() {
            return Err(EngineError::Invariant(format!(
                "tool log has {} entries for {} outcomes",
                self.tool.len(),
                self.outcomes.len()
            )));
        }
        let mut prev: Option<usize> = None;
        for entry in self.tool.entries() {
            if entry.outcome_index >= self.outcomes.len() {
                return Err(EngineError::Invariant(format!(
                    "resolution points at outcome {} of {}",
                    entry.outcome_index,
                    self.outcomes.len()
                )));
            }
            if prev.is_some_and(|p| p >= entry.outcome_index) {
                return Err(EngineError::Invariant(format!(
                    "resolutions out of order at outcome {}",
                    entry.outcome_index
                )));
            }
            prev = Some(entry.outcome_index);
        }
        Ok(())
    }

    fn check_invariants(&self) {
        if let Err(err) = self.validate() {
            invariant_violation(&err.to_string());
        }
    }

    /// Hex SHA-256 over the canonical JSON of the session state.
    pub fn fingerprint(&self) -> String {
        let snap = Snapshot {
            outcomes: &self.outcomes,
            tool: &self.tool,
            heat: &self.heat,
            pending: &self.pending,
        };
        let bytes = serde_json::to_vec(&snap).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }
}

/// Fatal in debug builds, logged and ignored in release builds.
pub fn invariant_violation(detail: &str) {
    if cfg!(debug_assertions) {
        panic!("invariant violation: {}", detail);
    }
    log_invariant(detail);
}
