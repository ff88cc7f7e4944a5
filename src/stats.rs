//! Aggregate figures a collaborator renders next to the decision.

use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::symbol::Symbol;

/// Tool win rate at or above which the band is `Good`.
pub const GOOD_BAND_PCT: u32 = 55;
/// Tool win rate at or above which the band is `Mid`.
pub const MID_BAND_PCT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ToolBand {
    Good,
    Mid,
    Bad,
}

impl ToolBand {
    pub fn from_pct(pct: u32) -> Self {
        if pct >= GOOD_BAND_PCT {
            ToolBand::Good
        } else if pct >= MID_BAND_PCT {
            ToolBand::Mid
        } else {
            ToolBand::Bad
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub outcomes: usize,
    pub resolved: usize,
    pub banker_pct: u32,
    pub player_pct: u32,
    pub tool_pct: u32,
    pub tool_band: ToolBand,
    pub streak: usize,
    pub alternation_rate: f64,
}

impl SessionStats {
    pub fn from_session(session: &Session) -> Self {
        let log = session.outcomes();
        let tool = session.tool_log();

        // Empty log divides by one: 0% banker, 100% player.
        let total = log.len().max(1) as f64;
        let banker = log.count(Symbol::B) as f64 / total;
        let tool_pct = tool
            .win_rate()
            .map(|r| (r * 100.0).round() as u32)
            .unwrap_or(0);

        Self {
            outcomes: log.len(),
            resolved: tool.len(),
            banker_pct: (banker * 100.0).round() as u32,
            player_pct: ((1.0 - banker) * 100.0).round() as u32,
            tool_pct,
            tool_band: ToolBand::from_pct(tool_pct),
            streak: log.streak(),
            alternation_rate: log.alternation_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session() {
        let stats = SessionStats::from_session(&Session::default());
        assert_eq!(stats.banker_pct, 0);
        assert_eq!(stats.player_pct, 100);
        assert_eq!(stats.tool_pct, 0);
        assert_eq!(stats.tool_band, ToolBand::Bad);
    }

    #[test]
    fn test_symbol_split_rounds() {
        let mut s = Session::default();
        for sym in [Symbol::B, Symbol::B, Symbol::P] {
            s.report_outcome(sym);
        }
        let stats = SessionStats::from_session(&s);
        assert_eq!(stats.banker_pct, 67);
        assert_eq!(stats.player_pct, 33);
        assert_eq!(stats.outcomes, 3);
        assert_eq!(stats.streak, 1);
    }

    #[test]
    fn test_tool_bands() {
        assert_eq!(ToolBand::from_pct(100), ToolBand::Good);
        assert_eq!(ToolBand::from_pct(55), ToolBand::Good);
        assert_eq!(ToolBand::from_pct(54), ToolBand::Mid);
        assert_eq!(ToolBand::from_pct(50), ToolBand::Mid);
        assert_eq!(ToolBand::from_pct(49), ToolBand::Bad);
    }

    #[test]
    fn test_tool_rate_after_win() {
        let mut s = Session::default();
        for _ in 0..5 {
            s.report_outcome(Symbol::P);
        }
        let stats = SessionStats::from_session(&s);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.tool_pct, 100);
        assert_eq!(stats.tool_band, ToolBand::Good);
    }
}
