//! Adaptive per-(phase, method) performance table.
//!
//! A fixed 4x2 table of win/loss tallies. Cells with enough history bias
//! candidate confidence up or down; thin cells stay neutral.

use serde::{Deserialize, Serialize};

use crate::methods::Method;
use crate::phase::Phase;
use crate::tool_log::ToolResult;

/// Win rate at or above which a cell is rewarded.
pub const REWARD_WIN_RATE: f64 = 0.6;
/// Win rate below which a cell is penalized.
pub const PENALTY_WIN_RATE: f64 = 0.45;
pub const REWARD_MULT: f64 = 1.1;
pub const PENALTY_MULT: f64 = 0.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatCell {
    pub wins: u32,
    pub losses: u32,
}

impl HeatCell {
    pub fn total(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.wins as f64 / n as f64),
        }
    }

    pub fn record(&mut self, result: ToolResult) {
        match result {
            ToolResult::Win => self.wins += 1,
            ToolResult::Lose => self.losses += 1,
        }
    }

    /// Confidence multiplier for this cell.
    pub fn multiplier(&self, min_samples: u32) -> f64 {
        if self.total() < min_samples {
            return 1.0;
        }
        match self.win_rate() {
            Some(r) if r >= REWARD_WIN_RATE => REWARD_MULT,
            Some(r) if r < PENALTY_WIN_RATE => PENALTY_MULT,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heatmap {
    cells: [[HeatCell; 2]; 4],
}

impl Heatmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, phase: Phase, method: Method) -> HeatCell {
        self.cells[phase.index()][method.index()]
    }

    pub fn record(&mut self, phase: Phase, method: Method, result: ToolResult) {
        self.cells[phase.index()][method.index()].record(result);
    }

    pub fn bonus(&self, phase: Phase, method: Method, min_samples: u32) -> f64 {
        self.cell(phase, method).multiplier(min_samples)
    }

    pub fn reset(&mut self) {
        self.cells = Default::default();
    }

    /// All cells in (phase, method) order.
    pub fn iter(&self) -> impl Iterator<Item = (Phase, Method, HeatCell)> + '_ {
        Phase::ALL.into_iter().flat_map(move |phase| {
            Method::ALL
                .into_iter()
                .map(move |method| (phase, method, self.cell(phase, method)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(wins: u32, losses: u32) -> HeatCell {
        HeatCell { wins, losses }
    }

    #[test]
    fn test_thin_cells_are_neutral() {
        for (w, l) in [(0, 0), (4, 0), (0, 4), (2, 2), (3, 1)] {
            assert_eq!(cell(w, l).multiplier(5), 1.0, "{}/{}", w, l);
        }
    }

    #[test]
    fn test_reward_and_penalty_breakpoints() {
        assert_eq!(cell(3, 2).multiplier(5), 1.1); // 0.60
        assert_eq!(cell(5, 0).multiplier(5), 1.1);
        assert_eq!(cell(11, 9).multiplier(5), 1.0); // 0.55
        assert_eq!(cell(9, 11).multiplier(5), 1.0); // 0.45
        assert_eq!(cell(2, 3).multiplier(5), 0.8); // 0.40
        assert_eq!(cell(0, 5).multiplier(5), 0.8);
    }

    #[test]
    fn test_record_hits_one_cell() {
        let mut heat = Heatmap::new();
        heat.record(Phase::Noise, Method::Pattern, ToolResult::Win);
        heat.record(Phase::Noise, Method::Pattern, ToolResult::Lose);
        heat.record(Phase::Trend, Method::Trend, ToolResult::Win);

        assert_eq!(heat.cell(Phase::Noise, Method::Pattern), cell(1, 1));
        assert_eq!(heat.cell(Phase::Trend, Method::Trend), cell(1, 0));
        assert_eq!(heat.cell(Phase::Noise, Method::Trend), cell(0, 0));
        assert_eq!(heat.iter().count(), 8);
    }

    #[test]
    fn test_reset_zeroes_every_cell() {
        let mut heat = Heatmap::new();
        for phase in Phase::ALL {
            for method in Method::ALL {
                heat.record(phase, method, ToolResult::Lose);
            }
        }
        heat.reset();
        assert!(heat.iter().all(|(_, _, c)| c == HeatCell::default()));
    }
}
