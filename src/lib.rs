//! Heuristic next-outcome engine for a two-symbol stream.
//!
//! ```text
//! collaborator ──► Session::report_outcome ──► resolve pending ──► ToolLog / Heatmap
//!                                         └──► OutcomeLog ──► engine::evaluate ──► Decision
//! ```
//!
//! The session owns all state; the engine is a pure function over it.

pub mod command;
pub mod engine;
pub mod error;
pub mod heatmap;
pub mod lockout;
pub mod logging;
pub mod methods;
pub mod outcome_log;
pub mod phase;
pub mod session;
pub mod stats;
pub mod symbol;
pub mod tool_log;

pub use engine::{Action, Decision, EngineConfig};
pub use error::EngineError;
pub use methods::Method;
pub use phase::Phase;
pub use session::Session;
pub use symbol::Symbol;
