//! The two-valued outcome alphabet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One observed outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    B,
    P,
}

impl Symbol {
    pub const ALL: [Symbol; 2] = [Symbol::B, Symbol::P];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::B => "B",
            Symbol::P => "P",
        }
    }

    /// Board label: `BANKER` or `PLAYER`.
    pub fn label(&self) -> &'static str {
        match self {
            Symbol::B => "BANKER",
            Symbol::P => "PLAYER",
        }
    }

    pub fn opposite(&self) -> Symbol {
        match self {
            Symbol::B => Symbol::P,
            Symbol::P => Symbol::B,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" | "BANKER" => Ok(Symbol::B),
            "P" | "PLAYER" => Ok(Symbol::P),
            _ => Err(EngineError::InvalidInput(format!(
                "unknown symbol {:?}, expected B or P",
                s
            ))),
        }
    }
}
