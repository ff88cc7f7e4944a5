//! Line grammar used by the console and replay binaries.
//!
//! One command per line, either a bare token (`B`, `P`, `U`, `R`, `S`,
//! `undo`, `reset`, `stats`, `banker`, `player`) or a JSON object tagged by
//! `type`, e.g. `{"type":"Outcome","symbol":"B"}`. Blank lines and lines
//! starting with `#` are skipped.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::engine::Decision;
use crate::error::{EngineError, Result};
use crate::logging::{log, obj, v_str, Domain, Level};
use crate::session::Session;
use crate::stats::SessionStats;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    Outcome { symbol: Symbol },
    Undo,
    Reset,
    Stats,
}

/// What a collaborator renders after a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub decision: Decision,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SessionStats>,
}

pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line.starts_with('{') {
        return serde_json::from_str(line)
            .map(Some)
            .map_err(|e| EngineError::InvalidInput(format!("bad command json: {}", e)));
    }
    let cmd = match line.to_ascii_lowercase().as_str() {
        "u" | "undo" => Command::Undo,
        "r" | "reset" => Command::Reset,
        "s" | "stats" => Command::Stats,
        _ => Command::Outcome {
            symbol: line.parse()?,
        },
    };
    Ok(Some(cmd))
}

pub fn apply_command(session: &mut Session, cmd: Command) -> Reply {
    let (decision, stats) = match cmd {
        Command::Outcome { symbol } => (session.report_outcome(symbol), None),
        Command::Undo => {
            session.undo();
            (session.current_decision(), None)
        }
        Command::Reset => {
            session.reset();
            (session.current_decision(), None)
        }
        Command::Stats => (
            session.current_decision(),
            Some(SessionStats::from_session(session)),
        ),
    };
    Reply {
        decision,
        label: decision.label(),
        stats,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
    pub plays: usize,
    pub waits: usize,
    pub locked: usize,
    /// 1-based line numbers of rejected lines.
    pub rejected_lines: Vec<usize>,
}

/// Apply every command in `reader`. Bad lines are counted and skipped.
pub fn replay_reader<R: BufRead>(session: &mut Session, reader: R) -> std::io::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(err) => {
                log(
                    Level::Warn,
                    Domain::Session,
                    "replay_rejected",
                    obj(&[
                        ("line", serde_json::json!(line_no)),
                        ("msg", v_str(&err.to_string())),
                    ]),
                );
                summary.rejected += 1;
                summary.rejected_lines.push(line_no);
                continue;
            }
        };
        let reply = apply_command(session, cmd);
        summary.applied += 1;
        if let Command::Outcome { .. } = cmd {
            if reply.decision.is_play() {
                summary.plays += 1;
            } else {
                summary.waits += 1;
            }
            if reply.decision.locked {
                summary.locked += 1;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_tokens() {
        assert_eq!(parse_command("B").unwrap(), Some(Command::Outcome { symbol: Symbol::B }));
        assert_eq!(parse_command(" player ").unwrap(), Some(Command::Outcome { symbol: Symbol::P }));
        assert_eq!(parse_command("U").unwrap(), Some(Command::Undo));
        assert_eq!(parse_command("reset").unwrap(), Some(Command::Reset));
        assert_eq!(parse_command("s").unwrap(), Some(Command::Stats));
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("# comment").unwrap(), None);
    }

    #[test]
    fn test_parse_json() {
        assert_eq!(
            parse_command(r#"{"type":"Outcome","symbol":"P"}"#).unwrap(),
            Some(Command::Outcome { symbol: Symbol::P })
        );
        assert_eq!(parse_command(r#"{"type":"Undo"}"#).unwrap(), Some(Command::Undo));
        assert!(parse_command(r#"{"type":"Outcome","symbol":"T"}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_token() {
        assert!(matches!(parse_command("tie"), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_stats_reply_carries_panel() {
        let mut s = Session::default();
        let reply = apply_command(&mut s, Command::Stats);
        assert_eq!(reply.label, "WAIT");
        assert!(reply.stats.is_some());
    }

    #[test]
    fn test_replay_counts() {
        let input = "B\nB\nx\nB\nB\n# note\nU\nS\n";
        let mut s = Session::default();
        let summary = replay_reader(&mut s, Cursor::new(input)).unwrap();
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.applied, 6);
        // BBBB is the only PLAY among the four outcomes
        assert_eq!(summary.plays, 1);
        assert_eq!(summary.waits, 3);
        assert_eq!(s.outcomes().len(), 3);
        assert_eq!(summary.rejected_lines, vec![3]);
    }

    #[test]
    fn test_replay_reports_physical_line_numbers() {
        let input = "# header\n\n# more\nB\nbogus\n";
        let mut s = Session::default();
        let summary = replay_reader(&mut s, Cursor::new(input)).unwrap();
        assert_eq!(summary.applied, 1);
        assert_eq!(summary.rejected_lines, vec![5]);
    }
}
