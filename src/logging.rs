//! Structured JSON-lines logging for the decision engine.
//!
//! Design goals:
//! 1. Level filtering via `LOG_LEVEL` (trace → fatal)
//! 2. Domain categories via `LOG_DOMAINS` (comma-separated or "all")
//! 3. Ordered records (`seq`) with millisecond timestamps for replay
//! 4. Optional file sink: `LOG_DIR/<run_id>/events.jsonl`
//!
//! Records always go to stderr so that binaries can keep stdout for
//! decision output.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::engine::Decision;
use crate::methods::Candidate;
use crate::tool_log::ToolLogEntry;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            Ok("fatal") => Level::Fatal,
            _ => Level::Warn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Engine,  // Phase, candidates, decisions
    Session, // Append, undo, reset
    Guard,   // Lockout trips
    Heatmap, // Resolution tallies
    System,  // Startup, summaries
    Audit,   // Fingerprints for replay
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Engine => "engine",
            Domain::Session => "session",
            Domain::Guard => "guard",
            Domain::Heatmap => "heatmap",
            Domain::System => "system",
            Domain::Audit => "audit",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    events: Option<Mutex<BufWriter<File>>>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let events = std::env::var("LOG_DIR").ok().and_then(|base| {
            let mut run_dir = PathBuf::from(base);
            run_dir.push(&run_id);
            if let Err(err) = create_dir_all(&run_dir) {
                eprintln!("[log] failed to create run dir: {}", err);
                return None;
            }
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(run_dir.join("events.jsonl"))
            {
                Ok(f) => Some(Mutex::new(BufWriter::new(f))),
                Err(err) => {
                    eprintln!("[log] failed to create events log: {}", err);
                    None
                }
            }
        });
        RunContext { run_id, events }
    })
}

pub fn run_id() -> &'static str {
    &ensure_run_context().run_id
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Epoch milliseconds
pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    emit_record(level, domain.as_str(), event, fields);
}

fn emit_record(level: Level, component: &str, event: &str, mut fields: Map<String, Value>) {
    let ctx = ensure_run_context();
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));

    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(ctx.run_id.clone()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));

    let line = Value::Object(entry).to_string();
    if let Some(writer) = &ctx.events {
        if let Ok(mut w) = writer.lock() {
            let _ = writeln!(w, "{}", line);
            let _ = w.flush();
        }
    }
    eprintln!("{}", line);
}

// =============================================================================
// Domain helpers
// =============================================================================

/// Log one evaluated decision with the candidates that competed for it.
pub fn log_decision(decision: &Decision, alternatives: &[(Candidate, f64)]) {
    let alts: Vec<Value> = alternatives
        .iter()
        .map(|(c, adjusted)| {
            json!({
                "method": c.method.as_str(),
                "prediction": c.prediction.as_str(),
                "confidence": c.confidence,
                "adjusted": adjusted,
            })
        })
        .collect();

    log(
        Level::Debug,
        Domain::Engine,
        "decision",
        obj(&[
            ("action", v_str(decision.action.as_str())),
            (
                "prediction",
                decision.prediction.map(|p| v_str(p.as_str())).unwrap_or(Value::Null),
            ),
            (
                "method",
                decision.method.map(|m| v_str(m.as_str())).unwrap_or(Value::Null),
            ),
            ("phase", v_str(decision.phase.as_str())),
            ("locked", Value::Bool(decision.locked)),
            ("alternatives", Value::Array(alts)),
        ]),
    );
}

pub fn log_resolution(entry: &ToolLogEntry) {
    log(
        Level::Debug,
        Domain::Heatmap,
        "resolution",
        obj(&[
            ("result", v_str(entry.result.as_str())),
            ("method", v_str(entry.method.as_str())),
            ("phase", v_str(entry.phase.as_str())),
            ("outcome_index", json!(entry.outcome_index)),
        ]),
    );
}

pub fn log_lockout(sample: usize, wins: usize, threshold: f64) {
    let rate = if sample > 0 { wins as f64 / sample as f64 } else { 0.0 };
    log(
        Level::Info,
        Domain::Guard,
        "lockout",
        obj(&[
            ("sample", json!(sample)),
            ("wins", json!(wins)),
            ("win_rate", v_num(rate)),
            ("threshold", v_num(threshold)),
        ]),
    );
}

pub fn log_session_event(event: &str, outcomes: usize, resolved: usize) {
    log(
        Level::Debug,
        Domain::Session,
        event,
        obj(&[
            ("outcomes", json!(outcomes)),
            ("resolved", json!(resolved)),
        ]),
    );
}

pub fn log_audit(event: &str, fingerprint: &str) {
    log(
        Level::Info,
        Domain::Audit,
        event,
        obj(&[("fingerprint", v_str(fingerprint))]),
    );
}

pub fn log_invariant(detail: &str) {
    log(
        Level::Error,
        Domain::Session,
        "invariant_violation",
        obj(&[("msg", v_str(detail))]),
    );
}

// =============================================================================
// Field helpers
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
