//! Soak run over a synthetic outcome stream.
//!
//! `SEED`, `ROUNDS`, `BANKER_BIAS` (probability of B for a fresh draw),
//! `STICKINESS` (probability of repeating the previous outcome) and `CHOP`
//! (probability of flipping it) shape the stream. Prints one JSON summary
//! line.

use std::env;

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;

use bpsignal::logging::{log, obj, v_num, Domain, Level};
use bpsignal::stats::SessionStats;
use bpsignal::{Action, Session, Symbol};

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn main() -> Result<()> {
    let seed: u64 = env_or("SEED", 42);
    let rounds: usize = env_or("ROUNDS", 500);
    let bias: f64 = env_or("BANKER_BIAS", 0.5068);
    let stickiness: f64 = env_or("STICKINESS", 0.0);
    let chop: f64 = env_or("CHOP", 0.0);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = Session::from_env();
    let mut prev: Option<Symbol> = None;
    let (mut plays, mut waits, mut locked) = (0usize, 0usize, 0usize);

    for _ in 0..rounds {
        let roll: f64 = rng.gen();
        let next = match prev {
            Some(p) if roll < stickiness => p,
            Some(p) if roll < stickiness + chop => p.opposite(),
            _ if rng.gen_bool(bias.clamp(0.0, 1.0)) => Symbol::B,
            _ => Symbol::P,
        };
        let decision = session.report_outcome(next);
        match decision.action {
            Action::Play => plays += 1,
            Action::Wait => waits += 1,
        }
        if decision.locked {
            locked += 1;
        }
        prev = Some(next);
    }

    let stats = SessionStats::from_session(&session);
    let cells: Vec<_> = session
        .heatmap()
        .iter()
        .map(|(phase, method, cell)| {
            json!({
                "phase": phase.as_str(),
                "method": method.as_str(),
                "wins": cell.wins,
                "losses": cell.losses,
            })
        })
        .collect();

    log(
        Level::Info,
        Domain::System,
        "simulate_done",
        obj(&[
            ("rounds", json!(rounds)),
            ("tool_pct", v_num(stats.tool_pct as f64)),
        ]),
    );

    println!(
        "{}",
        json!({
            "seed": seed,
            "rounds": rounds,
            "plays": plays,
            "waits": waits,
            "locked": locked,
            "resolved": stats.resolved,
            "tool_pct": stats.tool_pct,
            "tool_band": stats.tool_band,
            "heatmap": cells,
            "fingerprint": session.fingerprint(),
        })
    );
    Ok(())
}
