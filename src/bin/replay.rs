use std::env;
use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};

use bpsignal::command::replay_reader;
use bpsignal::logging::log_audit;
use bpsignal::stats::SessionStats;
use bpsignal::Session;

fn main() -> Result<()> {
    let mut session = Session::from_env();

    let summary = match env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("cannot open {}", path))?;
            replay_reader(&mut session, BufReader::new(file))?
        }
        None => replay_reader(&mut session, io::stdin().lock())?,
    };

    let fingerprint = session.fingerprint();
    log_audit("replay_done", &fingerprint);
    let stats = SessionStats::from_session(&session);
    println!(
        "applied={} rejected={} plays={} waits={} locked={} tool_pct={} fingerprint={}",
        summary.applied,
        summary.rejected,
        summary.plays,
        summary.waits,
        summary.locked,
        stats.tool_pct,
        fingerprint
    );
    Ok(())
}
