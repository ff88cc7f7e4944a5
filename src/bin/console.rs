use std::io::{self, BufRead, Write};

use anyhow::Result;

use bpsignal::command::{apply_command, parse_command};
use bpsignal::logging::{log_audit, run_id};
use bpsignal::Session;

fn main() -> Result<()> {
    let mut session = Session::from_env();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{}", err);
                continue;
            }
        };
        let reply = apply_command(&mut session, cmd);
        writeln!(out, "{}", serde_json::to_string(&reply)?)?;
        out.flush()?;
    }

    log_audit("console_exit", &session.fingerprint());
    eprintln!("run_id={} outcomes={}", run_id(), session.outcomes().len());
    Ok(())
}
