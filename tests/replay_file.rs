//! Replaying command files through the shared line grammar.

use std::fs::File;
use std::io::{BufReader, Write};

use bpsignal::command::replay_reader;
use bpsignal::stats::{SessionStats, ToolBand};
use bpsignal::{Action, Session};

fn write_commands(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn replay_mixed_grammar() {
    let file = write_commands(&[
        "# warmup",
        "B",
        "banker",
        r#"{"type":"Outcome","symbol":"B"}"#,
        "b",
        "B",
        "tie",
        "S",
    ]);
    let mut session = Session::default();
    let summary = replay_reader(&mut session, BufReader::new(File::open(file.path()).unwrap())).unwrap();

    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.applied, 6);
    assert_eq!(session.outcomes().len(), 5);
    // BBBB played B, fifth B won it
    assert_eq!(session.tool_log().len(), 1);
    let stats = SessionStats::from_session(&session);
    assert_eq!(stats.banker_pct, 100);
    assert_eq!(stats.tool_pct, 100);
    assert_eq!(stats.tool_band, ToolBand::Good);
    assert_eq!(session.current_decision().action, Action::Play);
}

#[test]
fn identical_files_replay_to_identical_fingerprints() {
    let lines = ["B", "P", "B", "P", "B", "P", "B", "P", "B", "U", "P", "P", "P", "R", "P"];
    let a = write_commands(&lines);
    let b = write_commands(&lines);

    let mut first = Session::default();
    let mut second = Session::default();
    replay_reader(&mut first, BufReader::new(File::open(a.path()).unwrap())).unwrap();
    replay_reader(&mut second, BufReader::new(File::open(b.path()).unwrap())).unwrap();

    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.outcomes().len(), 1);
    assert!(first.heatmap().iter().all(|(_, _, c)| c.total() == 0));
}
