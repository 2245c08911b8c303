//! Line-protocol driver (default binary).
//!
//! Reads one JSON request per line from stdin and writes one JSON reply per
//! line to stdout. Diagnostics go to stderr.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use match3::adapter::{Session, SessionConfig};

fn main() -> Result<()> {
    let config = SessionConfig::from_env();
    let mut session = Session::new(config).context("failed to start session")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = session.handle_line(&line)?;
        writeln!(out, "{}", reply).context("failed to write reply")?;
        out.flush().context("failed to flush reply")?;
    }

    Ok(())
}
