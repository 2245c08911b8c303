//! JSONL replay log
//!
//! One line per inbound request (verbatim) and one per outbound reply, in
//! wire order. Replaying the inbound lines against the same seed reproduces
//! the outbound lines exactly.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

pub struct ReplayLog {
    writer: Option<BufWriter<File>>,
    buf: Vec<u8>,
}

impl ReplayLog {
    /// Open `path` for appending
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            buf: Vec::with_capacity(4096),
        })
    }

    /// False once a write has failed; the log then drops every record
    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }

    /// Record an inbound line as received
    pub fn record_inbound(&mut self, line: &str) {
        self.buf.clear();
        self.buf.extend_from_slice(line.trim_end().as_bytes());
        self.flush_line();
    }

    /// Record an outbound message
    pub fn record<T: Serialize>(&mut self, msg: &T) {
        self.buf.clear();
        if let Err(e) = serde_json::to_writer(&mut self.buf, msg) {
            eprintln!("[match3] replay log: cannot encode record: {}", e);
            return;
        }
        self.flush_line();
    }

    fn flush_line(&mut self) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let result = writer
            .write_all(&self.buf)
            .and_then(|_| writer.write_all(b"\n"))
            .and_then(|_| writer.flush());
        if let Err(e) = result {
            eprintln!("[match3] replay log disabled: {}", e);
            self.writer = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::create_ack;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("match3-{}-{}.jsonl", name, std::process::id()))
    }

    #[test]
    fn test_records_one_line_each() {
        let path = temp_path("replay");
        let _ = std::fs::remove_file(&path);

        {
            let mut log = ReplayLog::open(&path).unwrap();
            log.record_inbound("{\"type\":\"clear\",\"seq\":1}\n");
            log.record(&create_ack(1, 0));
            assert!(log.is_active());
        }

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"type":"clear","seq":1}"#);
        assert_eq!(lines[1], r#"{"type":"ack","seq":1,"cleared":0}"#);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("match3-no-such-dir")
            .join("log.jsonl");
        assert!(ReplayLog::open(path).is_err());
    }
}
