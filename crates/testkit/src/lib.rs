#![warn(missing_docs)]
//! Headless test surfaces: a JSONL event stream and metrics reports.

mod metrics;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use terra2d_core::SimTick;

pub use metrics::*;

/// Primary event record captured by headless runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Short kind label, e.g. `break` or `landed`.
    pub kind: String,
    /// Free-form payload.
    pub payload: String,
}

impl EventRecord {
    /// Build a record from borrowed parts.
    pub fn new(tick: SimTick, kind: &str, payload: impl Into<String>) -> Self {
        Self {
            tick,
            kind: kind.to_string(),
            payload: payload.into(),
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    writer: BufWriter<File>,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Parse a JSONL event log back into records.
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<Vec<EventRecord>> {
    let contents = fs::read_to_string(path)?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<EventRecord>(line).map_err(Into::into))
        .collect()
}
