//! Newline-delimited JSON transcripts of command runs.

use anyhow::Result;
use chrono::{DateTime, Utc};
use commandbox_core::SimTick;
use commandbox_proxy::ExecOutcome;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// One executed command as captured by headless runs.
#[derive(Debug, Serialize)]
pub struct TranscriptRecord<'a> {
    /// Simulation tick the command ran on.
    pub tick: SimTick,
    /// Wall-clock capture time.
    pub recorded_at: DateTime<Utc>,
    /// Computer that ran the command.
    pub computer: u32,
    /// Command text.
    pub command: &'a str,
    /// Outcome of the run.
    pub outcome: &'a ExecOutcome,
}

impl<'a> TranscriptRecord<'a> {
    /// Stamp a record with the current time.
    pub fn now(tick: SimTick, computer: u32, command: &'a str, outcome: &'a ExecOutcome) -> Self {
        Self {
            tick,
            recorded_at: Utc::now(),
            computer,
            command,
            outcome,
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append a record to the log.
    pub fn write(&mut self, record: &TranscriptRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}
