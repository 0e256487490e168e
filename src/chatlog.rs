//! JSON Lines chat logs.
//!
//! One record per line: `{"msg": "...", "is_delete": false, "ts": "2024-05-01T12:00:00Z"}`.
//! A batch render reads a log into a [`Schedule`]; a live session can write one with [`LogWriter`].

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::foundation::error::{DanmakuError, DanmakuResult};

/// One chat log record.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Message text.
    pub msg: String,
    /// The message was moderated away and must not be shown.
    #[serde(default)]
    pub is_delete: bool,
    /// Arrival time.
    pub ts: DateTime<Utc>,
}

impl LogEntry {
    /// A visible message stamped with the current time.
    pub fn now(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            is_delete: false,
            ts: Utc::now(),
        }
    }
}

/// Parse a JSON Lines log. Blank lines are skipped; errors carry the 1-based line number.
pub fn parse_log(reader: impl BufRead) -> DanmakuResult<Vec<LogEntry>> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line
            .map_err(|e| DanmakuError::serde(format!("line {line_no}: read failed: {e}")))?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: LogEntry = serde_json::from_str(&line)
            .map_err(|e| DanmakuError::serde(format!("line {line_no}: {e}")))?;
        out.push(entry);
    }
    Ok(out)
}

/// Read and parse the log at `path`.
pub fn read_log(path: &Path) -> DanmakuResult<Vec<LogEntry>> {
    let file = File::open(path).map_err(|e| {
        DanmakuError::validation(format!("failed to open log '{}': {e}", path.display()))
    })?;
    parse_log(BufReader::new(file))
}

/// A message due at `offset` seconds after the start of a render.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledMessage {
    /// Seconds after the earliest kept record.
    pub offset: f64,
    /// Message text.
    pub text: String,
}

/// Log records in display order with offsets relative to the earliest kept record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schedule {
    messages: Vec<ScheduledMessage>,
}

impl Schedule {
    /// Drop deleted records, stable-sort by timestamp and compute offsets.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        let mut kept: Vec<LogEntry> = entries.into_iter().filter(|e| !e.is_delete).collect();
        kept.sort_by_key(|e| e.ts);

        let Some(start) = kept.first().map(|e| e.ts) else {
            return Self::default();
        };
        let messages = kept
            .into_iter()
            .map(|e| ScheduledMessage {
                offset: (e.ts - start).to_std().map_or(0.0, |d| d.as_secs_f64()),
                text: e.msg,
            })
            .collect();
        Self { messages }
    }

    /// Read a log file straight into a schedule.
    pub fn from_path(path: &Path) -> DanmakuResult<Self> {
        let entries = read_log(path)?;
        let total = entries.len();
        let schedule = Self::from_entries(entries);
        tracing::debug!(
            path = %path.display(),
            records = total,
            kept = schedule.len(),
            "log loaded"
        );
        Ok(schedule)
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[ScheduledMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// `true` when there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Offset of the last message.
    pub fn span_secs(&self) -> f64 {
        self.messages.last().map_or(0.0, |m| m.offset)
    }
}

/// Appends records to a JSON Lines log, flushing after every record.
pub struct LogWriter {
    out: BufWriter<File>,
}

impl LogWriter {
    /// Open `path` for appending, creating it when missing.
    pub fn append(path: &Path) -> DanmakuResult<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                DanmakuError::validation(format!("failed to open log '{}': {e}", path.display()))
            })?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    /// Write one record.
    pub fn write(&mut self, entry: &LogEntry) -> DanmakuResult<()> {
        use anyhow::Context as _;
        let line = serde_json::to_string(entry)
            .map_err(|e| DanmakuError::serde(format!("failed to serialize log record: {e}")))?;
        self.out
            .write_all(line.as_bytes())
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush())
            .context("failed to write log record")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/chatlog.rs"]
mod tests;
