//! Structured engine events and an append-only NDJSON sink.
//!
//! When `EngineConfig::record_events` is set the engine buffers one
//! [`EngineEvent`] per notable transition. Callers drain the buffer with
//! `RollAndRake::take_events` and may persist it with [`NdjsonWriter`], which
//! writes exactly one JSON object per line.
//!
//! ```
//! use roll_and_rake::events::{EngineEvent, NdjsonWriter};
//!
//! let mut writer = NdjsonWriter::new(Vec::new());
//! writer.write_event(&EngineEvent::EpisodeFinished { turns: 9, score: 41 }).unwrap();
//! let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(text, "{\"event\":\"episode_finished\",\"turns\":9,\"score\":41}\n");
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Phase, Variant};
use crate::rules::Action;

/// One engine transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    EpisodeStarted {
        seed: u64,
        variant: Variant,
    },
    ActionApplied {
        turn: u32,
        action_id: usize,
        action: Action,
        reward: i32,
    },
    IllegalAction {
        turn: u32,
        action_id: usize,
        phase: Phase,
    },
    TurnEnded {
        turn: u32,
        pace: u32,
        pace_die_value: u8,
        score: i32,
    },
    EpisodeFinished {
        turns: u32,
        score: i32,
    },
}

/// Errors writing an event log.
#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("event log io error: {0}")]
    Io(#[from] io::Error),
    #[error("event encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only NDJSON writer.
#[derive(Debug)]
pub struct NdjsonWriter<W: Write> {
    writer: W,
    lines_written: u64,
}

impl NdjsonWriter<BufWriter<File>> {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, EventLogError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> NdjsonWriter<W> {
    /// Wrap any writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    /// Write one serializable record followed by a newline.
    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), EventLogError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.lines_written += 1;
        Ok(())
    }

    /// Write a batch of records.
    pub fn write_all<'a, T, I>(&mut self, events: I) -> Result<(), EventLogError>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for event in events {
            self.write_event(event)?;
        }
        Ok(())
    }

    /// Lines written through this writer.
    #[must_use]
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn flush(&mut self) -> Result<(), EventLogError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W, EventLogError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DiceMask;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_tagging() {
        let event = EngineEvent::ActionApplied {
            turn: 2,
            action_id: 69,
            action: Action::TakeCombination(DiceMask::new(7).unwrap()),
            reward: 0,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "action_applied");
        assert_eq!(value["action_id"], 69);

        let back: EngineEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_writes_one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        let events = vec![
            EngineEvent::EpisodeStarted {
                seed: 10,
                variant: Variant::Phased,
            },
            EngineEvent::TurnEnded {
                turn: 1,
                pace: 36,
                pace_die_value: 4,
                score: 0,
            },
        ];

        let mut writer = NdjsonWriter::open_append(&path).unwrap();
        writer.write_all(&events).unwrap();
        assert_eq!(writer.lines_written(), 2);
        writer.flush().unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "episode_started");
        assert_eq!(lines[1]["pace"], 36);
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let finished = EngineEvent::EpisodeFinished { turns: 8, score: 30 };

        for _ in 0..2 {
            let mut writer = NdjsonWriter::open_append(&path).unwrap();
            writer.write_event(&finished).unwrap();
            writer.flush().unwrap();
        }

        assert_eq!(read_lines(&path).len(), 2);
    }
}
