use std::io::Write;

use thiserror::Error;

use crate::combat::BattleSummary;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to write battle summary: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize battle summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable sink for one summary per resolved match. The bracket logs a
/// failed submission and keeps going.
pub trait MatchRecorder {
    fn submit(&mut self, summary: &BattleSummary) -> Result<(), RecordError>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl MatchRecorder for NullRecorder {
    fn submit(&mut self, _summary: &BattleSummary) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Keeps every summary in memory, in submission order.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecorder {
    pub summaries: Vec<BattleSummary>,
}

impl MatchRecorder for MemoryRecorder {
    fn submit(&mut self, summary: &BattleSummary) -> Result<(), RecordError> {
        self.summaries.push(summary.clone());
        Ok(())
    }
}

/// One JSON document per line, flushed after each summary.
pub struct JsonLinesRecorder<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> JsonLinesRecorder<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MatchRecorder for JsonLinesRecorder<W> {
    fn submit(&mut self, summary: &BattleSummary) -> Result<(), RecordError> {
        serde_json::to_writer(&mut self.out, summary)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.written += 1;
        Ok(())
    }
}
