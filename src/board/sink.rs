use anyhow::Result;
use crate::models::ActivityEntry;

/// Receiver for stage-change audit entries.
///
/// The board does not wait on or roll back for the sink: a failed `record`
/// is logged and the stage change stands.
pub trait ActivitySink {
    fn record(&mut self, entry: &ActivityEntry) -> Result<()>;
}

/// Sink that keeps entries in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub entries: Vec<ActivityEntry>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivitySink for MemorySink {
    fn record(&mut self, entry: &ActivityEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

/// Sink that drops everything
#[derive(Debug, Default)]
pub struct NullSink;

impl ActivitySink for NullSink {
    fn record(&mut self, _entry: &ActivityEntry) -> Result<()> {
        Ok(())
    }
}
