use chrono::Utc;

use crate::session::result::AttemptReport;
use crate::sink::{ResultSink, SinkError};
use crate::store::SharedProgress;

/// Feeds outcomes into the local progress book, which schedules the next
/// review and persists it.
pub struct LocalResultSink {
    progress: SharedProgress,
}

impl LocalResultSink {
    pub fn new(progress: SharedProgress) -> Self {
        Self { progress }
    }
}

impl ResultSink for LocalResultSink {
    fn report(&self, report: &AttemptReport) -> Result<(), SinkError> {
        let mut book = self
            .progress
            .lock()
            .map_err(|_| SinkError::Store("progress lock poisoned".to_string()))?;
        book.record(report.word_id, report.success, Utc::now())
            .map_err(|err| SinkError::Store(err.to_string()))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
