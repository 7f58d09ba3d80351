#[cfg(feature = "network")]
pub mod http;
pub mod local;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::session::result::AttemptReport;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("result sink unavailable: {0}")]
    Unavailable(String),
    #[error("result rejected: {0}")]
    Rejected(String),
    #[error("progress store failed: {0}")]
    Store(String),
}

/// Records attempt outcomes. Implementations may block; callers go through
/// `dispatch` so the game loop never waits on them.
pub trait ResultSink: Send + Sync {
    fn report(&self, report: &AttemptReport) -> Result<(), SinkError>;

    fn name(&self) -> &'static str;
}

/// Report on a detached thread. Failures are logged and never retried.
pub fn dispatch(sink: &Arc<dyn ResultSink>, report: AttemptReport) -> Option<JoinHandle<()>> {
    let sink = Arc::clone(sink);
    let spawned = thread::Builder::new()
        .name("result-sink".to_string())
        .spawn(move || match sink.report(&report) {
            Ok(()) => tracing::debug!(
                sink = sink.name(),
                word_id = %report.word_id,
                success = report.success,
                "result reported"
            ),
            Err(err) => tracing::warn!(
                sink = sink.name(),
                word_id = %report.word_id,
                %err,
                "result upload failed"
            ),
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::warn!(%err, "could not spawn result reporter");
            None
        }
    }
}

/// Sink that only writes to the log.
pub struct NullSink;

impl ResultSink for NullSink {
    fn report(&self, report: &AttemptReport) -> Result<(), SinkError> {
        tracing::info!(word_id = %report.word_id, success = report.success, "attempt");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
