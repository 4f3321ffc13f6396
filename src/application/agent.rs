use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::domain::{MetricBatch, MetricRecord, MonitorTarget};
use crate::ports::MetricSink;

use super::CollectorDispatch;

/// What a single iteration ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// No targets configured, nothing was sent
    NothingToTrack,
    Sent { records: usize },
    /// The batch was built but the transport rejected it; it is dropped
    Failed,
}

/// Owns the targets, the per-kind state and the transport
pub struct Agent {
    targets: Vec<MonitorTarget>,
    dispatch: CollectorDispatch,
    sink: Arc<dyn MetricSink>,
}

impl Agent {
    pub fn new(
        targets: Vec<MonitorTarget>,
        dispatch: CollectorDispatch,
        sink: Arc<dyn MetricSink>,
    ) -> Self {
        Self {
            targets,
            dispatch,
            sink,
        }
    }

    pub fn targets(&self) -> &[MonitorTarget] {
        &self.targets
    }

    /// One full pass over every target in configured order
    pub async fn run_iteration(&mut self) -> IterationOutcome {
        if self.targets.is_empty() {
            info!("Nothing to track, no monitor targets configured");
            return IterationOutcome::NothingToTrack;
        }

        let mut batch = MetricBatch::new();
        for target in &self.targets {
            if let Some(body) = self.dispatch.collect(target).await {
                batch.push(MetricRecord::new(target, body, Utc::now()));
            }
        }

        if batch.is_empty() {
            debug!("No target produced a record this iteration");
        }

        let records = batch.len();
        match self.sink.submit(&batch).await {
            Ok(()) => {
                debug!(records, "Metrics submitted");
                IterationOutcome::Sent { records }
            }
            Err(e) => {
                error!(records, error = %e, "Failed to submit metrics, dropping batch");
                IterationOutcome::Failed
            }
        }
    }
}
