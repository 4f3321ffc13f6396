use async_trait::async_trait;

use crate::domain::MetricBatch;
use crate::error::AgentError;

/// Port for delivering a batch to the remote collector
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn submit(&self, batch: &MetricBatch) -> Result<(), AgentError>;
}
