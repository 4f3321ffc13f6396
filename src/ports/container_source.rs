use async_trait::async_trait;

use crate::domain::ContainerStatus;
use crate::error::AgentError;

/// Port for listing containers
#[async_trait]
pub trait ContainerSource: Send + Sync {
    /// Containers that are currently running
    async fn list_running(&self) -> Result<Vec<ContainerStatus>, AgentError>;
}
