use async_trait::async_trait;

use crate::error::AgentError;

/// Port for reading server status counters from a database
#[async_trait]
pub trait DatabaseSource: Send + Sync {
    /// `(variable, value)` rows for the requested global status variables
    async fn global_status(
        &self,
        connection: &str,
        variables: &[String],
    ) -> Result<Vec<(String, String)>, AgentError>;
}
