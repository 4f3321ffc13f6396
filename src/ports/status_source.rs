use async_trait::async_trait;

use crate::error::AgentError;

/// Port for scraping a web server's status page
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Total handled requests reported by the page at `endpoint`
    async fn request_count(&self, endpoint: &str) -> Result<u64, AgentError>;
}
