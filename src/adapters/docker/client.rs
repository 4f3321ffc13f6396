use async_trait::async_trait;
use bollard::container::ListContainersOptions;
use bollard::models::ContainerSummary;
use bollard::Docker;

use crate::domain::ContainerStatus;
use crate::error::AgentError;
use crate::ports::ContainerSource;

/// Docker adapter using bollard client
pub struct DockerAdapter {
    client: Docker,
}

impl DockerAdapter {
    /// Connect lazily; the daemon is first contacted on the first listing
    pub fn new() -> Result<Self, AgentError> {
        let client = Docker::connect_with_local_defaults()?;
        Ok(Self { client })
    }

    pub fn with_socket(socket_path: &str) -> Result<Self, AgentError> {
        let client = Docker::connect_with_socket(socket_path, 120, bollard::API_DEFAULT_VERSION)?;
        Ok(Self { client })
    }

    fn parse_container_name(names: &Option<Vec<String>>) -> String {
        names
            .as_ref()
            .and_then(|n| n.first())
            .map(|s| s.trim_start_matches('/').to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// `containerName` carries the image reference, e.g. "nginx:1.25";
    /// the container's own name is only a fallback
    fn to_status(summary: ContainerSummary) -> ContainerStatus {
        let name = summary
            .image
            .filter(|image| !image.is_empty())
            .unwrap_or_else(|| Self::parse_container_name(&summary.names));
        // `status` is the human-readable text, e.g. "Up 3 hours (healthy)"
        let status = summary
            .status
            .or(summary.state)
            .unwrap_or_else(|| "unknown".to_string());

        ContainerStatus::new(name, status)
    }
}

#[async_trait]
impl ContainerSource for DockerAdapter {
    async fn list_running(&self) -> Result<Vec<ContainerStatus>, AgentError> {
        let options = Some(ListContainersOptions::<String> {
            all: false,
            ..Default::default()
        });

        let summaries = self.client.list_containers(options).await?;

        Ok(summaries.into_iter().map(Self::to_status).collect())
    }
}
