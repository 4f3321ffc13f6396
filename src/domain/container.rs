use serde::{Deserialize, Serialize};

/// A running container and its human-readable status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStatus {
    pub container_name: String,
    pub status: String,
}

impl ContainerStatus {
    pub fn new(container_name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            container_name: container_name.into(),
            status: status.into(),
        }
    }
}
