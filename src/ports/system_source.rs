use async_trait::async_trait;

use crate::domain::{CpuStat, DiskStat, FilesystemUsage, MemoryMetrics, NetDevStat};
use crate::error::AgentError;

/// Port for reading host-level counters
#[async_trait]
pub trait SystemSource: Send + Sync {
    /// Current memory snapshot
    async fn read_memory(&self) -> Result<MemoryMetrics, AgentError>;

    /// Sector counters for every block device
    async fn read_disk_stats(&self) -> Result<Vec<DiskStat>, AgentError>;

    /// Tick counters for the aggregate `cpu` line and every core
    async fn read_cpu_stats(&self) -> Result<Vec<CpuStat>, AgentError>;

    /// Seconds since boot, verbatim
    async fn read_uptime(&self) -> Result<String, AgentError>;

    /// Byte counters for every network interface
    async fn read_network_stats(&self) -> Result<Vec<NetDevStat>, AgentError>;

    /// Usage of every real mounted filesystem
    async fn list_filesystems(&self) -> Result<Vec<FilesystemUsage>, AgentError>;
}
