use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{CpuStat, DiskStat, FilesystemUsage, MemoryMetrics, NetDevStat};
use crate::error::AgentError;
use crate::ports::SystemSource;

use super::parser;
use super::ProcfsConfig;

/// Filesystem types never reported by the diskUsage collector
const SKIP_FS: [&str; 4] = ["squashfs", "devtmpfs", "tmpfs", "fuse"];

/// System source implementation using procfs
pub struct ProcfsSystemSource {
    config: ProcfsConfig,
}

impl ProcfsSystemSource {
    pub fn new(config: ProcfsConfig) -> Self {
        Self { config }
    }

    async fn read_proc(&self, relative: &str) -> Result<String, AgentError> {
        let path = self.config.proc_path.join(relative);
        Ok(tokio::fs::read_to_string(&path).await?)
    }

    fn filesystem_usage(mounts: Vec<parser::MountInfo>) -> Vec<FilesystemUsage> {
        let mut seen = HashSet::new();
        let mut filesystems = Vec::new();

        for mount in mounts {
            if SKIP_FS.contains(&mount.filesystem.as_str()) || seen.contains(&mount.device) {
                continue;
            }

            let stat = match nix::sys::statvfs::statvfs(mount.mount_point.as_str()) {
                Ok(stat) => stat,
                Err(e) => {
                    debug!(mount = %mount.mount_point, error = %e, "statvfs failed, skipping mount");
                    continue;
                }
            };

            // Pseudo filesystems (proc, sysfs, cgroup...) report no blocks
            let blocks = stat.blocks() as u64;
            if blocks == 0 {
                continue;
            }

            let fragment_size = stat.fragment_size() as u64;
            let total_kb = blocks * fragment_size / 1024;
            let used_kb = blocks.saturating_sub(stat.blocks_free() as u64) * fragment_size / 1024;

            seen.insert(mount.device.clone());
            filesystems.push(FilesystemUsage::new(mount.device, total_kb, used_kb));
        }

        filesystems
    }
}

#[async_trait]
impl SystemSource for ProcfsSystemSource {
    async fn read_memory(&self) -> Result<MemoryMetrics, AgentError> {
        let content = self.read_proc("meminfo").await?;
        Ok(parser::parse_meminfo(&content)?)
    }

    async fn read_disk_stats(&self) -> Result<Vec<DiskStat>, AgentError> {
        let content = self.read_proc("diskstats").await?;
        Ok(parser::parse_diskstats(&content)?)
    }

    async fn read_cpu_stats(&self) -> Result<Vec<CpuStat>, AgentError> {
        let content = self.read_proc("stat").await?;
        Ok(parser::parse_cpu_stats(&content)?)
    }

    async fn read_uptime(&self) -> Result<String, AgentError> {
        let content = self.read_proc("uptime").await?;
        Ok(parser::parse_uptime(&content)?)
    }

    async fn read_network_stats(&self) -> Result<Vec<NetDevStat>, AgentError> {
        let content = self.read_proc("net/dev").await?;
        Ok(parser::parse_net_dev(&content)?)
    }

    async fn list_filesystems(&self) -> Result<Vec<FilesystemUsage>, AgentError> {
        let content = self.read_proc("mounts").await?;
        let mounts = parser::parse_mounts(&content)?;

        // statvfs blocks, so keep it off the runtime's worker threads
        let filesystems = tokio::task::spawn_blocking(move || Self::filesystem_usage(mounts))
            .await
            .map_err(|e| AgentError::Io(std::io::Error::other(e)))?;

        Ok(filesystems)
    }
}
