//! In-memory sources and sink for exercising the iteration without a host.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{
    ContainerStatus, CpuStat, DiskStat, FilesystemUsage, MemoryMetrics, MetricBatch, NetDevStat,
};
use crate::error::{AgentError, ParseError};
use crate::ports::{ContainerSource, DatabaseSource, MetricSink, StatusSource, SystemSource};

use super::Sources;

fn unavailable(what: &str) -> AgentError {
    AgentError::Parse(ParseError::MissingField(what.to_string()))
}

#[derive(Default)]
pub struct FakeSystem {
    pub memory: Mutex<MemoryMetrics>,
    pub disks: Mutex<Vec<DiskStat>>,
    pub cpus: Mutex<Vec<CpuStat>>,
    /// `None` makes the uptime read fail
    pub uptime: Mutex<Option<String>>,
    pub interfaces: Mutex<Vec<NetDevStat>>,
    pub filesystems: Mutex<Vec<FilesystemUsage>>,
}

#[async_trait]
impl SystemSource for FakeSystem {
    async fn read_memory(&self) -> Result<MemoryMetrics, AgentError> {
        Ok(self.memory.lock().unwrap().clone())
    }

    async fn read_disk_stats(&self) -> Result<Vec<DiskStat>, AgentError> {
        Ok(self.disks.lock().unwrap().clone())
    }

    async fn read_cpu_stats(&self) -> Result<Vec<CpuStat>, AgentError> {
        Ok(self.cpus.lock().unwrap().clone())
    }

    async fn read_uptime(&self) -> Result<String, AgentError> {
        self.uptime.lock().unwrap().clone().ok_or_else(|| unavailable("uptime"))
    }

    async fn read_network_stats(&self) -> Result<Vec<NetDevStat>, AgentError> {
        Ok(self.interfaces.lock().unwrap().clone())
    }

    async fn list_filesystems(&self) -> Result<Vec<FilesystemUsage>, AgentError> {
        Ok(self.filesystems.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct FakeContainers(pub Vec<ContainerStatus>);

#[async_trait]
impl ContainerSource for FakeContainers {
    async fn list_running(&self) -> Result<Vec<ContainerStatus>, AgentError> {
        Ok(self.0.clone())
    }
}

/// Serves one fixed request count for every endpoint
#[derive(Default)]
pub struct FakeStatus(pub Mutex<u64>);

#[async_trait]
impl StatusSource for FakeStatus {
    async fn request_count(&self, _endpoint: &str) -> Result<u64, AgentError> {
        Ok(*self.0.lock().unwrap())
    }
}

#[derive(Default)]
pub struct FakeDatabase(pub Mutex<Vec<(String, String)>>);

#[async_trait]
impl DatabaseSource for FakeDatabase {
    async fn global_status(
        &self,
        _connection: &str,
        variables: &[String],
    ) -> Result<Vec<(String, String)>, AgentError> {
        let rows = self.0.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|(name, _)| variables.contains(name))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub batches: Mutex<Vec<MetricBatch>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn submitted(&self) -> Vec<MetricBatch> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricSink for RecordingSink {
    async fn submit(&self, batch: &MetricBatch) -> Result<(), AgentError> {
        self.batches.lock().unwrap().push(batch.clone());
        if self.fail {
            return Err(AgentError::Backend("collector unavailable".to_string()));
        }
        Ok(())
    }
}

/// Shared handles onto every fake, plus a controllable millisecond clock
#[derive(Default)]
pub struct Fixture {
    pub system: Arc<FakeSystem>,
    pub containers: Arc<FakeContainers>,
    pub status: Arc<FakeStatus>,
    pub database: Arc<FakeDatabase>,
    pub now_ms: Arc<AtomicI64>,
}

impl Fixture {
    pub fn with_containers(containers: Vec<ContainerStatus>) -> Self {
        Self {
            containers: Arc::new(FakeContainers(containers)),
            ..Default::default()
        }
    }

    pub fn sources(&self) -> Sources {
        Sources {
            system: self.system.clone(),
            containers: Some(self.containers.clone()),
            status: self.status.clone(),
            database: self.database.clone(),
        }
    }

    pub fn clock(&self) -> impl Fn() -> i64 + Send + Sync + 'static {
        let now_ms = self.now_ms.clone();
        move || now_ms.load(Ordering::SeqCst)
    }

    pub fn advance(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}
