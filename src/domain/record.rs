use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::{
    ContainerStatus, CpuRates, FilesystemUsage, IoRates, MemoryMetrics, MonitorTarget,
    NetworkRates,
};

/// Kind-specific content of a metric record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricBody {
    Memory(MemoryMetrics),
    Io { devices: Vec<IoRates> },
    DiskUsage { filesystems: Vec<FilesystemUsage> },
    Cpu { cpus: Vec<CpuRates> },
    Uptime { uptime: String },
    Network { devices: Vec<NetworkRates> },
    Docker { containers: Vec<ContainerStatus> },
    Nginx {
        #[serde(skip_serializing_if = "Option::is_none")]
        requests: Option<f64>,
    },
    Mysql(BTreeMap<String, f64>),
}

/// One entry of a metric batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub tag: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub body: MetricBody,
}

impl MetricRecord {
    /// Wrap a collector result with the target's metadata
    pub fn new(target: &MonitorTarget, body: MetricBody, at: DateTime<Utc>) -> Self {
        Self {
            kind: target.kind.name().to_string(),
            tag: target.tag().to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            body,
        }
    }
}

/// Everything one iteration produced; the transport payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricBatch {
    pub metrics: Vec<MetricRecord>,
}

impl MetricBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MetricRecord) {
        self.metrics.push(record);
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
