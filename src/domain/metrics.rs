use serde::{Deserialize, Serialize};

use super::rate::per_second;

/// Memory counters for the host, in kB exactly as the kernel reports them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_free: Option<u64>,
}

impl MemoryMetrics {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Tick counters for one `cpu*` line of the kernel stat file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuStat {
    pub label: String,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuStat {
    /// Rate every tick counter independently against `previous`
    pub fn rates_since(&self, previous: &CpuStat, secs: i64) -> CpuRates {
        CpuRates {
            cpu: self.label.clone(),
            user: per_second(previous.user, self.user, secs),
            nice: per_second(previous.nice, self.nice, secs),
            system: per_second(previous.system, self.system, secs),
            idle: per_second(previous.idle, self.idle, secs),
            iowait: per_second(previous.iowait, self.iowait, secs),
            irq: per_second(previous.irq, self.irq, secs),
            softirq: per_second(previous.softirq, self.softirq, secs),
            steal: per_second(previous.steal, self.steal, secs),
            guest: per_second(previous.guest, self.guest, secs),
            guest_nice: per_second(previous.guest_nice, self.guest_nice, secs),
        }
    }
}

/// Ticks per second spent in each CPU state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuRates {
    pub cpu: String,
    pub user: i64,
    pub nice: i64,
    pub system: i64,
    pub idle: i64,
    pub iowait: i64,
    pub irq: i64,
    pub softirq: i64,
    pub steal: i64,
    pub guest: i64,
    pub guest_nice: i64,
}
