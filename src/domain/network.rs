use serde::{Deserialize, Serialize};

use super::rate::per_second;

/// Byte counters for one network interface
#[derive(Debug, Clone, PartialEq)]
pub struct NetDevStat {
    pub device: String,
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

impl NetDevStat {
    pub fn new(device: impl Into<String>, bytes_received: u64, bytes_sent: u64) -> Self {
        Self {
            device: device.into(),
            bytes_received,
            bytes_sent,
        }
    }

    pub fn rates_since(&self, previous: &NetDevStat, secs: i64) -> NetworkRates {
        NetworkRates {
            device: self.device.clone(),
            bytes_sent: per_second(previous.bytes_sent, self.bytes_sent, secs),
            bytes_received: per_second(previous.bytes_received, self.bytes_received, secs),
        }
    }
}

/// Bytes per second through a network interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRates {
    pub device: String,
    pub bytes_sent: i64,
    pub bytes_received: i64,
}
