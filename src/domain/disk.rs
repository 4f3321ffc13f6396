use serde::{Deserialize, Serialize};

/// Bytes per sector as the kernel counts them in diskstats, independent of
/// the device's physical sector size
pub const SECTOR_SIZE: i64 = 512;

/// Sector counters for one block device
#[derive(Debug, Clone, PartialEq)]
pub struct DiskStat {
    pub device: String,
    pub sectors_read: u64,
    pub sectors_written: u64,
}

impl DiskStat {
    pub fn new(device: impl Into<String>, sectors_read: u64, sectors_written: u64) -> Self {
        Self {
            device: device.into(),
            sectors_read,
            sectors_written,
        }
    }

    /// Loop devices back file images and are never reported
    pub fn is_loop(&self) -> bool {
        self.device.starts_with("loop")
    }

    pub fn rates_since(&self, previous: &DiskStat, secs: i64) -> IoRates {
        let bytes = |previous: u64, current: u64| (current as i64 - previous as i64) * SECTOR_SIZE;

        IoRates {
            device: self.device.clone(),
            read: bytes(previous.sectors_read, self.sectors_read) / secs,
            write: bytes(previous.sectors_written, self.sectors_written) / secs,
        }
    }
}

/// Bytes per second read from and written to a block device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoRates {
    pub device: String,
    pub read: i64,
    pub write: i64,
}

/// Capacity of one mounted filesystem, in 1K blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesystemUsage {
    pub filesystem: String,
    pub total: u64,
    pub used: u64,
}

impl FilesystemUsage {
    pub fn new(filesystem: impl Into<String>, total: u64, used: u64) -> Self {
        Self {
            filesystem: filesystem.into(),
            total,
            used,
        }
    }
}
