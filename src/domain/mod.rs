pub mod container;
pub mod disk;
pub mod metrics;
pub mod network;
pub mod rate;
pub mod record;
pub mod sample;
pub mod target;

pub use container::ContainerStatus;
pub use disk::{DiskStat, FilesystemUsage, IoRates};
pub use metrics::{CpuRates, CpuStat, MemoryMetrics};
pub use network::{NetDevStat, NetworkRates};
pub use record::{MetricBatch, MetricBody, MetricRecord};
pub use sample::{Sample, SampleStore};
pub use target::{MonitorKind, MonitorTarget};
