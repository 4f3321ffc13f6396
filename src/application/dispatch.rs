use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::{MetricBody, MonitorKind, MonitorTarget};
use crate::error::AgentError;
use crate::ports::{ContainerSource, DatabaseSource, StatusSource, SystemSource};

use super::collectors::{CpuCollector, IoCollector, MysqlCollector, NetworkCollector, NginxCollector};

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Raw reading sources, one per kind of collaborator
#[derive(Clone)]
pub struct Sources {
    pub system: Arc<dyn SystemSource>,
    /// `None` when the container engine could not be reached at startup
    pub containers: Option<Arc<dyn ContainerSource>>,
    pub status: Arc<dyn StatusSource>,
    pub database: Arc<dyn DatabaseSource>,
}

/// Maps each target to its source and, for counter kinds, its collector.
///
/// Failures are logged here and turn into an empty result, so one broken
/// target never affects the others.
pub struct CollectorDispatch {
    sources: Sources,
    io: IoCollector,
    cpu: CpuCollector,
    network: NetworkCollector,
    nginx: NginxCollector,
    mysql: MysqlCollector,
    clock: Clock,
}

impl CollectorDispatch {
    pub fn new(sources: Sources) -> Self {
        Self {
            sources,
            io: IoCollector::default(),
            cpu: CpuCollector::default(),
            network: NetworkCollector::default(),
            nginx: NginxCollector::default(),
            mysql: MysqlCollector::default(),
            clock: Box::new(|| Utc::now().timestamp_millis()),
        }
    }

    /// Replace the millisecond clock used to timestamp samples
    #[cfg(test)]
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Sample one target; `None` means nothing to report this iteration
    pub async fn collect(&mut self, target: &MonitorTarget) -> Option<MetricBody> {
        match self.sample(&target.kind).await {
            Ok(body) => {
                if body.is_none() {
                    debug!(kind = target.kind.name(), tag = target.tag(), "Nothing to report");
                }
                body
            }
            Err(e) => {
                warn!(kind = target.kind.name(), tag = target.tag(), error = %e, "Collector failed, skipping target");
                None
            }
        }
    }

    async fn sample(&mut self, kind: &MonitorKind) -> Result<Option<MetricBody>, AgentError> {
        let body = match kind {
            MonitorKind::Memory => {
                Some(MetricBody::Memory(self.sources.system.read_memory().await?))
            }
            MonitorKind::Io => {
                let stats = self.sources.system.read_disk_stats().await?;
                let now = self.now();
                self.io.observe(stats, now)
            }
            MonitorKind::DiskUsage => {
                let filesystems = self.sources.system.list_filesystems().await?;
                (!filesystems.is_empty()).then_some(MetricBody::DiskUsage { filesystems })
            }
            MonitorKind::Cpu => {
                let stats = self.sources.system.read_cpu_stats().await?;
                let now = self.now();
                self.cpu.observe(stats, now)
            }
            MonitorKind::Uptime => Some(MetricBody::Uptime {
                uptime: self.sources.system.read_uptime().await?,
            }),
            MonitorKind::Network => {
                let stats = self.sources.system.read_network_stats().await?;
                let now = self.now();
                self.network.observe(stats, now)
            }
            MonitorKind::Docker => {
                let Some(source) = &self.sources.containers else {
                    warn!("Docker is not available, skipping target");
                    return Ok(None);
                };
                let containers = source.list_running().await?;
                (!containers.is_empty()).then_some(MetricBody::Docker { containers })
            }
            MonitorKind::Nginx(params) => {
                let requests = self.sources.status.request_count(&params.endpoint).await?;
                let now = self.now();
                Some(self.nginx.observe(&params.endpoint, requests, now))
            }
            MonitorKind::Mysql(params) => {
                let rows = self
                    .sources
                    .database
                    .global_status(&params.connection, &params.variables)
                    .await?;
                let now = self.now();
                self.mysql.observe(&params.connection, rows, now)
            }
            MonitorKind::Unknown(name) if name.is_empty() => {
                warn!("Monitor target has no type, skipping target");
                None
            }
            MonitorKind::Unknown(name) => {
                warn!(kind = %name, "Unknown monitor type, skipping target");
                None
            }
        };

        Ok(body)
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::application::fakes::Fixture;
    use crate::domain::target::{MysqlParams, NginxParams};
    use crate::domain::{ContainerStatus, DiskStat, FilesystemUsage, IoRates, MemoryMetrics};

    fn dispatch(fixture: &Fixture) -> CollectorDispatch {
        CollectorDispatch::new(fixture.sources()).with_clock(fixture.clock())
    }

    #[tokio::test]
    async fn test_memory_is_passthrough() {
        let fixture = Fixture::default();
        let memory = MemoryMetrics {
            total: Some(16_303_500),
            free: Some(1_254_300),
            swap_free: Some(0),
            ..Default::default()
        };
        *fixture.system.memory.lock().unwrap() = memory.clone();

        let mut dispatch = dispatch(&fixture);
        let target = MonitorTarget::new(MonitorKind::Memory);

        assert_eq!(dispatch.collect(&target).await, Some(MetricBody::Memory(memory.clone())));
        assert_eq!(dispatch.collect(&target).await, Some(MetricBody::Memory(memory)));
    }

    #[tokio::test]
    async fn test_io_rates_from_elapsed_clock() {
        let fixture = Fixture::default();
        let mut dispatch = dispatch(&fixture);
        let target = MonitorTarget::new(MonitorKind::Io);

        *fixture.system.disks.lock().unwrap() = vec![DiskStat::new("sda", 1000, 500)];
        assert_eq!(dispatch.collect(&target).await, None);

        fixture.advance(2_000);
        *fixture.system.disks.lock().unwrap() = vec![DiskStat::new("sda", 1100, 600)];
        assert_eq!(
            dispatch.collect(&target).await,
            Some(MetricBody::Io {
                devices: vec![IoRates {
                    device: "sda".to_string(),
                    read: 25600,
                    write: 25600,
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_empty_snapshots_are_omitted() {
        let fixture = Fixture::default();
        let mut dispatch = dispatch(&fixture);

        assert_eq!(dispatch.collect(&MonitorTarget::new(MonitorKind::DiskUsage)).await, None);
        assert_eq!(dispatch.collect(&MonitorTarget::new(MonitorKind::Docker)).await, None);
    }

    #[tokio::test]
    async fn test_disk_usage_and_docker_snapshots() {
        let fixture = Fixture::with_containers(vec![ContainerStatus::new("web", "Up 3 hours")]);
        *fixture.system.filesystems.lock().unwrap() =
            vec![FilesystemUsage::new("/dev/sda1", 102_400, 51_200)];
        let mut dispatch = dispatch(&fixture);

        assert_eq!(
            dispatch.collect(&MonitorTarget::new(MonitorKind::DiskUsage)).await,
            Some(MetricBody::DiskUsage {
                filesystems: vec![FilesystemUsage::new("/dev/sda1", 102_400, 51_200)]
            })
        );
        assert_eq!(
            dispatch.collect(&MonitorTarget::new(MonitorKind::Docker)).await,
            Some(MetricBody::Docker {
                containers: vec![ContainerStatus::new("web", "Up 3 hours")]
            })
        );
    }

    #[tokio::test]
    async fn test_docker_unavailable_is_skipped() {
        let fixture = Fixture::with_containers(vec![ContainerStatus::new("web", "Up")]);
        let mut sources = fixture.sources();
        sources.containers = None;
        let mut dispatch = CollectorDispatch::new(sources);

        assert_eq!(dispatch.collect(&MonitorTarget::new(MonitorKind::Docker)).await, None);
    }

    #[tokio::test]
    async fn test_failed_read_yields_nothing() {
        let fixture = Fixture::default();
        let mut dispatch = dispatch(&fixture);
        assert_eq!(dispatch.collect(&MonitorTarget::new(MonitorKind::Uptime)).await, None);

        *fixture.system.uptime.lock().unwrap() = Some("3600.25".to_string());
        assert_eq!(
            dispatch.collect(&MonitorTarget::new(MonitorKind::Uptime)).await,
            Some(MetricBody::Uptime {
                uptime: "3600.25".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_kind_yields_nothing() {
        let fixture = Fixture::default();
        let mut dispatch = dispatch(&fixture);
        let target = MonitorTarget::new(MonitorKind::Unknown("redis".to_string()));
        assert_eq!(dispatch.collect(&target).await, None);

        let untyped = MonitorTarget::new(MonitorKind::Unknown(String::new()));
        assert_eq!(dispatch.collect(&untyped).await, None);
    }

    #[tokio::test]
    async fn test_nginx_metadata_then_rate() {
        let fixture = Fixture::default();
        let mut dispatch = dispatch(&fixture);
        let target = MonitorTarget::new(MonitorKind::Nginx(NginxParams {
            endpoint: "http://localhost/nginx_status".to_string(),
        }));

        *fixture.status.0.lock().unwrap() = 500;
        assert_eq!(
            dispatch.collect(&target).await,
            Some(MetricBody::Nginx { requests: None })
        );

        fixture.advance(60_000);
        *fixture.status.0.lock().unwrap() = 620;
        assert_eq!(
            dispatch.collect(&target).await,
            Some(MetricBody::Nginx {
                requests: Some(2.0)
            })
        );
    }

    #[tokio::test]
    async fn test_mysql_queries_configured_variables() {
        let fixture = Fixture::default();
        *fixture.database.0.lock().unwrap() = vec![
            ("Questions".to_string(), "100".to_string()),
            ("Uptime".to_string(), "10".to_string()),
        ];
        let mut dispatch = dispatch(&fixture);
        let target = MonitorTarget::new(MonitorKind::Mysql(MysqlParams {
            connection: "mysql://root@localhost:3306/".to_string(),
            variables: vec!["Questions".to_string()],
        }));

        assert_eq!(dispatch.collect(&target).await, None);

        fixture.advance(10_000);
        *fixture.database.0.lock().unwrap() = vec![("Questions".to_string(), "150".to_string())];
        assert_eq!(
            dispatch.collect(&target).await,
            Some(MetricBody::Mysql(BTreeMap::from([("questions".to_string(), 5.0)])))
        );
    }
}
