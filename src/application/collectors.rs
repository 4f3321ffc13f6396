//! Stateful collectors: each owns the previous sample of every resource key
//! in its monitor kind and turns raw readings into per-second rates.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::rate::{per_second_f64, track};
use crate::domain::{CpuStat, DiskStat, MetricBody, NetDevStat, Sample, SampleStore};

/// Block device throughput, keyed by device name
#[derive(Debug, Default)]
pub struct IoCollector {
    previous: SampleStore<DiskStat>,
}

impl IoCollector {
    pub fn observe(&mut self, stats: Vec<DiskStat>, now_ms: i64) -> Option<MetricBody> {
        let mut devices = Vec::new();

        for stat in stats.into_iter().filter(|s| !s.is_loop()) {
            let key = stat.device.clone();
            if let Some(rates) = track(&mut self.previous, key, Sample::new(stat, now_ms), |p, c, secs| {
                c.rates_since(p, secs)
            }) {
                devices.push(rates);
            }
        }

        (!devices.is_empty()).then_some(MetricBody::Io { devices })
    }
}

/// Tick rates for the aggregate line and every core, keyed by `cpu` label
#[derive(Debug, Default)]
pub struct CpuCollector {
    previous: SampleStore<CpuStat>,
}

impl CpuCollector {
    pub fn observe(&mut self, stats: Vec<CpuStat>, now_ms: i64) -> Option<MetricBody> {
        let mut cpus = Vec::new();

        for stat in stats {
            let key = stat.label.clone();
            if let Some(rates) = track(&mut self.previous, key, Sample::new(stat, now_ms), |p, c, secs| {
                c.rates_since(p, secs)
            }) {
                cpus.push(rates);
            }
        }

        (!cpus.is_empty()).then_some(MetricBody::Cpu { cpus })
    }
}

/// Interface throughput, keyed by interface name
#[derive(Debug, Default)]
pub struct NetworkCollector {
    previous: SampleStore<NetDevStat>,
}

impl NetworkCollector {
    pub fn observe(&mut self, stats: Vec<NetDevStat>, now_ms: i64) -> Option<MetricBody> {
        let mut devices = Vec::new();

        for stat in stats {
            let key = stat.device.clone();
            if let Some(rates) = track(&mut self.previous, key, Sample::new(stat, now_ms), |p, c, secs| {
                c.rates_since(p, secs)
            }) {
                devices.push(rates);
            }
        }

        (!devices.is_empty()).then_some(MetricBody::Network { devices })
    }
}

/// Requests per second, keyed by status endpoint
#[derive(Debug, Default)]
pub struct NginxCollector {
    previous: SampleStore<u64>,
}

impl NginxCollector {
    /// Always yields a record; `requests` is absent until a rate exists
    pub fn observe(&mut self, endpoint: &str, requests: u64, now_ms: i64) -> MetricBody {
        let requests = track(&mut self.previous, endpoint, Sample::new(requests, now_ms), |p, c, secs| {
            per_second_f64(*p as f64, *c as f64, secs)
        });

        MetricBody::Nginx { requests }
    }
}

/// Status variable rates, keyed by connection string
#[derive(Debug, Default)]
pub struct MysqlCollector {
    previous: SampleStore<BTreeMap<String, f64>>,
}

impl MysqlCollector {
    pub fn observe(
        &mut self,
        connection: &str,
        rows: Vec<(String, String)>,
        now_ms: i64,
    ) -> Option<MetricBody> {
        let values: BTreeMap<String, f64> = rows
            .into_iter()
            .filter_map(|(name, value)| match value.trim().parse::<f64>() {
                Ok(number) => Some((name, number)),
                Err(_) => {
                    debug!(variable = %name, value = %value, "Non-numeric status variable, skipping");
                    None
                }
            })
            .collect();

        let rates = track(&mut self.previous, connection, Sample::new(values, now_ms), |p, c, secs| {
            c.iter()
                .filter_map(|(name, value)| {
                    p.get(name)
                        .map(|previous| (name.to_lowercase(), per_second_f64(*previous, *value, secs)))
                })
                .collect::<BTreeMap<_, _>>()
        })?;

        (!rates.is_empty()).then_some(MetricBody::Mysql(rates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CpuRates, IoRates, NetworkRates};

    fn io_devices(body: Option<MetricBody>) -> Vec<IoRates> {
        match body {
            Some(MetricBody::Io { devices }) => devices,
            other => panic!("expected io body, got {:?}", other),
        }
    }

    #[test]
    fn test_io_first_sample_is_omitted() {
        let mut collector = IoCollector::default();
        assert_eq!(collector.observe(vec![DiskStat::new("sda", 1000, 500)], 0), None);
    }

    #[test]
    fn test_io_rates_bytes_per_second() {
        let mut collector = IoCollector::default();
        collector.observe(vec![DiskStat::new("sda", 1000, 500)], 10_000);

        let devices = io_devices(collector.observe(vec![DiskStat::new("sda", 1100, 600)], 12_000));
        assert_eq!(
            devices,
            vec![IoRates {
                device: "sda".to_string(),
                read: 25600,
                write: 25600,
            }]
        );
    }

    #[test]
    fn test_io_never_reports_loop_devices() {
        let mut collector = IoCollector::default();
        let stats = || vec![DiskStat::new("loop0", 10, 10), DiskStat::new("sda", 10, 10)];

        collector.observe(stats(), 0);
        collector.observe(stats(), 1_000);
        let devices = io_devices(collector.observe(stats(), 2_000));

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device, "sda");
    }

    #[test]
    fn test_io_new_device_waits_for_second_sample() {
        let mut collector = IoCollector::default();
        collector.observe(vec![DiskStat::new("sda", 0, 0)], 0);

        let devices = io_devices(collector.observe(
            vec![DiskStat::new("sda", 8, 8), DiskStat::new("sdb", 100, 100)],
            4_000,
        ));
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].read, 1024);
    }

    #[test]
    fn test_io_sub_second_resample_is_omitted() {
        let mut collector = IoCollector::default();
        collector.observe(vec![DiskStat::new("sda", 0, 0)], 0);
        assert_eq!(collector.observe(vec![DiskStat::new("sda", 8, 8)], 999), None);
    }

    #[test]
    fn test_io_identical_counters_rate_to_zero() {
        let mut collector = IoCollector::default();
        let stats = || vec![DiskStat::new("nvme0n1", 48_000, 12_000)];

        collector.observe(stats(), 0);
        let devices = io_devices(collector.observe(stats(), 60_000));
        assert_eq!(
            devices,
            vec![IoRates {
                device: "nvme0n1".to_string(),
                read: 0,
                write: 0,
            }]
        );
    }

    #[test]
    fn test_cpu_identical_counters_rate_to_zero() {
        let mut collector = CpuCollector::default();
        let stat = CpuStat {
            label: "cpu".to_string(),
            user: 1000,
            nice: 20,
            system: 300,
            idle: 9000,
            iowait: 40,
            irq: 5,
            softirq: 6,
            steal: 7,
            guest: 8,
            guest_nice: 9,
        };

        assert_eq!(collector.observe(vec![stat.clone()], 0), None);
        let body = collector.observe(vec![stat], 60_000);
        assert_eq!(
            body,
            Some(MetricBody::Cpu {
                cpus: vec![CpuRates {
                    cpu: "cpu".to_string(),
                    user: 0,
                    nice: 0,
                    system: 0,
                    idle: 0,
                    iowait: 0,
                    irq: 0,
                    softirq: 0,
                    steal: 0,
                    guest: 0,
                    guest_nice: 0,
                }]
            })
        );
    }

    #[test]
    fn test_cpu_cores_rated_independently() {
        let mut collector = CpuCollector::default();
        let core = |label: &str, user: u64| CpuStat {
            label: label.to_string(),
            user,
            ..Default::default()
        };

        collector.observe(vec![core("cpu", 0), core("cpu0", 0)], 0);
        let body = collector.observe(vec![core("cpu", 200), core("cpu0", 100)], 2_000);

        match body {
            Some(MetricBody::Cpu { cpus }) => {
                assert_eq!(cpus[0].user, 100);
                assert_eq!(cpus[1].cpu, "cpu0");
                assert_eq!(cpus[1].user, 50);
            }
            other => panic!("expected cpu body, got {:?}", other),
        }
    }

    #[test]
    fn test_network_counter_reset_goes_negative() {
        let mut collector = NetworkCollector::default();
        collector.observe(vec![NetDevStat::new("eth0", 5_000, 3_000)], 0);

        let body = collector.observe(vec![NetDevStat::new("eth0", 1_000, 3_500)], 2_000);
        assert_eq!(
            body,
            Some(MetricBody::Network {
                devices: vec![NetworkRates {
                    device: "eth0".to_string(),
                    bytes_sent: 250,
                    bytes_received: -2_000,
                }]
            })
        );
    }

    #[test]
    fn test_network_identical_counters_rate_to_zero() {
        let mut collector = NetworkCollector::default();
        let stats = || vec![NetDevStat::new("eth0", 9_000, 4_000)];

        collector.observe(stats(), 0);
        assert_eq!(
            collector.observe(stats(), 60_000),
            Some(MetricBody::Network {
                devices: vec![NetworkRates {
                    device: "eth0".to_string(),
                    bytes_sent: 0,
                    bytes_received: 0,
                }]
            })
        );
    }

    #[test]
    fn test_network_new_interface_waits_beside_rated_one() {
        let mut collector = NetworkCollector::default();
        collector.observe(vec![NetDevStat::new("eth0", 0, 0)], 0);

        let body = collector.observe(
            vec![NetDevStat::new("eth0", 600, 300), NetDevStat::new("docker0", 50, 50)],
            3_000,
        );
        assert_eq!(
            body,
            Some(MetricBody::Network {
                devices: vec![NetworkRates {
                    device: "eth0".to_string(),
                    bytes_sent: 100,
                    bytes_received: 200,
                }]
            })
        );

        match collector.observe(
            vec![NetDevStat::new("eth0", 600, 300), NetDevStat::new("docker0", 150, 50)],
            4_000,
        ) {
            Some(MetricBody::Network { devices }) => {
                assert_eq!(devices.len(), 2);
                assert_eq!(devices[1].device, "docker0");
                assert_eq!(devices[1].bytes_received, 100);
            }
            other => panic!("expected network body, got {:?}", other),
        }
    }

    #[test]
    fn test_network_first_sample_is_omitted() {
        let mut collector = NetworkCollector::default();
        assert_eq!(collector.observe(vec![NetDevStat::new("lo", 1, 1)], 0), None);
    }

    #[test]
    fn test_nginx_first_sample_has_no_rate() {
        let mut collector = NginxCollector::default();
        let endpoint = "http://127.0.0.1/nginx_status";

        assert_eq!(
            collector.observe(endpoint, 1_000, 0),
            MetricBody::Nginx { requests: None }
        );
        assert_eq!(
            collector.observe(endpoint, 1_150, 60_000),
            MetricBody::Nginx {
                requests: Some(2.5)
            }
        );
    }

    #[test]
    fn test_nginx_sub_second_resample_has_no_rate() {
        let mut collector = NginxCollector::default();
        let endpoint = "http://127.0.0.1/nginx_status";

        collector.observe(endpoint, 1_000, 0);
        assert_eq!(
            collector.observe(endpoint, 1_040, 400),
            MetricBody::Nginx { requests: None }
        );
        assert_eq!(
            collector.observe(endpoint, 1_100, 2_400),
            MetricBody::Nginx {
                requests: Some(30.0)
            }
        );
    }

    #[test]
    fn test_nginx_endpoints_tracked_separately() {
        let mut collector = NginxCollector::default();
        collector.observe("http://a/status", 100, 0);

        assert_eq!(
            collector.observe("http://b/status", 500, 10_000),
            MetricBody::Nginx { requests: None }
        );
    }

    #[test]
    fn test_mysql_first_sample_seeds_only() {
        let mut collector = MysqlCollector::default();
        let rows = vec![("Questions".to_string(), "1000".to_string())];
        assert_eq!(collector.observe("mysql://db/", rows, 0), None);
    }

    #[test]
    fn test_mysql_rates_lowercase_keys() {
        let mut collector = MysqlCollector::default();
        let connection = "root:pw@tcp(db:3306)/";

        collector.observe(
            connection,
            vec![
                ("Questions".to_string(), "1000".to_string()),
                ("Slow_queries".to_string(), "4".to_string()),
            ],
            0,
        );
        let body = collector.observe(
            connection,
            vec![
                ("Questions".to_string(), "1600".to_string()),
                ("Slow_queries".to_string(), "7".to_string()),
            ],
            60_000,
        );

        assert_eq!(
            body,
            Some(MetricBody::Mysql(BTreeMap::from([
                ("questions".to_string(), 10.0),
                ("slow_queries".to_string(), 0.05),
            ])))
        );
    }

    #[test]
    fn test_mysql_sub_second_resample_has_no_rate() {
        let mut collector = MysqlCollector::default();
        let rows = |questions: &str| vec![("Questions".to_string(), questions.to_string())];

        collector.observe("c", rows("100"), 0);
        assert_eq!(collector.observe("c", rows("110"), 999), None);
        assert_eq!(
            collector.observe("c", rows("130"), 2_000),
            Some(MetricBody::Mysql(BTreeMap::from([("questions".to_string(), 20.0)])))
        );
    }

    #[test]
    fn test_mysql_skips_unparseable_values() {
        let mut collector = MysqlCollector::default();
        let rows = || {
            vec![
                ("Questions".to_string(), "10".to_string()),
                ("Ssl_cipher".to_string(), "TLS_AES_256".to_string()),
            ]
        };

        collector.observe("c", rows(), 0);
        match collector.observe("c", rows(), 1_000) {
            Some(MetricBody::Mysql(rates)) => {
                assert_eq!(rates.len(), 1);
                assert_eq!(rates["questions"], 0.0);
            }
            other => panic!("expected mysql body, got {:?}", other),
        }
    }
}
