use serde::Deserialize;
use serde_json::Value;

/// Status variables sampled when a mysql target names none
pub const DEFAULT_MYSQL_VARIABLES: &[&str] = &["Questions"];

/// Record keys that a mysql variable must not shadow once lower-cased
const ENVELOPE_KEYS: [&str; 3] = ["type", "tag", "timestamp"];

/// One configured monitoring target
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTarget")]
pub struct MonitorTarget {
    pub kind: MonitorKind,
    pub tag: Option<String>,
}

impl MonitorTarget {
    /// Declared tag, or the kind name when none was configured
    pub fn tag(&self) -> &str {
        self.tag.as_deref().unwrap_or_else(|| self.kind.name())
    }
}

#[cfg(test)]
impl MonitorTarget {
    pub fn new(kind: MonitorKind) -> Self {
        Self { kind, tag: None }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// The monitor kinds the agent knows how to sample
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorKind {
    Memory,
    Io,
    DiskUsage,
    Cpu,
    Uptime,
    Network,
    Docker,
    Nginx(NginxParams),
    Mysql(MysqlParams),
    /// Loaded so the iteration can report it, never sampled. Empty when
    /// the target had no string `type`.
    Unknown(String),
}

impl MonitorKind {
    /// Wire name, used as the record `type`
    pub fn name(&self) -> &str {
        match self {
            Self::Memory => "memory",
            Self::Io => "io",
            Self::DiskUsage => "diskUsage",
            Self::Cpu => "cpu",
            Self::Uptime => "uptime",
            Self::Network => "network",
            Self::Docker => "docker",
            Self::Nginx(_) => "nginx",
            Self::Mysql(_) => "mysql",
            Self::Unknown(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NginxParams {
    /// URL of the stub_status page
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MysqlParams {
    /// `mysql://` URL or `user:pass@tcp(host:port)/db` DSN
    pub connection: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    #[serde(rename = "type")]
    kind: Option<Value>,
    tag: Option<String>,
    endpoint: Option<String>,
    connection: Option<String>,
    variables: Option<Vec<String>>,
}

impl TryFrom<RawTarget> for MonitorTarget {
    type Error = String;

    fn try_from(raw: RawTarget) -> Result<Self, Self::Error> {
        let name = match &raw.kind {
            Some(Value::String(name)) => name.clone(),
            _ => String::new(),
        };

        let kind = match name.as_str() {
            "memory" => MonitorKind::Memory,
            "io" => MonitorKind::Io,
            "diskUsage" => MonitorKind::DiskUsage,
            "cpu" => MonitorKind::Cpu,
            "uptime" => MonitorKind::Uptime,
            "network" => MonitorKind::Network,
            "docker" => MonitorKind::Docker,
            "nginx" => MonitorKind::Nginx(NginxParams {
                endpoint: raw
                    .endpoint
                    .ok_or_else(|| "nginx target requires an `endpoint`".to_string())?,
            }),
            "mysql" => {
                let connection = raw
                    .connection
                    .ok_or_else(|| "mysql target requires a `connection`".to_string())?;
                let variables = raw.variables.unwrap_or_else(|| {
                    DEFAULT_MYSQL_VARIABLES.iter().map(|v| v.to_string()).collect()
                });
                if let Some(bad) = variables.iter().find(|v| !is_status_variable(v)) {
                    return Err(format!("invalid mysql status variable `{}`", bad));
                }
                if let Some(reserved) = variables
                    .iter()
                    .find(|v| ENVELOPE_KEYS.contains(&v.to_lowercase().as_str()))
                {
                    return Err(format!(
                        "mysql status variable `{}` clashes with a record field",
                        reserved
                    ));
                }
                MonitorKind::Mysql(MysqlParams {
                    connection,
                    variables,
                })
            }
            other => MonitorKind::Unknown(other.to_string()),
        };

        Ok(Self { kind, tag: raw.tag })
    }
}

fn is_status_variable(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
