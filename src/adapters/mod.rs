pub mod backend;
pub mod docker;
pub mod host;
pub mod mysql;
pub mod nginx;
pub mod procfs;
pub mod store;

pub use backend::BackendClient;
pub use docker::DockerAdapter;
pub use host::HostProperties;
pub use mysql::MysqlStatusSource;
pub use nginx::StubStatusSource;
pub use procfs::{ProcfsConfig, ProcfsSystemSource};
pub use store::StateFile;
