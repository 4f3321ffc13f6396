pub mod container_source;
pub mod database_source;
pub mod metric_sink;
pub mod status_source;
pub mod system_source;

pub use container_source::ContainerSource;
pub use database_source::DatabaseSource;
pub use metric_sink::MetricSink;
pub use status_source::StatusSource;
pub use system_source::SystemSource;
