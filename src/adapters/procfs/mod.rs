mod parser;
mod system;

use std::path::PathBuf;

pub use system::ProcfsSystemSource;

/// Configuration for procfs paths (useful for container mounts)
#[derive(Debug, Clone)]
pub struct ProcfsConfig {
    pub proc_path: PathBuf,
}

impl ProcfsConfig {
    pub fn new(proc_path: impl Into<PathBuf>) -> Self {
        Self {
            proc_path: proc_path.into(),
        }
    }
}
