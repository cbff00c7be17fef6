pub mod apps;
pub mod command;
pub mod sections;
pub mod system;

#[cfg(test)]
pub mod fake;

use crate::diagnostics::DiagnosticsSink;
use crate::report::MemoryInfo;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("{probe}: {reason}")]
    Probe { probe: &'static str, reason: String },
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("unexpected output from {program}: {detail}")]
    Output { program: String, detail: String },
    #[error("invalid date {raw:?}: {source}")]
    Date {
        raw: String,
        source: chrono::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuCounts {
    pub physical: usize,
    pub logical: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuFrequency {
    pub current: f64,
    pub min: f64,
    pub max: f64,
}

pub trait HostProbe {
    fn memory(&mut self) -> Result<MemoryInfo, CollectError>;

    fn partitions(&mut self) -> Result<Vec<Partition>, CollectError>;

    fn disk_usage(&mut self, mount_point: &str) -> Result<DiskUsage, CollectError>;

    fn cpu_counts(&mut self) -> Result<CpuCounts, CollectError>;

    fn cpu_frequency(&mut self) -> Result<CpuFrequency, CollectError>;

    fn cpu_percent(&mut self) -> Result<f64, CollectError>;

    fn hardware_profile(&mut self) -> Result<String, CollectError>;
}

pub trait AppCatalog {
    fn list_applications(&self) -> Result<Vec<String>, CollectError>;

    fn last_used_metadata(&self, path: &str) -> Result<Option<String>, CollectError>;
}

pub fn guarded<T>(
    section: &str,
    sink: &mut dyn DiagnosticsSink,
    step: impl FnOnce() -> Result<T, CollectError>,
) -> Option<T> {
    match step() {
        Ok(value) => Some(value),
        Err(err) => {
            sink.error(format!("failed to collect {section} information: {err}"));
            None
        }
    }
}
