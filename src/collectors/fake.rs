use super::{AppCatalog, CollectError, CpuCounts, CpuFrequency, DiskUsage, HostProbe, Partition};
use crate::report::MemoryInfo;
use std::collections::{HashMap, HashSet};
use std::io;

pub struct FakeHost {
    pub fail: HashSet<&'static str>,
    pub fail_disk_usage_for: Option<String>,
    pub profile: String,
    pub calls: Vec<&'static str>,
}

impl FakeHost {
    pub fn healthy() -> Self {
        Self {
            fail: HashSet::new(),
            fail_disk_usage_for: None,
            profile: "Hardware:\n".to_string(),
            calls: Vec::new(),
        }
    }

    fn call(&mut self, probe: &'static str) -> Result<(), CollectError> {
        self.calls.push(probe);
        if self.fail.contains(probe) {
            return Err(CollectError::Probe {
                probe,
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl HostProbe for FakeHost {
    fn memory(&mut self) -> Result<MemoryInfo, CollectError> {
        self.call("memory")?;
        Ok(MemoryInfo {
            total: 16_000_000_000,
            available: 8_000_000_000,
            used: 7_500_000_000,
            free: 500_000_000,
        })
    }

    fn partitions(&mut self) -> Result<Vec<Partition>, CollectError> {
        self.call("partitions")?;
        Ok(vec![
            Partition {
                device: "/dev/disk3s1".to_string(),
                mount_point: "/".to_string(),
                fs_type: "apfs".to_string(),
            },
            Partition {
                device: "/dev/disk3s5".to_string(),
                mount_point: "/System/Volumes/Data".to_string(),
                fs_type: "apfs".to_string(),
            },
        ])
    }

    fn disk_usage(&mut self, mount_point: &str) -> Result<DiskUsage, CollectError> {
        self.call("disk_usage")?;
        if self.fail_disk_usage_for.as_deref() == Some(mount_point) {
            return Err(CollectError::Probe {
                probe: "disk usage",
                reason: format!("{mount_point}: permission denied"),
            });
        }
        Ok(match mount_point {
            "/" => DiskUsage {
                total: 400,
                used: 100,
                free: 300,
            },
            _ => DiskUsage {
                total: 1000,
                used: 500,
                free: 500,
            },
        })
    }

    fn cpu_counts(&mut self) -> Result<CpuCounts, CollectError> {
        self.call("cpu_counts")?;
        Ok(CpuCounts {
            physical: 8,
            logical: 8,
        })
    }

    fn cpu_frequency(&mut self) -> Result<CpuFrequency, CollectError> {
        self.call("cpu_frequency")?;
        Ok(CpuFrequency {
            current: 3504.0,
            min: 600.0,
            max: 3504.0,
        })
    }

    fn cpu_percent(&mut self) -> Result<f64, CollectError> {
        self.call("cpu_percent")?;
        Ok(12.5)
    }

    fn hardware_profile(&mut self) -> Result<String, CollectError> {
        self.call("hardware_profile")?;
        Ok(self.profile.clone())
    }
}

pub enum FakeMetadata {
    Date(&'static str),
    NeverUsed,
    Fail,
}

#[derive(Default)]
pub struct FakeCatalog {
    pub apps: Option<Vec<String>>,
    pub metadata: HashMap<String, FakeMetadata>,
}

impl FakeCatalog {
    pub fn with_apps(apps: &[&str]) -> Self {
        Self {
            apps: Some(apps.iter().map(|s| s.to_string()).collect()),
            metadata: HashMap::new(),
        }
    }

    pub fn meta(mut self, path: &str, meta: FakeMetadata) -> Self {
        self.metadata.insert(path.to_string(), meta);
        self
    }
}

impl AppCatalog for FakeCatalog {
    fn list_applications(&self) -> Result<Vec<String>, CollectError> {
        self.apps.clone().ok_or_else(|| CollectError::Spawn {
            program: "mdfind".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }

    fn last_used_metadata(&self, path: &str) -> Result<Option<String>, CollectError> {
        match self.metadata.get(path) {
            Some(FakeMetadata::Date(raw)) => Ok(Some(raw.to_string())),
            Some(FakeMetadata::NeverUsed) | None => Ok(None),
            Some(FakeMetadata::Fail) => Err(CollectError::Output {
                program: "mdls".to_string(),
                detail: "could not find file".to_string(),
            }),
        }
    }
}
