use super::command::run_tool;
use super::{CollectError, CpuCounts, CpuFrequency, DiskUsage, HostProbe, Partition};
use crate::config::{Config, PlatformDetailConfig};
use crate::report::MemoryInfo;
#[cfg(target_os = "linux")]
use std::fs;
use std::thread;
use std::time::Duration;
use sysinfo::{CpuExt, DiskExt, System, SystemExt};
use tracing::debug;

pub struct LiveHost {
    system: System,
    cpu_sample_interval: Duration,
    profiler: PlatformDetailConfig,
}

impl LiveHost {
    pub fn new(cfg: &Config) -> Self {
        Self {
            system: System::new(),
            cpu_sample_interval: cfg.cpu_sample_interval(),
            profiler: cfg.platform_detail.clone(),
        }
    }
}

impl HostProbe for LiveHost {
    fn memory(&mut self) -> Result<MemoryInfo, CollectError> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(CollectError::Probe {
                probe: "virtual memory",
                reason: "host reported zero total memory".to_string(),
            });
        }
        Ok(MemoryInfo {
            total,
            available: self.system.available_memory(),
            used: self.system.used_memory(),
            free: self.system.free_memory(),
        })
    }

    fn partitions(&mut self) -> Result<Vec<Partition>, CollectError> {
        self.system.refresh_disks_list();
        Ok(self
            .system
            .disks()
            .iter()
            .map(|d| Partition {
                device: d.name().to_string_lossy().to_string(),
                mount_point: d.mount_point().to_string_lossy().to_string(),
                fs_type: String::from_utf8_lossy(d.file_system()).to_string(),
            })
            .collect())
    }

    fn disk_usage(&mut self, mount_point: &str) -> Result<DiskUsage, CollectError> {
        let Some(disk) = self
            .system
            .disks_mut()
            .iter_mut()
            .find(|d| d.mount_point().to_string_lossy() == mount_point)
        else {
            return Err(CollectError::Probe {
                probe: "disk usage",
                reason: format!("{mount_point} is no longer mounted"),
            });
        };
        if !disk.refresh() {
            return Err(CollectError::Probe {
                probe: "disk usage",
                reason: format!("failed to stat {mount_point}"),
            });
        }
        let total = disk.total_space();
        let free = disk.available_space();
        Ok(DiskUsage {
            total,
            used: total.saturating_sub(free),
            free,
        })
    }

    fn cpu_counts(&mut self) -> Result<CpuCounts, CollectError> {
        self.system.refresh_cpu();
        let logical = self.system.cpus().len();
        if logical == 0 {
            return Err(CollectError::Probe {
                probe: "cpu count",
                reason: "no logical cpus reported".to_string(),
            });
        }
        let physical = self
            .system
            .physical_core_count()
            .ok_or_else(|| CollectError::Probe {
                probe: "cpu count",
                reason: "physical core count unavailable".to_string(),
            })?;
        Ok(CpuCounts { physical, logical })
    }

    fn cpu_frequency(&mut self) -> Result<CpuFrequency, CollectError> {
        self.system.refresh_cpu();
        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return Err(CollectError::Probe {
                probe: "cpu frequency",
                reason: "no logical cpus reported".to_string(),
            });
        }
        let sum: u64 = cpus.iter().map(|c| c.frequency()).sum();
        let current = sum as f64 / cpus.len() as f64;
        let (min, max) = frequency_range_mhz().unwrap_or((0.0, 0.0));
        debug!(current, min, max, "cpu frequency sampled");
        Ok(CpuFrequency { current, min, max })
    }

    fn cpu_percent(&mut self) -> Result<f64, CollectError> {
        self.system.refresh_cpu();
        thread::sleep(self.cpu_sample_interval.max(System::MINIMUM_CPU_UPDATE_INTERVAL));
        self.system.refresh_cpu();
        let usage = self.system.global_cpu_info().cpu_usage() as f64;
        if !usage.is_finite() {
            return Err(CollectError::Probe {
                probe: "cpu utilisation",
                reason: format!("non-finite sample {usage}"),
            });
        }
        Ok(usage.clamp(0.0, 100.0))
    }

    fn hardware_profile(&mut self) -> Result<String, CollectError> {
        run_tool(&self.profiler.command, &self.profiler.args)
    }
}

#[cfg(target_os = "linux")]
fn frequency_range_mhz() -> Option<(f64, f64)> {
    let read_khz = |name: &str| -> Option<f64> {
        let path = format!("/sys/devices/system/cpu/cpu0/cpufreq/{name}");
        fs::read_to_string(path).ok()?.trim().parse::<f64>().ok()
    };
    let min = read_khz("cpuinfo_min_freq")?;
    let max = read_khz("cpuinfo_max_freq")?;
    Some((min / 1000.0, max / 1000.0))
}

#[cfg(target_os = "macos")]
fn frequency_range_mhz() -> Option<(f64, f64)> {
    let out = run_tool("sysctl", ["-n", "hw.cpufrequency_min", "hw.cpufrequency_max"]).ok()?;
    let mut values = out.lines().filter_map(|l| l.trim().parse::<f64>().ok());
    let min = values.next()?;
    let max = values.next()?;
    Some((min / 1_000_000.0, max / 1_000_000.0))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn frequency_range_mhz() -> Option<(f64, f64)> {
    None
}
