use super::{CollectError, HostProbe};
use crate::report::{CpuInfo, DiskEntry, MemoryInfo};

pub fn collect_memory(host: &mut dyn HostProbe) -> Result<MemoryInfo, CollectError> {
    host.memory()
}

pub fn collect_disks(host: &mut dyn HostProbe) -> Result<Vec<DiskEntry>, CollectError> {
    let partitions = host.partitions()?;
    let mut disks = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let usage = host.disk_usage(&partition.mount_point)?;
        disks.push(DiskEntry {
            device: partition.device,
            mount_point: partition.mount_point,
            fs_type: partition.fs_type,
            total: usage.total,
            used: usage.used,
            free: usage.free,
            percentage: used_percent(usage.used, usage.free),
        });
    }
    Ok(disks)
}

pub fn collect_cpu(host: &mut dyn HostProbe) -> Result<CpuInfo, CollectError> {
    let counts = host.cpu_counts()?;
    let freq = host.cpu_frequency()?;
    let usage_percent = host.cpu_percent()?;
    Ok(CpuInfo {
        physical_cores: counts.physical,
        logical_cores: counts.logical,
        max_frequency: freq.max,
        min_frequency: freq.min,
        current_frequency: freq.current,
        usage_percent,
    })
}

pub fn collect_platform_detail(host: &mut dyn HostProbe) -> Result<String, CollectError> {
    host.hardware_profile()
}

// rounded to one decimal; probes report used = total - available, so
// root-reserved blocks count as used
fn used_percent(used: u64, free: u64) -> f64 {
    let base = used.saturating_add(free);
    if base == 0 {
        return 0.0;
    }
    ((used as f64 / base as f64) * 1000.0).round() / 10.0
}
