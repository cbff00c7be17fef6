use crate::collectors::apps::resolve_usage;
use crate::collectors::sections::{
    collect_cpu, collect_disks, collect_memory, collect_platform_detail,
};
use crate::collectors::{guarded, AppCatalog, HostProbe};
use crate::diagnostics::DiagnosticsSink;
use crate::report::{
    Report, Section, APPLICATION_USAGE, CPU, DISK, MEMORY, PLATFORM_DETAIL, SECTION_ORDER,
};
use std::time::{Duration, Instant};
use tracing::debug;

pub fn assemble(
    host: &mut dyn HostProbe,
    catalog: &dyn AppCatalog,
    sink: &mut dyn DiagnosticsSink,
) -> Report {
    let started = Instant::now();
    let mut report = Report::default();

    if let Some(memory) = guarded(MEMORY, sink, || collect_memory(host)) {
        report.insert(MEMORY, Section::Memory(memory));
    }
    if let Some(disks) = guarded(DISK, sink, || collect_disks(host)) {
        report.insert(DISK, Section::Disk(disks));
    }
    if let Some(cpu) = guarded(CPU, sink, || collect_cpu(host)) {
        report.insert(CPU, Section::Cpu(cpu));
    }
    if let Some(text) = guarded(PLATFORM_DETAIL, sink, || collect_platform_detail(host)) {
        report.insert(PLATFORM_DETAIL, Section::PlatformDetail(text));
    }
    if let Some(paths) = guarded(APPLICATION_USAGE, sink, || catalog.list_applications()) {
        debug!(count = paths.len(), "applications enumerated");
        let records = resolve_usage(catalog, &paths, sink);
        report.insert(APPLICATION_USAGE, Section::ApplicationUsage(records));
    }

    record_completion(sink, &report, started.elapsed());
    report
}

fn record_completion(sink: &mut dyn DiagnosticsSink, report: &Report, elapsed: Duration) {
    // whole milliseconds keep the humantime output readable
    let rounded = Duration::from_millis(elapsed.as_millis() as u64);
    let missing: Vec<&str> = SECTION_ORDER
        .iter()
        .copied()
        .filter(|name| report.get(name).is_none())
        .collect();
    let mut message = format!(
        "system report assembled with {} of {} sections in {} ({:.3} seconds)",
        report.len(),
        SECTION_ORDER.len(),
        humantime::format_duration(rounded),
        elapsed.as_secs_f64()
    );
    if !missing.is_empty() {
        message.push_str(&format!("; missing: {}", missing.join(", ")));
    }
    sink.info(message);
}
