use chrono::{DateTime, Utc};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl DiagnosticEntry {
    pub fn new(severity: Severity, message: String) -> Self {
        Self {
            severity,
            timestamp: Utc::now(),
            message,
        }
    }
}

pub trait DiagnosticsSink {
    fn append(&mut self, entry: DiagnosticEntry);

    fn info(&mut self, message: String) {
        self.append(DiagnosticEntry::new(Severity::Info, message));
    }

    fn error(&mut self, message: String) {
        self.append(DiagnosticEntry::new(Severity::Error, message));
    }
}

#[derive(Debug, Default)]
pub struct TracingSink {
    errors: usize,
}

impl TracingSink {
    pub fn error_count(&self) -> usize {
        self.errors
    }
}

impl DiagnosticsSink for TracingSink {
    fn append(&mut self, entry: DiagnosticEntry) {
        match entry.severity {
            Severity::Info => info!(recorded_at = %entry.timestamp, "{}", entry.message),
            Severity::Error => {
                self.errors += 1;
                error!(recorded_at = %entry.timestamp, "{}", entry.message);
            }
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    pub entries: Vec<DiagnosticEntry>,
}

#[cfg(test)]
impl MemorySink {
    pub fn errors(&self) -> Vec<&DiagnosticEntry> {
        self.entries
            .iter()
            .filter(|e| e.severity == Severity::Error)
            .collect()
    }
}

#[cfg(test)]
impl DiagnosticsSink for MemorySink {
    fn append(&mut self, entry: DiagnosticEntry) {
        self.entries.push(entry);
    }
}
