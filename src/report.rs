use chrono::{DateTime, FixedOffset};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MEMORY: &str = "memory";
pub const DISK: &str = "disk";
pub const CPU: &str = "cpu";
pub const PLATFORM_DETAIL: &str = "platform-detail";
pub const APPLICATION_USAGE: &str = "application-usage";

pub const SECTION_ORDER: [&str; 5] = [MEMORY, DISK, CPU, PLATFORM_DETAIL, APPLICATION_USAGE];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryInfo {
    #[serde(rename = "Total")]
    pub total: u64,
    #[serde(rename = "Available")]
    pub available: u64,
    #[serde(rename = "Used")]
    pub used: u64,
    #[serde(rename = "Free")]
    pub free: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskEntry {
    #[serde(rename = "Device")]
    pub device: String,
    #[serde(rename = "Mountpoint")]
    pub mount_point: String,
    #[serde(rename = "Fstype")]
    pub fs_type: String,
    #[serde(rename = "Total")]
    pub total: u64,
    #[serde(rename = "Used")]
    pub used: u64,
    #[serde(rename = "Free")]
    pub free: u64,
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuInfo {
    #[serde(rename = "Physical_Cores")]
    pub physical_cores: usize,
    #[serde(rename = "Total_Cores")]
    pub logical_cores: usize,
    #[serde(rename = "Max_Frequency")]
    pub max_frequency: f64,
    #[serde(rename = "Min_Frequency")]
    pub min_frequency: f64,
    #[serde(rename = "Current_Frequency")]
    pub current_frequency: f64,
    #[serde(rename = "CPU_Usage")]
    pub usage_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LastUsed {
    At(DateTime<FixedOffset>),
    NeverUsed,
    Unknown,
}

impl LastUsed {
    pub const NEVER_USED: &'static str = "never used";
    pub const UNKNOWN: &'static str = "unknown";
}

impl Serialize for LastUsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LastUsed::At(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            LastUsed::NeverUsed => serializer.serialize_str(Self::NEVER_USED),
            LastUsed::Unknown => serializer.serialize_str(Self::UNKNOWN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRecord {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "LastUsed")]
    pub last_used: LastUsed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Section {
    Memory(MemoryInfo),
    Disk(Vec<DiskEntry>),
    Cpu(CpuInfo),
    PlatformDetail(String),
    ApplicationUsage(Vec<ApplicationRecord>),
}

// a missing section means its collection failed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    sections: Vec<(&'static str, Section)>,
}

impl Report {
    pub fn insert(&mut self, name: &'static str, section: Section) {
        self.sections.push((name, section));
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, s)| s)
    }

    pub fn section_names(&self) -> Vec<&'static str> {
        self.sections.iter().map(|(n, _)| *n).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        // written beside the target and renamed, never partially in place
        let tmp = temp_path(path);

        let result = self.write_new_file(&tmp).and_then(|()| {
            fs::rename(&tmp, path).map_err(|source| ReportError::Io {
                path: path.display().to_string(),
                source,
            })
        });
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn write_new_file(&self, path: &Path) -> Result<(), ReportError> {
        let io_err = |source| ReportError::Io {
            path: path.display().to_string(),
            source,
        };
        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        Ok(())
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, section) in &self.sections {
            map.serialize_entry(name, section)?;
        }
        map.end()
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
