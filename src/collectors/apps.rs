use super::command::run_tool;
use super::{AppCatalog, CollectError};
use crate::diagnostics::DiagnosticsSink;
use crate::report::{ApplicationRecord, LastUsed};
use chrono::{DateTime, FixedOffset};

const MDFIND: &str = "mdfind";
const MDLS: &str = "mdls";
const APPLICATION_KIND_QUERY: &str = "kMDItemKind=\"Application\"";
const LAST_USED_ATTR: &str = "kMDItemLastUsedDate";
const LAST_USED_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

#[derive(Debug, Default, Clone, Copy)]
pub struct Spotlight;

impl AppCatalog for Spotlight {
    fn list_applications(&self) -> Result<Vec<String>, CollectError> {
        let out = run_tool(MDFIND, [APPLICATION_KIND_QUERY])?;
        Ok(parse_listing(&out))
    }

    fn last_used_metadata(&self, path: &str) -> Result<Option<String>, CollectError> {
        let out = run_tool(MDLS, ["-name", LAST_USED_ATTR, path])?;
        parse_metadata_value(&out, LAST_USED_ATTR)
    }
}

pub fn parse_listing(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// a missing key or a `(null)` value means the attribute is not set
pub fn parse_metadata_value(out: &str, key: &str) -> Result<Option<String>, CollectError> {
    for line in out.lines().filter(|l| !l.trim().is_empty()) {
        let Some((name, value)) = line.split_once('=') else {
            return Err(CollectError::Output {
                program: MDLS.to_string(),
                detail: format!("expected `key = value`, got {:?}", line.trim()),
            });
        };
        if name.trim() != key {
            continue;
        }
        let value = value.trim().trim_matches('"');
        if value.is_empty() || value == "(null)" {
            return Ok(None);
        }
        return Ok(Some(value.to_string()));
    }
    Ok(None)
}

pub fn parse_last_used_date(raw: &str) -> Result<DateTime<FixedOffset>, CollectError> {
    DateTime::parse_from_str(raw, LAST_USED_FORMAT).map_err(|source| CollectError::Date {
        raw: raw.to_string(),
        source,
    })
}

pub fn resolve_usage(
    catalog: &dyn AppCatalog,
    paths: &[String],
    sink: &mut dyn DiagnosticsSink,
) -> Vec<ApplicationRecord> {
    paths
        .iter()
        .map(|path| {
            let resolved = catalog
                .last_used_metadata(path)
                .and_then(|raw| raw.as_deref().map(parse_last_used_date).transpose());
            let last_used = match resolved {
                Ok(Some(ts)) => LastUsed::At(ts),
                Ok(None) => LastUsed::NeverUsed,
                Err(err) => {
                    sink.error(format!("failed to get last used time for app {path}: {err}"));
                    LastUsed::Unknown
                }
            };
            ApplicationRecord {
                path: path.clone(),
                last_used,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::fake::{FakeCatalog, FakeMetadata};
    use crate::diagnostics::MemorySink;
    use chrono::{TimeZone, Utc};

    #[test]
    fn listing_keeps_order_and_duplicates() {
        let out = "/Applications/Safari.app\n\n/Applications/Xcode.app\n/Applications/Safari.app\n";
        assert_eq!(
            parse_listing(out),
            [
                "/Applications/Safari.app",
                "/Applications/Xcode.app",
                "/Applications/Safari.app"
            ]
        );
        assert!(parse_listing("").is_empty());
    }

    #[test]
    fn metadata_value_is_extracted_and_unquoted() {
        let out = "kMDItemLastUsedDate = 2024-02-11 18:04:53 +0000\n";
        assert_eq!(
            parse_metadata_value(out, LAST_USED_ATTR).unwrap().as_deref(),
            Some("2024-02-11 18:04:53 +0000")
        );
        let quoted = "kMDItemLastUsedDate = \"2024-02-11 18:04:53 +0000\"";
        assert_eq!(
            parse_metadata_value(quoted, LAST_USED_ATTR).unwrap().as_deref(),
            Some("2024-02-11 18:04:53 +0000")
        );
    }

    #[test]
    fn null_or_missing_attribute_means_unset() {
        assert_eq!(
            parse_metadata_value("kMDItemLastUsedDate = (null)\n", LAST_USED_ATTR).unwrap(),
            None
        );
        assert_eq!(
            parse_metadata_value("kMDItemDisplayName = \"Xcode\"\n", LAST_USED_ATTR).unwrap(),
            None
        );
    }

    #[test]
    fn line_without_delimiter_is_unexpected_output() {
        let err = parse_metadata_value("something went wrong\n", LAST_USED_ATTR).unwrap_err();
        assert!(matches!(err, CollectError::Output { .. }));
    }

    #[test]
    fn last_used_date_keeps_offset() {
        let ts = parse_last_used_date("2023-11-05 07:30:00 +0200").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(
            ts.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2023, 11, 5, 5, 30, 0).unwrap()
        );
        assert!(matches!(
            parse_last_used_date("yesterday"),
            Err(CollectError::Date { .. })
        ));
        assert!(parse_last_used_date("2023-11-05 07:30:00").is_err());
    }

    #[test]
    fn one_failing_item_does_not_stop_the_rest() {
        let catalog = FakeCatalog::with_apps(&["/Applications/A.app", "/Applications/B.app"])
            .meta("/Applications/A.app", FakeMetadata::Date("2024-01-02 03:04:05 +0000"))
            .meta("/Applications/B.app", FakeMetadata::Fail);
        let paths = catalog.list_applications().unwrap();
        let mut sink = MemorySink::default();

        let records = resolve_usage(&catalog, &paths, &mut sink);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].last_used,
            LastUsed::At(parse_last_used_date("2024-01-02 03:04:05 +0000").unwrap())
        );
        assert_eq!(records[1].path, "/Applications/B.app");
        assert_eq!(records[1].last_used, LastUsed::Unknown);
        assert_eq!(sink.errors().len(), 1);
        assert!(sink.errors()[0].message.contains("/Applications/B.app"));
    }

    #[test]
    fn unparseable_date_is_unknown() {
        let catalog = FakeCatalog::with_apps(&["/Applications/C.app"])
            .meta("/Applications/C.app", FakeMetadata::Date("02/01/2024"));
        let paths = catalog.list_applications().unwrap();
        let mut sink = MemorySink::default();
        let records = resolve_usage(&catalog, &paths, &mut sink);
        assert_eq!(records[0].last_used, LastUsed::Unknown);
        assert_eq!(sink.errors().len(), 1);
    }

    #[test]
    fn missing_usage_field_is_never_used() {
        let catalog = FakeCatalog::with_apps(&["/Applications/D.app"])
            .meta("/Applications/D.app", FakeMetadata::NeverUsed);
        let paths = catalog.list_applications().unwrap();
        let mut sink = MemorySink::default();
        let records = resolve_usage(&catalog, &paths, &mut sink);
        assert_eq!(records[0].last_used, LastUsed::NeverUsed);
        assert!(sink.entries.is_empty());
    }

    #[test]
    fn duplicate_paths_yield_duplicate_records() {
        let catalog = FakeCatalog::with_apps(&["/Applications/E.app", "/Applications/E.app"]);
        let paths = catalog.list_applications().unwrap();
        let mut sink = MemorySink::default();
        let records = resolve_usage(&catalog, &paths, &mut sink);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.path == "/Applications/E.app"));
    }
}
