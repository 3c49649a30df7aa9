//! Writing batch results: per-language text files, a ZIP archive of all
//! languages, and the CSV risk report.
//!
//! Each export is independent. A failing export is reported on its own and
//! leaves the results and the other exports untouched.

use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use locrisk::{
    ParseMetadata, ProcessedEntry, SerializeOptions, group_by_language, serialize_with_options,
    to_csv,
};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;

pub const ARCHIVE_NAME: &str = "localized_batch.zip";

pub fn text_file_name(code: &str) -> String {
    format!("localized_{}.txt", code)
}

/// `risk_report_<code>.csv` for one language, `risk_report_batch.csv` otherwise
pub fn report_file_name(codes: &[&str]) -> String {
    match codes {
        [code] => format!("risk_report_{}.csv", code),
        _ => "risk_report_batch.csv".to_string(),
    }
}

/// Serialize the results for `code` into the tagged-line format
pub fn export_text(
    results: &[ProcessedEntry],
    code: &str,
    metadata: &ParseMetadata,
    options: SerializeOptions,
) -> Result<String, ExportError> {
    if !results.iter().any(|entry| entry.language_code == code) {
        return Err(ExportError::Empty);
    }
    Ok(serialize_with_options(results, code, metadata, options))
}

/// Write one `localized_<code>.txt` per language into a ZIP archive
pub fn write_archive<W: Write + Seek>(
    results: &[ProcessedEntry],
    metadata: &ParseMetadata,
    options: SerializeOptions,
    writer: W,
) -> Result<W, ExportError> {
    let groups = group_by_language(results);
    if groups.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut zip = ZipWriter::new(writer);
    let file_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (code, entries) in &groups {
        zip.start_file(text_file_name(code), file_options)?;
        zip.write_all(serialize_with_options(entries, code, metadata, options).as_bytes())?;
    }

    Ok(zip.finish()?)
}

/// Build the archive in memory
pub fn archive_bytes(
    results: &[ProcessedEntry],
    metadata: &ParseMetadata,
    options: SerializeOptions,
) -> Result<Vec<u8>, ExportError> {
    let cursor = write_archive(results, metadata, options, Cursor::new(Vec::new()))?;
    Ok(cursor.into_inner())
}

/// Which files [`write_outputs`] produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub text: bool,
    pub csv: bool,
    pub serialize: SerializeOptions,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            text: true,
            csv: false,
            serialize: SerializeOptions::default(),
        }
    }
}

/// Outcome of [`write_outputs`]
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, ExportError)>,
}

impl ExportReport {
    fn record(&mut self, path: PathBuf, outcome: Result<(), ExportError>) {
        match outcome {
            Ok(()) => self.written.push(path),
            Err(error) => self.failures.push((path, error)),
        }
    }
}

/// Write the localized text (one file for a single language, an archive
/// otherwise) and the CSV report into `out_dir`
pub fn write_outputs(
    out_dir: &Path,
    results: &[ProcessedEntry],
    metadata: &ParseMetadata,
    options: &OutputOptions,
) -> ExportReport {
    let mut report = ExportReport::default();
    let groups = group_by_language(results);
    let codes: Vec<&str> = groups.iter().map(|(code, _)| code.as_str()).collect();

    if options.text {
        match codes.as_slice() {
            [code] => {
                let path = out_dir.join(text_file_name(code));
                let outcome = export_text(results, code, metadata, options.serialize)
                    .and_then(|text| Ok(fs::write(&path, text)?));
                report.record(path, outcome);
            }
            _ => {
                let path = out_dir.join(ARCHIVE_NAME);
                // No file at all when there is nothing to archive
                let outcome = if codes.is_empty() {
                    Err(ExportError::Empty)
                } else {
                    fs::File::create(&path)
                        .map_err(ExportError::from)
                        .and_then(|file| write_archive(results, metadata, options.serialize, file))
                        .map(|_| ())
                };
                report.record(path, outcome);
            }
        }
    }

    if options.csv {
        let path = out_dir.join(report_file_name(&codes));
        let outcome = if results.is_empty() {
            Err(ExportError::Empty)
        } else {
            to_csv(results)
                .map_err(ExportError::from)
                .and_then(|csv| Ok(fs::write(&path, csv)?))
        };
        report.record(path, outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use locrisk::{LocalizationEntry, RiskKind, RiskWarning};
    use std::io::Read;

    fn processed(key: &str, value: &str, code: &str) -> ProcessedEntry {
        let entry = LocalizationEntry::new(key, value, Some("UI"));
        ProcessedEntry::new(&entry, code, format!("[{}] {}", code, value), Vec::new())
    }

    fn metadata() -> ParseMetadata {
        ParseMetadata {
            language_id: Some("en-US".to_string()),
            table_id: Some("UI".to_string()),
            raw_header: Vec::new(),
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(text_file_name("de-DE"), "localized_de-DE.txt");
        assert_eq!(report_file_name(&["ja-JP"]), "risk_report_ja-JP.csv");
        assert_eq!(report_file_name(&["ja-JP", "ko-KR"]), "risk_report_batch.csv");
    }

    #[test]
    fn test_export_text_single_language() {
        let results = vec![processed("K1", "Hello", "de-DE"), processed("K1", "Hello", "fr-FR")];
        let text = export_text(&results, "fr-FR", &metadata(), SerializeOptions::default()).unwrap();
        assert_eq!(text, "[LanguageID] fr-FR\n[TableID] UI\n\n[StringKey] K1\n[Value] Hello\n");
    }

    #[test]
    fn test_export_text_without_results() {
        let results = vec![processed("K1", "Hello", "de-DE")];
        let err = export_text(&results, "ja-JP", &metadata(), SerializeOptions::default()).unwrap_err();
        assert!(matches!(err, ExportError::Empty));
    }

    #[test]
    fn test_archive_has_one_file_per_language() {
        let results = vec![
            processed("K1", "Hello", "de-DE"),
            processed("K1", "Hello", "ar-SA"),
            processed("K2", "Bye", "de-DE"),
        ];
        let bytes = archive_bytes(&results, &metadata(), SerializeOptions::default()).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut german = String::new();
        archive
            .by_name("localized_de-DE.txt")
            .unwrap()
            .read_to_string(&mut german)
            .unwrap();
        assert!(german.contains("[StringKey] K1\n[Value] Hello\n"));
        assert!(german.contains("[StringKey] K2\n[Value] Bye\n"));
        assert!(archive.by_name("localized_ar-SA.txt").is_ok());
    }

    #[test]
    fn test_empty_archive_is_an_error() {
        let result = archive_bytes(&[], &metadata(), SerializeOptions::default());
        assert!(matches!(result, Err(ExportError::Empty)));
    }

    #[test]
    fn test_write_outputs_single_language() {
        let dir = tempfile::tempdir().unwrap();
        let mut entry = processed("K1", "Hello", "ar-SA");
        entry.risks.push(RiskWarning::new(RiskKind::Rtl, "[RTL_ALERT] flip"));

        let options = OutputOptions {
            csv: true,
            ..OutputOptions::default()
        };
        let report = write_outputs(dir.path(), &[entry], &metadata(), &options);

        assert!(report.failures.is_empty());
        assert_eq!(
            report.written,
            vec![
                dir.path().join("localized_ar-SA.txt"),
                dir.path().join("risk_report_ar-SA.csv")
            ]
        );
        let csv = fs::read_to_string(dir.path().join("risk_report_ar-SA.csv")).unwrap();
        assert!(csv.contains("\"RTL_ALERT\""));
    }

    #[test]
    fn test_write_outputs_batch() {
        let dir = tempfile::tempdir().unwrap();
        let results = vec![processed("K1", "Hello", "de-DE"), processed("K1", "Hello", "ko-KR")];
        let options = OutputOptions {
            csv: true,
            ..OutputOptions::default()
        };
        let report = write_outputs(dir.path(), &results, &metadata(), &options);

        assert!(report.failures.is_empty());
        assert!(dir.path().join(ARCHIVE_NAME).exists());
        assert!(dir.path().join("risk_report_batch.csv").exists());
    }

    #[test]
    fn test_write_outputs_without_results_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let options = OutputOptions {
            csv: true,
            ..OutputOptions::default()
        };
        let report = write_outputs(dir.path(), &[], &metadata(), &options);

        assert!(report.written.is_empty());
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(report.failures[0].1, ExportError::Empty));
        assert!(!dir.path().join(ARCHIVE_NAME).exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_export_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let results = vec![processed("K1", "Hello", "de-DE")];
        let options = OutputOptions {
            text: false,
            csv: true,
            ..OutputOptions::default()
        };

        let report = write_outputs(&missing, &results, &metadata(), &options);
        assert!(report.written.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].1, ExportError::Io(_)));

        let report = write_outputs(dir.path(), &results, &metadata(), &options);
        assert_eq!(report.written.len(), 1);
    }
}
