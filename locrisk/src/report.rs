//! CSV audit report of translated entries and their risks.

use std::collections::BTreeMap;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::entry::{ProcessedEntry, RiskKind};
use crate::error::ReportError;

pub const CSV_HEADER: [&str; 6] = [
    "Language",
    "StringKey",
    "Original Text",
    "Translated Text",
    "Risk Type",
    "Risk Message",
];

/// Risk Type written for entries without warnings
pub const PASS: &str = "PASS";

/// Render one row per risk (or a single `PASS` row) for every entry.
///
/// Every field is quoted and embedded quotes are doubled. Newlines inside
/// fields are kept as-is.
pub fn to_csv(entries: &[ProcessedEntry]) -> Result<String, ReportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for entry in entries {
        if entry.risks.is_empty() {
            writer.write_record([
                entry.language_code.as_str(),
                entry.string_key.as_str(),
                entry.original_value.as_str(),
                entry.translated_value.as_str(),
                PASS,
                "",
            ])?;
            continue;
        }
        for risk in &entry.risks {
            writer.write_record([
                entry.language_code.as_str(),
                entry.string_key.as_str(),
                entry.original_value.as_str(),
                entry.translated_value.as_str(),
                risk.kind.as_str(),
                risk.message.as_str(),
            ])?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Warning counts over a set of processed entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskSummary {
    pub entries: usize,
    pub passed: usize,
    pub by_kind: BTreeMap<RiskKind, usize>,
}

impl RiskSummary {
    pub fn from_entries(entries: &[ProcessedEntry]) -> Self {
        let mut summary = RiskSummary {
            entries: entries.len(),
            ..RiskSummary::default()
        };
        for entry in entries {
            if entry.risks.is_empty() {
                summary.passed += 1;
            }
            for risk in &entry.risks {
                *summary.by_kind.entry(risk.kind).or_insert(0) += 1;
            }
        }
        summary
    }

    pub fn warnings(&self) -> usize {
        self.by_kind.values().sum()
    }
}
