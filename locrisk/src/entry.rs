//! Data model shared by the parser, scanner, serializer and report generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One localizable string read from a tagged source file.
///
/// Entries are immutable once parsed. Duplicate keys are allowed; every
/// `[StringKey]`/`[Value]` pair produces its own entry with its own `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationEntry {
    pub id: String,
    pub string_key: String,
    pub original_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
}

impl LocalizationEntry {
    pub fn new(string_key: &str, original_value: &str, table_id: Option<&str>) -> Self {
        LocalizationEntry {
            id: generate_id(),
            string_key: string_key.to_owned(),
            original_value: original_value.to_owned(),
            table_id: table_id.map(str::to_owned),
        }
    }
}

/// Header information needed to rebuild a file in the tagged format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetadata {
    pub language_id: Option<String>,
    pub table_id: Option<String>,
    /// Unrecognized tag lines, verbatim and in input order
    pub raw_header: Vec<String>,
}

/// Output of a single parse call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub entries: Vec<LocalizationEntry>,
    pub metadata: ParseMetadata,
}

/// Category of a localization risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskKind {
    #[serde(rename = "RTL_ALERT")]
    Rtl,
    #[serde(rename = "CJK_FONT_ALERT")]
    CjkFont,
    #[serde(rename = "UI_EXPANSION_RISK")]
    UiExpansion,
    #[serde(rename = "CULTURAL_ERROR")]
    Cultural,
    #[serde(rename = "FORMATTING_ERROR")]
    Formatting,
}

impl RiskKind {
    pub const ALL: [RiskKind; 5] = [
        RiskKind::Rtl,
        RiskKind::CjkFont,
        RiskKind::UiExpansion,
        RiskKind::Cultural,
        RiskKind::Formatting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskKind::Rtl => "RTL_ALERT",
            RiskKind::CjkFont => "CJK_FONT_ALERT",
            RiskKind::UiExpansion => "UI_EXPANSION_RISK",
            RiskKind::Cultural => "CULTURAL_ERROR",
            RiskKind::Formatting => "FORMATTING_ERROR",
        }
    }
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single heuristic warning attached to a translated entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskWarning {
    #[serde(rename = "type")]
    pub kind: RiskKind,
    pub message: String,
}

impl RiskWarning {
    pub fn new(kind: RiskKind, message: impl Into<String>) -> Self {
        RiskWarning {
            kind,
            message: message.into(),
        }
    }
}

/// An entry translated into one target language.
///
/// There is one `ProcessedEntry` per (entry, language) pair. Its `id` is
/// derived from both so that fan-out across languages never shares identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedEntry {
    pub id: String,
    pub string_key: String,
    pub original_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    pub translated_value: String,
    pub language_code: String,
    pub risks: Vec<RiskWarning>,
}

impl ProcessedEntry {
    pub fn new(
        entry: &LocalizationEntry,
        language_code: &str,
        translated_value: String,
        risks: Vec<RiskWarning>,
    ) -> Self {
        ProcessedEntry {
            id: format!("{}-{}", entry.id, language_code),
            string_key: entry.string_key.clone(),
            original_value: entry.original_value.clone(),
            table_id: entry.table_id.clone(),
            translated_value,
            language_code: language_code.to_owned(),
            risks,
        }
    }
}

/// Generate a fresh random (v4) identifier for a parsed entry
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
