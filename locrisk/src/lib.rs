//! Core of locrisk: the tagged-line localization format, localization risk
//! scanning and the CSV audit report.
//!
//! # Example
//!
//! ```
//! use locrisk::{ProcessedEntry, parse, scan, serialize, to_csv};
//!
//! let parsed = parse("[LanguageID] en-US\n[StringKey] K1\n[Value] Hello\n");
//! let entry = &parsed.entries[0];
//!
//! let translated = "مرحبا".to_string();
//! let risks = scan(&entry.original_value, &translated, "ar-SA");
//! let processed = vec![ProcessedEntry::new(entry, "ar-SA", translated, risks)];
//!
//! let text = serialize(&processed, "ar-SA", &parsed.metadata);
//! assert!(text.starts_with("[LanguageID] ar-SA\n"));
//! assert!(to_csv(&processed).unwrap().contains("RTL_ALERT"));
//! ```

pub mod entry;
pub mod error;
pub mod languages;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod serializer;

pub use entry::{
    LocalizationEntry, ParseMetadata, ParseResult, ProcessedEntry, RiskKind, RiskWarning,
    generate_id,
};
pub use error::{ReportError, SelectionError};
pub use languages::{
    CatalogLanguage, LanguageOption, LanguageSelection, TARGET_LANGUAGES, find_language,
};
pub use parser::{Parser, parse};
pub use report::{CSV_HEADER, PASS, RiskSummary, to_csv};
pub use scanner::{FormattingCheck, LocaleProfile, RiskScanner, scan};
pub use serializer::{SerializeOptions, group_by_language, serialize, serialize_with_options};
