//! Renders translated entries back into the tagged-line format, one language per file.

use crate::entry::{ParseMetadata, ProcessedEntry};

/// Options for [`serialize_with_options`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Write the unrecognized header lines captured at parse time after the `TableID` line
    pub keep_raw_header: bool,
}

/// Serialize entries for `language_code` with default options.
///
/// The `LanguageID` header is set to `language_code`, not to the source
/// language from `metadata`.
pub fn serialize(entries: &[ProcessedEntry], language_code: &str, metadata: &ParseMetadata) -> String {
    serialize_with_options(entries, language_code, metadata, SerializeOptions::default())
}

pub fn serialize_with_options(
    entries: &[ProcessedEntry],
    language_code: &str,
    metadata: &ParseMetadata,
    options: SerializeOptions,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("[LanguageID] {}\n", language_code));
    if let Some(table_id) = &metadata.table_id {
        output.push_str(&format!("[TableID] {}\n", table_id));
    }
    if options.keep_raw_header {
        for line in &metadata.raw_header {
            output.push_str(line);
            output.push('\n');
        }
    }

    let echo_prefix = format!("[{}] ", language_code);
    let mut active_table = metadata.table_id.as_deref();

    for entry in entries.iter().filter(|e| e.language_code == language_code) {
        output.push('\n');

        // A file may switch tables midway; re-announce so each entry keeps its table.
        // An empty `[TableID]` line resets to no table.
        let table_id = entry.table_id.as_deref();
        if active_table != table_id {
            match table_id {
                Some(table_id) => output.push_str(&format!("[TableID] {}\n", table_id)),
                None => output.push_str("[TableID]\n"),
            }
            active_table = table_id;
        }

        output.push_str(&format!("[StringKey] {}\n", entry.string_key));

        let value = entry
            .translated_value
            .strip_prefix(echo_prefix.as_str())
            .unwrap_or(&entry.translated_value);
        output.push_str(&format!("[Value] {}\n", value));
    }

    output
}

/// Group entries by language code, keeping languages in order of first appearance
pub fn group_by_language(entries: &[ProcessedEntry]) -> Vec<(String, Vec<ProcessedEntry>)> {
    let mut groups: Vec<(String, Vec<ProcessedEntry>)> = Vec::new();
    for entry in entries {
        match groups
            .iter_mut()
            .find(|(code, _)| *code == entry.language_code)
        {
            Some((_, group)) => group.push(entry.clone()),
            None => groups.push((entry.language_code.clone(), vec![entry.clone()])),
        }
    }
    groups
}
