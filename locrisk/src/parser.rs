//! Parser for the tagged-line localization format.
//!
//! ```text
//! [LanguageID] en-US
//! [TableID] HUD_Main
//!
//! * Common Actions
//! [StringKey] BTN_ACCEPT
//! [Value] Accept
//! ```
//!
//! Parsing never fails. Blank lines and `*` comments are ignored, lines that
//! are not of the form `[Tag] Value` are dropped, and unknown tags are kept
//! verbatim in [`ParseMetadata::raw_header`].

use std::sync::LazyLock;

use regex::Regex;

use crate::entry::{LocalizationEntry, ParseMetadata, ParseResult};

static TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.*?)\]\s*(.*)$").expect("tag line pattern is valid"));

/// Tags with a meaning to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    LanguageId,
    TableId,
    StringKey,
    Value,
    Other,
}

impl Tag {
    fn from_name(name: &str) -> Self {
        match name {
            "LanguageID" => Tag::LanguageId,
            "TableID" => Tag::TableId,
            "StringKey" => Tag::StringKey,
            "Value" => Tag::Value,
            _ => Tag::Other,
        }
    }
}

/// Entry assembly state.
///
/// | state            | StringKey        | Value             |
/// |------------------|------------------|-------------------|
/// | Idle             | KeyOpen          | Idle (ignored)    |
/// | KeyOpen          | KeyOpen (drop)   | KeyAndValueOpen   |
/// | KeyAndValueOpen  | emit, KeyOpen    | KeyAndValueOpen   |
///
/// An empty `StringKey` moves to Idle instead of KeyOpen. `LanguageID`,
/// `TableID` and unknown tags never change the state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    KeyOpen {
        key: String,
        table_id: Option<String>,
    },
    KeyAndValueOpen {
        key: String,
        value: String,
        table_id: Option<String>,
    },
}

pub struct Parser {
    source: String,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Parser {
            source: source.to_string(),
        }
    }

    pub fn parse(&mut self) -> ParseResult {
        let mut entries = Vec::new();
        let mut metadata = ParseMetadata::default();
        let mut current_table: Option<String> = None;
        let mut state = State::Idle;

        for line in self.source.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('*') {
                continue;
            }

            let Some(caps) = TAG_LINE.captures(trimmed) else {
                continue;
            };
            let name = caps.get(1).map_or("", |m| m.as_str());
            let value = caps.get(2).map_or("", |m| m.as_str());

            state = match Tag::from_name(name) {
                Tag::LanguageId => {
                    metadata.language_id = Some(value.to_string());
                    state
                }
                Tag::TableId => {
                    current_table = (!value.is_empty()).then(|| value.to_string());
                    metadata.table_id = current_table.clone();
                    state
                }
                Tag::StringKey => {
                    if let Some(entry) = Self::finalize(state) {
                        entries.push(entry);
                    }
                    // An empty key opens nothing, so its value is ignored
                    if value.is_empty() {
                        State::Idle
                    } else {
                        State::KeyOpen {
                            key: value.to_string(),
                            table_id: current_table.clone(),
                        }
                    }
                }
                Tag::Value => match state {
                    State::Idle => State::Idle,
                    State::KeyOpen { key, table_id }
                    | State::KeyAndValueOpen { key, table_id, .. } => State::KeyAndValueOpen {
                        key,
                        value: value.to_string(),
                        table_id,
                    },
                },
                Tag::Other => {
                    metadata.raw_header.push(line.to_string());
                    state
                }
            };
        }

        if let Some(entry) = Self::finalize(state) {
            entries.push(entry);
        }

        ParseResult { entries, metadata }
    }

    /// Turn a complete key/value pair into an entry; incomplete states yield nothing
    fn finalize(state: State) -> Option<LocalizationEntry> {
        match state {
            State::KeyAndValueOpen {
                key,
                value,
                table_id,
            } => Some(LocalizationEntry::new(&key, &value, table_id.as_deref())),
            State::Idle | State::KeyOpen { .. } => None,
        }
    }
}

/// Parse tagged text into entries and header metadata
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source).parse()
}
