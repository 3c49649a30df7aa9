//! Chunked, per-language batch translation with risk scanning.
//!
//! Languages run one after another in the order given. Within a language the
//! source strings are split into chunks that are sent strictly in sequence.
//! A failing chunk drops that whole language from the result; the other
//! languages are unaffected. Short responses are padded with empty strings
//! per chunk so a missing item never shifts the items after it.

use std::num::NonZeroUsize;
use std::sync::Arc;

use locrisk::{LanguageOption, LocalizationEntry, ProcessedEntry, RiskScanner};

use crate::error::{ProviderError, ProviderResult};
use crate::observer::{RunObserver, tracing_observer};
use crate::translator::Translator;

/// Most strings sent in one provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkSize {
    /// Everything in one call
    #[default]
    Unbounded,
    Max(NonZeroUsize),
}

impl From<usize> for ChunkSize {
    /// `0` means unbounded
    fn from(size: usize) -> Self {
        NonZeroUsize::new(size).map_or(ChunkSize::Unbounded, ChunkSize::Max)
    }
}

impl ChunkSize {
    pub fn split<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        if items.is_empty() {
            return Vec::new();
        }
        match self {
            ChunkSize::Unbounded => vec![items],
            ChunkSize::Max(max) => items.chunks(max.get()).collect(),
        }
    }
}

/// A language dropped from the run and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLanguage {
    pub code: String,
    pub error: ProviderError,
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Results of every language that succeeded, in request order
    pub entries: Vec<ProcessedEntry>,
    pub skipped: Vec<SkippedLanguage>,
}

impl BatchResult {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub struct BatchOrchestrator<'a, T: Translator + ?Sized> {
    translator: &'a T,
    chunk_size: ChunkSize,
    context: Option<String>,
    scanner: RiskScanner,
    observer: Arc<dyn RunObserver>,
}

impl<'a, T: Translator + ?Sized> BatchOrchestrator<'a, T> {
    pub fn new(translator: &'a T) -> Self {
        Self {
            translator,
            chunk_size: ChunkSize::Unbounded,
            context: None,
            scanner: RiskScanner::default(),
            observer: tracing_observer(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: ChunkSize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Free-text guidance passed with every call; blank means none
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_scanner(mut self, scanner: RiskScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Translate and scan `entries` for every language in `languages`
    pub async fn run(
        &self,
        entries: &[LocalizationEntry],
        languages: &[LanguageOption],
    ) -> BatchResult {
        let mut result = BatchResult::default();

        self.observer.info(
            None,
            format!(
                "Starting batch: {} entries, {} languages, provider {}",
                entries.len(),
                languages.len(),
                self.translator.provider_name()
            ),
        );

        for language in languages {
            let code = language.code.as_str();
            self.observer.info(
                Some(code),
                format!("Processing {} ({})...", language.label, code),
            );

            match self.process_language(entries, code).await {
                Ok(processed) => {
                    self.observer.info(
                        Some(code),
                        format!("Finished {}: {} entries", code, processed.len()),
                    );
                    result.entries.extend(processed);
                }
                Err(error) => {
                    self.observer.error(
                        Some(code),
                        format!("Failed to process {}: {}", code, error),
                    );
                    result.skipped.push(SkippedLanguage {
                        code: code.to_string(),
                        error,
                    });
                }
            }
        }

        self.observer.info(
            None,
            format!(
                "Batch complete: {} results, {} languages skipped",
                result.entries.len(),
                result.skipped.len()
            ),
        );
        result
    }

    async fn process_language(
        &self,
        entries: &[LocalizationEntry],
        code: &str,
    ) -> ProviderResult<Vec<ProcessedEntry>> {
        let texts: Vec<String> = entries.iter().map(|e| e.original_value.clone()).collect();
        let translated = self.translate_chunks(&texts, code).await?;

        Ok(entries
            .iter()
            .zip(translated)
            .map(|(entry, translated_value)| {
                let risks = self
                    .scanner
                    .scan(&entry.original_value, &translated_value, code);
                ProcessedEntry::new(entry, code, translated_value, risks)
            })
            .collect())
    }

    async fn translate_chunks(&self, texts: &[String], code: &str) -> ProviderResult<Vec<String>> {
        let chunks = self.chunk_size.split(texts);
        let total = chunks.len();
        let mut translated = Vec::with_capacity(texts.len());

        for (index, chunk) in chunks.into_iter().enumerate() {
            self.observer.debug(
                Some(code),
                format!("Chunk {}/{} ({} strings)", index + 1, total, chunk.len()),
            );

            let mut output = self
                .translator
                .translate(chunk, code, self.context.as_deref())
                .await?;
            self.align(&mut output, chunk.len(), translated.len(), code);
            translated.extend(output);
        }

        Ok(translated)
    }

    /// Force `output` to `expected` items; `offset` is the chunk's position in the language
    fn align(&self, output: &mut Vec<String>, expected: usize, offset: usize, code: &str) {
        if output.len() > expected {
            self.observer.warn(
                Some(code),
                format!(
                    "Provider returned {} translations for {} strings; extra items ignored",
                    output.len(),
                    expected
                ),
            );
            output.truncate(expected);
        }
        for missing in output.len()..expected {
            self.observer.warn(
                Some(code),
                format!(
                    "Missing translation for string {}; using empty text",
                    offset + missing + 1
                ),
            );
        }
        output.resize(expected, String::new());
    }
}
