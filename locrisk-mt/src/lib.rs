//! Machine translation for locrisk
//!
//! Sends parsed entries to a translation backend in chunks, one target
//! language at a time, scans every result for localization risks and writes
//! the localized files and the CSV report.
//!
//! # Workflow Example
//!
//! ```ignore
//! use locrisk::{LanguageSelection, parse, serialize};
//! use locrisk_mt::{BatchOrchestrator, ChunkSize, Provider, ProviderKind, ProviderSettings};
//! use locrisk_mt::observer::tracing_observer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Parse the source file
//!     let parsed = parse(&std::fs::read_to_string("strings_en.txt")?);
//!
//!     // 2. Resolve the target languages
//!     let languages = LanguageSelection::Custom(vec!["de-DE".into(), "ar-SA".into()]).resolve()?;
//!
//!     // 3. Translate and scan
//!     let settings = ProviderSettings::from_env();
//!     let provider = Provider::build(ProviderKind::LmStudio, &settings, None, None, tracing_observer())?;
//!     let result = BatchOrchestrator::new(&provider)
//!         .with_chunk_size(ChunkSize::from(20))
//!         .run(&parsed.entries, &languages)
//!         .await;
//!
//!     // 4. Write one file per language
//!     for language in &languages {
//!         println!("{}", serialize(&result.entries, &language.code, &parsed.metadata));
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod echo;
pub mod error;
pub mod export;
pub mod lmstudio;
pub mod observer;
pub mod openai;
pub mod orchestrator;
pub mod provider;
pub mod remote;
pub mod response;
pub mod translator;
pub mod wire;


// Re-export main types for convenient access
pub use echo::{EchoMode, EchoTranslator};
pub use error::{ExportError, ProviderError, ProviderResult};
pub use export::{
    ARCHIVE_NAME, ExportReport, OutputOptions, archive_bytes, export_text, report_file_name,
    text_file_name, write_archive, write_outputs,
};
pub use lmstudio::LmStudioTranslator;
pub use observer::{LogLevel, LogRecord, MemoryObserver, RunObserver, TracingObserver};
pub use openai::OpenAiTranslator;
pub use orchestrator::{BatchOrchestrator, BatchResult, ChunkSize, SkippedLanguage};
pub use provider::{Provider, ProviderKind, ProviderSettings};
pub use remote::RemoteTranslator;
pub use response::decode_translations;
pub use translator::Translator;
pub use wire::{ErrorResponse, TranslateRequest, TranslateResponse};
