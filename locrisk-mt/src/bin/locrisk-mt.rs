use clap::{Arg, ArgAction, Command, value_parser};
use locrisk::{LanguageSelection, RiskKind, RiskSummary, SerializeOptions, parse};
use locrisk_mt::observer::tracing_observer;
use locrisk_mt::{
    BatchOrchestrator, ChunkSize, OutputOptions, Provider, ProviderKind, ProviderSettings,
    Translator, write_outputs,
};
use std::io::Read;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("locrisk-mt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Batch-translate a tagged localization file and audit the results for localization risks")
        .arg(
            Arg::new("input")
                .help("Source file in the tagged [StringKey]/[Value] format, or - for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Target language code (repeatable, e.g. -t de-DE -t ar-SA)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .help("Translate into every supported language")
                .action(ArgAction::SetTrue)
                .conflicts_with("target"),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .short('p')
                .help("Translation backend")
                .value_parser(["echo", "openai", "lmstudio", "remote"])
                .default_value("echo"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .help("Backend the remote service should use (mock, openai, lmstudio)")
                .default_value("mock"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .env("LOCRISK_ENDPOINT")
                .help("LM Studio base URL, or the service URL with --provider remote"),
        )
        .arg(
            Arg::new("context")
                .long("context")
                .env("LOCRISK_CONTEXT")
                .help("Free-text guidance sent with every request (e.g. \"fantasy RPG, formal tone\")"),
        )
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .help("Strings per request, 0 sends everything at once")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .short('o')
                .help("Directory for the localized files and the report")
                .value_parser(value_parser!(PathBuf))
                .default_value("."),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Write the CSV risk report")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-text")
                .long("no-text")
                .help("Do not write the localized text files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep-header")
                .long("keep-header")
                .help("Copy unrecognized header tags into the localized files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show per-chunk progress and every warning")
                .action(ArgAction::SetTrue),
        )
}

fn read_source(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();
    let verbose = matches.get_flag("verbose");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(if verbose { "debug" } else { "info" }.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // 1. Validate input before any work
    let input = matches.get_one::<String>("input").unwrap();
    let source = read_source(input).map_err(|e| format!("Cannot read {}: {}", input, e))?;
    if source.trim().is_empty() {
        eprintln!("❌ Please provide source text");
        return Err("No source text".into());
    }

    let codes: Vec<String> = matches
        .get_many::<String>("target")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let languages = match LanguageSelection::from_codes(&codes, matches.get_flag("all")).resolve() {
        Ok(languages) => languages,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   Use -t <code> (repeatable) or --all");
            return Err(e.into());
        }
    };

    // 2. Parse
    let parsed = parse(&source);
    if parsed.entries.is_empty() {
        eprintln!("⚠️  No [StringKey]/[Value] pairs found in {}", input);
    }
    if verbose {
        println!(
            "📝 Parsed {} entries (source language: {})",
            parsed.entries.len(),
            parsed.metadata.language_id.as_deref().unwrap_or("unknown")
        );
        println!(
            "🌍 Targets: {}",
            languages
                .iter()
                .map(|l| l.code.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    // 3. Build the backend
    let settings = ProviderSettings::from_env();
    let endpoint = matches.get_one::<String>("endpoint").cloned();
    let provider = match matches.get_one::<String>("provider").map(String::as_str) {
        Some("remote") => {
            let backend: ProviderKind = matches.get_one::<String>("backend").unwrap().parse()?;
            let url = endpoint
                .as_deref()
                .ok_or("--endpoint is required with --provider remote")?;
            Provider::remote(url, backend, &settings, None, settings.openai_api_key.clone())?
        }
        Some(name) => {
            let kind: ProviderKind = name.parse()?;
            Provider::build(kind, &settings, endpoint.as_deref(), None, tracing_observer())?
        }
        None => unreachable!("provider has a default value"),
    };

    // 4. Translate and scan
    let chunk_size = ChunkSize::from(*matches.get_one::<usize>("chunk-size").unwrap());
    let result = BatchOrchestrator::new(&provider)
        .with_chunk_size(chunk_size)
        .with_context(matches.get_one::<String>("context").cloned())
        .run(&parsed.entries, &languages)
        .await;

    for skipped in &result.skipped {
        eprintln!("❌ {} skipped: {}", skipped.code, skipped.error);
    }

    let summary = RiskSummary::from_entries(&result.entries);
    println!(
        "✅ {} results via {} ({} passed, {} warnings)",
        summary.entries,
        provider.provider_name(),
        summary.passed,
        summary.warnings()
    );
    for kind in RiskKind::ALL {
        if let Some(count) = summary.by_kind.get(&kind) {
            println!("   {}: {}", kind, count);
        }
    }
    if verbose {
        for entry in result.entries.iter().filter(|e| !e.risks.is_empty()) {
            for risk in &entry.risks {
                println!("   [{}] {}: {}", entry.language_code, entry.string_key, risk.message);
            }
        }
    }

    // 5. Export
    let options = OutputOptions {
        text: !matches.get_flag("no-text"),
        csv: matches.get_flag("csv"),
        serialize: SerializeOptions {
            keep_raw_header: matches.get_flag("keep-header"),
        },
    };
    let out_dir = matches.get_one::<PathBuf>("out-dir").unwrap();
    let report = write_outputs(out_dir, &result.entries, &parsed.metadata, &options);
    for path in &report.written {
        println!("💾 {}", path.display());
    }
    for (path, error) in &report.failures {
        eprintln!("❌ Failed to write {}: {}", path.display(), error);
    }

    if result.entries.is_empty() && !result.skipped.is_empty() {
        return Err("Every target language failed".into());
    }
    Ok(())
}
