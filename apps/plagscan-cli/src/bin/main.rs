use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use plagscan_core::config::{Config, Settings};
use plagscan_core::types::BlockResult;
use plagscan_embed::get_default_embedder;
use plagscan_hybrid::{highlight_segments, index_corpus, merge_intervals, ComparisonService, Interval};

#[derive(Parser)]
#[command(name = "plagscan")]
#[command(about = "Block-level plagiarism detection against a local reference corpus", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Window the reference corpus and build both indices
    Index {
        /// Raw corpus directory (default: data_raw_dir)
        #[arg(long)]
        raw: Option<PathBuf>,
        /// Preprocessed corpus directory, preferred when non-empty
        #[arg(long)]
        processed: Option<PathBuf>,
    },
    /// Compare a document against the indexed corpus
    Compare {
        /// Query file; `-` or omitted reads stdin
        file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Highlight,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // stdout carries the report
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn read_query(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let bytes = fs::read(&path).map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn run_index(mut settings: Settings, raw: Option<PathBuf>, processed: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(raw) = raw { settings.data_raw_dir = raw.display().to_string(); }
    if let Some(processed) = processed { settings.data_processed_dir = processed.display().to_string(); }
    let embedder = get_default_embedder(&settings)?;
    let (lexical, _) = index_corpus(&settings, embedder.as_ref())?;
    eprintln!("✅ Indexed {} reference blocks", lexical.blocks().len());
    Ok(())
}

fn print_highlight(text: &str, results: &[BlockResult]) {
    let merged = merge_intervals(results.iter().map(Interval::from));
    for seg in highlight_segments(text, &merged) {
        match seg.match_type {
            Some(t) => println!("[{} {}..{}] {}", t, seg.start, seg.end, seg.text),
            None => println!("{}", seg.text),
        }
    }
}

fn run_compare(settings: Settings, file: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let text = read_query(file)?;
    let service = ComparisonService::open(settings)?;
    let results = service.compare(&text)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Highlight => print_highlight(text.trim(), &results),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    match cli.command {
        Commands::Index { raw, processed } => run_index(settings, raw, processed),
        Commands::Compare { file, format } => run_compare(settings, file, format),
    }
}
