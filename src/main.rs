//! memcore — memory tool server for an AI collaborator
//!
//! Usage:
//!   memcore                              → serve on stdio (same as `serve`)
//!   memcore serve --memory-dir ~/.memory → serve a specific memory directory
//!   memcore check                        → load everything once, print status
//!   memcore dump-config                  → print the default config
//!   memcore version                      → show version
//!
//! stdout carries protocol frames only; all logging goes to stderr (and
//! optionally a daily log file).

use clap::{Args, Parser, Subcommand};
use memcore_core::{expand_tilde, MemcoreConfig};
use memcore_memory::MemoryStore;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG: &str = "memcore.json";

#[derive(Parser)]
#[command(
    name = "memcore",
    about = "Memory tool server: narrative log, TF-IDF search, wonders, over JSON-RPC on stdio",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    source: SourceArgs,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Args)]
struct SourceArgs {
    /// Config file (JSON). Falls back to $MEMCORE_CONFIG, then ./memcore.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Memory directory; overrides `memory_dir` from the config
    #[arg(short, long, global = true)]
    memory_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve JSON-RPC on stdin/stdout (default)
    Serve,
    /// Load config and memory files once and print a status report
    Check,
    /// Print the default configuration as JSON
    DumpConfig,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let _guard = init_tracing(cli.log_dir.as_deref())?;
            let config = load_config(&cli.source)?;
            tracing::info!("Memory directory: {}", config.memory_dir.display());
            memcore_server::serve_stdio(config).await?;
        }
        Commands::Check => {
            let _guard = init_tracing(cli.log_dir.as_deref())?;
            let config = load_config(&cli.source)?;
            check(config)?;
        }
        Commands::DumpConfig => {
            println!("{}", MemcoreConfig::default().to_json()?);
        }
        Commands::Version => {
            println!("memcore v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// stderr always; a daily file under `log_dir` when given. The returned
/// guard must live until exit or buffered file lines are lost.
fn init_tracing(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "memcore=info".into());
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let dir = expand_tilde(dir);
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, "memcore.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(guard)
}

fn load_config(source: &SourceArgs) -> anyhow::Result<MemcoreConfig> {
    let path = source
        .config
        .clone()
        .or_else(|| std::env::var("MEMCORE_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = MemcoreConfig::load(&expand_tilde(&path))?;
    if let Some(dir) = &source.memory_dir {
        config.memory_dir = dir.clone();
    }
    config.memory_dir = expand_tilde(&config.memory_dir);
    Ok(config)
}

/// Run the same load the `initialized` notification would and report.
fn check(config: MemcoreConfig) -> anyhow::Result<()> {
    let mut store = MemoryStore::new(config)?;
    let report = store.initialize()?;
    println!("loaded:  {}", report.loaded.join(", "));
    if !report.skipped.is_empty() {
        println!("skipped: {}", report.skipped.join(", "));
    }
    println!("entries: {}  terms: {}", report.entries, report.terms);
    println!("{}", serde_json::to_string_pretty(&store.status())?);
    Ok(())
}
