use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fsstore::{Result, SerializerKind, StoreConfig};

mod commands;

use commands::{execute, Command};

/// fsstore - inspect and edit a filesystem key-value store
#[derive(Parser, Debug)]
#[command(name = "fsstore")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage root directory [default: .storage]
    #[arg(long)]
    root: Option<PathBuf>,

    /// Namespace below the root; "." stores in the root itself
    #[arg(long)]
    namespace: Option<String>,

    /// Value format: json or native
    #[arg(long)]
    format: Option<SerializerKind>,

    /// Indent JSON files
    #[arg(long)]
    pretty: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => StoreConfig::from_json_file(path)?,
            None => StoreConfig::default(),
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        config.pretty |= self.pretty;

        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = args.store_config()?;
    debug!(?config, "opening store");

    let storage = config.open()?;
    execute(&args.command, &storage, &mut std::io::stdout().lock())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
