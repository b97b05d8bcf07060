//! resload - extract a bundled native library and load it
//!
//! Mostly a debugging aid for checking that a library inside a bundle
//! (directory or zip/jar archive) loads on this machine.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use resload::resources::{provider_for_path, ResourceChain};
use resload::{LibraryLoader, LoaderConfig};

#[derive(Parser)]
#[command(name = "resload")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dry run mode - extract the library but do not load it
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a library resource and load it into this process
    Load {
        /// Resource name, e.g. native/libfoo.so
        resource: String,

        /// Directories or zip archives to search, in order
        #[arg(
            short,
            long = "resources",
            env = "RESLOAD_RESOURCE_PATH",
            value_delimiter = ':',
            required = true
        )]
        resources: Vec<PathBuf>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Call an exported `int fn(void)` after loading and print the result
        #[arg(long)]
        call: Option<String>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file
        config: PathBuf,
    },

    /// Generate a sample configuration file
    GenerateConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "resload.toml")]
        output: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Load {
            resource,
            resources,
            config,
            call,
        } => cmd_load(&resource, &resources, config, call.as_deref(), cli.dry_run)?,
        Commands::Validate { config } => cmd_validate(&config)?,
        Commands::GenerateConfig { output } => cmd_generate_config(&output)?,
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<LoaderConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            LoaderConfig::from_file(&path)?
        }
        None => LoaderConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn cmd_load(
    resource: &str,
    search_path: &[PathBuf],
    config_path: Option<PathBuf>,
    call: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let mut chain = ResourceChain::new();
    for path in search_path {
        let provider = provider_for_path(path)
            .with_context(|| format!("cannot open resource bundle {}", path.display()))?;
        chain.push(provider);
    }

    let loader = LibraryLoader::with_config(chain, config);

    if dry_run {
        let extracted = loader.extract(resource)?;
        println!(
            "  [dry-run] Would load {} ({} bytes)",
            extracted.path.display(),
            extracted.size
        );
        return Ok(());
    }

    let library = loader.load_library(resource)?;
    println!("✓ Loaded {} from {}", resource, library.path().display());

    if let Some(symbol) = call {
        type EntryFn = unsafe extern "C" fn() -> libc::c_int;
        // The caller vouches for the signature.
        let entry: EntryFn = unsafe { library.symbol(symbol) }
            .with_context(|| format!("symbol not found: {}", symbol))?;
        let result = unsafe { entry() };
        println!("{}() = {}", symbol, result);
    }

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    let config = LoaderConfig::from_file(config_path)?;
    config.validate()?;
    println!("✓ Configuration is valid");
    Ok(())
}

fn cmd_generate_config(output: &Path) -> Result<()> {
    let sample = LoaderConfig::sample();
    let content = toml::to_string_pretty(&sample)?;
    std::fs::write(output, content)?;
    println!("✓ Sample configuration written to {}", output.display());
    Ok(())
}
