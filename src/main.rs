// SPDX-License-Identifier: PMPL-1.0-or-later
//! altbot CLI - image alt text linter for built sites

use altbot::config::{default_config_path, load_config, write_default_config, Config};
use altbot::report::{generate_report, OutputFormat};
use altbot::scanner;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Image alt text linter for static-site document trees
#[derive(Parser)]
#[command(name = "altbot")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every supported document in a directory
    Check {
        /// Directory to scan
        dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Configuration file (YAML or TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Check a single HTML or hast JSON document
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Configuration file (YAML or TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Generate a SARIF report for a directory
    Report {
        /// Directory to scan
        dir: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Configuration file (YAML or TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Write a default configuration file
    Init {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("altbot=debug")
    } else {
        EnvFilter::new("altbot=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = path.unwrap_or_else(default_config_path);
    tracing::debug!("Loading configuration from {}", path.display());
    Ok(load_config(&path)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { dir, format, output, config, verbose } => {
            init_logging(verbose);
            let config = resolve_config(config)?;
            let findings = scanner::scan_directory(&dir, &config)?;
            let report = generate_report(&findings, format.into());
            write_output(&report, output.as_deref())?;

            if findings.blocks_release() {
                std::process::exit(1);
            }
        }

        Commands::Analyze { file, format, config, verbose } => {
            init_logging(verbose);
            let config = resolve_config(config)?;
            let findings = scanner::scan_file(&file, &config)?;
            let report = generate_report(&findings, format.into());
            println!("{}", report);

            if findings.blocks_release() {
                std::process::exit(1);
            }
        }

        Commands::Report { dir, output, config, verbose } => {
            init_logging(verbose);
            let config = resolve_config(config)?;
            let findings = scanner::scan_directory(&dir, &config)?;
            let report = generate_report(&findings, OutputFormat::Sarif);
            write_output(&report, output.as_deref())?;
        }

        Commands::Init { path, force } => {
            init_logging(false);
            let path = path.unwrap_or_else(default_config_path);
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            write_default_config(&path)?;
            eprintln!("Configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
