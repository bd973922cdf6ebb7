// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use errory::ErroryFactory;
use errory_cli::commands::{self, BuildOptions};
use errory_cli::format::{format_variants_table, format_warnings};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "errory", version, about = "Inspect and exercise errory factory configurations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the variants a config generates.
    Variants {
        /// Factory config (TOML, or JSON with a `.json` extension).
        #[arg(long)]
        config: PathBuf,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Construct an error and print its snapshot.
    Build {
        /// Factory config.
        #[arg(long)]
        config: PathBuf,

        /// Code of the variant to use.
        #[arg(long)]
        code: String,

        /// Message override.
        #[arg(long)]
        message: Option<String>,

        /// Status override: a number or a name such as NOT_FOUND.
        #[arg(long)]
        status: Option<String>,

        /// Classification override.
        #[arg(long)]
        expected: Option<bool>,

        /// Metadata as key=value; values are parsed as JSON when possible.
        /// Can be repeated.
        #[arg(long = "meta")]
        meta: Vec<String>,

        /// Print the full snapshot instead of the human-logging view.
        #[arg(long)]
        raw: bool,
    },

    /// Normalize a JSON payload into an error of the configured family.
    Normalize {
        /// Factory config.
        #[arg(long)]
        config: PathBuf,

        /// JSON payload; read from stdin when absent or `-`.
        payload: Option<String>,

        /// Print the full snapshot instead of the human-logging view.
        #[arg(long)]
        raw: bool,
    },

    /// Resolve a status number or name.
    Status {
        /// e.g. 404 or NOT_FOUND.
        input: String,
    },

    /// Print the JSON schema of the factory config.
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("errory=debug")
    } else {
        EnvFilter::new("errory=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Variants { config, json } => cmd_variants(&config, json),
        Commands::Build {
            config,
            code,
            message,
            status,
            expected,
            meta,
            raw,
        } => {
            let opts = BuildOptions {
                code,
                message,
                status,
                expected,
                meta,
            };
            cmd_build(&config, &opts, raw)
        }
        Commands::Normalize {
            config,
            payload,
            raw,
        } => cmd_normalize(&config, payload.as_deref(), raw),
        Commands::Status { input } => {
            println!("{}", commands::status_report(&input));
            Ok(())
        }
        Commands::Schema => {
            println!("{}", commands::schema_json()?);
            Ok(())
        }
    }
}

/// Load the factory and print its config warnings once, to stderr.
fn load(config: &Path) -> Result<ErroryFactory> {
    let (factory, warnings) = commands::load_factory(config)?;
    eprint!("{}", format_warnings(&warnings));
    Ok(factory)
}

fn cmd_variants(config: &Path, json: bool) -> Result<()> {
    let factory = load(config)?;
    let descriptors: Vec<_> = factory.variants().map(|v| v.descriptor()).collect();
    if json {
        let out = serde_json::to_string_pretty(&descriptors).context("serialize variants")?;
        println!("{out}");
    } else {
        print!("{}", format_variants_table(&descriptors));
    }
    Ok(())
}

fn cmd_build(config: &Path, opts: &BuildOptions, raw: bool) -> Result<()> {
    let factory = load(config)?;
    let e = commands::build_error(&factory, opts)?;
    println!("{}", commands::render_errory(&e, raw)?);
    Ok(())
}

fn cmd_normalize(config: &Path, payload: Option<&str>, raw: bool) -> Result<()> {
    let factory = load(config)?;
    let input = commands::read_payload(payload)?;
    let e = commands::normalize_payload(&factory, &input);
    println!("{}", commands::render_errory(&e, raw)?);
    Ok(())
}
