//! meterctl - Meter Hierarchy Tool for VoltageEMS
//!
//! Offline inspection of meter snapshots: write-path validation, hierarchy
//! classification, code suggestions and forest rendering.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(name = "meterctl")]
#[command(about = "Meter hierarchy tool for VoltageEMS")]
#[command(long_about = "Meter hierarchy tool for VoltageEMS

Commands:
  tree        Build the 400kV -> 132kV -> 11kV/380V forest from a snapshot
  validate    Run transformer code checks on every meter
  classify    Show which meters have a complete code set
  suggest     Suggest area and transformer codes for a meter identifier

Examples:
  meterctl tree meters.json                    # Render the forest
  meterctl tree meters.yaml --format json      # Forest as JSON
  meterctl validate meters.json --brief        # Only list failures
  meterctl suggest PQMS_11KV.APA0042_H3 11kV   # -> APA, APA132, APA011")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Extra configuration file (toml, yaml or json)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Directory searched for meterctl.{toml,yaml,json}
    #[arg(long = "config-dir", global = true, default_value = "config")]
    config_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and print the meter forest
    Tree {
        /// Meter snapshot (.json, .yaml or .yml)
        snapshot: PathBuf,

        /// Output format (default from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Validate transformer codes of every meter
    Validate {
        /// Meter snapshot (.json, .yaml or .yml)
        snapshot: PathBuf,

        /// Only print failing meters
        #[arg(short = 'b', long = "brief")]
        brief: bool,
    },

    /// Classify hierarchy completeness of every meter
    Classify {
        /// Meter snapshot (.json, .yaml or .yml)
        snapshot: PathBuf,

        /// Only print incomplete meters
        #[arg(short, long)]
        incomplete_only: bool,
    },

    /// Suggest codes from a meter identifier
    Suggest {
        /// Meter identifier, e.g. PQMS_11KV.APA0042_H3
        meter_code: String,

        /// Voltage level: 400kV, 132kV, 11kV or 380V
        voltage_level: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(&cli.config_dir, cli.config.as_deref())?;

    // Configure colored output
    if cli.no_color || !config.color {
        colored::control::set_override(false);
    }

    // Initialize logging; RUST_LOG wins over config
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Tree { snapshot, format } => {
            commands::tree(&snapshot, format.unwrap_or(config.output.format))?;
        },
        Commands::Validate { snapshot, brief } => {
            if !commands::validate(&snapshot, &config.rules, brief)? {
                std::process::exit(1);
            }
        },
        Commands::Classify {
            snapshot,
            incomplete_only,
        } => {
            commands::classify_all(&snapshot, incomplete_only)?;
        },
        Commands::Suggest {
            meter_code,
            voltage_level,
        } => {
            commands::suggest(&meter_code, &voltage_level)?;
        },
    }

    Ok(())
}
