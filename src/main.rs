use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use ridesplit::batch;
use ridesplit::config::AnalysisConfig;
use ridesplit::export::encoder_for;
use ridesplit::import::DecoderRegistry;
use ridesplit::logging::{init_logging, LogConfig, LogLevel};
use ridesplit::report;
use ridesplit::segmenter::StopSegmenter;
use ridesplit::splitter::split_activity;
use ridesplit::zones::ZoneClassifier;

/// RideSplit - Ride Telemetry Analysis CLI
///
/// Finds the stops in a recorded ride, reports power-zone distribution
/// against FTP, and splits one recording into separate sub-activities.
#[derive(Parser)]
#[command(name = "ridesplit")]
#[command(version = "0.1.0")]
#[command(about = "Ride telemetry stop and zone analysis", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect and report stops in an activity file
    Stops {
        /// Input activity file (FIT or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Minimum stop duration in seconds
        #[arg(short, long, default_value = "60")]
        min_stop: i64,
    },

    /// Report time in power zones against an FTP value
    Zones {
        /// Input activity file (FIT or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Functional threshold power in watts
        #[arg(long)]
        ftp: u16,
    },

    /// Split an activity into sub-activities at its stops
    Split {
        /// Input activity file (FIT or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Minimum stop duration in seconds
        #[arg(short, long, default_value = "60")]
        min_stop: i64,

        /// Output directory for the sub-activity files
        #[arg(short, long, default_value = "splits")]
        output: PathBuf,

        /// Output format (csv, json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Analyze every activity file in a directory
    Batch {
        /// Directory containing activity files
        #[arg(short, long)]
        dir: PathBuf,

        /// Minimum stop duration in seconds
        #[arg(short, long, default_value = "60")]
        min_stop: i64,

        /// Functional threshold power in watts (enables zone analysis)
        #[arg(long)]
        ftp: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        ..LogConfig::default()
    };
    init_logging(&log_config)?;

    let config_path = match cli.config {
        Some(path) => path,
        None => AnalysisConfig::default_path()?,
    };
    let config = AnalysisConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    config.validate()?;

    match cli.command {
        Commands::Stops { file, min_stop } => {
            let samples = DecoderRegistry::new().decode_file(&file)?;
            let segmenter = StopSegmenter::new(&config)?;
            let stops = segmenter.segment(&samples, Duration::seconds(min_stop))?;
            let final_leg = segmenter.final_leg(&samples, &stops);

            println!("{}", format!("Stops in {}", file.display()).green().bold());
            println!(
                "{}",
                report::render_stops(&samples, &stops, final_leg.as_ref(), config.units)
            );
            println!(
                "{}",
                format!("✓ {} stops of at least {}s", stops.len(), min_stop).green()
            );
        }

        Commands::Zones { file, ftp } => {
            let samples = DecoderRegistry::new().decode_file(&file)?;
            let classifier = ZoneClassifier::new(&config)?;
            let summary = classifier.classify(&samples, ftp)?;

            println!(
                "{}",
                format!("Power zones for {} (FTP {} W)", file.display(), ftp)
                    .blue()
                    .bold()
            );
            println!("{}", report::render_zones(&summary));
        }

        Commands::Split {
            file,
            min_stop,
            output,
            format,
        } => {
            let samples = DecoderRegistry::new().decode_file(&file)?;
            let segmenter = StopSegmenter::new(&config)?;
            let stops = segmenter.segment(&samples, Duration::seconds(min_stop))?;

            let base_name = file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("activity")
                .to_string();
            let encoder = encoder_for(&format, output.clone())?;
            let written = split_activity(&samples, &stops, &base_name, encoder.as_ref())?;

            println!("{}", "Splitting activity...".yellow().bold());
            for name in &written {
                println!("  {}", name);
            }
            println!(
                "{}",
                format!("✓ wrote {} sub-activities to {}", written.len(), output.display())
                    .yellow()
            );
        }

        Commands::Batch { dir, min_stop, ftp } => {
            println!("{}", format!("Analyzing {}", dir.display()).cyan().bold());
            let summary =
                batch::analyze_directory(&dir, &config, Duration::seconds(min_stop), ftp)?;

            println!(
                "{}",
                format!(
                    "✓ {} of {} files analyzed",
                    summary.outcomes.len(),
                    summary.total_files
                )
                .cyan()
            );
            if !summary.is_fully_successful() {
                for (path, error) in &summary.errors {
                    eprintln!("{}", format!("  ✗ {}: {}", path.display(), error).red());
                }
                anyhow::bail!("{} files failed to analyze", summary.errors.len());
            }
        }
    }

    Ok(())
}
