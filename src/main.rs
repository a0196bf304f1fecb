// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "viewfinder")]
#[command(about = "Camera viewfinder core: code detection overlay and square photo capture")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect codes in an image and print the resulting overlay state
    Scan {
        /// Image to scan (stands in for one preview frame)
        image: PathBuf,

        /// Viewport size as WIDTHxHEIGHT (default: the image size)
        #[arg(long, value_parser = cli::parse_viewport)]
        viewport: Option<(u32, u32)>,

        /// Write the rendered preview with the overlay box to this file
        #[arg(long)]
        annotate: Option<PathBuf>,
    },

    /// Take a square photo from an image file
    Photo {
        /// Image used as the capture source
        image: PathBuf,

        /// Output directory (default: ~/Pictures/viewfinder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Interface orientation at capture time (portrait, landscape-left, ...)
        #[arg(long)]
        orientation: Option<String>,
    },

    /// Print the effective configuration
    Config {
        /// Print the config file path instead
        #[arg(long)]
        path: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=viewfinder=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.or_else(viewfinder::Config::default_path);

    match cli.command {
        Commands::Scan {
            image,
            viewport,
            annotate,
        } => cli::scan(config_path.as_deref(), &image, viewport, annotate.as_deref()),
        Commands::Photo {
            image,
            output,
            orientation,
        } => cli::take_photo(config_path.as_deref(), &image, output, orientation.as_deref()),
        Commands::Config { path } => cli::show_config(config_path.as_deref(), path),
    }
}
