//! monosprite - headless 1-bit sprite editor host

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use monosprite_formats::LocalBridge;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod convert;
mod host;
mod stdio;

use convert::OutputFormat;
use host::SessionHost;

#[derive(Parser)]
#[command(name = "monosprite", version, about = "1-bit sprite editor")]
struct Cli {
    #[arg(help = "JSON editor config file", long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run an editing session over JSON lines on stdin/stdout (default)")]
    Session,

    #[command(about = "Convert an image or bitmap into a 1-bit format")]
    Convert {
        input: PathBuf,
        output: PathBuf,

        #[arg(help = "Output format, inferred from the extension when omitted", long, value_enum)]
        format: Option<OutputFormat>,

        #[arg(help = "Luma cutoff for color images (0-255)", long)]
        threshold: Option<f64>,

        #[arg(help = "Scale factor for PNG output", long, default_value_t = 1)]
        scale: u32,
    },

    #[command(about = "Print a thresholded image as text")]
    Preview {
        input: PathBuf,

        #[arg(help = "Luma cutoff for color images (0-255)", long)]
        threshold: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Stdout carries protocol output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    let bridge = LocalBridge::new(config.threshold);

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => {
            info!("Starting session on stdio");
            let (host, outcomes) = SessionHost::new(&config)?;
            stdio::run(host, outcomes, tokio::io::stdin(), tokio::io::stdout()).await?;
        }
        Commands::Convert {
            input,
            output,
            format,
            threshold,
            scale,
        } => {
            convert::convert(&bridge, &input, &output, format, threshold, scale).await?;
        }
        Commands::Preview { input, threshold } => {
            let buffer =
                host::import_file(&bridge, &input.to_string_lossy(), threshold).await?;
            print!("{}", convert::render_text(&buffer));
        }
    }
    Ok(())
}
