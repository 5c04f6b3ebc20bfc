//! CLI entry point for bikemap

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use bikemap::cli::{self, Commands};
use bikemap::Config;

// Load .env at startup
fn load_env() {
    // Look for .env in the current directory or next to the binary
    if dotenvy::dotenv().is_err() {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Bicycle-route map pipeline: classified map sources and a multi-stop
/// route builder
#[derive(Parser)]
#[command(name = "bikemap")]
#[command(author, version)]
#[command(about = "Fetch, classify and export the bicycle map sources, or build a route")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything else
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Fetch { output } => {
            let config = Config::from_env()?;
            info!(output = %output.display(), source = %config.kml_source, "Fetching map sources");
            cli::cmd_fetch(&config, &output).await?;
        }
        Commands::Classify { input, output } => {
            info!(input = %input.display(), output = %output.display(), "Classifying document");
            cli::cmd_classify(&input, &output)?;
        }
        Commands::Route { stops, output } => {
            let config = Config::from_env()?;
            info!(stops = stops.len(), "Building route");
            cli::cmd_route(&config, &stops, output.as_deref()).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
