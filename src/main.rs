use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adventure::cli::commands::{parse::ParseOptions, search::SearchOptions};
use adventure::{ConfigLoader, SearchArea};

#[derive(Parser)]
#[command(name = "adventure")]
#[command(
    version,
    about = "Turn natural-language venue requests into structured search intents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Config file (skips global and project layers)")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a venue request into a structured intent
    Parse {
        #[arg(help = "Request text, e.g. \"Хочу в тихий бар с друзьями\"")]
        text: Option<String>,
        #[arg(long, short, default_value = "0", help = "User id attached to the response")]
        user_id: i64,
        #[arg(long, short, help = "Raw JSON request body: {\"user_id\": .., \"text\": ..}")]
        request: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Search organizations directly
    Search {
        #[arg(help = "Search text")]
        text: String,
        #[arg(long, allow_hyphen_values = true, help = "Latitude of the search center")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, help = "Longitude of the search center")]
        lon: Option<f64>,
        #[arg(long, help = "Search radius in meters")]
        radius: Option<i64>,
        #[arg(long, help = "Results per page")]
        results: Option<u32>,
        #[arg(long, help = "Text-only search, ignores location options")]
        raw: bool,
    },

    /// Show service health
    Health {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mAdventure encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            adventure::cli::Output::new().error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Path and init must work even when the current config is broken
    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Path => return Ok(adventure::cli::commands::config::path()?),
            ConfigAction::Init { global, force } => {
                return Ok(adventure::cli::commands::config::init(*global, *force)?);
            }
            ConfigAction::Show { .. } => {}
        }
    }

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let filter = if cli.verbose || config.debug {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Parse {
            text,
            user_id,
            request,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(adventure::cli::commands::parse::run(
                &config,
                ParseOptions {
                    text,
                    user_id,
                    request,
                    format,
                },
            ))?;
        }
        Commands::Search {
            text,
            lat,
            lon,
            radius,
            results,
            raw,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(adventure::cli::commands::search::run(
                &config,
                SearchOptions {
                    text,
                    area: SearchArea {
                        latitude: lat,
                        longitude: lon,
                        radius,
                        results,
                    },
                    raw,
                },
            ))?;
        }
        Commands::Health { format } => {
            adventure::cli::commands::health::run(&config, &format)?;
        }
        Commands::Config { action } => {
            if let ConfigAction::Show { format } = action {
                adventure::cli::commands::config::show(&config, &format)?;
            }
        }
    }

    Ok(())
}
