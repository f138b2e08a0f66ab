use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ConfigLoader;

pub mod commands;

use self::commands::{FormatTimeArgs, HighlightArgs, PathArgs, SetIdArgs};

#[derive(Parser, Debug)]
#[command(
    name = "teamsite",
    version,
    about = "Run the team site view helpers from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file location (takes precedence over TEAMSITE_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a timestamp as YYYY年MM月DD日
    FormatTime(FormatTimeArgs),
    /// Wrap every occurrence of a search term with the highlight marker
    Highlight(HighlightArgs),
    /// Convert an asset URL between absolute and relative form
    Path(PathArgs),
    /// Number the records of a JSON array (1-based `id` field)
    SetId(SetIdArgs),
    /// Print the navigation bar entries with their ids
    Nav,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let loader = ConfigLoader::discover(cli.config)?;
    let config = loader.load_or_init()?;

    let output = match cli.command {
        Commands::FormatTime(args) => commands::format_time(&args)?,
        Commands::Highlight(args) => commands::highlight(&config, &args),
        Commands::Path(args) => commands::path(&config, &args),
        Commands::SetId(args) => commands::set_id(&args)?,
        Commands::Nav => commands::nav(&config)?,
    };
    println!("{output}");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
    .map(|_| ())
}
