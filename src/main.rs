#[macro_use]
mod utils;
mod cli;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cli::{list::list_cmd, resolve::resolve_cmd, ColorMode};
use tracing_subscriber::EnvFilter;
use utils::errors::configure_color;

use modelroute::config::read_config;

#[derive(
    Parser, Default, Clone, Copy, ValueEnum, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum RequestedColorMode {
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "modelroute")]
#[command(
    about = "Resolve model requests into ready-to-use chat model clients",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value_t = RequestedColorMode::default())]
    color: RequestedColorMode,
    /// Read the configuration from the specified file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a model into its primary and backup clients
    Resolve(ResolveArgs),
    /// List configuration objects
    List(ListArgs),
}

/// Output formats
#[derive(
    Parser, ValueEnum, Default, Clone, Copy, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum ListingFormat {
    /// Format the output as a table
    #[default]
    Table,
    /// Format the output as JSON
    Json,
    /// Format the output as a table without a header
    HeaderlessTable,
}

#[derive(Parser)]
pub(crate) struct ResolveArgs {
    /// The model, as <provider>/<model>, or "auto"
    model: String,
    /// Treat the specified <provider>/<model> as having failed recently
    #[arg(long)]
    failed: Vec<String>,
    /// Output the resolution with the specified format
    #[arg(short, long, default_value_t = ListingFormat::default())]
    format: ListingFormat,
}

/// Possible listings
#[derive(Subcommand)]
pub(crate) enum ListObject {
    /// Known providers
    Providers,
}

#[derive(Parser)]
pub(crate) struct ListArgs {
    /// Output the listing with the specified format
    #[arg(short, long, default_value_t = ListingFormat::default())]
    format: ListingFormat,
    /// List the specified object
    #[command(subcommand)]
    object: ListObject,
}

fn configure_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    configure_color(ColorMode::resolve_auto(cli.color));
    configure_tracing();

    let loaded = match read_config(cli.config.clone()) {
        Ok(loaded) => loaded,
        Err(err) => die!("{}", err),
    };

    for key in &loaded.extraneous_keys {
        warn!("config contains extraneous key \"{}\", ignoring", key);
    }

    match &cli.command {
        Commands::Resolve(args) => resolve_cmd(&loaded.config, args).await,
        Commands::List(args) => list_cmd(&loaded.config, args).await,
    }
}
