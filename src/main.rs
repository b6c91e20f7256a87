use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use shipdesk::cli::{
    handle_config_command, handle_init_command, handle_recover_command, handle_ship_command,
};
use shipdesk::config::{Settings, ShipdeskPaths};

#[derive(Parser)]
#[command(
    name = "shipdesk",
    author = "Kaylee Beyene",
    version,
    about = "Shipment and account recovery wizards for ShipDesk",
    long_about = "Shipdesk walks you through resetting a forgotten password and \
                  creating shipments, one step at a time, from the command line."
)]
struct Cli {
    /// Override the data directory
    #[arg(long, global = true, env = "SHIPDESK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset a forgotten password
    #[command(alias = "forgot-password")]
    Recover,

    /// Create and submit a shipment
    Ship,

    /// Write the default configuration
    Init,

    /// Show current configuration and paths
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => ShipdeskPaths::with_base_dir(dir),
        None => ShipdeskPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    shipdesk::logging::init(&paths, &settings)?;

    match cli.command {
        Some(Commands::Recover) => handle_recover_command(&settings).await?,
        Some(Commands::Ship) => handle_ship_command(&settings).await?,
        Some(Commands::Init) => handle_init_command(&paths, &settings)?,
        Some(Commands::Config) => handle_config_command(&paths, &settings)?,
        None => {
            println!("Shipdesk - shipment and account recovery wizards");
            println!();
            println!("Run 'shipdesk --help' for usage information.");
            println!("Run 'shipdesk recover' to reset a password.");
        }
    }

    Ok(())
}
