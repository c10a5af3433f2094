use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use proxysheet::ScryfallClient;

/// Fetch card images from scryfall and compose them into printable 3x3 proxy
/// sheets (8.5x11 inches at 300 dpi).
#[derive(Parser, Debug)]
#[command(name = "proxysheet", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Card list file, one "name[,set[,number]]" entry or card url per line;
    /// the ".csv" extension is optional
    #[arg(default_value = "input")]
    list: String,

    /// Log debug output instead of info
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose sheets from pre-rendered card images in customAssets/<NAME>
    Custom {
        /// Batch directory name under customAssets/
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    proxysheet::setup_logger(level)?;

    let output_root = Path::new("Output");
    let saved = match &cli.command {
        Some(Command::Custom { name }) => {
            proxysheet::sheets_from_directory(name, Path::new("customAssets"), output_root)?
        }
        None => {
            let client = ScryfallClient::new();
            proxysheet::sheets_from_list(&cli.list, output_root, &client)?
        }
    };
    log::info!("saved {} sheet(s)", saved.len());
    Ok(())
}
