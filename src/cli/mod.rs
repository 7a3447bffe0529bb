pub mod region;
pub mod replay;

use std::{error::Error, fs, path::PathBuf};

use clap::{Parser, Subcommand};
use region::{handle_classify, handle_grid};
use replay::handle_replay;

use crate::{
    config::{load_config, path::find_config_file},
    input::classifier::Scheme,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the remotepad service (default)
    Run {
        /// Path to the configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the region a single sample falls in
    Classify {
        /// Classification scheme to use
        #[arg(long, value_enum, default_value_t = Scheme::Side)]
        scheme: Scheme,
        /// Horizontal deflection in [-1, 1]
        #[arg(allow_hyphen_values = true)]
        x: f64,
        /// Vertical deflection in [-1, 1]
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },
    /// Print a table of regions sampled across the unit square
    Grid {
        /// Classification scheme to use
        #[arg(long, value_enum, default_value_t = Scheme::Side)]
        scheme: Scheme,
        /// Number of rows and columns
        #[arg(long, default_value_t = 9)]
        size: usize,
    },
    /// Run a recorded sample file through a tracker and print the events
    Replay {
        /// Classification scheme to use
        #[arg(long, value_enum, default_value_t = Scheme::Side)]
        scheme: Scheme,
        /// Newline-delimited JSON sample file
        file: PathBuf,
    },
    /// Print the resolved configuration
    Config {
        /// Path to the configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn main_cli(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(cmd) = args.cmd else {
        return Ok(());
    };

    match cmd {
        Commands::Run { .. } => (),
        Commands::Classify { scheme, x, y } => handle_classify(scheme, x, y),
        Commands::Grid { scheme, size } => handle_grid(scheme, size)?,
        Commands::Replay { scheme, file } => handle_replay(scheme, file)?,
        Commands::Config { config } => handle_config(config)?,
    }

    Ok(())
}

/// Print the path and contents of the configuration that would be loaded
fn handle_config(path: Option<PathBuf>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let path = match path {
        Some(path) => path,
        None => find_config_file().ok_or("No configuration file found")?,
    };
    let config = load_config(Some(&path))?;
    println!("# {}", path.display());
    print!("{}", serde_yaml::to_string(&config)?);
    let count = config.devices.len();
    println!("# {count} source device(s)");

    // Warn about files that parse but will not produce any samples
    for device in config.devices.iter() {
        if device.evdev.is_none() && device.replay.is_none() {
            eprintln!("Device '{}' has no evdev or replay section", device.id);
        }
        if let Some(replay) = device.replay.as_ref() {
            if fs::metadata(&replay.path).is_err() {
                eprintln!("Device '{}' replay file not found: {}", device.id, replay.path);
            }
        }
    }

    Ok(())
}
