use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tokio::sync::mpsc;

use remotepad::cli::{main_cli, Args, Commands};
use remotepad::config::load_config;
use remotepad::input::{output::EventOutput, service};

/// Size of the buffer between the pad manager and the event writer
const OUTPUT_BUFFER_SIZE: usize = 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();

    let config_path = match args.cmd {
        None => None,
        Some(Commands::Run { config }) => config,
        Some(cmd) => return main_cli(Args { cmd: Some(cmd) }).await,
    };

    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting remotepad v{}", VERSION);

    // Setup CTRL+C handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Unable to listen for shutdown signal: {e}");
            return;
        }
        log::info!("Shutting down");
        process::exit(0);
    });

    run_service(config_path).await?;

    log::info!("remotepad stopped");

    Ok(())
}

/// Load the configuration and run the service until every source stops
async fn run_service(config_path: Option<PathBuf>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = load_config(config_path.as_deref())?;
    log::info!("Loaded config '{}' with {} device(s)", config.name, config.devices.len());

    let (tx, rx) = mpsc::channel(OUTPUT_BUFFER_SIZE);
    let output = EventOutput::new(config.output_format(), rx);

    let (service_result, output_result) = tokio::join!(service::run(&config, tx), output.run());

    match service_result {
        Ok(_) => {
            log::info!("The pad service has exited");
        }
        Err(service_err) => {
            log::error!("Error running the pad service: {service_err}");
            return Err(service_err);
        }
    }

    if let Err(output_err) = output_result {
        log::error!("Error writing region events: {output_err}");
        return Err(Box::new(output_err));
    }

    Ok(())
}
