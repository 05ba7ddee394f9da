use clap::Parser;
use std::process;
use vidplate::cli::Vidplate;
use vidplate::commands::handle_command;
use vidplate::{Config, Result, VidplateError};

fn setup_logging(config: &Config) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(config.log_filter()?)
        .parse_default_env()
        .try_init()
        .map_err(|e| VidplateError::Other(format!("Failed to setup logging: {}", e)))
}

fn main() {
    let args = Vidplate::parse();

    let result = Config::load().and_then(|config| {
        setup_logging(&config)?;
        handle_command(args, &config)
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
