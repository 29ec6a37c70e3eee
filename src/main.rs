//! Automata to regular expressions

use automata_re::{Config, Result, VERSION, cli, init_logging};
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::load()?
    };

    init_logging(&args.log_level(&config), config.logging.file.as_deref())?;

    tracing::info!("automata-re v{}", VERSION);
    tracing::debug!("Parsed arguments: {:?}", args);
    tracing::debug!("Loaded configuration: {:?}", config);

    cli::execute(args, config)?;

    Ok(())
}
