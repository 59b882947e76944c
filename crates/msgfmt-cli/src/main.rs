//! Main entry point for msgfmt.

use clap::Parser;
use msgfmt_cli::{init_logging_for, load_config, render, Cli};
use tracing::error;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging_for(&cli, &config)?;

    match render(&cli, &config) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Formatting failed");
            Err(e.into())
        }
    }
}
