//! minserve - serve static assets with on-the-fly css/js minification.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use minserve::{
    cli::{self, Cli, Commands},
    config::Config,
    logger,
    serve::lifecycle,
};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    lifecycle::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve_assets(&config),
        Commands::Minify { file, output } => cli::minify::minify_file(file, output.as_deref()),
    }
}
