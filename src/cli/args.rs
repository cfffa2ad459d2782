//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::{net::IpAddr, path::PathBuf};

/// Static asset server with css/js minification
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: minserve.toml)
    #[arg(short = 'C', long, global = true, default_value = "minserve.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the asset root over HTTP
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },

    /// Minify a single css/js file
    #[command(visible_alias = "m")]
    Minify {
        /// File to minify; the type is taken from its extension
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

/// Serve command arguments; each one overrides `minserve.toml`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Asset root directory (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// URL prefix stripped before file lookup (e.g., /static)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Router pattern the pipeline is mounted at
    #[arg(long)]
    pub mount: Option<String>,

    /// Number of request worker threads
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Cache transformed assets in memory
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub cache: Option<bool>,

    /// Minify css/js on the fly
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,
}

impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}
