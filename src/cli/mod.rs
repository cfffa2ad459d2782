//! Command-line interface module.

mod args;
pub mod minify;
pub mod serve;

pub use args::{Cli, Commands, ServeArgs};
