//! Configuration management for `minserve.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── assets     # [assets]
//! │   └── serve      # [serve]
//! ├── error          # ConfigError, ConfigDiagnostics
//! └── mod.rs         # Config (this file)
//! ```
//!
//! A missing config file is not an error: every field has a default, and
//! command-line flags override whatever the file sets.

mod error;
pub mod section;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use section::{AssetsConfig, ServeConfig};

use crate::{
    cli::{Cli, Commands, ServeArgs},
    debug, log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing minserve.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory relative paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Asset pipeline settings
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// The root is the config file's parent directory, or the current
    /// directory when no config file exists.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = cwd.join(&cli.config);

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            debug!("config"; "{} not found, using defaults", cli.config.display());
            Self::default()
        };

        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        if let Commands::Serve { args } = &cli.command {
            config.apply_serve_args(args, &cwd);
        }

        config.finalize();
        config.validate(cli.is_serve())?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Join a path with the config root. Absolute paths are kept.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    // ========================================================================
    // CLI options
    // ========================================================================

    /// Apply serve command overrides. `--root` is relative to `cwd`.
    fn apply_serve_args(&mut self, args: &ServeArgs, cwd: &Path) {
        let root = args.root.as_ref().map(|r| cwd.join(r));
        Self::update_option(&mut self.assets.root, root.as_ref());
        Self::update_option(&mut self.serve.interface, args.interface.as_ref());
        Self::update_option(&mut self.serve.port, args.port.as_ref());
        Self::update_option(&mut self.serve.threads, args.threads.as_ref());
        Self::update_option(&mut self.serve.mount, args.mount.as_ref());
        Self::update_option(&mut self.assets.cache, args.cache.as_ref());
        Self::update_option(&mut self.assets.minify, args.minify.as_ref());
        if args.prefix.is_some() {
            self.assets.prefix = args.prefix.clone();
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize values and resolve paths against the root.
    fn finalize(&mut self) {
        self.assets.normalize();
        self.assets.root = self.root_join(&self.assets.root);
    }

    /// Validate configuration. Collects all errors and returns them at once.
    pub fn validate(&self, check_root: bool) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.serve.validate(&mut diag);
        self.assets.validate(&mut diag);
        if check_root {
            self.assets.validate_root(&mut diag);
        }

        diag.into_result()
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::net::{IpAddr, Ipv4Addr};
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("minserve").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(Config::parse_with_ignored("[serve\nport = 1").is_err());
    }

    #[test]
    fn test_parse_wrong_type() {
        assert!(Config::parse_with_ignored("[serve]\nport = \"http\"").is_err());
    }

    #[test]
    fn test_load_surfaces_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minserve.toml");
        fs::write(&path, "[serve]\nport = \"http\"").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let err = Config::load(&cli(&["-C", &path_str, "minify", "a.css"])).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.serve.port, 5277);
        assert_eq!(config.assets.extensions, ["css", "js"]);
        assert!(config.validate(false).is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let (_, ignored) =
            Config::parse_with_ignored("[serve]\nport = 1\nwatch = true\n[deploy]\nx = 1")
                .unwrap();
        assert!(ignored.iter().any(|f| f == "serve.watch"));
        assert!(ignored.iter().any(|f| f.starts_with("deploy")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) =
            Config::parse_with_ignored("[serve]\nport = 1\n[assets]\nminify = false").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_load_file_with_cli_overrides() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("web")).unwrap();
        let path = dir.path().join("minserve.toml");
        fs::write(
            &path,
            "[serve]\nport = 9000\n[assets]\nroot = \"web\"\nextensions = [\".CSS\", \"js\"]",
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config = Config::load(&cli(&[
            "-C", &path_str, "serve", "-p", "9100", "--prefix", "/static", "--cache", "false",
        ]))
        .unwrap();

        assert_eq!(config.serve.port, 9100);
        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.root, dir.path());
        assert_eq!(config.assets.root, dir.path().join("web"));
        assert_eq!(config.assets.extensions, ["css", "js"]);
        assert_eq!(config.assets.prefix.as_deref(), Some("/static"));
        assert!(!config.assets.cache);
        assert!(config.assets.minify);
    }

    #[test]
    fn test_load_rejects_missing_root_for_serve() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minserve.toml");
        fs::write(&path, "[assets]\nroot = \"nope\"").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let err = Config::load(&cli(&["-C", &path_str, "serve"])).unwrap_err();
        assert!(err.to_string().contains("assets.root"));

        // minify does not need the asset root
        assert!(Config::load(&cli(&["-C", &path_str, "minify", "a.css"])).is_ok());
    }

    #[test]
    fn test_load_rejects_zero_threads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minserve.toml");
        fs::write(&path, "[serve]\nthreads = 0").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let err = Config::load(&cli(&["-C", &path_str, "minify", "a.css"])).unwrap_err();
        assert!(err.to_string().contains("serve.threads"));
    }
}
