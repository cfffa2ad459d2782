//! `[assets]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! root = "public"             # Directory assets are served from
//! prefix = "/static"          # URL prefix stripped before lookup
//! cache = true                # Keep transformed css/js in memory
//! minify = true               # Minify eligible assets
//! extensions = ["css", "js"]  # Extensions that are transformed and cached
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{config::ConfigDiagnostics, pipeline::PipelineOptions};

/// Asset pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Asset root, relative to the config file.
    pub root: PathBuf,

    /// URL prefix removed from request paths.
    pub prefix: Option<String>,

    /// Cache transformed assets.
    pub cache: bool,

    /// Register the built-in minifier.
    pub minify: bool,

    /// Eligible extensions.
    pub extensions: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let options = PipelineOptions::default();
        Self {
            root: "public".into(),
            prefix: options.prefix,
            cache: options.caching,
            minify: options.minify,
            extensions: options.extensions,
        }
    }
}

impl AssetsConfig {
    /// Lowercase extensions and strip leading dots; drop duplicates.
    pub fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.extensions.len());
        for ext in &self.extensions {
            let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
            if !seen.contains(&ext) {
                seen.push(ext);
            }
        }
        self.extensions = seen;
        self.prefix = self.prefix.take().filter(|p| !p.trim().is_empty());
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error_with_hint(
                "assets.extensions",
                "at least one extension is required",
                "extensions = [\"css\", \"js\"]",
            );
        }
        if self.extensions.iter().any(String::is_empty) {
            diag.error("assets.extensions", "empty extension");
        }
    }

    /// Check the (already resolved) root is an existing directory.
    pub fn validate_root(&self, diag: &mut ConfigDiagnostics) {
        if !self.root.is_dir() {
            diag.error(
                "assets.root",
                format!("`{}` is not a directory", self.root.display()),
            );
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            caching: self.cache,
            prefix: self.prefix.clone(),
            extensions: self.extensions.clone(),
            minify: self.minify,
        }
    }
}
