//! Request-time asset pipeline.
//!
//! ```text
//! resolve(path)
//!   ├─ clean + strip prefix      → logical path (cache key)
//!   ├─ cache hit?                → rewound cached handle
//!   ├─ open backing file         → NotFound / Io
//!   ├─ directory?                → Directory
//!   ├─ eligible extension?       → run transform chain
//!   └─ hash + cache store (eligible only)
//! ```

use std::sync::Arc;

use crate::{
    asset::{
        AssetCache, AssetError, AssetHandle, AssetResult, FileSystem, Minify, Transform,
        TransformChain,
    },
    debug,
    utils::url::{clean_path, normalize_prefix, strip_prefix},
};

/// Extensions transformed and cached unless configured otherwise.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["css", "js"];

/// Construction-time options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Cache transformed eligible assets.
    pub caching: bool,
    /// URL prefix removed before lookup (e.g. `/static`).
    pub prefix: Option<String>,
    /// Eligible extensions, without the dot.
    pub extensions: Vec<String>,
    /// Register the built-in minifier as the first chain entry.
    pub minify: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            caching: true,
            prefix: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            minify: true,
        }
    }
}

/// Resolves request paths to (possibly transformed, possibly cached) assets.
pub struct Pipeline {
    fs: Arc<dyn FileSystem>,
    cache: Arc<AssetCache>,
    chain: TransformChain,
    caching: bool,
    prefix: Option<String>,
    extensions: Vec<String>,
}

impl Pipeline {
    /// Pipeline with default options: caching on, no prefix, css/js minified.
    pub fn new(fs: impl FileSystem + 'static) -> Self {
        Self::with_options(Arc::new(fs), PipelineOptions::default())
    }

    pub fn with_options(fs: Arc<dyn FileSystem>, options: PipelineOptions) -> Self {
        let mut chain = TransformChain::new();
        if options.minify {
            chain.register(Minify);
        }
        Self {
            fs,
            cache: Arc::new(AssetCache::new()),
            chain,
            caching: options.caching,
            prefix: options.prefix.as_deref().and_then(normalize_prefix),
            extensions: options
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Share an externally owned cache.
    pub fn with_cache(mut self, cache: Arc<AssetCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.register(transform);
        self
    }

    /// Append a transform to the chain.
    pub fn register(&mut self, transform: impl Transform + 'static) {
        self.chain.register(transform);
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    pub fn chain(&self) -> &TransformChain {
        &self.chain
    }

    pub fn caching(&self) -> bool {
        self.caching
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Cache key / backing path for a request path.
    pub fn logical_path(&self, request_path: &str) -> String {
        let cleaned = clean_path(request_path);
        match &self.prefix {
            Some(prefix) => strip_prefix(&cleaned, prefix),
            None => cleaned,
        }
    }

    /// Whether `handle` gets transformed and cached.
    pub fn is_eligible(&self, handle: &AssetHandle) -> bool {
        handle
            .ext()
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }

    /// Resolve `request_path` to the handle that should be delivered.
    pub fn resolve(&self, request_path: &str) -> AssetResult<AssetHandle> {
        let path = self.logical_path(request_path);

        if self.caching
            && let Some(handle) = self.cache.get(&path)
        {
            debug!("cache"; "hit {}", path);
            return Ok(handle);
        }

        let handle = AssetHandle::open(self.fs.as_ref(), &path)?;
        if handle.is_dir() {
            return Err(AssetError::Directory(path));
        }

        if !self.is_eligible(&handle) {
            return Ok(handle);
        }

        let mut handle = self.chain.apply(handle);
        if self.caching {
            handle.store_etag();
            debug!("cache"; "store {}", path);
            self.cache.set(&path, handle.clone());
        }
        Ok(handle.rewound())
    }
}
