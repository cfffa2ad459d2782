//! Ordered transform chain.

use std::{fmt, sync::Arc};

use super::AssetHandle;

/// A content transform: consumes a handle, returns it with content rewritten.
///
/// Implementations must be deterministic; cached output is reused verbatim.
pub trait Transform: Send + Sync {
    fn name(&self) -> &str {
        "anonymous"
    }

    fn apply(&self, handle: AssetHandle) -> AssetHandle;
}

impl<F> Transform for F
where
    F: Fn(AssetHandle) -> AssetHandle + Send + Sync,
{
    fn apply(&self, handle: AssetHandle) -> AssetHandle {
        self(handle)
    }
}

/// Transforms applied in registration order.
#[derive(Clone, Default)]
pub struct TransformChain {
    entries: Vec<Arc<dyn Transform>>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, transform: impl Transform + 'static) {
        self.entries.push(Arc::new(transform));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every entry over `handle`, each one consuming the previous output.
    pub fn apply(&self, handle: AssetHandle) -> AssetHandle {
        self.entries
            .iter()
            .fold(handle, |handle, entry| entry.apply(handle))
    }
}

impl fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|t| t.name()))
            .finish()
    }
}
