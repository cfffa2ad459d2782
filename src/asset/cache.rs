//! Transformed asset cache keyed by logical request path.

use dashmap::DashMap;

use super::AssetHandle;

/// Thread-safe map from logical path to a finalized handle.
///
/// Writes take the shard's exclusive lock, reads a shared one. Two requests
/// missing the same key may both build it; the last `set` wins.
#[derive(Debug, Default)]
pub struct AssetCache {
    assets: DashMap<String, AssetHandle>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self {
            assets: DashMap::new(),
        }
    }

    /// Cached handle for `key`, rewound to offset 0.
    pub fn get(&self, key: &str) -> Option<AssetHandle> {
        self.assets.get(key).map(|entry| entry.rewound())
    }

    pub fn set(&self, key: &str, handle: AssetHandle) {
        self.assets.insert(key.to_string(), handle);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.assets.contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<AssetHandle> {
        self.assets.remove(key).map(|(_, handle)| handle)
    }

    pub fn clear(&self) {
        self.assets.clear();
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetMeta;
    use std::io::Read;
    use std::sync::Arc;
    use std::time::SystemTime;

    fn handle(name: &str, content: &str) -> AssetHandle {
        AssetHandle::new(
            AssetMeta {
                name: name.to_string(),
                len: content.len() as u64,
                modified: SystemTime::UNIX_EPOCH,
                mode: 0o644,
                is_dir: false,
            },
            content.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_cache_get_set() {
        let cache = AssetCache::new();
        assert!(cache.get("/a.css").is_none());

        cache.set("/a.css", handle("a.css", "a{}"));
        assert!(cache.contains("/a.css"));
        assert_eq!(cache.get("/a.css").unwrap().content(), b"a{}");
    }

    #[test]
    fn test_cache_overwrite() {
        let cache = AssetCache::new();
        cache.set("/a.css", handle("a.css", "old"));
        cache.set("/a.css", handle("a.css", "new"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/a.css").unwrap().content(), b"new");
    }

    #[test]
    fn test_cache_get_is_rewound() {
        let cache = AssetCache::new();
        let mut h = handle("a.js", "abcdef");
        let mut buf = [0u8; 4];
        h.read_exact(&mut buf).unwrap();
        cache.set("/a.js", h);

        for _ in 0..2 {
            let mut out = String::new();
            cache.get("/a.js").unwrap().read_to_string(&mut out).unwrap();
            assert_eq!(out, "abcdef");
        }
    }

    #[test]
    fn test_cache_remove_clear() {
        let cache = AssetCache::new();
        cache.set("/a.css", handle("a.css", "a"));
        cache.set("/b.css", handle("b.css", "b"));

        assert!(cache.remove("/a.css").is_some());
        assert!(!cache.contains("/a.css"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_concurrent_set() {
        let cache = Arc::new(AssetCache::new());
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for j in 0..100 {
                        let key = format!("/{}.css", j % 10);
                        cache.set(&key, handle("x.css", &i.to_string()));
                        assert!(cache.get(&key).is_some());
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(cache.len(), 10);
    }
}
