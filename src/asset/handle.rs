//! In-memory asset handle.

use std::{
    io::{self, Cursor, Read, Seek, SeekFrom},
    path::Path,
    sync::Arc,
    time::SystemTime,
};

use super::{AssetError, AssetResult, FileSystem};
use crate::utils::hash;

/// Metadata captured when the backing file is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMeta {
    pub name: String,
    pub len: u64,
    pub modified: SystemTime,
    pub mode: u32,
    pub is_dir: bool,
}

/// A seekable in-memory byte source plus metadata.
///
/// Transforms rewrite content through [`AssetHandle::replace_source`];
/// metadata is never touched after construction. Clones share the byte
/// buffer but carry their own read position.
#[derive(Debug, Clone)]
pub struct AssetHandle {
    meta: AssetMeta,
    source: Cursor<Arc<[u8]>>,
    /// Entity tag of `source`, set by [`Self::store_etag`].
    etag: Option<Arc<str>>,
}

impl AssetHandle {
    pub fn new(meta: AssetMeta, content: impl Into<Arc<[u8]>>) -> Self {
        Self {
            meta,
            source: Cursor::new(content.into()),
            etag: None,
        }
    }

    /// Open `path` on `fs` and read its whole content eagerly.
    pub fn open(fs: &dyn FileSystem, path: &str) -> AssetResult<Self> {
        let mut file = fs.open(path).map_err(|e| AssetError::from_io(path, e))?;

        let mut content = Vec::with_capacity(file.meta.len as usize);
        if !file.meta.is_dir {
            file.reader
                .read_to_end(&mut content)
                .map_err(|e| AssetError::from_io(path, e))?;
        }
        Ok(Self::new(file.meta, content))
    }

    /// Swap the underlying content. The read position returns to 0 and any
    /// stored entity tag is dropped.
    pub fn replace_source(&mut self, content: impl Into<Arc<[u8]>>) {
        self.source = Cursor::new(content.into());
        self.etag = None;
    }

    /// A copy of this handle positioned at offset 0.
    pub fn rewound(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            source: Cursor::new(Arc::clone(self.source.get_ref())),
            etag: self.etag.clone(),
        }
    }

    /// Hash the current content once and keep the tag with the handle.
    pub fn store_etag(&mut self) {
        self.etag = Some(hash::etag(self.content()).into());
    }

    pub fn stored_etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Quoted entity tag of the current content.
    pub fn etag(&self) -> Arc<str> {
        match &self.etag {
            Some(tag) => Arc::clone(tag),
            None => hash::etag(self.content()).into(),
        }
    }

    /// Current content, regardless of read position.
    pub fn content(&self) -> &[u8] {
        self.source.get_ref()
    }

    /// Length of the current content (may differ from [`Self::len`] after a transform).
    pub fn content_len(&self) -> u64 {
        self.source.get_ref().len() as u64
    }

    pub fn meta(&self) -> &AssetMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Size as reported by the backing file at open time.
    pub fn len(&self) -> u64 {
        self.meta.len
    }

    pub fn is_empty(&self) -> bool {
        self.meta.len == 0
    }

    pub fn mode(&self) -> u32 {
        self.meta.mode
    }

    pub fn modified(&self) -> SystemTime {
        self.meta.modified
    }

    pub fn is_dir(&self) -> bool {
        self.meta.is_dir
    }

    /// Lowercased extension of the file name, without the dot.
    pub fn ext(&self) -> Option<String> {
        Path::new(&self.meta.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

impl Read for AssetHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.source.read(buf)
    }
}

impl Seek for AssetHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.source.seek(pos)
    }
}
