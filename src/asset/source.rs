//! Backing file lookup.
//!
//! The pipeline depends only on [`FileSystem`]: given a cleaned, rooted path
//! it yields metadata plus a reader, or an `io::ErrorKind::NotFound` error.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::{
    fs,
    io::{self, Read},
    path::{Component, Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    time::SystemTime,
};

use super::AssetMeta;

/// An opened backing file: metadata captured at open time plus its content.
pub struct OpenedFile {
    pub meta: AssetMeta,
    pub reader: Box<dyn Read + Send>,
}

/// Minimal file lookup capability consumed by the pipeline.
pub trait FileSystem: Send + Sync {
    /// Open `path` (rooted, already cleaned, `/` separated).
    fn open(&self, path: &str) -> io::Result<OpenedFile>;
}

// ============================================================================
// DirFileSystem
// ============================================================================

/// Serves files from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFileSystem {
    root: PathBuf,
}

impl DirFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a rooted request path onto the directory.
    ///
    /// Only normal components are kept, so the result never leaves `root`.
    fn local_path(&self, path: &str) -> io::Result<PathBuf> {
        if path.contains('\0') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid character in file path",
            ));
        }
        let mut local = self.root.clone();
        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => local.push(part),
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        "path escapes serve root",
                    ));
                }
            }
        }
        Ok(local)
    }
}

impl FileSystem for DirFileSystem {
    fn open(&self, path: &str) -> io::Result<OpenedFile> {
        let local = self.local_path(path)?;
        let metadata = fs::metadata(&local).map_err(not_a_directory_as_missing)?;
        let meta = AssetMeta {
            name: file_name(&local, path),
            len: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            mode: file_mode(&metadata),
            is_dir: metadata.is_dir(),
        };

        let reader: Box<dyn Read + Send> = if meta.is_dir {
            Box::new(io::empty())
        } else {
            Box::new(fs::File::open(&local)?)
        };
        Ok(OpenedFile { meta, reader })
    }
}

/// A file used as a directory (`a.css/b.css`) names nothing.
fn not_a_directory_as_missing(err: io::Error) -> io::Error {
    if err.kind() == io::ErrorKind::NotADirectory {
        io::Error::new(io::ErrorKind::NotFound, err)
    } else {
        err
    }
}

fn file_name(local: &Path, path: &str) -> String {
    local
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.to_string())
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

// ============================================================================
// MemoryFileSystem
// ============================================================================

/// In-memory file lookup with an `open` call counter.
///
/// Directories are implied by file paths: `css/a.css` makes `/css` a directory.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: RwLock<FxHashMap<String, (Vec<u8>, SystemTime)>>,
    opens: AtomicUsize,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file.
    pub fn insert(&self, path: &str, content: impl Into<Vec<u8>>) {
        self.insert_with_time(path, content, SystemTime::UNIX_EPOCH);
    }

    /// Insert or replace a file with an explicit modification time.
    pub fn insert_with_time(&self, path: &str, content: impl Into<Vec<u8>>, modified: SystemTime) {
        self.files
            .write()
            .insert(normalize_key(path), (content.into(), modified));
    }

    pub fn with_file(self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Number of `open` calls served so far (hits and misses).
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn is_dir(&self, key: &str) -> bool {
        if key == "/" {
            return true;
        }
        let dir_prefix = format!("{key}/");
        self.files.read().keys().any(|k| k.starts_with(&dir_prefix))
    }
}

impl FileSystem for MemoryFileSystem {
    fn open(&self, path: &str) -> io::Result<OpenedFile> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let key = normalize_key(path);
        let name = key.rsplit('/').next().unwrap_or_default().to_string();

        if let Some((content, modified)) = self.files.read().get(&key) {
            return Ok(OpenedFile {
                meta: AssetMeta {
                    name,
                    len: content.len() as u64,
                    modified: *modified,
                    mode: 0o644,
                    is_dir: false,
                },
                reader: Box::new(io::Cursor::new(content.clone())),
            });
        }

        if self.is_dir(&key) {
            return Ok(OpenedFile {
                meta: AssetMeta {
                    name,
                    len: 0,
                    modified: SystemTime::UNIX_EPOCH,
                    mode: 0o755,
                    is_dir: true,
                },
                reader: Box::new(io::empty()),
            });
        }

        Err(io::Error::new(io::ErrorKind::NotFound, key))
    }
}

fn normalize_key(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}
