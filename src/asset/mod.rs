//! Asset handles, backing lookup, transforms and the transformed-asset cache.

mod cache;
mod error;
mod handle;
pub mod minify;
mod source;
mod transform;

pub use cache::AssetCache;
pub use error::{AssetError, AssetResult};
pub use handle::{AssetHandle, AssetMeta};
pub use minify::Minify;
pub use source::{DirFileSystem, FileSystem, MemoryFileSystem, OpenedFile};
pub use transform::{Transform, TransformChain};
