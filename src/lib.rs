//! minserve - static asset serving with an in-memory minification cache.
//!
//! ```text
//! request path → clean → strip prefix → cache? ─hit──────────────→ deliver
//!                                          └miss→ open → transform → store → deliver
//! ```
//!
//! The request-time pipeline lives in [`pipeline`]; it only depends on the
//! [`asset::FileSystem`] lookup capability. HTTP framing, range and
//! conditional handling live in [`serve`].

pub mod asset;
pub mod cli;
pub mod config;
pub mod logger;
pub mod pipeline;
pub mod serve;
pub mod utils;

pub use asset::{AssetCache, AssetError, AssetHandle, Transform, TransformChain};
pub use pipeline::{Pipeline, PipelineOptions};
