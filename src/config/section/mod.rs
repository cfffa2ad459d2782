//! Configuration section definitions.
//!
//! Each module corresponds to a section in `minserve.toml`:
//!
//! | Module   | TOML Section | Purpose                             |
//! |----------|--------------|-------------------------------------|
//! | `assets` | `[assets]`   | Asset root, prefix, cache, minify   |
//! | `serve`  | `[serve]`    | HTTP server                         |

mod assets;
mod serve;

pub use assets::AssetsConfig;
pub use serve::ServeConfig;
