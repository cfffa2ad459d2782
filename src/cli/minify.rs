//! `minify` command: run the minifier over a single file.

use std::{
    fs,
    io::Write,
    path::Path,
};

use anyhow::{Context, Result, bail};

use crate::{
    asset::{AssetHandle, DirFileSystem, minify::minify_by_ext},
    log,
};

/// Minify `file`, writing to `output` or stdout.
///
/// Unlike the serving path, malformed input is an error here.
pub fn minify_file(file: &Path, output: Option<&Path>) -> Result<()> {
    let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
        bail!("invalid file name: {}", file.display());
    };
    let dir = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let source = DirFileSystem::new(dir);
    let handle = AssetHandle::open(&source, &format!("/{name}"))
        .with_context(|| format!("failed to open {}", file.display()))?;
    if handle.is_dir() {
        bail!("{} is a directory", file.display());
    }

    let Some(ext) = handle.ext() else {
        bail!("{} has no extension", file.display());
    };
    let text = std::str::from_utf8(handle.content())
        .with_context(|| format!("{} is not valid UTF-8", file.display()))?;
    let Some(minified) = minify_by_ext(&ext, text) else {
        bail!("failed to minify {} (unsupported type or syntax error)", file.display());
    };

    match output {
        Some(path) => {
            fs::write(path, &minified)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log!(
                "minify";
                "{} -> {} ({} -> {} bytes)",
                file.display(),
                path.display(),
                handle.len(),
                minified.len()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(minified.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
