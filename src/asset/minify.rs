//! Asset minification for JS and CSS files.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Malformed input is
//! served as-is rather than failing the request.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{AssetHandle, Transform};
use crate::debug;

/// Minify a classic script. Top-level declarations stay global, so their
/// names survive for other scripts on the page.
pub fn minify_js(source: &str) -> Option<String> {
    minify_ecmascript(source, SourceType::default().with_script(true))
}

/// Minify an ES module.
pub fn minify_module(source: &str) -> Option<String> {
    minify_ecmascript(source, SourceType::mjs())
}

fn minify_ecmascript(source: &str, source_type: SourceType) -> Option<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() || ret.panicked {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Option<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(result.code)
}

/// Minify content based on a lowercased extension.
///
/// Returns `Some(minified)` if minification succeeded, `None` otherwise.
/// `.mjs` is accepted here for the `minify` command; the serving transform
/// only rewrites `.css` and `.js`.
pub fn minify_by_ext(ext: &str, content: &str) -> Option<String> {
    match ext {
        "js" => minify_js(content),
        "mjs" => minify_module(content),
        "css" => minify_css(content),
        _ => None,
    }
}

/// Built-in transform: minify `.css` / `.js`, copy everything else.
///
/// The output is always a fresh buffer. When the minifier rejects the input
/// the original bytes are kept.
pub fn minify(mut handle: AssetHandle) -> AssetHandle {
    let ext = handle.ext();
    let output = match ext.as_deref() {
        Some(ext @ ("css" | "js")) => minify_bytes(ext, handle.content()).unwrap_or_else(|| {
            debug!("minify"; "kept original {}: input could not be minified", handle.name());
            handle.content().to_vec()
        }),
        _ => handle.content().to_vec(),
    };
    handle.replace_source(output);
    handle
}

fn minify_bytes(ext: &str, content: &[u8]) -> Option<Vec<u8>> {
    let source = std::str::from_utf8(content).ok()?;
    minify_by_ext(ext, source).map(String::into_bytes)
}

/// [`minify`] as a named chain entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minify;

impl Transform for Minify {
    fn name(&self) -> &str {
        "minify"
    }

    fn apply(&self, handle: AssetHandle) -> AssetHandle {
        minify(handle)
    }
}
