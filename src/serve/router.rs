//! Request dispatch: handlers, mount points and the prefix router.

use std::sync::Arc;

use super::delivery::{Reply, deliver};
use super::request::HttpRequest;
use crate::{log, pipeline::Pipeline, utils::url::clean_path};

/// Anything that can answer a request.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &HttpRequest) -> Reply;
}

impl<F> Handler for F
where
    F: Fn(&HttpRequest) -> Reply + Send + Sync,
{
    fn handle(&self, request: &HttpRequest) -> Reply {
        self(request)
    }
}

/// A router that handlers can be attached to.
pub trait Mount {
    fn mount(&mut self, pattern: &str, handler: Arc<dyn Handler>);
}

/// Normalize a mount pattern to `/segment/` form (`/` for the root).
///
/// ```ignore
/// normalize_pattern("static")   -> "/static/"
/// normalize_pattern("/static/") -> "/static/"
/// normalize_pattern("")         -> "/"
/// ```
pub fn normalize_pattern(pattern: &str) -> String {
    match clean_path(pattern).as_str() {
        "/" => "/".to_string(),
        cleaned => format!("{cleaned}/"),
    }
}

/// Longest-prefix router; unmatched paths get 404.
#[derive(Default)]
pub struct PrefixRouter {
    /// Sorted by pattern length, longest first.
    routes: Vec<(String, Arc<dyn Handler>)>,
}

impl PrefixRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }

    fn route(&self, path: &str) -> Option<&Arc<dyn Handler>> {
        let cleaned = clean_path(path);
        self.routes
            .iter()
            .find(|(pattern, _)| {
                cleaned.starts_with(pattern.as_str())
                    || format!("{cleaned}/") == *pattern
            })
            .map(|(_, handler)| handler)
    }
}

impl Mount for PrefixRouter {
    /// Mounting the same pattern twice replaces the earlier handler.
    fn mount(&mut self, pattern: &str, handler: Arc<dyn Handler>) {
        let pattern = normalize_pattern(pattern);
        self.routes.retain(|(p, _)| *p != pattern);
        self.routes.push((pattern, handler));
        self.routes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }
}

impl Handler for PrefixRouter {
    fn handle(&self, request: &HttpRequest) -> Reply {
        match self.route(request.path()) {
            Some(handler) => handler.handle(request),
            None => Reply::not_found(),
        }
    }
}

impl Handler for Pipeline {
    fn handle(&self, request: &HttpRequest) -> Reply {
        if !request.method().is_safe() {
            return Reply::method_not_allowed();
        }

        match self.resolve(request.path()) {
            Ok(handle) => deliver(handle, request).unwrap_or_else(|e| {
                log!("error"; "{}: {}", request.path(), e);
                Reply::internal_error()
            }),
            Err(e) if e.is_not_found() => Reply::not_found(),
            Err(e) => {
                log!("error"; "{}", e);
                Reply::internal_error()
            }
        }
    }
}

/// Attach `pipeline` to `router` under `pattern`.
pub fn bind(router: &mut impl Mount, pattern: &str, pipeline: Pipeline) {
    router.mount(pattern, Arc::new(pipeline));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{FileSystem, MemoryFileSystem, OpenedFile};
    use crate::pipeline::PipelineOptions;
    use crate::serve::request::Method;
    use std::io;
    use std::time::{Duration, SystemTime};

    struct Failing;

    /// Opens every path as a plain file whose reads fail.
    struct FailingReads;

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("read failed"))
        }
    }

    impl FileSystem for FailingReads {
        fn open(&self, path: &str) -> io::Result<OpenedFile> {
            Ok(OpenedFile {
                meta: crate::asset::AssetMeta {
                    name: path.rsplit('/').next().unwrap_or_default().to_string(),
                    len: 8,
                    modified: SystemTime::UNIX_EPOCH,
                    mode: 0o644,
                    is_dir: false,
                },
                reader: Box::new(FailingReader),
            })
        }
    }

    impl FileSystem for Failing {
        fn open(&self, _path: &str) -> io::Result<OpenedFile> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn fixture() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file("static/css/hello.css", "body { color: red; }")
            .with_file("static/js/hello.js", "console.log( \"hello\" );")
            .with_file("static/image.png", vec![1u8, 2, 3])
    }

    fn static_router() -> PrefixRouter {
        let mut router = PrefixRouter::new();
        bind(&mut router, "/static", Pipeline::new(fixture()));
        router
    }

    #[test]
    fn test_normalize_pattern() {
        assert_eq!(normalize_pattern("static"), "/static/");
        assert_eq!(normalize_pattern("/static"), "/static/");
        assert_eq!(normalize_pattern("/static/"), "/static/");
        assert_eq!(normalize_pattern("/"), "/");
        assert_eq!(normalize_pattern(""), "/");
    }

    #[test]
    fn test_bound_pipeline_serves_minified() {
        let router = static_router();

        let reply = router.handle(&HttpRequest::get("/static/css/hello.css"));
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, b"body{color:red}");

        let reply = router.handle(&HttpRequest::get("/static/image.png"));
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, vec![1u8, 2, 3]);
    }

    #[test]
    fn test_missing_and_directory_are_404() {
        let router = static_router();
        for path in [
            "/static/css/missing.css",
            "/static/",
            "/static",
            "/static/css",
            "/elsewhere/a.css",
        ] {
            assert_eq!(router.handle(&HttpRequest::get(path)).status, 404, "{path}");
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut router = static_router();
        router.mount("/static/js", Arc::new(|_: &HttpRequest| Reply::text(200, "js")));

        assert_eq!(router.handle(&HttpRequest::get("/static/js/hello.js")).body, b"js");
        assert_eq!(
            router.handle(&HttpRequest::get("/static/css/hello.css")).body,
            b"body{color:red}"
        );
        assert_eq!(router.patterns().collect::<Vec<_>>(), ["/static/js/", "/static/"]);
    }

    #[test]
    fn test_remount_replaces() {
        let mut router = static_router();
        router.mount("static/", Arc::new(|_: &HttpRequest| Reply::text(200, "new")));
        assert_eq!(router.patterns().count(), 1);
        assert_eq!(router.handle(&HttpRequest::get("/static/css/hello.css")).body, b"new");
    }

    #[test]
    fn test_root_mount_with_prefix() {
        let mut router = PrefixRouter::new();
        let pipeline = Pipeline::with_options(
            Arc::new(fixture()),
            PipelineOptions {
                prefix: Some("/assets".into()),
                ..PipelineOptions::default()
            },
        );
        bind(&mut router, "/", pipeline);
        let reply = router.handle(&HttpRequest::get("/assets/static/js/hello.js"));
        assert_eq!(reply.status, 200);
        assert!(String::from_utf8_lossy(&reply.body).contains("console.log"));
    }

    #[test]
    fn test_head_and_method_not_allowed() {
        let router = static_router();

        let head = router.handle(&HttpRequest::new(Method::Head, "/static/css/hello.css"));
        assert_eq!(head.status, 200);
        assert!(head.body.is_empty());
        assert_eq!(head.content_length, 15);

        let post = router.handle(&HttpRequest::new(Method::Other, "/static/css/hello.css"));
        assert_eq!(post.status, 405);
        assert_eq!(post.header("allow"), Some("GET, HEAD"));
    }

    #[test]
    fn test_io_error_is_500() {
        let mut router = PrefixRouter::new();
        bind(&mut router, "/", Pipeline::new(Failing));
        assert_eq!(router.handle(&HttpRequest::get("/a.css")).status, 500);
    }

    #[test]
    fn test_read_error_is_500() {
        let mut router = PrefixRouter::new();
        bind(&mut router, "/", Pipeline::new(FailingReads));
        assert_eq!(router.handle(&HttpRequest::get("/a.css")).status, 500);
        assert_eq!(router.handle(&HttpRequest::get("/image.png")).status, 500);
    }

    #[test]
    fn test_path_through_a_file_is_404() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/hello.css"), "a{}").unwrap();

        let mut router = PrefixRouter::new();
        bind(&mut router, "/", Pipeline::new(crate::asset::DirFileSystem::new(dir.path())));
        let reply = router.handle(&HttpRequest::get("/css/hello.css/extra.css"));
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn test_last_modified_through_router() {
        let fs = fixture();
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        fs.insert_with_time("static/css/dated.css", "a { color: #ff0000 }", modified);
        let mut router = PrefixRouter::new();
        bind(&mut router, "/static", Pipeline::new(fs));

        let first = router.handle(&HttpRequest::get("/static/css/dated.css"));
        assert_eq!(first.status, 200);
        assert_eq!(first.body, b"a{color:red}");
        assert_eq!(
            first.header("last-modified"),
            Some("Tue, 14 Nov 2023 22:13:20 GMT")
        );

        let same = HttpRequest::get("/static/css/dated.css")
            .with_header("If-Modified-Since", "Tue, 14 Nov 2023 22:13:20 GMT");
        assert_eq!(router.handle(&same).status, 304);

        let older = HttpRequest::get("/static/css/dated.css")
            .with_header("If-Modified-Since", "Mon, 13 Nov 2023 22:13:20 GMT");
        assert_eq!(router.handle(&older).status, 200);

        // epoch-dated files carry no Last-Modified
        let undated = router.handle(&HttpRequest::get("/static/css/hello.css"));
        assert_eq!(undated.header("last-modified"), None);
    }

    #[test]
    fn test_conditional_through_router() {
        let router = static_router();
        let first = router.handle(&HttpRequest::get("/static/css/hello.css"));
        let etag = first.header("etag").unwrap().to_string();

        let req = HttpRequest::get("/static/css/hello.css").with_header("If-None-Match", &etag);
        assert_eq!(router.handle(&req).status, 304);
    }
}
