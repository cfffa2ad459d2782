//! `serve` command: mount the asset pipeline and run the HTTP server.

use std::sync::Arc;

use anyhow::Result;

use crate::{
    asset::DirFileSystem,
    config::Config,
    log,
    pipeline::Pipeline,
    serve::{self, PrefixRouter},
};

/// Serve `config.assets.root` until Ctrl+C.
pub fn serve_assets(config: &Config) -> Result<()> {
    let fs = DirFileSystem::new(&config.assets.root);
    let pipeline = Pipeline::with_options(Arc::new(fs), config.assets.pipeline_options());

    log!(
        "serve";
        "{} -> {} (cache: {}, chain: {:?})",
        serve::normalize_pattern(&config.serve.mount),
        config.assets.root.display(),
        pipeline.caching(),
        pipeline.chain()
    );

    let mut router = PrefixRouter::new();
    serve::bind(&mut router, &config.serve.mount, pipeline);

    let server = serve::bind_server(
        config.serve.interface,
        config.serve.port,
        config.serve.threads,
    )?;
    server.run(Arc::new(router))
}
