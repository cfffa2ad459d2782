//! HTTP serving on top of the asset pipeline.
//!
//! The request loop runs on a rayon pool; each request is converted into an
//! [`HttpRequest`], dispatched through a [`Handler`] and the resulting
//! [`Reply`] written back through tiny_http.

mod delivery;
pub mod lifecycle;
mod request;
mod router;

pub use delivery::{ByteRange, Reply, deliver, parse_range};
pub use request::{HttpRequest, Method};
pub use router::{Handler, Mount, PrefixRouter, bind, normalize_pattern};

use std::io::Cursor;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use tiny_http::{Header, Request, Response, Server, StatusCode};

use crate::{debug, log};

/// Bound server ready to accept requests.
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    threads: usize,
}

/// Bind the HTTP server without starting the request loop.
pub fn bind_server(interface: IpAddr, port: u16, threads: usize) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(interface, port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        addr,
        threads: threads.max(1),
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking until shutdown).
    pub fn run(self, handler: Arc<dyn Handler>) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("minserve-worker-{i}"))
            .build()?;

        for request in self.server.incoming_requests() {
            let handler = Arc::clone(&handler);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, handler.as_ref()) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request.
fn handle_request(request: Request, handler: &dyn Handler) -> Result<()> {
    if lifecycle::is_shutdown() {
        return respond(request, Reply::unavailable());
    }

    let req = HttpRequest::from_tiny(&request);
    let reply = handler.handle(&req);
    debug!("serve"; "{} {} {}", req.method(), req.url(), reply.status);
    respond(request, reply)
}

/// Write `reply` to the client.
pub fn respond(request: Request, reply: Reply) -> Result<()> {
    let headers = reply
        .headers
        .iter()
        .map(|(name, value)| {
            Header::from_bytes(name.as_bytes(), value.as_bytes())
                .map_err(|_| anyhow::anyhow!("invalid header {name}: {value}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let response = Response::new(
        StatusCode(reply.status),
        headers,
        Cursor::new(reply.body),
        Some(reply.content_length),
        None,
    );
    request.respond(response)?;
    Ok(())
}
