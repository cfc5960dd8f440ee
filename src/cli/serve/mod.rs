//! Sprite server.
//!
//! `GET <route>/<namespace>.svg` answers with the sprite built for that
//! namespace. With watch enabled, a background thread rebuilds on change
//! and the next request sees the new file.

mod lifecycle;
mod path;
mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel;
use tiny_http::{Method, Request, Server};

use crate::{
    config::SpriteConfig,
    log,
    pipeline::BuildSession,
    sprite::output_path,
};

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server(config: &SpriteConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(1);
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}{}", addr, config.serve.route_prefix());

    Ok(BoundServer {
        server,
        addr,
        shutdown_rx,
    })
}

impl BoundServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking).
    pub fn run(self, session: Arc<BuildSession>) -> Result<()> {
        let watcher = session
            .config()
            .serve
            .watch
            .then(|| lifecycle::spawn_watcher(Arc::clone(&session), self.shutdown_rx));

        for request in self.server.incoming_requests() {
            if let Err(e) = handle_request(request, session.config()) {
                log!("serve"; "request error: {e}");
            }
        }

        lifecycle::wait_for_shutdown(watcher);
        Ok(())
    }
}

/// Build once, then serve until Ctrl+C.
///
/// A failed first build does not stop the server; watch mode may fix it.
pub fn serve_sprites(config: SpriteConfig) -> Result<()> {
    let session = Arc::new(BuildSession::new(config));
    if let Err(e) = session.run().and_then(super::build::check_report) {
        crate::logger::status_error("initial build failed", &format!("{e:#}"));
    }

    let bound = bind_server(session.config())?;
    bound.run(session)
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &SpriteConfig) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    let Some(namespace) = path::sprite_namespace(request.url(), config.serve.route_prefix()) else {
        return response::respond_not_found(request);
    };

    let file = output_path(&config.build.output, &namespace);
    if !file.is_file() {
        crate::debug!("serve"; "no sprite for namespace `{}`", namespace);
        return response::respond_not_found(request);
    }
    response::respond_sprite(request, &file)
}
