// SPDX-License-Identifier: MIT
//! Static file server for the game assets.
//!
//! A stock axum router whose fallback service is [`ServeDir`] over the base
//! directory. `ServeDir` handles everything the launcher needs: GET path
//! resolution, MIME inference from the file extension, `index.html` appending
//! for directory requests, and a plain 404 for anything that does not resolve
//! to a file.
//!
//! The server has no shutdown API — the launcher owns the serving task and
//! aborts it when the process is interrupted.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use axum::Router;
use tokio::net::{TcpListener, TcpSocket};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

/// Bind the listening socket with `SO_REUSEADDR` enabled.
///
/// Address reuse lets a relaunch bind the same port immediately after a
/// previous instance exited, instead of tripping over the OS's TIME_WAIT
/// grace period with "address in use".
pub fn bind(addr: SocketAddr) -> Result<TcpListener> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    let listener = socket.listen(1024)?;
    info!(addr = %addr, "listener bound");
    Ok(listener)
}

/// Build the router: every request falls through to static file resolution
/// under `base_dir`. No other routes exist.
pub fn router(base_dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(base_dir))
        .layer(TraceLayer::new_for_http())
}

/// Serve requests until the owning task is aborted.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    axum::serve(listener, router).await?;
    Ok(())
}
