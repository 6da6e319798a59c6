use std::net::SocketAddrV4;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{error, info};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::static_files::StaticFiles;

/// Requested accept backlog. The kernel clamps it to its own maximum.
const LISTEN_BACKLOG: u32 = i32::MAX as u32;

const ACCEPT_ERROR_PAUSE: Duration = Duration::from_millis(100);

/// Binds an IPv4 listener with `SO_REUSEADDR` set.
pub fn bind(addr: SocketAddrV4) -> std::io::Result<TcpListener> {
    let socket = TcpSocket::new_v4()?;
    socket.set_reuseaddr(true)?;
    socket.bind(addr.into())?;
    socket.listen(LISTEN_BACKLOG)
}

/// Binds the configured port and serves the working directory forever.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let addr = cfg.server.listen_addr();
    let listener = bind(addr).with_context(|| format!("failed to listen on {addr}"))?;
    info!("Listening on {}", addr);

    let files = Arc::new(StaticFiles::from_config(".", &cfg.static_files));
    serve(listener, files).await
}

/// Accepts connections until the process ends, one task per connection.
///
/// Nothing limits the number of live connections.
pub async fn serve(listener: TcpListener, files: Arc<StaticFiles>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "Failed to accept connection");
                tokio::time::sleep(ACCEPT_ERROR_PAUSE).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let files = Arc::clone(&files);
        tokio::spawn(async move {
            let conn = Connection::new(socket, files).with_peer(peer.to_string());
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
