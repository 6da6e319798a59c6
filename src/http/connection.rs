use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::http::parser::read_request;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseError, StatusCode};
use crate::http::static_files::{ResolveError, StaticFiles};
use crate::http::writer::ResponseWriter;

/// One accepted client connection.
///
/// A connection answers exactly one request and is then shut down. There is
/// no read or write timeout, so a stalled client holds its task until the
/// peer goes away.
pub struct Connection<S> {
    stream: S,
    files: Arc<StaticFiles>,
    peer: String,
    state: ConnectionState,
}

pub enum ConnectionState {
    Accepted,
    Parsed(Request),
    Responding(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, files: Arc<StaticFiles>) -> Self {
        Self {
            stream,
            files,
            peer: "unknown".to_string(),
            state: ConnectionState::Accepted,
        }
    }

    /// Label used for the peer in log lines.
    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = peer.into();
        self
    }

    /// Reads the request, answers it and closes the stream.
    ///
    /// The stream is shut down whatever the outcome; the returned error is
    /// the one hit while sending the response, if any.
    pub async fn run(mut self) -> Result<(), ResponseError> {
        let result = self.drive().await;
        self.close().await;
        result
    }

    async fn drive(&mut self) -> Result<(), ResponseError> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Accepted => {
                    self.state = match read_request(&mut self.stream).await {
                        Ok(request) => ConnectionState::Parsed(request),
                        Err(e) => {
                            warn!(peer = %self.peer, error = %e, "Rejecting request");
                            ConnectionState::Responding(Response::message(
                                StatusCode::BAD_REQUEST,
                                "",
                            ))
                        }
                    };
                }

                ConnectionState::Parsed(request) => {
                    let response = self.dispatch(&request).await;
                    info!(
                        peer = %self.peer,
                        method = %request.method,
                        path = %request.path,
                        version = %request.version,
                        status = response.status().map(|s| s.as_u16()).unwrap_or(0),
                        "Request handled"
                    );
                    self.state = ConnectionState::Responding(response);
                }

                ConnectionState::Responding(mut response) => {
                    let mut writer = ResponseWriter::new(&mut self.stream);
                    let result = writer.send(&mut response).await;
                    debug!(
                        peer = %self.peer,
                        bytes = writer.bytes_written(),
                        "Response written"
                    );
                    // state is already Closed
                    return result;
                }

                ConnectionState::Closed => return Ok(()),
            }
        }
    }

    /// Picks the response for a successfully parsed request.
    pub async fn dispatch(&self, request: &Request) -> Response {
        if !request.is_supported_version() {
            return Response::message(StatusCode::HTTP_VERSION_NOT_SUPPORTED, "");
        }

        match request.method {
            Method::GET => self.serve_get(&request.path).await,
            _ => Response::message(StatusCode::NOT_IMPLEMENTED, ""),
        }
    }

    async fn serve_get(&self, path: &str) -> Response {
        let Some(rel) = normalize_path(path) else {
            return Response::message(StatusCode::NOT_FOUND, "");
        };

        match self.files.serve(rel).await {
            Ok(response) => response,
            Err(ResolveError::NotFound | ResolveError::NotRegularFile) => {
                Response::message(StatusCode::NOT_FOUND, "")
            }
            Err(e @ ResolveError::ResourceAccess(_)) => {
                error!(peer = %self.peer, path = %path, error = %e, "Failed to serve resource");
                Response::message(StatusCode::INTERNAL_SERVER_ERROR, "")
            }
        }
    }

    // Consuming self makes closing happen once.
    async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!(peer = %self.peer, error = %e, "Shutdown failed");
        }
    }
}

/// Turns a request target into a path relative to the served root.
///
/// The target must start with `/`; one trailing `/` is dropped, so `/docs/`
/// and `/docs` name the same directory and `/` names the root.
pub fn normalize_path(target: &str) -> Option<&str> {
    let rel = target.strip_prefix('/')?;
    Some(rel.strip_suffix('/').unwrap_or(rel))
}
