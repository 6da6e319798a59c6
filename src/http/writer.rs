use std::io;

use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response, ResponseError};

const HTTP_VERSION: &str = "HTTP/1.1";

/// File bodies are streamed in chunks of this size.
pub const BODY_CHUNK_SIZE: usize = 4096;

/// Serializes a [`Response`] onto a stream.
///
/// The writer borrows the stream and never closes it; the owner of the
/// connection decides when to shut it down.
pub struct ResponseWriter<'a, W> {
    stream: &'a mut W,
    written: u64,
}

impl<'a, W> ResponseWriter<'a, W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(stream: &'a mut W) -> Self {
        Self { stream, written: 0 }
    }

    /// Total bytes put on the wire so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Sends status line, headers, the blank line and the body, then flushes.
    pub async fn send(&mut self, response: &mut Response) -> Result<(), ResponseError> {
        self.send_status_line(response).await?;
        self.send_headers(response).await?;
        self.end_headers().await?;
        self.send_body(response).await?;
        self.stream.flush().await?;
        Ok(())
    }

    pub async fn send_status_line(&mut self, response: &Response) -> Result<(), ResponseError> {
        let status = response.status().ok_or(ResponseError::StatusNotSet)?;
        let line = format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            status.as_u16(),
            status.reason_phrase()
        );
        self.write_fully(line.as_bytes()).await
    }

    /// Writes every queued header in order and drains the queue.
    pub async fn send_headers(&mut self, response: &mut Response) -> Result<(), ResponseError> {
        let mut buf = Vec::new();
        for header in response.headers.drain() {
            buf.extend_from_slice(header.name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(header.value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
        self.write_fully(&buf).await
    }

    pub async fn end_headers(&mut self) -> Result<(), ResponseError> {
        self.write_fully(b"\r\n").await
    }

    pub async fn send_body(&mut self, response: &mut Response) -> Result<(), ResponseError> {
        match &mut response.body {
            Body::Empty => Ok(()),
            Body::Text(text) => self.write_fully(text.as_bytes()).await,
            Body::File(body) => {
                let expected = body.len;
                let mut file = (&mut body.file).take(expected);
                let mut chunk = [0u8; BODY_CHUNK_SIZE];
                let mut sent = 0u64;

                loop {
                    let n = file.read(&mut chunk).await?;
                    if n == 0 {
                        break;
                    }
                    self.write_fully(&chunk[..n]).await?;
                    sent += n as u64;
                }

                if sent < expected {
                    return Err(ResponseError::Send(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!(
                            "{} ended after {sent} of {expected} bytes",
                            body.path.display()
                        ),
                    )));
                }
                Ok(())
            }
        }
    }

    // Partial writes are retried until the whole buffer is out.
    async fn write_fully(&mut self, buf: &[u8]) -> Result<(), ResponseError> {
        let mut written = 0;
        while written < buf.len() {
            let n = self.stream.write(&buf[written..]).await?;

            if n == 0 {
                return Err(ResponseError::Send(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "connection closed while writing",
                )));
            }

            written += n;
            self.written += n as u64;
        }

        Ok(())
    }
}
