use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::request::{Method, Request};

/// Upper bound on the bytes read for a single request.
pub const MAX_REQUEST_SIZE: usize = 10 * 1024 * 1024;

const READ_CHUNK: usize = 4096;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line: {0}")]
    MalformedRequestLine(&'static str),
    #[error("failed to read request: {0}")]
    ReadFailure(#[from] std::io::Error),
}

/// Reads a request off `reader` and parses its request line.
///
/// Reading stops at end-of-stream, at the first short read, once a line feed
/// has arrived, or at `MAX_REQUEST_SIZE`. Nothing past that is buffered.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let buf = read_to_buffer(reader).await?;
    parse_request_line(&buf)
}

async fn read_to_buffer<R>(reader: &mut R) -> std::io::Result<BytesMut>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(READ_CHUNK);

    loop {
        let remaining = MAX_REQUEST_SIZE - buf.len();
        if remaining == 0 {
            break;
        }

        buf.reserve(READ_CHUNK.min(remaining));
        let spare = (buf.capacity() - buf.len()).min(remaining);
        let start = buf.len();

        let n = (&mut *reader).take(spare as u64).read_buf(&mut buf).await?;

        if n == 0 || n < spare || buf[start..].contains(&b'\n') {
            break;
        }
    }

    Ok(buf)
}

/// Parses `METHOD SP request-target SP version` from the start of `buf`.
///
/// Anything after the version token is ignored; header fields are not parsed.
pub fn parse_request_line(buf: &[u8]) -> Result<Request, ParseError> {
    let method_len = buf.iter().take_while(|b| b.is_ascii_uppercase()).count();
    if method_len == 0 {
        return Err(ParseError::MalformedRequestLine("missing method"));
    }
    let mut pos = method_len;

    expect_space(buf, &mut pos, "expected space after method")?;
    let path = scan_token(buf, &mut pos, "missing request target")?;
    expect_space(buf, &mut pos, "expected space after request target")?;
    let version = scan_token(buf, &mut pos, "missing protocol version")?;

    // Uppercase ASCII is always valid UTF-8.
    let method = std::str::from_utf8(&buf[..method_len])
        .map_err(|_| ParseError::MalformedRequestLine("invalid method"))?;

    Ok(Request {
        method: Method::from_token(method),
        path: path.to_string(),
        version: version.to_string(),
        raw_size: buf.len(),
    })
}

fn expect_space(buf: &[u8], pos: &mut usize, reason: &'static str) -> Result<(), ParseError> {
    match buf.get(*pos) {
        Some(b' ') => {
            *pos += 1;
            Ok(())
        }
        _ => Err(ParseError::MalformedRequestLine(reason)),
    }
}

fn scan_token<'a>(
    buf: &'a [u8],
    pos: &mut usize,
    reason: &'static str,
) -> Result<&'a str, ParseError> {
    let rest = &buf[*pos..];
    let len = rest
        .iter()
        .take_while(|&&b| !matches!(b, b' ' | b'\r' | b'\n' | 0))
        .count();
    if len == 0 {
        return Err(ParseError::MalformedRequestLine(reason));
    }
    *pos += len;

    std::str::from_utf8(&rest[..len])
        .map_err(|_| ParseError::MalformedRequestLine("token is not valid UTF-8"))
}
