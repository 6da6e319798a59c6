use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::http::header::HeaderQueue;

/// Numeric HTTP status code.
///
/// Any `u16` can be carried; only the codes in the reason table get their
/// own phrase, every other code reads "Internal Server Error".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const CONTINUE: StatusCode = StatusCode(100);
    pub const OK: StatusCode = StatusCode(200);
    pub const MOVED_PERMANENTLY: StatusCode = StatusCode(301);
    pub const FOUND: StatusCode = StatusCode(302);
    pub const NOT_MODIFIED: StatusCode = StatusCode(304);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const NOT_IMPLEMENTED: StatusCode = StatusCode(501);
    pub const HTTP_VERSION_NOT_SUPPORTED: StatusCode = StatusCode(505);

    pub const fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the reason phrase sent after the code in the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::from_u16(418).reason_phrase(), "Internal Server Error");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            100 => "Continue",
            200 => "OK",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            501 => "Not Implemented",
            505 => "HTTP Version Not Supported",
            _ => "Internal Server Error",
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("header name must not be empty")]
    InvalidHeader,
    #[error("status code was not set before sending")]
    StatusNotSet,
    #[error("failed to send response: {0}")]
    Send(#[from] io::Error),
}

/// An opened file to be streamed as a response body.
#[derive(Debug)]
pub struct FileBody {
    pub path: PathBuf,
    pub file: tokio::fs::File,
    /// Bytes announced in `Content-Length`; never more than this is sent.
    pub len: u64,
}

/// Where the response body comes from.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    File(FileBody),
    Text(String),
}

impl Body {
    pub fn len(&self) -> u64 {
        match self {
            Body::Empty => 0,
            Body::File(file) => file.len,
            Body::Text(text) => text.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A response under construction.
///
/// The status must be set before the response is handed to a
/// [`ResponseWriter`](crate::http::writer::ResponseWriter). Headers go out in
/// the order they were pushed.
#[derive(Debug, Default)]
pub struct Response {
    status: Option<StatusCode>,
    pub headers: HeaderQueue,
    pub body: Body,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: impl Into<StatusCode>) {
        self.status = Some(status.into());
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Queues a header. Empty names are refused with `InvalidHeader`.
    pub fn push_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ResponseError> {
        if self.headers.push(name, value) {
            Ok(())
        } else {
            Err(ResponseError::InvalidHeader)
        }
    }

    pub fn set_body(&mut self, body: Body) {
        self.body = body;
    }

    /// A generated `text/html` response.
    ///
    /// Empty `text` yields an empty body; anything else is wrapped in a
    /// minimal HTML document titled with the status line.
    pub fn message(status: StatusCode, text: &str) -> Self {
        if text.is_empty() {
            return Self::with_body(status, "text/html", Body::Text(String::new()));
        }

        let html = format!(
            "<html><head><title>{code} {reason}</title></head><body><h1>{text}</h1></body></html>\n",
            code = status.as_u16(),
            reason = status.reason_phrase(),
            text = escape_html(text),
        );
        Self::html(status, html)
    }

    /// A response carrying an already rendered HTML document.
    pub fn html(status: StatusCode, html: String) -> Self {
        Self::with_body(status, "text/html", Body::Text(html))
    }

    /// A 200 response streaming `file`.
    pub fn file(file: FileBody, content_type: &str) -> Self {
        Self::with_body(StatusCode::OK, content_type, Body::File(file))
    }

    fn with_body(status: StatusCode, content_type: &str, body: Body) -> Self {
        let mut response = Self::new();
        response.set_status(status);
        response.headers.push("Content-Type", content_type);
        response.headers.push("Content-Length", body.len().to_string());
        response.headers.push("Connection", "close");
        response.body = body;
        response
    }
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
