use std::fmt;

/// The only protocol version this server answers.
pub const SUPPORTED_VERSION: &str = "HTTP/1.1";

/// HTTP request methods.
///
/// Only `GET` is served. Every other well-formed verb is still recognised so
/// the dispatcher can answer it with 501 Not Implemented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other uppercase token, kept verbatim
    Other(String),
}

impl Method {
    /// Maps a method token to a `Method`.
    ///
    /// Matching is case-sensitive; unknown tokens become `Method::Other`.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpd::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("BREW"), Method::Other("BREW".into()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed HTTP request line.
///
/// Header fields and bodies are never read, so the request line is all a
/// request carries. A `Request` only exists once every token was non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request-target, not percent-decoded (e.g. "/index.html")
    pub path: String,
    /// Protocol version token exactly as sent (e.g. "HTTP/1.1")
    pub version: String,
    /// Number of bytes read off the connection
    pub raw_size: usize,
}

impl Request {
    pub fn is_supported_version(&self) -> bool {
        self.version == SUPPORTED_VERSION
    }
}
