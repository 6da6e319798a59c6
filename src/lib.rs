//! httpd - minimal HTTP/1.1 static file server
//!
//! Serves files, directory listings and status messages from a directory
//! tree, one request per connection.

pub mod config;
pub mod http;
pub mod server;
