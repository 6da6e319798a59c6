use httpd::http::parser::{ParseError, parse_request_line, read_request};
use httpd::http::request::Method;
use tokio::io::AsyncWriteExt;

fn assert_malformed(input: &[u8]) {
    let result = parse_request_line(input);
    assert!(
        matches!(result, Err(ParseError::MalformedRequestLine(_))),
        "expected malformed for {:?}, got {:?}",
        String::from_utf8_lossy(input),
        result
    );
}

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.raw_size, req.len());
}

#[test]
fn test_parse_without_line_terminator() {
    let parsed = parse_request_line(b"GET /index.html HTTP/1.0").unwrap();

    assert_eq!(parsed.path, "/index.html");
    assert_eq!(parsed.version, "HTTP/1.0");
}

#[test]
fn test_parse_keeps_tokens_verbatim() {
    let lines = [
        ("GET", "/search?q=rust%20lang", "HTTP/1.1"),
        ("DELETE", "/a/b/c/", "HTTP/2"),
        ("BREW", "*", "HTCPCP/1.0"),
        ("POST", "http://example.com/x", "HTTP/1.1"),
    ];

    for (method, target, version) in lines {
        let line = format!("{method} {target} {version}\n");
        let parsed = parse_request_line(line.as_bytes()).unwrap();
        assert_eq!(parsed.method.as_str(), method);
        assert_eq!(parsed.path, target);
        assert_eq!(parsed.version, version);
    }
}

#[test]
fn test_parse_various_http_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
        ("PURGE", Method::Other("PURGE".to_string())),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} / HTTP/1.1\r\n\r\n", method_str);
        let parsed = parse_request_line(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, expected_method);
    }
}

#[test]
fn test_parse_headers_are_ignored() {
    let req = b"GET /path HTTP/1.1\r\nHost: example.com\r\nBrokenHeader\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.path, "/path");
}

#[test]
fn test_parse_no_separators() {
    assert_malformed(b"XYZ");
}

#[test]
fn test_parse_empty_input() {
    assert_malformed(b"");
}

#[test]
fn test_parse_lowercase_method() {
    assert_malformed(b"get / HTTP/1.1\r\n");
}

#[test]
fn test_parse_missing_target() {
    assert_malformed(b"GET ");
    assert_malformed(b"GET \r\n");
    assert_malformed(b"GET  HTTP/1.1\r\n");
}

#[test]
fn test_parse_missing_version() {
    assert_malformed(b"GET /");
    assert_malformed(b"GET / ");
    assert_malformed(b"GET / \r\n");
    assert_malformed(b"GET /\r\n");
}

#[test]
fn test_parse_tab_is_not_a_separator() {
    assert_malformed(b"GET\t/ HTTP/1.1\r\n");
}

#[test]
fn test_parse_nul_ends_target() {
    assert_malformed(b"GET /a\0b HTTP/1.1");
}

#[test]
fn test_parse_invalid_utf8_target() {
    assert_malformed(b"GET /\xff\xfe HTTP/1.1\r\n");
}

#[tokio::test]
async fn test_read_request_from_stream() {
    let mut input: &[u8] = b"GET /notes.txt HTTP/1.1\r\nHost: localhost\r\n\r\n";
    let parsed = read_request(&mut input).await.unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/notes.txt");
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[tokio::test]
async fn test_read_request_end_of_stream_is_malformed() {
    let mut input: &[u8] = b"";
    let result = read_request(&mut input).await;

    assert!(matches!(result, Err(ParseError::MalformedRequestLine(_))));
}

#[tokio::test]
async fn test_read_request_truncated_line() {
    let mut input: &[u8] = b"GET /notes.txt";
    let result = read_request(&mut input).await;

    assert!(matches!(result, Err(ParseError::MalformedRequestLine(_))));
}

#[tokio::test]
async fn test_read_request_long_target() {
    let target = format!("/{}", "a".repeat(20_000));
    let line = format!("GET {target} HTTP/1.1\r\n");
    let mut input: &[u8] = line.as_bytes();

    let parsed = read_request(&mut input).await.unwrap();
    assert_eq!(parsed.path, target);
    assert_eq!(parsed.raw_size, line.len());
}

#[tokio::test]
async fn test_read_request_from_open_stream() {
    let (mut client, mut server) = tokio::io::duplex(1024);

    let reader = tokio::spawn(async move { read_request(&mut server).await });

    client.write_all(b"GET /late.html HTTP/1.1\r\n").await.unwrap();

    let parsed = reader.await.unwrap().unwrap();
    assert_eq!(parsed.path, "/late.html");
}
