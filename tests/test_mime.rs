use httpd::http::mime::{DEFAULT_MIME, content_type, from_extension};

#[test]
fn test_common_extensions() {
    assert_eq!(content_type("index.html"), "text/html");
    assert_eq!(content_type("index.htm"), "text/html");
    assert_eq!(content_type("site.css"), "text/css");
    assert_eq!(content_type("app.js"), "application/javascript");
    assert_eq!(content_type("photo.jpeg"), "image/jpeg");
    assert_eq!(content_type("photo.jpg"), "image/jpeg");
    assert_eq!(content_type("doc.pdf"), "application/pdf");
    assert_eq!(content_type("notes.txt"), "text/plain");
}

#[test]
fn test_extension_case_is_ignored() {
    assert_eq!(content_type("LOGO.PNG"), "image/png");
    assert_eq!(from_extension("Svg"), Some("image/svg+xml"));
}

#[test]
fn test_unknown_or_missing_extension_defaults_to_text_plain() {
    assert_eq!(DEFAULT_MIME, "text/plain");
    assert_eq!(content_type("Makefile"), "text/plain");
    assert_eq!(content_type("archive.xyz"), "text/plain");
    assert_eq!(content_type(".bashrc"), "text/plain");
    assert_eq!(content_type("dir.d/file"), "text/plain");
    assert_eq!(from_extension("xyz"), None);
}

#[test]
fn test_only_last_extension_counts() {
    assert_eq!(content_type("backup.html.gz"), "application/gzip");
    assert_eq!(content_type("www/docs/readme.md"), "text/markdown");
}
