//! Static content resolution.
//!
//! Maps a request path onto the served tree and builds the response for it:
//! a regular file, a directory's index file, or a generated listing.

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use crate::config::StaticFilesConfig;
use crate::http::mime;
use crate::http::response::{escape_html, FileBody, Response, StatusCode};

pub const DEFAULT_INDEX: &str = "index.html";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("resource not found")]
    NotFound,
    #[error("resource is neither a directory nor a regular file")]
    NotRegularFile,
    #[error("cannot access resource: {0}")]
    ResourceAccess(#[source] io::Error),
}

/// How a path under the root is going to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    RegularFile(PathBuf),
    DirectoryWithIndex(PathBuf),
    DirectoryListing(PathBuf),
}

/// Serves files from a directory tree.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index: String,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: DEFAULT_INDEX.to_string(),
        }
    }

    /// Serves `root` with the index file name from `cfg`.
    pub fn from_config(root: impl Into<PathBuf>, cfg: &StaticFilesConfig) -> Self {
        Self::new(root).with_index(cfg.index.clone())
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Classifies `rel`, a path relative to the root with no leading or
    /// trailing slash. The empty path is the root itself.
    ///
    /// Paths with `..` or absolute components never leave the root; they
    /// resolve to `NotFound`. Symlinks are followed.
    pub async fn resolve(&self, rel: &str) -> Result<Resolved, ResolveError> {
        if !is_contained(rel) {
            return Err(ResolveError::NotFound);
        }

        let full = self.root.join(rel);
        let meta = fs::metadata(&full).await.map_err(classify_io)?;

        if meta.is_dir() {
            let index = full.join(&self.index);
            match fs::metadata(&index).await {
                Ok(m) if m.is_file() => Ok(Resolved::DirectoryWithIndex(index)),
                _ => Ok(Resolved::DirectoryListing(full)),
            }
        } else if meta.is_file() {
            Ok(Resolved::RegularFile(full))
        } else {
            Err(ResolveError::NotRegularFile)
        }
    }

    /// Resolves `rel` and builds the 200 response that serves it.
    pub async fn serve(&self, rel: &str) -> Result<Response, ResolveError> {
        match self.resolve(rel).await? {
            Resolved::RegularFile(path) | Resolved::DirectoryWithIndex(path) => {
                open_file(path).await
            }
            Resolved::DirectoryListing(dir) => {
                let html = render_listing(rel, &dir).await?;
                Ok(Response::html(StatusCode::OK, html))
            }
        }
    }
}

async fn open_file(path: PathBuf) -> Result<Response, ResolveError> {
    let file = fs::File::open(&path)
        .await
        .map_err(ResolveError::ResourceAccess)?;
    let meta = file
        .metadata()
        .await
        .map_err(ResolveError::ResourceAccess)?;
    if !meta.is_file() {
        return Err(ResolveError::NotRegularFile);
    }

    let content_type = mime::content_type(&path);
    Ok(Response::file(
        FileBody {
            path,
            file,
            len: meta.len(),
        },
        content_type,
    ))
}

/// Renders the HTML listing of `dir`, which is served at `/<rel>`.
///
/// The parent link comes first, then one link per entry sorted by name.
async fn render_listing(rel: &str, dir: &Path) -> Result<String, ResolveError> {
    let rel = rel.trim_end_matches('/');
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir)
        .await
        .map_err(ResolveError::ResourceAccess)?;
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(ResolveError::ResourceAccess)?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == "." {
            continue;
        }
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        entries.push((name, is_dir));
    }
    entries.sort();

    let base = if rel.is_empty() {
        String::new()
    } else {
        format!("/{rel}")
    };
    let parent = match rel.rsplit_once('/') {
        Some((parent, _)) => format!("/{parent}"),
        None => "/".to_string(),
    };
    let shown = if rel.is_empty() { "/" } else { base.as_str() };
    let title = escape_html(&format!("Index of {shown}"));

    let mut html = String::new();
    html.push_str(&format!(
        "<html><head><title>{title}</title></head><body>\n<h1>{title}</h1>\n<ul>\n"
    ));
    html.push_str(&format!(
        "<li><a href=\"{}\">Parent Directory</a></li>\n",
        escape_html(&parent)
    ));
    for (name, is_dir) in &entries {
        let href = format!("{base}/{name}");
        let label = if *is_dir {
            format!("{name}/")
        } else {
            name.clone()
        };
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&href),
            escape_html(&label)
        ));
    }
    html.push_str("</ul>\n</body></html>\n");

    Ok(html)
}

fn classify_io(err: io::Error) -> ResolveError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => ResolveError::NotFound,
        _ => ResolveError::ResourceAccess(err),
    }
}

fn is_contained(rel: &str) -> bool {
    Path::new(rel)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
