use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::http::static_files::DEFAULT_INDEX;

/// Path of an optional YAML configuration file.
pub const CONFIG_ENV: &str = "HTTPD_CONFIG";
pub const PORT_ENV: &str = "HTTPD_PORT";
pub const ROOT_ENV: &str = "HTTPD_ROOT";
pub const THREADS_ENV: &str = "HTTPD_THREADS";

/// Server configuration.
///
/// ```yaml
/// server:
///   port: 8080
///   worker_threads: 4
/// static_files:
///   root: www
///   index: index.html
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Runtime worker threads; tokio's default when unset.
    pub worker_threads: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory the server switches into and serves from.
    pub root: PathBuf,
    /// File served in place of a directory listing when present.
    pub index: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            worker_threads: None,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("www"),
            index: DEFAULT_INDEX.to_string(),
        }
    }
}

impl ServerConfig {
    /// Any IPv4 interface on the configured port.
    pub fn listen_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, self.port)
    }
}

impl Config {
    /// Loads the file named by `HTTPD_CONFIG` if set, then applies the
    /// `HTTPD_PORT`, `HTTPD_ROOT` and `HTTPD_THREADS` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses a YAML document; missing keys keep their defaults.
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("failed to parse configuration")
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(port) = std::env::var(PORT_ENV) {
            self.server.port = port
                .parse()
                .with_context(|| format!("invalid {PORT_ENV} value {port:?}"))?;
        }
        if let Ok(root) = std::env::var(ROOT_ENV) {
            self.static_files.root = PathBuf::from(root);
        }
        if let Ok(threads) = std::env::var(THREADS_ENV) {
            let threads = threads
                .parse()
                .with_context(|| format!("invalid {THREADS_ENV} value {threads:?}"))?;
            self.server.worker_threads = Some(threads);
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            bail!("port must be between 1 and 65535");
        }
        if self.server.worker_threads == Some(0) {
            bail!("worker_threads must be at least 1");
        }
        if self.static_files.index.is_empty() {
            bail!("static_files.index must not be empty");
        }
        Ok(())
    }
}
