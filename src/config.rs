use std::path::{Path, PathBuf};

use clap::Parser;

const DEFAULT_PORT: &str = "8080";

/// Default cap on the bytes buffered for a single request head.
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("not a regular file: {}", .0.display())]
    NotARegularFile(PathBuf),

    #[error("not a valid port: {0:?}")]
    InvalidPort(String),

    #[error("unable to read redirect table {}: {}", .path.display(), .source)]
    RedirectTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(version, about = "Minimal HTTP/1.1 file server with redirects")]
pub struct Args {
    /// Directory to serve files from
    pub directory: String,

    /// Tab-separated redirect table (path, host, port per line)
    pub redirects: PathBuf,

    /// Port to listen on
    pub port: Option<String>,

    /// Address to bind
    #[arg(long, env = "PORTICO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Maximum size in bytes of a request head
    #[arg(long, env = "PORTICO_MAX_REQUEST_SIZE", default_value_t = DEFAULT_MAX_REQUEST_SIZE)]
    pub max_request_size: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub root: String,
    pub redirects: PathBuf,
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

impl Config {
    /// Validates parsed arguments against the filesystem.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let root = normalize_root(args.directory);
        if !Path::new(&root).is_dir() {
            return Err(ConfigError::NotADirectory(PathBuf::from(root)));
        }

        if !args.redirects.is_file() {
            return Err(ConfigError::NotARegularFile(args.redirects));
        }

        let port_str = args.port.unwrap_or_else(|| DEFAULT_PORT.to_string());
        let port = port_str
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port_str.clone()))?;

        Ok(Self {
            root,
            redirects: args.redirects,
            host: args.host,
            port,
            max_request_size: args.max_request_size,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn normalize_root(mut directory: String) -> String {
    if directory.len() > 1 && directory.ends_with('/') {
        directory.pop();
    }
    directory
}
