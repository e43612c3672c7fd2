//! Redirect table
//!
//! Maps request paths to absolute URLs on other servers. Built once at
//! startup and read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use crate::config::ConfigError;

/// Immutable mapping from a resource path to its redirect URL.
///
/// Keys are raw bytes so targets that are not UTF-8 still match.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    entries: HashMap<Vec<u8>, String>,
}

impl RedirectTable {
    /// Loads the table from a tab-separated file.
    ///
    /// Only an unreadable file fails the load. Lines with missing fields are
    /// kept with the missing parts left empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|source| ConfigError::RedirectTable {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::parse_bytes(&contents))
    }

    /// Parses `path<TAB>host<TAB>port` lines. Later lines overwrite earlier
    /// ones with the same path.
    pub fn parse(contents: &str) -> Self {
        Self::parse_bytes(contents.as_bytes())
    }

    /// Like [`RedirectTable::parse`], over raw bytes. Invalid UTF-8 in a line
    /// is replaced in the URL but kept as-is in the lookup key.
    pub fn parse_bytes(contents: &[u8]) -> Self {
        let mut entries = HashMap::new();

        for line in contents.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split(|&b| b == b'\t');
            let path = fields.next().unwrap_or_default();
            let host = String::from_utf8_lossy(fields.next().unwrap_or_default());
            let port = String::from_utf8_lossy(fields.next().unwrap_or_default());

            let url = format!("http://{host}:{port}{}", String::from_utf8_lossy(path));
            entries.insert(path.to_vec(), url);
        }

        Self { entries }
    }

    /// Looks up the redirect URL for an exact request path.
    pub fn resolve(&self, path: impl AsRef<[u8]>) -> Option<&str> {
        self.entries.get(path.as_ref()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
