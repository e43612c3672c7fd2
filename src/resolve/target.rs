//! Target resolution
//!
//! Turns a validated request target into a file, a redirect, or an error
//! outcome.

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncReadExt;

use crate::resolve::{Outcome, RedirectTable, ServedFile};

/// Resolves request targets against a served directory and a redirect table.
///
/// Shared read-only between all connections.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: String,
    redirects: RedirectTable,
}

impl Resolver {
    pub fn new(root: impl Into<String>, redirects: RedirectTable) -> Self {
        Self {
            root: root.into(),
            redirects,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn redirects(&self) -> &RedirectTable {
        &self.redirects
    }

    /// Resolves `target`, which must start with `/`.
    ///
    /// Regular readable files are served when they live strictly inside the
    /// canonical root; anything else falls back to the redirect table keyed by
    /// the raw target.
    pub async fn resolve(&self, target: impl AsRef<[u8]>) -> Outcome {
        let target = target.as_ref();
        let candidate = self.candidate_path(target);

        match open_regular_file(&candidate).await {
            Some(file) => self.serve_file(&candidate, file).await,
            None => match self.redirects.resolve(target) {
                Some(url) => Outcome::Redirect(url.to_string()),
                None => Outcome::NotFound,
            },
        }
    }

    fn candidate_path(&self, target: &[u8]) -> PathBuf {
        if self.root == "/" {
            path_from_bytes(target)
        } else {
            let mut joined = self.root.as_bytes().to_vec();
            joined.extend_from_slice(target);
            path_from_bytes(&joined)
        }
    }

    async fn serve_file(&self, candidate: &Path, mut file: File) -> Outcome {
        let canonical = match fs::canonicalize(candidate).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(path = %candidate.display(), error = %e, "Failed to canonicalize target");
                return Outcome::InternalError;
            }
        };
        let root = match fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(root = %self.root, error = %e, "Failed to canonicalize root");
                return Outcome::InternalError;
            }
        };

        // Traversal outside the root looks exactly like a missing file.
        if canonical == root || !canonical.starts_with(&root) {
            tracing::debug!(path = %canonical.display(), "Target escapes served directory");
            return Outcome::NotFound;
        }

        let mut contents = Vec::new();
        if let Err(e) = file.read_to_end(&mut contents).await {
            tracing::warn!(path = %canonical.display(), error = %e, "Failed to read file");
            return Outcome::InternalError;
        }

        Outcome::ServeFile(ServedFile {
            path: canonical,
            contents,
        })
    }
}

async fn open_regular_file(path: impl AsRef<Path>) -> Option<File> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    File::open(path).await.ok()
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
