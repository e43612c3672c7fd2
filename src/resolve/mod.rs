//! Resource resolution
//!
//! Decides what a request target refers to: a file under the served
//! directory, a redirect to another server, or nothing at all.

pub mod redirect;
pub mod target;

use std::path::PathBuf;

pub use redirect::RedirectTable;
pub use target::Resolver;

/// File contents read for a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedFile {
    /// Canonical path of the file
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// The single classification of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 200, file bytes in the body
    ServeFile(ServedFile),
    /// 302 with the stored URL as `Location`
    Redirect(String),
    /// 404, also used for targets escaping the served directory
    NotFound,
    /// 501, method other than GET/HEAD
    NotImplemented,
    /// 400, grammar or header policy violation
    MalformedRequest,
    /// 500, filesystem failure
    InternalError,
}
