use std::borrow::Cow;
use std::collections::HashMap;

/// HTTP request methods.
///
/// Only GET and HEAD are served. Anything else is carried as `Other` so the
/// connection can answer 501 Not Implemented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// Any other method token, as sent
    Other(String),
}

impl Method {
    /// Returns `true` for the methods this server implements.
    pub fn is_supported(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::Other(s) => s,
        }
    }
}

impl From<&str> for Method {
    /// Method tokens are case-sensitive: `"get"` is an unknown method.
    ///
    /// # Example
    ///
    /// ```
    /// # use portico::http::request::Method;
    /// assert_eq!(Method::from("GET"), Method::GET);
    /// assert_eq!(Method::from("get"), Method::Other("get".to_string()));
    /// ```
    fn from(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            other => Method::Other(other.to_string()),
        }
    }
}

/// A request that matched the accepted grammar in full.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The raw request target, always starting with `/`
    pub target: Vec<u8>,
    /// HTTP version, always `HTTP/1.1`
    pub version: String,
    /// Header fields keyed by lowercased name, non-UTF-8 bytes replaced
    pub headers: HashMap<String, String>,
}

impl Request {
    /// Retrieves a header value by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Whether the client asked for the connection to be closed.
    ///
    /// HTTP/1.1 defaults to keep-alive, so only an explicit
    /// `Connection: close` counts.
    pub fn wants_close(&self) -> bool {
        self.header("Connection")
            .map(|v| v.eq_ignore_ascii_case("close"))
            .unwrap_or(false)
    }

    /// The target for display, with invalid UTF-8 replaced.
    pub fn target_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.target)
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}
